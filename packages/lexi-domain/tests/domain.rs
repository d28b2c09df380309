use lexi_config::{AliasBoost, AliasGroup};
use lexi_domain::{
	AliasTable, Intent, KnowledgeBase, Language, detect_language, normalize, tokenize,
};

#[test]
fn knowledge_base_tolerates_missing_lists() {
	let raw = r#"{ "intents": [ { "tag": "greeting" }, { "tag": "acne", "patterns": ["what causes pimples"] } ] }"#;
	let kb: KnowledgeBase = serde_json::from_str(raw).expect("Failed to parse knowledge base.");

	assert_eq!(kb.intents.len(), 2);
	assert!(kb.intents[0].patterns.is_empty());
	assert!(kb.intents[0].responses.is_empty());
	assert_eq!(kb.intents[1].primary_response(), "");
}

#[test]
fn empty_document_is_an_empty_knowledge_base() {
	let kb: KnowledgeBase = serde_json::from_str("{}").expect("Failed to parse knowledge base.");

	assert!(kb.is_empty());
}

#[test]
fn primary_response_is_the_first_response() {
	let intent = Intent::new("acne", &[], &["First answer.", "Second answer."]);

	assert_eq!(intent.primary_response(), "First answer.");
}

#[test]
fn normalized_query_and_corpus_text_share_tokens() {
	let query = normalize("WHAT causes ACNE??");
	let pattern = normalize("What causes acne");

	assert_eq!(query, pattern);
	assert_eq!(tokenize(&query), vec!["what", "causes", "acne"]);
}

#[test]
fn custom_alias_table_replaces_defaults() {
	let cfg = AliasBoost {
		increment: 0.1,
		cap: 0.15,
		groups: vec![AliasGroup::new("headache", &["migraine", "head pain"])],
	};
	let table = AliasTable::new(&cfg);

	assert!((table.boost("bad head pain today", "Migraine relief tips.") - 0.1).abs() < 1e-6);
	assert_eq!(table.boost("what causes acne", "Pimples are common."), 0.0);
}

#[test]
fn language_detection_is_independent_of_normalization() {
	assert_eq!(detect_language("Hi!"), Language::English);
	assert_eq!(detect_language("مرحبا"), Language::Arabic);
}
