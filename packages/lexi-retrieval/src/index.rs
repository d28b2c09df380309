use std::{fs, path::Path, sync::Arc};

use crate::{
	Error, Result,
	corpus::{Corpus, build_corpus},
};
use lexi_domain::KnowledgeBase;

const FINGERPRINT_PREFIX_LEN: usize = 12;

/// A knowledge base together with its pre-built corpus, shared read-only between callers.
#[derive(Debug)]
pub struct KnowledgeIndex {
	pub fingerprint: String,
	pub knowledge_base: Arc<KnowledgeBase>,
	pub corpus: Arc<Corpus>,
}
impl KnowledgeIndex {
	pub fn build(knowledge_base: KnowledgeBase) -> Result<Self> {
		let fingerprint = fingerprint(&knowledge_base)?;
		let corpus = build_corpus(&knowledge_base);

		Ok(Self { fingerprint, knowledge_base: Arc::new(knowledge_base), corpus: Arc::new(corpus) })
	}

	pub fn fingerprint_prefix(&self) -> &str {
		fingerprint_prefix(&self.fingerprint)
	}
}

/// Short form of a hex fingerprint for log fields.
pub fn fingerprint_prefix(fingerprint: &str) -> &str {
	let len = fingerprint.len().min(FINGERPRINT_PREFIX_LEN);

	fingerprint.get(..len).unwrap_or(fingerprint)
}

/// Reads a `{ "intents": [...] }` record collection.
pub fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
	let raw = fs::read_to_string(path)
		.map_err(|source| Error::ReadKnowledgeBase { path: path.to_path_buf(), source })?;
	let knowledge_base: KnowledgeBase = serde_json::from_str(&raw)
		.map_err(|source| Error::ParseKnowledgeBase { path: path.to_path_buf(), source })?;

	for (idx, intent) in knowledge_base.intents.iter().enumerate() {
		if intent.tag.trim().is_empty() {
			tracing::warn!(index = idx, "Intent has an empty tag.");
		}
	}

	Ok(knowledge_base)
}

/// BLAKE3 hex digest of the knowledge base's JSON encoding. Equal content gives an equal
/// fingerprint.
pub fn fingerprint(knowledge_base: &KnowledgeBase) -> Result<String> {
	let raw = serde_json::to_vec(knowledge_base).map_err(|err| Error::Fingerprint {
		message: format!("Failed to encode knowledge base: {err}."),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}
