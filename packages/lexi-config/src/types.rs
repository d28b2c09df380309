use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub knowledge_base: KnowledgeBaseSource,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub dialogue: Dialogue,
	#[serde(default)]
	pub routing: Routing,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct KnowledgeBaseSource {
	/// JSON record collection of the form `{ "intents": [...] }`.
	pub path: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	pub top_k: u32,
	/// Number of contiguous corpus partitions scored concurrently. `1` scores inline.
	pub partitions: u32,
	/// Optional. When set, edit distances above the band are not computed exactly and the
	/// document's edit-distance similarity is treated as zero.
	pub levenshtein_band: Option<u32>,
	/// Corpus tokens shorter than this (in chars) are left out of the relatedness vocabulary.
	pub min_vocabulary_token_chars: u32,
	pub weights: RetrievalWeights,
	pub kind_bias: KindBias,
	pub alias: AliasBoost,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self {
			top_k: 10,
			partitions: 1,
			levenshtein_band: None,
			min_vocabulary_token_chars: 3,
			weights: RetrievalWeights::default(),
			kind_bias: KindBias::default(),
			alias: AliasBoost::default(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RetrievalWeights {
	pub jaccard: f32,
	pub levenshtein: f32,
	pub overlap: f32,
}
impl Default for RetrievalWeights {
	fn default() -> Self {
		Self { jaccard: 0.5, levenshtein: 0.32, overlap: 0.14 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct KindBias {
	pub response: f32,
	pub pattern: f32,
	pub tag: f32,
}
impl Default for KindBias {
	fn default() -> Self {
		Self { response: 0.04, pattern: 0.02, tag: 0.0 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AliasBoost {
	pub increment: f32,
	pub cap: f32,
	pub groups: Vec<AliasGroup>,
}
impl Default for AliasBoost {
	fn default() -> Self {
		Self { increment: 0.08, cap: 0.2, groups: default_alias_groups() }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct AliasGroup {
	pub canonical: String,
	#[serde(default)]
	pub aliases: Vec<String>,
}
impl AliasGroup {
	pub fn new(canonical: &str, aliases: &[&str]) -> Self {
		Self {
			canonical: canonical.to_string(),
			aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Dialogue {
	/// Most recent prior turns considered.
	pub max_turns: u32,
	pub min_similarity: f32,
	pub max_pairs: u32,
}
impl Default for Dialogue {
	fn default() -> Self {
		Self { max_turns: 8, min_similarity: 0.2, max_pairs: 2 }
	}
}

/// Thresholds applied by the caller to a retrieval result to answer, defer, or refuse.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Routing {
	/// Best-match score required to answer from the knowledge base.
	pub best_min: f32,
	/// Best-match score below which a query is a refusal candidate.
	pub related_min: f32,
	/// Global relatedness at or above which a query counts as in-domain.
	pub domain_signal_min: f32,
}
impl Default for Routing {
	fn default() -> Self {
		Self { best_min: 0.18, related_min: 0.1, domain_signal_min: 0.22 }
	}
}

pub fn default_alias_groups() -> Vec<AliasGroup> {
	vec![
		AliasGroup::new(
			"masturbation",
			&["self-stimulation", "self stimulation", "self-pleasure", "self pleasure", "solo sex"],
		),
		AliasGroup::new("pimples", &["acne", "zits", "spots"]),
		AliasGroup::new("period", &["menstruation", "menstrual", "menses"]),
		AliasGroup::new("penis", &["male organ"]),
		AliasGroup::new("vagina", &["female organ"]),
		AliasGroup::new("العادة", &["العادة السرية", "الاستمناء", "استمناء"]),
		AliasGroup::new("حب", &["حب الشباب", "بثور"]),
	]
}
