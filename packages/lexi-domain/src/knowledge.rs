use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct KnowledgeBase {
	#[serde(default)]
	pub intents: Vec<Intent>,
}
impl KnowledgeBase {
	pub fn new(intents: Vec<Intent>) -> Self {
		Self { intents }
	}

	pub fn is_empty(&self) -> bool {
		self.intents.is_empty()
	}
}

/// A labeled concept with example phrasings and canned answers.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Intent {
	pub tag: String,
	#[serde(default)]
	pub patterns: Vec<String>,
	#[serde(default)]
	pub responses: Vec<String>,
}
impl Intent {
	pub fn new(tag: &str, patterns: &[&str], responses: &[&str]) -> Self {
		Self {
			tag: tag.to_string(),
			patterns: patterns.iter().map(|pattern| pattern.to_string()).collect(),
			responses: responses.iter().map(|response| response.to_string()).collect(),
		}
	}

	/// Canonical answer for pattern and tag matches.
	pub fn primary_response(&self) -> &str {
		self.responses.first().map(String::as_str).unwrap_or("")
	}
}
