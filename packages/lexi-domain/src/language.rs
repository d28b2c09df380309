use serde::{Deserialize, Serialize};
use unicode_script::{Script, UnicodeScript};

/// Reply language picked from the user's message. Scoring never depends on it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
	Arabic,
	English,
}
impl Language {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Arabic => "ar",
			Self::English => "en",
		}
	}
}

pub fn detect_language(input: &str) -> Language {
	if contains_arabic(input) { Language::Arabic } else { Language::English }
}

pub fn contains_arabic(input: &str) -> bool {
	input.chars().any(|ch| ch.script() == Script::Arabic)
}
