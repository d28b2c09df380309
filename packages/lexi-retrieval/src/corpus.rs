use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use lexi_domain::{KnowledgeBase, normalize, tokenize};

static SENTENCE_BREAK: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"[.!?\x{061F}]\s+").ok());

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
	/// An authored example phrasing.
	Pattern,
	/// One sentence of a canned answer.
	Response,
	/// One segment of the intent tag.
	Tag,
}
impl DocumentKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pattern => "pattern",
			Self::Response => "response",
			Self::Tag => "tag",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
	pub text: String,
	pub tag: String,
	pub kind: DocumentKind,
	pub full_response: String,
}

/// A document with its comparison forms computed once.
#[derive(Clone, Debug)]
pub struct IndexedDocument {
	pub document: Document,
	pub normalized: String,
	pub tokens: Vec<String>,
	pub token_set: HashSet<String>,
	pub chars: Vec<char>,
}
impl IndexedDocument {
	pub fn new(document: Document) -> Self {
		let normalized = normalize(&document.text);
		let tokens: Vec<String> = tokenize(&normalized).into_iter().map(str::to_string).collect();
		let token_set = tokens.iter().cloned().collect();
		let chars = normalized.chars().collect();

		Self { document, normalized, tokens, token_set, chars }
	}
}

#[derive(Clone, Debug, Default)]
pub struct Corpus {
	entries: Vec<IndexedDocument>,
	vocabulary: HashSet<String>,
}
impl Corpus {
	pub fn from_documents(documents: Vec<Document>) -> Self {
		let entries: Vec<IndexedDocument> =
			documents.into_iter().map(IndexedDocument::new).collect();
		let mut vocabulary = HashSet::new();

		for entry in &entries {
			for token in &entry.tokens {
				if !vocabulary.contains(token) {
					vocabulary.insert(token.clone());
				}
			}
		}

		Self { entries, vocabulary }
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Documents in construction order. Position in this slice is the ranking tie-break.
	pub fn entries(&self) -> &[IndexedDocument] {
		&self.entries
	}

	/// Whether the token occurs in the corpus and has at least `min_chars` chars.
	pub fn has_vocabulary_token(&self, token: &str, min_chars: usize) -> bool {
		token.chars().count() >= min_chars && self.vocabulary.contains(token)
	}
}

/// Expands a knowledge base into its documents: per intent, patterns, then response
/// sentences, then tag segments.
pub fn build_documents(kb: &KnowledgeBase) -> Vec<Document> {
	let mut documents = Vec::new();

	for intent in &kb.intents {
		let primary_response = intent.primary_response();

		for pattern in &intent.patterns {
			documents.push(Document {
				text: pattern.clone(),
				tag: intent.tag.clone(),
				kind: DocumentKind::Pattern,
				full_response: primary_response.to_string(),
			});
		}
		for response in &intent.responses {
			for sentence in split_sentences(response) {
				documents.push(Document {
					text: sentence.to_string(),
					tag: intent.tag.clone(),
					kind: DocumentKind::Response,
					full_response: response.clone(),
				});
			}
		}
		for segment in split_tag(&intent.tag) {
			documents.push(Document {
				text: segment.to_string(),
				tag: intent.tag.clone(),
				kind: DocumentKind::Tag,
				full_response: primary_response.to_string(),
			});
		}
	}

	documents
}

pub fn build_corpus(kb: &KnowledgeBase) -> Corpus {
	let corpus = Corpus::from_documents(build_documents(kb));

	tracing::debug!(intents = kb.intents.len(), documents = corpus.len(), "Corpus built.");

	corpus
}

/// Splits after `.`, `!`, `?` or `؟` when whitespace follows. The terminator stays with its
/// sentence.
pub fn split_sentences(response: &str) -> Vec<&str> {
	let Some(sentence_break) = SENTENCE_BREAK.as_ref() else {
		return trimmed_pieces([response]);
	};
	let mut pieces = Vec::new();
	let mut start = 0_usize;

	for found in sentence_break.find_iter(response) {
		let terminator = response[found.start()..].chars().next().map_or(1, char::len_utf8);

		pieces.push(&response[start..found.start() + terminator]);

		start = found.end();
	}

	pieces.push(&response[start..]);

	trimmed_pieces(pieces)
}

/// Splits a tag on runs of `/ - ( ) [ ] , ;`.
pub fn split_tag(tag: &str) -> Vec<&str> {
	tag.split(is_tag_separator).map(str::trim).filter(|segment| !segment.is_empty()).collect()
}

fn trimmed_pieces<'a>(pieces: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
	pieces.into_iter().map(str::trim).filter(|piece| !piece.is_empty()).collect()
}

fn is_tag_separator(ch: char) -> bool {
	matches!(ch, '/' | '-' | '(' | ')' | '[' | ']' | ',' | ';')
}
