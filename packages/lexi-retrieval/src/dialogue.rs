//! Short-term conversational relevance: which recent exchanges share a topic with the latest
//! message.

use serde::{Deserialize, Serialize};

use crate::similarity::jaccard;
use lexi_config::Dialogue;
use lexi_domain::{normalize, token_set};

const FOLLOW_UP_HEADER: &str = "Follow-up context (for meaning only):";

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	User,
	Assistant,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConversationTurn {
	pub role: Role,
	pub content: String,
}
impl ConversationTurn {
	pub fn user(content: impl Into<String>) -> Self {
		Self { role: Role::User, content: content.into() }
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self { role: Role::Assistant, content: content.into() }
	}
}

/// A prior user question and the assistant reply that directly followed it, if any.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DialoguePair {
	pub question: String,
	pub answer: String,
	pub similarity: f32,
}
impl DialoguePair {
	pub fn render(&self) -> String {
		format!("Q: {}\nA: {}", self.question, self.answer)
	}
}

/// Jaccard similarity of two raw texts over their normalized token sets.
pub fn text_similarity(a: &str, b: &str) -> f32 {
	let (a, b) = (normalize(a), normalize(b));

	jaccard(&token_set(&a), &token_set(&b))
}

/// Qualifying pairs from the most recent `cfg.max_turns` turns, most recent first, at most
/// `cfg.max_pairs` of them. `conversation` excludes the latest message.
pub fn select_related_pairs(
	cfg: &Dialogue,
	conversation: &[ConversationTurn],
	latest: &str,
) -> Vec<DialoguePair> {
	let window_start = conversation.len().saturating_sub(cfg.max_turns as usize);
	let window = &conversation[window_start..];
	let latest = normalize(latest);
	let latest_tokens = token_set(&latest);
	let mut pairs = Vec::new();

	for (idx, turn) in window.iter().enumerate().rev() {
		if pairs.len() >= cfg.max_pairs as usize {
			break;
		}
		if turn.role != Role::User {
			continue;
		}

		let content = normalize(&turn.content);
		let similarity = jaccard(&token_set(&content), &latest_tokens);

		if similarity < cfg.min_similarity {
			continue;
		}

		let answer = match window.get(idx + 1) {
			Some(next) if next.role == Role::Assistant => next.content.clone(),
			_ => String::new(),
		};

		pairs.push(DialoguePair { question: turn.content.clone(), answer, similarity });
	}

	pairs
}

pub fn build_dialogue_context(conversation: &[ConversationTurn], latest: &str) -> String {
	build_dialogue_context_with(&Dialogue::default(), conversation, latest)
}

/// Rendered `Q:`/`A:` blocks separated by a blank line, or an empty string.
pub fn build_dialogue_context_with(
	cfg: &Dialogue,
	conversation: &[ConversationTurn],
	latest: &str,
) -> String {
	let pairs = select_related_pairs(cfg, conversation, latest);

	tracing::debug!(turns = conversation.len(), pairs = pairs.len(), "Dialogue context selected.");

	pairs.iter().map(DialoguePair::render).collect::<Vec<_>>().join("\n\n")
}

/// The text to retrieve with: the latest message, followed by the dialogue context when there
/// is one.
pub fn compose_retrieval_query(latest: &str, dialogue_context: &str) -> String {
	if dialogue_context.is_empty() {
		return latest.to_string();
	}

	format!("{latest}\n\n{FOLLOW_UP_HEADER}\n{dialogue_context}")
}
