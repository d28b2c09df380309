use std::{
	collections::HashSet,
	hash::{BuildHasher, Hash},
};

use serde::Serialize;

use crate::corpus::{DocumentKind, IndexedDocument};
use lexi_config::Retrieval;
use lexi_domain::{AliasTable, normalize, tokenize};

/// The individual signals behind one document's composite score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScoreTerms {
	pub jaccard: f32,
	pub levenshtein: f32,
	pub overlap: f32,
	pub alias: f32,
	pub kind_bias: f32,
	pub total: f32,
}

/// A query's comparison forms, computed once per retrieval.
#[derive(Clone, Debug)]
pub struct QueryProfile {
	pub normalized: String,
	pub tokens: Vec<String>,
	pub token_set: HashSet<String>,
	pub chars: Vec<char>,
	alias_hits: Vec<bool>,
}
impl QueryProfile {
	pub fn new(query: &str, aliases: &AliasTable) -> Self {
		let normalized = normalize(query);
		let tokens: Vec<String> = tokenize(&normalized).into_iter().map(str::to_string).collect();
		let token_set = tokens.iter().cloned().collect();
		let chars = normalized.chars().collect();
		let alias_hits = aliases.group_hits(&normalized);

		Self { normalized, tokens, token_set, chars, alias_hits }
	}
}

/// Scores documents against one query under a retrieval policy.
pub struct Scorer<'a> {
	cfg: &'a Retrieval,
	aliases: &'a AliasTable,
	query: &'a QueryProfile,
}
impl<'a> Scorer<'a> {
	pub fn new(cfg: &'a Retrieval, aliases: &'a AliasTable, query: &'a QueryProfile) -> Self {
		Self { cfg, aliases, query }
	}

	pub fn score(&self, entry: &IndexedDocument) -> ScoreTerms {
		let weights = &self.cfg.weights;
		let jaccard = jaccard(&self.query.token_set, &entry.token_set);
		let levenshtein = match self.cfg.levenshtein_band {
			Some(band) => banded_levenshtein_similarity(&self.query.chars, &entry.chars, band),
			None => levenshtein_similarity(&self.query.chars, &entry.chars),
		};
		let overlap = overlap_ratio(&self.query.tokens, &self.query.token_set, &entry.tokens);
		let alias = self
			.aliases
			.boost_from_hits(&self.query.alias_hits, &self.aliases.group_hits(&entry.normalized));
		let kind_bias = self.kind_bias(entry.document.kind);
		let total = weights.jaccard * jaccard
			+ weights.levenshtein * levenshtein
			+ weights.overlap * overlap.min(1.0)
			+ alias + kind_bias;

		ScoreTerms { jaccard, levenshtein, overlap, alias, kind_bias, total }
	}

	fn kind_bias(&self, kind: DocumentKind) -> f32 {
		match kind {
			DocumentKind::Response => self.cfg.kind_bias.response,
			DocumentKind::Pattern => self.cfg.kind_bias.pattern,
			DocumentKind::Tag => self.cfg.kind_bias.tag,
		}
	}
}

/// `|a ∩ b| / |a ∪ b|`, with the union floored at one.
pub fn jaccard<T, S>(a: &HashSet<T, S>, b: &HashSet<T, S>) -> f32
where
	T: Eq + Hash,
	S: BuildHasher,
{
	let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
	let intersection = small.iter().filter(|token| large.contains(*token)).count();
	let union = a.len() + b.len() - intersection;

	intersection as f32 / union.max(1) as f32
}

/// Share of the query's tokens found among the document's tokens. Repeated document tokens
/// count each time, so callers clamp to one before weighting.
pub fn overlap_ratio(
	query_tokens: &[String],
	query_token_set: &HashSet<String>,
	document_tokens: &[String],
) -> f32 {
	let matched = document_tokens.iter().filter(|token| query_token_set.contains(*token)).count();

	matched as f32 / query_tokens.len().max(1) as f32
}

/// Single-char insert/delete/substitute distance.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
	if a.is_empty() {
		return b.len();
	}
	if b.is_empty() {
		return a.len();
	}

	let mut prev: Vec<usize> = (0..=b.len()).collect();
	let mut curr = vec![0_usize; b.len() + 1];

	for (i, ca) in a.iter().enumerate() {
		curr[0] = i + 1;

		for (j, cb) in b.iter().enumerate() {
			let cost = usize::from(ca != cb);

			curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
		}

		std::mem::swap(&mut prev, &mut curr);
	}

	prev[b.len()]
}

/// Exact distance when it is at most `band`, `None` otherwise. Stops as soon as a whole
/// DP row exceeds the band.
pub fn levenshtein_within(a: &[char], b: &[char], band: usize) -> Option<usize> {
	if a.len().abs_diff(b.len()) > band {
		return None;
	}
	if a.is_empty() || b.is_empty() {
		return Some(a.len().max(b.len()));
	}

	let mut prev: Vec<usize> = (0..=b.len()).collect();
	let mut curr = vec![0_usize; b.len() + 1];

	for (i, ca) in a.iter().enumerate() {
		curr[0] = i + 1;

		let mut row_min = curr[0];

		for (j, cb) in b.iter().enumerate() {
			let cost = usize::from(ca != cb);

			curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
			row_min = row_min.min(curr[j + 1]);
		}

		if row_min > band {
			return None;
		}

		std::mem::swap(&mut prev, &mut curr);
	}

	let distance = prev[b.len()];

	(distance <= band).then_some(distance)
}

/// `1 - distance / max(1, |a|, |b|)`.
pub fn levenshtein_similarity(a: &[char], b: &[char]) -> f32 {
	let distance = levenshtein(a, b);

	1.0 - distance as f32 / a.len().max(b.len()).max(1) as f32
}

/// As [`levenshtein_similarity`], but distances beyond `band` count as the longer length.
pub fn banded_levenshtein_similarity(a: &[char], b: &[char], band: u32) -> f32 {
	let longest = a.len().max(b.len());
	let distance = levenshtein_within(a, b, band as usize).unwrap_or(longest);

	1.0 - distance as f32 / longest.max(1) as f32
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::{
		QueryProfile, Scorer, banded_levenshtein_similarity, jaccard, levenshtein,
		levenshtein_similarity, levenshtein_within, overlap_ratio,
	};
	use crate::corpus::{Document, DocumentKind, IndexedDocument};
	use lexi_config::Retrieval;
	use lexi_domain::{AliasTable, normalize, token_set};

	fn chars(text: &str) -> Vec<char> {
		text.chars().collect()
	}

	fn document(text: &str, kind: DocumentKind) -> IndexedDocument {
		IndexedDocument::new(Document {
			text: text.to_string(),
			tag: "acne".to_string(),
			kind,
			full_response: String::new(),
		})
	}

	#[test]
	fn jaccard_is_symmetric() {
		let pairs = [
			("what causes acne", "what causes pimples"),
			("i have acne", "does acne go away on its own"),
			("", "anything"),
			("same words", "words same"),
		];

		for (a, b) in pairs {
			let (na, nb) = (normalize(a), normalize(b));
			let (sa, sb) = (token_set(&na), token_set(&nb));

			assert_eq!(jaccard(&sa, &sb), jaccard(&sb, &sa));
		}
	}

	#[test]
	fn jaccard_of_two_empty_sets_is_zero() {
		let empty: HashSet<&str> = HashSet::new();

		assert_eq!(jaccard(&empty, &empty), 0.0);
	}

	#[test]
	fn jaccard_counts_shared_tokens_over_union() {
		let a = token_set("what causes acne");
		let b = token_set("what causes pimples");

		assert!((jaccard(&a, &b) - 0.5).abs() < 1e-6);
	}

	#[test]
	fn edit_distance_matches_known_values() {
		assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
		assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
		assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
		assert_eq!(levenshtein(&chars("abc"), &chars("")), 3);
		assert_eq!(levenshtein(&chars("حب"), &chars("حبوب")), 2);
	}

	#[test]
	fn self_similarity_is_one() {
		for text in ["acne", "what causes pimples", "حب الشباب", ""] {
			let text = chars(text);

			assert_eq!(levenshtein_similarity(&text, &text), 1.0);
		}
	}

	#[test]
	fn similarity_uses_the_longer_length() {
		let sim = levenshtein_similarity(&chars("abc"), &chars("abcd"));

		assert!((sim - 0.75).abs() < 1e-6, "Unexpected similarity: {sim}");
	}

	#[test]
	fn banded_distance_is_exact_within_the_band() {
		let cases = [
			("kitten", "sitting"),
			("what causes acne", "what causes pimples"),
			("flaw", "lawn"),
			("", "ab"),
			("same", "same"),
		];

		for (a, b) in cases {
			let (a, b) = (chars(a), chars(b));
			let exact = levenshtein(&a, &b);

			assert_eq!(levenshtein_within(&a, &b, exact), Some(exact));
			assert_eq!(levenshtein_within(&a, &b, exact + 5), Some(exact));

			if exact > 0 {
				assert_eq!(levenshtein_within(&a, &b, exact - 1), None);
			}
		}
	}

	#[test]
	fn banded_similarity_drops_to_zero_outside_the_band() {
		let (a, b) = (chars("what is the capital of france"), chars("acne"));

		assert_eq!(banded_levenshtein_similarity(&a, &b, 3), 0.0);
		assert_eq!(
			banded_levenshtein_similarity(&chars("acne"), &chars("acnes"), 3),
			levenshtein_similarity(&chars("acne"), &chars("acnes"))
		);
	}

	#[test]
	fn overlap_counts_repeated_document_tokens() {
		let query_tokens = vec!["acne".to_string(), "help".to_string()];
		let query_set: HashSet<String> = query_tokens.iter().cloned().collect();
		let document_tokens: Vec<String> =
			["acne", "acne", "acne"].iter().map(|token| token.to_string()).collect();

		assert!((overlap_ratio(&query_tokens, &query_set, &document_tokens) - 1.5).abs() < 1e-6);
		assert_eq!(overlap_ratio(&[], &HashSet::new(), &document_tokens), 0.0);
	}

	#[test]
	fn composite_score_combines_all_terms() {
		let cfg = Retrieval::default();
		let aliases = AliasTable::default();
		let query = QueryProfile::new("what causes acne", &aliases);
		let scorer = Scorer::new(&cfg, &aliases, &query);
		let terms = scorer.score(&document("what causes pimples", DocumentKind::Pattern));
		let lev = levenshtein_similarity(&chars("what causes acne"), &chars("what causes pimples"));
		let expected = 0.5 * 0.5 + 0.32 * lev + 0.14 * (2.0 / 3.0) + 0.08 + 0.02;

		assert!((terms.jaccard - 0.5).abs() < 1e-6);
		assert!((terms.overlap - 2.0 / 3.0).abs() < 1e-6);
		assert!((terms.alias - 0.08).abs() < 1e-6);
		assert!((terms.kind_bias - 0.02).abs() < 1e-6);
		assert!((terms.total - expected).abs() < 1e-5, "Unexpected total: {}", terms.total);
	}

	#[test]
	fn kind_bias_follows_document_kind() {
		let cfg = Retrieval::default();
		let aliases = AliasTable::default();
		let query = QueryProfile::new("acne", &aliases);
		let scorer = Scorer::new(&cfg, &aliases, &query);
		let response = scorer.score(&document("acne", DocumentKind::Response));
		let pattern = scorer.score(&document("acne", DocumentKind::Pattern));
		let tag = scorer.score(&document("acne", DocumentKind::Tag));

		assert!((response.total - pattern.total - 0.02).abs() < 1e-6);
		assert!((pattern.total - tag.total - 0.02).abs() < 1e-6);
		assert_eq!(tag.kind_bias, 0.0);
	}

	#[test]
	fn overlap_term_is_clamped_before_weighting() {
		let cfg = Retrieval::default();
		let aliases = AliasTable::default();
		let query = QueryProfile::new("acne help", &aliases);
		let scorer = Scorer::new(&cfg, &aliases, &query);
		let terms = scorer.score(&document("acne acne acne", DocumentKind::Tag));
		let lev = levenshtein_similarity(&chars("acne help"), &chars("acne acne acne"));
		let expected = 0.5 * 0.5 + 0.32 * lev + 0.14 + 0.08;

		assert!(terms.overlap > 1.0);
		assert!((terms.total - expected).abs() < 1e-5, "Unexpected total: {}", terms.total);
	}
}
