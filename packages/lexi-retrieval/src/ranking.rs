use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize};

use crate::{
	corpus::{Corpus, IndexedDocument, build_corpus},
	similarity::{QueryProfile, Scorer},
};
use lexi_config::{MAX_PARTITIONS, Retrieval};
use lexi_domain::{AliasTable, KnowledgeBase};

/// One scored document surfaced as a candidate answer.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Match {
	pub tag: String,
	/// Raw text of the matched document.
	pub pattern: String,
	pub response: String,
	pub score: f32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RetrievalResult {
	pub top: Vec<Match>,
	/// `top[0]`, or the zero-score sentinel when nothing scored above zero.
	pub best: Match,
	pub global_relatedness: f32,
}

#[derive(Clone, Copy, Debug)]
struct ScoredPosition {
	position: usize,
	score: f32,
}

/// Ranks `query` against `kb` with the default scoring policy.
pub fn retrieve(query: &str, kb: &KnowledgeBase, top_k: usize) -> RetrievalResult {
	retrieve_with(&Retrieval::default(), query, kb, top_k)
}

/// Builds the corpus for this call only, then ranks.
pub fn retrieve_with(
	cfg: &Retrieval,
	query: &str,
	kb: &KnowledgeBase,
	top_k: usize,
) -> RetrievalResult {
	let corpus = build_corpus(kb);

	retrieve_in_corpus(cfg, query, &corpus, top_k)
}

pub fn retrieve_in_corpus(
	cfg: &Retrieval,
	query: &str,
	corpus: &Corpus,
	top_k: usize,
) -> RetrievalResult {
	let aliases = AliasTable::new(&cfg.alias);
	let profile = QueryProfile::new(query, &aliases);
	let global_relatedness =
		global_relatedness(corpus, &profile.token_set, cfg.min_vocabulary_token_chars as usize);
	let scorer = Scorer::new(cfg, &aliases, &profile);
	let partitions = cfg.partitions.clamp(1, MAX_PARTITIONS) as usize;
	let mut scored = if partitions > 1 && corpus.len() > 1 {
		score_partitioned(&scorer, corpus.entries(), partitions)
	} else {
		score_range(&scorer, corpus.entries(), 0)
	};
	let candidates = scored.len();

	sort_scored(&mut scored);

	let top: Vec<Match> = scored
		.into_iter()
		.take(top_k)
		.map(|scored| to_match(&corpus.entries()[scored.position], scored.score))
		.collect();
	let best = top.first().cloned().unwrap_or_default();

	tracing::debug!(
		documents = corpus.len(),
		candidates,
		returned = top.len(),
		best_score = best.score,
		global_relatedness,
		"Retrieval ranked."
	);

	RetrievalResult { top, best, global_relatedness }
}

/// Share of the distinct query tokens that occur in the corpus vocabulary.
pub fn global_relatedness(
	corpus: &Corpus,
	query_tokens: &HashSet<String>,
	min_chars: usize,
) -> f32 {
	let hits =
		query_tokens.iter().filter(|token| corpus.has_vocabulary_token(token, min_chars)).count();

	(hits as f32 / query_tokens.len().max(1) as f32).min(1.0)
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn score_range(
	scorer: &Scorer<'_>,
	entries: &[IndexedDocument],
	offset: usize,
) -> Vec<ScoredPosition> {
	entries
		.iter()
		.enumerate()
		.filter_map(|(idx, entry)| {
			let score = scorer.score(entry).total;

			(score > 0.0).then_some(ScoredPosition { position: offset + idx, score })
		})
		.collect()
}

/// Scores contiguous partitions on scoped threads. Positions stay corpus-global, so the merged
/// output sorts exactly like a sequential pass.
fn score_partitioned(
	scorer: &Scorer<'_>,
	entries: &[IndexedDocument],
	partitions: usize,
) -> Vec<ScoredPosition> {
	let chunk_len = entries.len().div_ceil(partitions).max(1);

	std::thread::scope(|scope| {
		let handles: Vec<_> = entries
			.chunks(chunk_len)
			.enumerate()
			.map(|(idx, part)| scope.spawn(move || score_range(scorer, part, idx * chunk_len)))
			.collect();
		let mut merged = Vec::new();

		for handle in handles {
			match handle.join() {
				Ok(scored) => merged.extend(scored),
				Err(payload) => std::panic::resume_unwind(payload),
			}
		}

		merged
	})
}

fn sort_scored(scored: &mut [ScoredPosition]) {
	scored.sort_by(|a, b| cmp_f32_desc(a.score, b.score).then(a.position.cmp(&b.position)));
}

fn to_match(entry: &IndexedDocument, score: f32) -> Match {
	Match {
		tag: entry.document.tag.clone(),
		pattern: entry.document.text.clone(),
		response: entry.document.full_response.clone(),
		score,
	}
}
