//! Synonym groups that bridge informal and clinical phrasings of the same concept.

use lexi_config::AliasBoost;

use crate::text::{normalize, pad};

#[derive(Clone, Debug)]
pub struct AliasTable {
	groups: Vec<Vec<String>>,
	increment: f32,
	cap: f32,
}
impl AliasTable {
	pub fn new(cfg: &AliasBoost) -> Self {
		let groups = cfg
			.groups
			.iter()
			.map(|group| {
				let mut terms = Vec::with_capacity(group.aliases.len() + 1);

				for term in std::iter::once(&group.canonical).chain(group.aliases.iter()) {
					let normalized = normalize(term);

					// An empty term would match every padded text.
					if normalized.is_empty() {
						continue;
					}

					terms.push(pad(&normalized));
				}

				terms
			})
			.filter(|terms| !terms.is_empty())
			.collect();

		Self { groups, increment: cfg.increment.max(0.0), cap: cfg.cap.max(0.0) }
	}

	pub fn cap(&self) -> f32 {
		self.cap
	}

	/// Which groups a normalized text mentions, by group position.
	pub fn group_hits(&self, normalized: &str) -> Vec<bool> {
		let padded = pad(normalized);

		self.groups
			.iter()
			.map(|terms| terms.iter().any(|term| padded.contains(term.as_str())))
			.collect()
	}

	/// Boost for two texts given their precomputed group hits.
	pub fn boost_from_hits(&self, query_hits: &[bool], candidate_hits: &[bool]) -> f32 {
		let shared = query_hits.iter().zip(candidate_hits).filter(|(q, c)| **q && **c).count();

		(shared as f32 * self.increment).min(self.cap)
	}

	/// Boost for two raw texts. Both are normalized before matching.
	pub fn boost(&self, query: &str, candidate: &str) -> f32 {
		let query_hits = self.group_hits(&normalize(query));
		let candidate_hits = self.group_hits(&normalize(candidate));

		self.boost_from_hits(&query_hits, &candidate_hits)
	}
}
impl Default for AliasTable {
	fn default() -> Self {
		Self::new(&AliasBoost::default())
	}
}
