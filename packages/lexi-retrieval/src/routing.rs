use serde::{Deserialize, Serialize};

use crate::ranking::{Match, RetrievalResult};
use lexi_config::Routing;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteReason {
	/// Weak best match and no domain vocabulary in the query.
	OutOfDomain,
	/// As `OutOfDomain`, but the caller flagged the topic as sensitive.
	OutOfDomainSensitive,
	/// Sensitive topic without a strong enough knowledge-base match.
	SensitiveWeakCoverage,
	/// Below the answer threshold and without enough domain signal.
	InDomainNotCovered,
}
impl RouteReason {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::OutOfDomain => "out_of_domain",
			Self::OutOfDomainSensitive => "out_of_domain_sensitive",
			Self::SensitiveWeakCoverage => "sensitive_weak_coverage",
			Self::InDomainNotCovered => "in_domain_not_covered",
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteDecision {
	/// Answer from the knowledge base using the rendered context.
	Answer { knowledge_context: String },
	/// Hand over to a professional or a trusted adult.
	Defer { reason: RouteReason },
	Refuse { reason: RouteReason },
}
impl RouteDecision {
	pub fn is_answer(&self) -> bool {
		matches!(self, Self::Answer { .. })
	}

	pub fn reason(&self) -> Option<RouteReason> {
		match self {
			Self::Answer { .. } => None,
			Self::Defer { reason } | Self::Refuse { reason } => Some(*reason),
		}
	}
}

/// Applies the routing thresholds to a retrieval result. Checks run in order and the first
/// that fires decides.
pub fn decide_route(
	cfg: &Routing,
	result: &RetrievalResult,
	sensitive_topic: bool,
) -> RouteDecision {
	let best = result.best.score;
	let has_domain_signal = result.global_relatedness >= cfg.domain_signal_min;

	if best < cfg.related_min && !has_domain_signal {
		return if sensitive_topic {
			RouteDecision::Defer { reason: RouteReason::OutOfDomainSensitive }
		} else {
			RouteDecision::Refuse { reason: RouteReason::OutOfDomain }
		};
	}
	if sensitive_topic && best < cfg.best_min {
		return RouteDecision::Defer { reason: RouteReason::SensitiveWeakCoverage };
	}
	if best < cfg.best_min && !has_domain_signal {
		return RouteDecision::Defer { reason: RouteReason::InDomainNotCovered };
	}

	RouteDecision::Answer { knowledge_context: render_knowledge_context(&result.top) }
}

pub fn render_knowledge_context(top: &[Match]) -> String {
	top.iter()
		.map(|candidate| format!("Q: {}\nA: {}", candidate.pattern, candidate.response))
		.collect::<Vec<_>>()
		.join("\n\n")
}

#[cfg(test)]
mod tests {
	use super::{RouteDecision, RouteReason, decide_route, render_knowledge_context};
	use crate::ranking::{Match, RetrievalResult};
	use lexi_config::Routing;

	fn result(best: f32, global_relatedness: f32) -> RetrievalResult {
		let top = vec![Match {
			tag: "acne".to_string(),
			pattern: "what causes pimples".to_string(),
			response: "Pimples are caused by clogged pores.".to_string(),
			score: best,
		}];

		RetrievalResult { best: top[0].clone(), top, global_relatedness }
	}

	#[test]
	fn weak_and_unrelated_is_refused() {
		let decision = decide_route(&Routing::default(), &result(0.05, 0.1), false);

		assert_eq!(decision, RouteDecision::Refuse { reason: RouteReason::OutOfDomain });
	}

	#[test]
	fn sensitive_out_of_domain_is_deferred() {
		let decision = decide_route(&Routing::default(), &result(0.05, 0.1), true);

		assert_eq!(decision, RouteDecision::Defer { reason: RouteReason::OutOfDomainSensitive });
	}

	#[test]
	fn sensitive_weak_coverage_is_deferred() {
		let decision = decide_route(&Routing::default(), &result(0.15, 0.5), true);

		assert_eq!(decision.reason(), Some(RouteReason::SensitiveWeakCoverage));
	}

	#[test]
	fn below_answer_threshold_without_domain_signal_is_deferred() {
		let decision = decide_route(&Routing::default(), &result(0.15, 0.2), false);

		assert_eq!(decision, RouteDecision::Defer { reason: RouteReason::InDomainNotCovered });
	}

	#[test]
	fn domain_signal_allows_a_weak_best_match() {
		let decision = decide_route(&Routing::default(), &result(0.15, 0.22), false);

		assert!(decision.is_answer());
	}

	#[test]
	fn strong_match_is_answered_with_context() {
		let decision = decide_route(&Routing::default(), &result(0.6, 1.0), true);

		assert_eq!(decision, RouteDecision::Answer {
			knowledge_context: "Q: what causes pimples\nA: Pimples are caused by clogged pores."
				.to_string(),
		});
	}

	#[test]
	fn thresholds_are_overridable() {
		let strict = Routing { best_min: 0.9, related_min: 0.1, domain_signal_min: 1.0 };
		let decision = decide_route(&strict, &result(0.6, 0.9), false);

		assert_eq!(decision.reason(), Some(RouteReason::InDomainNotCovered));
	}

	#[test]
	fn decisions_serialize_with_an_action_tag() {
		let decision = RouteDecision::Defer { reason: RouteReason::SensitiveWeakCoverage };
		let value = serde_json::to_value(&decision).expect("Failed to serialize decision.");

		assert_eq!(value["action"], "defer");
		assert_eq!(value["reason"], RouteReason::SensitiveWeakCoverage.as_str());
	}

	#[test]
	fn context_blocks_are_separated_by_a_blank_line() {
		let top = vec![
			Match { pattern: "a".to_string(), response: "1".to_string(), ..Match::default() },
			Match { pattern: "b".to_string(), response: "2".to_string(), ..Match::default() },
		];

		assert_eq!(render_knowledge_context(&top), "Q: a\nA: 1\n\nQ: b\nA: 2");
		assert_eq!(render_knowledge_context(&[]), "");
	}
}
