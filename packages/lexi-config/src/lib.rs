mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AliasBoost, AliasGroup, Config, Dialogue, KindBias, KnowledgeBaseSource, Retrieval,
	RetrievalWeights, Routing, Service, default_alias_groups,
};

use std::{fs, path::Path};

/// Upper bound on concurrently scored corpus partitions, one scoped thread each.
pub const MAX_PARTITIONS: u32 = 64;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.knowledge_base.path.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "knowledge_base.path must be non-empty.".to_string(),
		});
	}
	if cfg.retrieval.top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.partitions == 0 {
		return Err(Error::Validation {
			message: "retrieval.partitions must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.partitions > MAX_PARTITIONS {
		return Err(Error::Validation {
			message: format!("retrieval.partitions must be at most {MAX_PARTITIONS}."),
		});
	}

	if let Some(band) = cfg.retrieval.levenshtein_band
		&& band == 0
	{
		return Err(Error::Validation {
			message: "retrieval.levenshtein_band must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("retrieval.weights.jaccard", cfg.retrieval.weights.jaccard),
		("retrieval.weights.levenshtein", cfg.retrieval.weights.levenshtein),
		("retrieval.weights.overlap", cfg.retrieval.weights.overlap),
		("retrieval.kind_bias.response", cfg.retrieval.kind_bias.response),
		("retrieval.kind_bias.pattern", cfg.retrieval.kind_bias.pattern),
		("retrieval.kind_bias.tag", cfg.retrieval.kind_bias.tag),
		("retrieval.alias.increment", cfg.retrieval.alias.increment),
		("retrieval.alias.cap", cfg.retrieval.alias.cap),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	for group in &cfg.retrieval.alias.groups {
		if !group.canonical.chars().any(char::is_alphanumeric) {
			return Err(Error::Validation {
				message: "retrieval.alias.groups.canonical must contain a letter or digit."
					.to_string(),
			});
		}
	}

	if cfg.dialogue.max_turns == 0 {
		return Err(Error::Validation {
			message: "dialogue.max_turns must be greater than zero.".to_string(),
		});
	}
	if cfg.dialogue.max_pairs == 0 {
		return Err(Error::Validation {
			message: "dialogue.max_pairs must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("dialogue.min_similarity", cfg.dialogue.min_similarity),
		("routing.best_min", cfg.routing.best_min),
		("routing.related_min", cfg.routing.related_min),
		("routing.domain_signal_min", cfg.routing.domain_signal_min),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	for group in &mut cfg.retrieval.alias.groups {
		group.canonical = group.canonical.trim().to_string();

		group.aliases.retain(|alias| !alias.trim().is_empty());
	}
}
