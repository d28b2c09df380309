pub mod corpus;
pub mod dialogue;
pub mod error;
pub mod index;
pub mod ranking;
pub mod routing;
pub mod similarity;

pub use error::{Error, Result};

use std::{path::Path, sync::Arc};

use parking_lot::RwLock;
use serde::Serialize;

pub use corpus::{Corpus, Document, DocumentKind, build_corpus, build_documents};
pub use dialogue::{
	ConversationTurn, DialoguePair, Role, build_dialogue_context, build_dialogue_context_with,
	compose_retrieval_query,
};
pub use index::{KnowledgeIndex, fingerprint, fingerprint_prefix, load_knowledge_base};
pub use ranking::{Match, RetrievalResult, retrieve, retrieve_in_corpus, retrieve_with};
pub use routing::{RouteDecision, RouteReason, decide_route, render_knowledge_context};
use lexi_config::Config;
use lexi_domain::{KnowledgeBase, Language, detect_language};

#[derive(Clone, Debug)]
pub struct AnswerRequest {
	/// Prior turns, oldest first, without the latest message.
	pub conversation: Vec<ConversationTurn>,
	pub latest: String,
	/// Set by the caller's topic classifier.
	pub sensitive_topic: bool,
}

/// Everything the orchestration layer needs to build a reply for one message.
#[derive(Clone, Debug, Serialize)]
pub struct AnswerPlan {
	pub language: Language,
	pub dialogue_context: String,
	pub retrieval_query: String,
	pub retrieval: RetrievalResult,
	pub decision: RouteDecision,
}

pub struct LexiService {
	pub cfg: Config,
	index: RwLock<Arc<KnowledgeIndex>>,
}
impl LexiService {
	pub fn new(cfg: Config, knowledge_base: KnowledgeBase) -> Result<Self> {
		let index = KnowledgeIndex::build(knowledge_base)?;

		tracing::info!(
			fingerprint = index.fingerprint_prefix(),
			documents = index.corpus.len(),
			"Knowledge index loaded."
		);

		Ok(Self { cfg, index: RwLock::new(Arc::new(index)) })
	}

	/// Loads the knowledge base named by `cfg.knowledge_base.path`.
	pub fn from_config(cfg: Config) -> Result<Self> {
		let knowledge_base = load_knowledge_base(&cfg.knowledge_base.path)?;

		Self::new(cfg, knowledge_base)
	}

	pub fn from_path(cfg: Config, path: &Path) -> Result<Self> {
		let knowledge_base = load_knowledge_base(path)?;

		Self::new(cfg, knowledge_base)
	}

	/// The current index. Callers keep it for as long as they need a consistent view.
	pub fn index(&self) -> Arc<KnowledgeIndex> {
		self.index.read().clone()
	}

	/// Swaps in a new knowledge base. Returns `false` when its content is unchanged.
	pub fn reload(&self, knowledge_base: KnowledgeBase) -> Result<bool> {
		let incoming = fingerprint(&knowledge_base)?;

		if self.index.read().fingerprint == incoming {
			tracing::debug!(
				fingerprint = fingerprint_prefix(&incoming),
				"Knowledge base unchanged."
			);

			return Ok(false);
		}

		let index = Arc::new(KnowledgeIndex::build(knowledge_base)?);

		tracing::info!(
			fingerprint = index.fingerprint_prefix(),
			documents = index.corpus.len(),
			"Knowledge index reloaded."
		);

		*self.index.write() = index;

		Ok(true)
	}

	pub fn reload_from_path(&self, path: &Path) -> Result<bool> {
		self.reload(load_knowledge_base(path)?)
	}

	pub fn retrieve(&self, query: &str, top_k: Option<usize>) -> RetrievalResult {
		let index = self.index();
		let top_k = top_k.unwrap_or(self.cfg.retrieval.top_k as usize);

		retrieve_in_corpus(&self.cfg.retrieval, query, &index.corpus, top_k)
	}

	pub fn dialogue_context(&self, conversation: &[ConversationTurn], latest: &str) -> String {
		build_dialogue_context_with(&self.cfg.dialogue, conversation, latest)
	}

	/// Dialogue filter, follow-up composition, retrieval, then routing.
	pub fn answer(&self, req: &AnswerRequest) -> AnswerPlan {
		let language = detect_language(&req.latest);
		let dialogue_context = self.dialogue_context(&req.conversation, &req.latest);
		let retrieval_query = compose_retrieval_query(&req.latest, &dialogue_context);
		let retrieval = self.retrieve(&retrieval_query, None);
		let decision = decide_route(&self.cfg.routing, &retrieval, req.sensitive_topic);

		tracing::debug!(
			language = language.as_str(),
			follow_up = !dialogue_context.is_empty(),
			best_score = retrieval.best.score,
			global_relatedness = retrieval.global_relatedness,
			decision = decision.reason().map(RouteReason::as_str).unwrap_or("answer"),
			"Answer planned."
		);

		AnswerPlan { language, dialogue_context, retrieval_query, retrieval, decision }
	}
}
