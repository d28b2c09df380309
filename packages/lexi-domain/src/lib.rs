pub mod alias;
pub mod knowledge;
pub mod language;
pub mod text;

pub use alias::AliasTable;
pub use knowledge::{Intent, KnowledgeBase};
pub use language::{Language, detect_language};
pub use text::{normalize, token_set, tokenize};
