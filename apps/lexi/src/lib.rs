use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lexi_config::Config;
use lexi_retrieval::{AnswerRequest, ConversationTurn, LexiService};

#[derive(Debug, Parser)]
#[command(
	version = lexi_cli::VERSION,
	rename_all = "kebab",
	styles = lexi_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum Command {
	/// Rank the knowledge base against one query.
	Retrieve {
		#[arg(long, short = 'q')]
		query: String,
		#[arg(long, value_name = "N")]
		top_k: Option<u32>,
	},
	/// Select the prior exchanges related to the latest message.
	Context {
		/// JSON array of `{ "role", "content" }` turns, oldest first, without the latest message.
		#[arg(long, value_name = "FILE")]
		conversation: PathBuf,
		#[arg(long, short = 'q')]
		query: String,
	},
	/// Plan the reply to a message: dialogue context, retrieval and routing.
	Route {
		#[arg(long, short = 'q')]
		query: String,
		#[arg(long, value_name = "FILE")]
		conversation: Option<PathBuf>,
		/// Treat the message as a sensitive topic.
		#[arg(long)]
		sensitive: bool,
	},
}

#[derive(Debug, Serialize)]
struct ContextOutput {
	context: String,
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let cfg = lexi_config::load(&args.config)?;

	init_tracing(&cfg);

	let service = LexiService::from_config(cfg)?;

	match args.command {
		Command::Retrieve { query, top_k } => {
			let result = service.retrieve(&query, top_k.map(|top_k| top_k as usize));

			print_json(&result)
		},
		Command::Context { conversation, query } => {
			let conversation = load_conversation(&conversation)?;
			let context = service.dialogue_context(&conversation, &query);

			print_json(&ContextOutput { context })
		},
		Command::Route { query, conversation, sensitive } => {
			let conversation = match conversation {
				Some(path) => load_conversation(&path)?,
				None => Vec::new(),
			};
			let plan = service.answer(&AnswerRequest {
				conversation,
				latest: query,
				sensitive_topic: sensitive,
			});

			print_json(&plan)
		},
	}
}

fn init_tracing(cfg: &Config) {
	let filter =
		EnvFilter::try_new(&cfg.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_conversation(path: &Path) -> color_eyre::Result<Vec<ConversationTurn>> {
	let raw = fs::read_to_string(path)?;
	let conversation: Vec<ConversationTurn> = serde_json::from_str(&raw)
		.map_err(|err| eyre::eyre!("Invalid conversation file {}: {err}.", path.display()))?;

	Ok(conversation)
}

fn print_json<T>(value: &T) -> color_eyre::Result<()>
where
	T: Serialize,
{
	let json = serde_json::to_string_pretty(value)?;

	println!("{json}");

	Ok(())
}
