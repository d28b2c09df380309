// crates.io
use clap::Parser;
// self
use lexi::Args;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	lexi::run(args)
}
