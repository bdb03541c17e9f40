//! qatidy CLI: cleans chat-exported Q&A transcripts into study notes.
//!
//! Removes conversational filler, groups questions under their topics and
//! renumbers them, or reorders an already numbered Q&A file.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
