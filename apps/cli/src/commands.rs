//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qatidy_core::{FileReport, ProgressReporter, SilentProgress, Task, process_files};
use qatidy_markdown::{Cleaner, FluffRemover};
use qatidy_shared::{
    AppConfig, CleanConfig, FluffProfile, Numbering, UnansweredPolicy, config_file_path,
    init_config, init_config_at, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// qatidy: turn chat-exported Q&A transcripts into clean, numbered Markdown.
#[derive(Parser)]
#[command(
    name = "qatidy",
    version,
    about = "Strip chat filler from Q&A transcripts and renumber questions per topic.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.qatidy/qatidy.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print run summaries as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Input files and optional explicit output path.
#[derive(Args)]
pub(crate) struct IoArgs {
    /// Transcript file(s) to process.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input only; defaults to a suffixed name next to the input).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Fluff pattern selection shared by `clean` and `strip`.
#[derive(Args)]
pub(crate) struct FluffArgs {
    /// Built-in filler pattern set: transcript, cicd, or none.
    #[arg(short, long)]
    pub profile: Option<FluffProfile>,

    /// Extra filler regex (repeatable; case-insensitive, `.` spans lines).
    #[arg(long = "fluff", value_name = "REGEX")]
    pub fluff: Vec<String>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Remove filler, group questions under topics, and renumber them.
    Clean {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        fluff: FluffArgs,

        /// Topic headings must be longer than this many characters.
        #[arg(long)]
        min_topic_len: Option<usize>,

        /// Questions without an answer: keep or drop.
        #[arg(long)]
        unanswered: Option<UnansweredPolicy>,

        /// Numbering scope: per-topic or global.
        #[arg(long)]
        numbering: Option<Numbering>,

        /// Keep unrecognized lines instead of dropping them.
        #[arg(long)]
        passthrough: bool,

        /// Leave mis-decoded arrow glyphs in answers.
        #[arg(long)]
        keep_arrows: bool,
    },

    /// Remove filler sentences only, leaving the layout as is.
    Strip {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        fluff: FluffArgs,
    },

    /// Sort numbered questions by their original number and renumber 1..N.
    Reorder {
        #[command(flatten)]
        io: IoArgs,

        /// Leave mis-decoded arrow glyphs in answers.
        #[arg(long)]
        keep_arrows: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "qatidy=info",
        1 => "qatidy=debug",
        _ => "qatidy=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    let config_path = cli.config;

    match cli.command {
        Command::Clean {
            io,
            fluff,
            min_topic_len,
            unanswered,
            numbering,
            passthrough,
            keep_arrows,
        } => {
            let mut clean = clean_config(config_path.as_deref(), &fluff)?;
            if let Some(len) = min_topic_len {
                clean.min_topic_len = len;
            }
            if let Some(policy) = unanswered {
                clean.unanswered = policy;
            }
            if let Some(scope) = numbering {
                clean.numbering = scope;
            }
            clean.passthrough |= passthrough;
            clean.strip_arrows &= !keep_arrows;

            let task = Task::Clean(Cleaner::new(&clean)?);
            cmd_process(&task, &io, json).await
        }
        Command::Strip { io, fluff } => {
            let clean = clean_config(config_path.as_deref(), &fluff)?;
            let task = Task::Strip(FluffRemover::for_profile(
                clean.profile,
                &clean.extra_patterns,
            )?);
            cmd_process(&task, &io, json).await
        }
        Command::Reorder { io, keep_arrows } => {
            let clean = clean_config(config_path.as_deref(), &FluffArgs::none())?;
            let task = Task::Reorder {
                strip_arrows: clean.strip_arrows && !keep_arrows,
            };
            cmd_process(&task, &io, json).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path.as_deref()).await,
            ConfigAction::Show => cmd_config_show(config_path.as_deref()).await,
        },
    }
}

impl FluffArgs {
    fn none() -> Self {
        Self {
            profile: None,
            fluff: Vec::new(),
        }
    }
}

/// Load the config file (explicit path or default) as an [`AppConfig`].
fn app_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Resolve the runtime clean config: config file, then fluff flags on top.
fn clean_config(path: Option<&Path>, fluff: &FluffArgs) -> Result<CleanConfig> {
    let mut clean = CleanConfig::from(&app_config(path)?);
    if let Some(profile) = fluff.profile {
        clean.profile = profile;
    }
    clean.extra_patterns.extend(fluff.fluff.iter().cloned());
    Ok(clean)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_process(task: &Task, io: &IoArgs, json: bool) -> Result<()> {
    info!(
        task = task.name(),
        files = io.inputs.len(),
        "processing transcripts"
    );

    let reports = if io.inputs.len() > 1 {
        let progress = CliProgress::new(io.inputs.len());
        process_files(task, &io.inputs, io.out.as_deref(), &progress).await?
    } else {
        process_files(task, &io.inputs, io.out.as_deref(), &SilentProgress).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        print_report(report);
    }

    Ok(())
}

fn print_report(report: &FileReport) {
    let summary = &report.summary;

    println!();
    match report.task {
        "reorder" => {
            println!(
                "  Reordered {} questions sequentially in {}",
                summary.questions,
                report.output.display()
            );
        }
        "strip" => {
            println!("  Stripped file: {}", report.output.display());
            println!("  Questions: {}", summary.questions);
            println!("  Answers:   {}", summary.answers);
        }
        _ => {
            println!("  Cleaned Q&A file: {}", report.output.display());
            println!("  Topics:    {}", summary.topics);
            println!("  Questions: {}", summary.questions);
            println!("  Answers:   {}", summary.answers);
        }
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar across input files.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .expect("valid progress template"),
        );
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn file_started(&self, path: &Path, _current: usize, _total: usize) {
        self.bar.set_message(path.display().to_string());
    }

    fn file_done(&self, _report: &FileReport, _current: usize, _total: usize) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

async fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => {
            init_config_at(p)?;
            p.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let source = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };
    let config = app_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("# {}", source.display());
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_clean_flags() {
        let cli = Cli::try_parse_from([
            "qatidy",
            "clean",
            "db_qa_init.md",
            "--profile",
            "cicd",
            "--fluff",
            "Want a PDF\\?",
            "--unanswered",
            "drop",
            "--numbering",
            "global",
            "-o",
            "db_qa_final.md",
        ])
        .expect("parse");

        match cli.command {
            Command::Clean {
                io,
                fluff,
                unanswered,
                numbering,
                passthrough,
                ..
            } => {
                assert_eq!(io.inputs, vec![PathBuf::from("db_qa_init.md")]);
                assert_eq!(io.out, Some(PathBuf::from("db_qa_final.md")));
                assert_eq!(fluff.profile, Some(FluffProfile::Cicd));
                assert_eq!(fluff.fluff, vec!["Want a PDF\\?".to_string()]);
                assert_eq!(unanswered, Some(UnansweredPolicy::Drop));
                assert_eq!(numbering, Some(Numbering::Global));
                assert!(!passthrough);
            }
            _ => panic!("expected clean"),
        }
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = Cli::try_parse_from(["qatidy", "clean", "a.md", "--unanswered", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn requires_an_input() {
        assert!(Cli::try_parse_from(["qatidy", "reorder"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qatidy", "reorder", "cicd_qa.md", "--json", "-vv"])
            .expect("parse");
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}
