use clap::{Args, Parser, Subcommand, ValueEnum};

/// How results are written to stdout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Top-level CLI parser for the `dcite` binary.
#[derive(Debug, Parser)]
#[command(
    name = "dcite",
    version,
    about = "Deepcite - cited answers from iterative web research"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Research a question and print a cited answer
    Ask(AskArgs),
    /// Print the JSON schema of the answer
    Schema,
    /// Print the resolved configuration with secrets redacted
    Config,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question to research
    pub question: String,

    /// Maximum plan/search/critique rounds
    #[arg(long)]
    pub max_iters: Option<u32>,

    /// Search results requested per query
    #[arg(long)]
    pub topk: Option<usize>,

    /// Generation model; `provider:model` is accepted
    #[arg(long)]
    pub model: Option<String>,

    /// Use search snippets only, never fetch pages
    #[arg(long)]
    pub safe_mode: bool,
}
