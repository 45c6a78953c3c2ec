use clap::{Parser, Subcommand, ValueEnum};

const CMD_NAME: &str = "tsq";
const DEFAULT_EXTRACT_OUTPUT: &str = "data";
const DEFAULT_PREPARE_INPUT: &str = "data/workflow_sequences.json";
const DEFAULT_PREPARE_OUTPUT: &str = "data/processed";

/// Stores our command-line args format.
#[derive(Parser)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Print additional info (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Dry run; process everything and print info but don't write any files.
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Linearize every workflow in a graph-store export
    Extract(ExtractArgs),
    /// Turn extracted workflows into vocabulary, splits and training tables
    Prepare(PrepareArgs),
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Graph-store export (JSON)
    #[arg(short, long, value_name = "FILE")]
    #[arg(env = "TOOLSEQ_EXPORT")]
    pub input: String,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_EXTRACT_OUTPUT)]
    #[arg(env = "TOOLSEQ_EXTRACT_OUTPUT")]
    pub output: String,

    /// Linearized workflows, relative to the output directory
    #[arg(long, value_name = "FILE", default_value = "workflow_sequences.json")]
    pub output_json: String,

    /// Per-workflow summary table, relative to the output directory
    #[arg(long, value_name = "FILE", default_value = "workflow_sequences.tsv")]
    pub output_tsv: String,

    /// Extraction metrics, relative to the output directory
    #[arg(long, value_name = "FILE", default_value = "extraction_metrics.json")]
    pub metrics: String,

    /// Number of workflows fetched from the source at a time
    #[arg(short, long, value_name = "N", default_value_t = 100)]
    pub batch_size: usize,

    /// Where to start traversing workflows with no unambiguous start step
    #[arg(long, value_enum, default_value_t = StartPolicyArg::EveryComponent)]
    pub start_policy: StartPolicyArg,
}

#[derive(clap::Args)]
pub struct PrepareArgs {
    /// Linearized workflows written by `extract`
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_PREPARE_INPUT)]
    #[arg(env = "TOOLSEQ_SEQUENCES")]
    pub input: String,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_PREPARE_OUTPUT)]
    #[arg(env = "TOOLSEQ_PREPARE_OUTPUT")]
    pub output: String,

    /// Number of preceding tokens in each context window
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub context_len: usize,

    /// Negative samples per training example
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub num_negatives: usize,

    /// Fraction of unique sequences held out for testing
    #[arg(long, value_name = "F", default_value_t = 0.1)]
    pub test_fraction: f64,

    /// Fraction of unique sequences held out for validation
    #[arg(long, value_name = "F", default_value_t = 0.1)]
    pub val_fraction: f64,

    /// Seed for splitting and negative sampling
    #[arg(long, value_name = "N", default_value_t = 42)]
    #[arg(env = "TOOLSEQ_SEED")]
    pub seed: u64,

    /// Treat <INPUT_DATA> as an ordinary token instead of a reserved one
    #[arg(long)]
    pub no_input_token: bool,

    /// Leave workflow input steps out of the tool sequences
    #[arg(long)]
    pub skip_input_steps: bool,

    /// Derive negative candidates from every split, not just training
    #[arg(long)]
    pub negatives_from_corpus: bool,
}

/// Command-line names for `traverse::StartPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StartPolicyArg {
    /// Only the smallest step id when every step has a predecessor
    SmallestId,
    /// Keep starting from unvisited steps until every step is visited
    EveryComponent,
}
