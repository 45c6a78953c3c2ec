use std::path::PathBuf;

use traverse::StartPolicy;

use crate::args::{Args, Command, ExtractArgs, PrepareArgs, StartPolicyArg};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input file \"{0}\" does not exist")]
    MissingInput(String),
    #[error("Batch size must be at least 1")]
    ZeroBatchSize,
    #[error("Context length must be at least 1")]
    ZeroContextLength,
    #[error("Invalid --{0} {1}: must be between 0 and 1")]
    FractionOutOfRange(&'static str, f64),
    #[error("--test-fraction and --val-fraction add up to {0}, which is more than 1")]
    FractionsTooLarge(f64),
}

/// Settings for the `extract` stage.
#[derive(Debug)]
pub struct ExtractSettings {
    pub input: PathBuf,
    pub output_json: PathBuf,
    pub output_tsv: PathBuf,
    pub metrics: PathBuf,
    pub batch_size: usize,
    pub start_policy: StartPolicy,
}

/// Settings for the `prepare` stage.
#[derive(Debug)]
pub struct PrepareSettings {
    pub input: PathBuf,
    pub context_len: usize,
    pub num_negatives: usize,
    pub test_fraction: f64,
    pub val_fraction: f64,
    pub seed: u64,
    pub reserve_input_token: bool,
    pub skip_input_steps: bool,
    pub negatives_from_corpus: bool,
}

/// Which stage to run.
#[derive(Debug)]
pub enum Stage {
    Extract(ExtractSettings),
    Prepare(PrepareSettings),
}

/// Settings are like Args, except all the logic has
/// been applied so e.g. paths are resolved and values validated.
#[derive(Debug)]
pub struct Settings {
    pub output: PathBuf,
    pub verbose: u8,
    pub dry_run: bool,
    pub stage: Stage,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let (output, stage) = match args.command {
            Command::Extract(extract) => {
                let output = PathBuf::from(&extract.output);
                let stage = Stage::Extract(ExtractSettings::try_from(extract)?);
                (output, stage)
            }
            Command::Prepare(prepare) => {
                let output = PathBuf::from(&prepare.output);
                let stage = Stage::Prepare(PrepareSettings::try_from(prepare)?);
                (output, stage)
            }
        };

        Ok(Self {
            output,
            verbose: args.verbose,
            dry_run: args.dry_run,
            stage,
        })
    }
}

impl TryFrom<ExtractArgs> for ExtractSettings {
    type Error = Error;
    fn try_from(args: ExtractArgs) -> Result<Self, Self::Error> {
        if args.batch_size == 0 {
            return Err(Error::ZeroBatchSize);
        }
        let output = PathBuf::from(&args.output);
        Ok(Self {
            input: existing_file(&args.input)?,
            output_json: output.join(&args.output_json),
            output_tsv: output.join(&args.output_tsv),
            metrics: output.join(&args.metrics),
            batch_size: args.batch_size,
            start_policy: args.start_policy.into(),
        })
    }
}

impl TryFrom<PrepareArgs> for PrepareSettings {
    type Error = Error;
    fn try_from(args: PrepareArgs) -> Result<Self, Self::Error> {
        if args.context_len == 0 {
            return Err(Error::ZeroContextLength);
        }
        check_fraction("test-fraction", args.test_fraction)?;
        check_fraction("val-fraction", args.val_fraction)?;
        let total = args.test_fraction + args.val_fraction;
        if total > 1.0 {
            return Err(Error::FractionsTooLarge(total));
        }

        Ok(Self {
            input: existing_file(&args.input)?,
            context_len: args.context_len,
            num_negatives: args.num_negatives,
            test_fraction: args.test_fraction,
            val_fraction: args.val_fraction,
            seed: args.seed,
            reserve_input_token: !args.no_input_token,
            skip_input_steps: args.skip_input_steps,
            negatives_from_corpus: args.negatives_from_corpus,
        })
    }
}

impl From<StartPolicyArg> for StartPolicy {
    fn from(arg: StartPolicyArg) -> Self {
        match arg {
            StartPolicyArg::SmallestId => StartPolicy::SmallestIdFallback,
            StartPolicyArg::EveryComponent => StartPolicy::EveryComponent,
        }
    }
}

fn existing_file(path: &str) -> Result<PathBuf, Error> {
    let path = PathBuf::from(path);
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::MissingInput(path.to_string_lossy().into_owned()))
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::FractionOutOfRange(name, value))
    }
}
