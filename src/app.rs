use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use workflow::LinearizationResult;

use crate::extract::{Extraction, Extractor};
use crate::fs::Fs;
use crate::prepare::{prepare, Prepared};
use crate::settings::{ExtractSettings, PrepareSettings, Settings, Stage};
use crate::source::{JsonFileSource, WorkflowSource};
use crate::ui::Ui;

const VOCAB_FILE: &str = "vocab.json";
const SPLITS_FILE: &str = "splits.json";
const TRANSITIONS_FILE: &str = "transitions.tsv";
const NEGATIVES_FILE: &str = "negative_candidates.json";
const SUMMARY_FILE: &str = "prepare_summary.json";

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// Filesystem interface
    fs: Fs,
    /// User interface
    ui: Ui,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        let fs = Fs::new(&settings.output, settings.dry_run);
        let ui = Ui::new(&settings);
        Self { settings, fs, ui }
    }

    /// Run the app, using settings to determine which stage to run.
    pub fn run(mut self) -> Result<()> {
        if self.settings.verbose > 0 {
            eprintln!("Using output directory {:?}", self.settings.output);
        }
        self.fs.ensure_output_dir_exists(self.settings.verbose > 0)?;

        match &self.settings.stage {
            Stage::Extract(extract) => self.run_extract(extract),
            Stage::Prepare(prepare) => self.run_prepare(prepare),
        }
    }
}

// EXTRACTION //////////////////
impl App {
    fn run_extract(&self, settings: &ExtractSettings) -> Result<()> {
        self.ui
            .verbose_progress_debug("Loading workflow export", &settings.input);
        let mut source = JsonFileSource::load(&self.fs, &settings.input)?;
        self.ui.done();
        self.extract_from(settings, &mut source)
    }

    /// Linearize everything in `source` and write it out. If the source fails
    /// part way, the results so far are still written before the error is returned.
    fn extract_from<S: WorkflowSource + ?Sized>(
        &self,
        settings: &ExtractSettings,
        source: &mut S,
    ) -> Result<()> {
        self.ui.verbose_progress("Linearizing workflows");
        self.ui.start_timer();
        let extraction =
            Extractor::new(settings.start_policy, settings.batch_size).run(source);
        self.ui.done();
        self.ui.print_elapsed("Linearizing workflows");

        extraction.metrics.log();
        let failures = extraction.diagnostics.print_recap("extracting workflows");

        // always flush whatever we have, even if the source failed part way:
        let written = self.write_extraction(settings, &extraction);
        if let Some(e) = extraction.interrupted {
            if let Err(write_err) = written {
                log::error!("failed to save partial results: {write_err:?}");
            }
            return Err(e.context("while reading workflows from the source"));
        }
        written?;

        self.ui.finished(&format!(
            "Extracted {} of {} workflows ({} failed).",
            extraction.results.len(),
            extraction.metrics.total_workflows,
            failures,
        ));
        Ok(())
    }

    fn write_extraction(&self, settings: &ExtractSettings, extraction: &Extraction) -> Result<()> {
        if self.fs.is_dry_run() {
            eprintln!(
                "Dry run. Not writing {} results to {:?}",
                extraction.results.len(),
                settings.output_json
            );
            return Ok(());
        }
        let mut strbuf = String::new();
        self.fs
            .write_json(&settings.output_json, &extraction.results)
            .context("while saving linearized workflows")?;
        self.fs
            .write_summary_tsv(&settings.output_tsv, &extraction.results, &mut strbuf)
            .context("while saving workflow summary")?;
        self.fs
            .write_json(&settings.metrics, &extraction.metrics)
            .context("while saving extraction metrics")?;
        Ok(())
    }
}

// PREPARATION /////////////////
impl App {
    fn run_prepare(&self, settings: &PrepareSettings) -> Result<()> {
        self.ui
            .verbose_progress_debug("Loading linearized workflows", &settings.input);
        let mut strbuf = String::new();
        let results: Vec<LinearizationResult> = self
            .fs
            .read_json(&settings.input, &mut strbuf)
            .context("while loading linearized workflows")?;
        self.ui.done();

        self.ui.verbose_progress("Preparing datasets");
        self.ui.start_timer();
        let prepared = prepare(&results, settings)?;
        self.ui.done();
        self.ui.print_elapsed("Preparing datasets");

        if self.fs.is_dry_run() {
            eprintln!(
                "Dry run. Not writing vocabulary of {} tokens or {} datasets",
                prepared.vocab.len(),
                prepared.datasets.len(),
            );
        } else {
            self.write_prepared(&prepared, &mut strbuf)?;
        }

        let examples: usize = prepared.datasets.iter().map(|d| d.examples.len()).sum();
        self.ui.finished(&format!(
            "Prepared {} examples from {} sequences; vocabulary has {} tokens.",
            examples,
            prepared.summary.sequences,
            prepared.vocab.len(),
        ));
        Ok(())
    }

    fn write_prepared(&self, prepared: &Prepared, strbuf: &mut String) -> Result<()> {
        let out = &self.settings.output;
        let context_len = prepared.summary.context_len;

        self.fs.write_json(out.join(VOCAB_FILE), &prepared.vocab)?;
        self.fs.write_json(out.join(SPLITS_FILE), &prepared.splits_json())?;
        self.fs
            .write_transitions_tsv(&out.join(TRANSITIONS_FILE), &prepared.transitions, strbuf)?;

        let negatives: BTreeMap<_, _> = prepared.candidates.iter().collect();
        self.fs.write_json(out.join(NEGATIVES_FILE), &negatives)?;

        for dataset in &prepared.datasets {
            let path = out.join(format!("{}.tsv", dataset.name));
            self.write_dataset(&path, dataset, context_len, strbuf)
                .with_context(|| format!("while saving {} dataset", dataset.name))?;
        }

        self.fs.write_json(out.join(SUMMARY_FILE), &prepared.summary)?;
        Ok(())
    }

    fn write_dataset(
        &self,
        path: &Path,
        dataset: &crate::prepare::SplitDataset,
        context_len: usize,
        strbuf: &mut String,
    ) -> Result<()> {
        log::debug!(
            "{} rows -> {}",
            dataset.examples.len(),
            path.display().to_string().cyan()
        );
        self.fs
            .write_dataset_tsv(path, &dataset.examples, context_len, strbuf)
    }
}
