use anyhow::Result;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::tempdir;
use toolseq::{App, Args, Command, ExtractArgs, PrepareArgs, StartPolicyArg};

fn extract_args(input: &Path, output: &Path) -> Args {
    Args {
        command: Command::Extract(ExtractArgs {
            input: input.to_str().unwrap().to_owned(),
            output: output.to_str().unwrap().to_owned(),
            output_json: String::from("workflow_sequences.json"),
            output_tsv: String::from("workflow_sequences.tsv"),
            metrics: String::from("extraction_metrics.json"),
            batch_size: 2,
            start_policy: StartPolicyArg::EveryComponent,
        }),
        verbose: 1,
        dry_run: false,
    }
}

fn prepare_args(input: &Path, output: &Path) -> Args {
    Args {
        command: Command::Prepare(PrepareArgs {
            input: input.to_str().unwrap().to_owned(),
            output: output.to_str().unwrap().to_owned(),
            context_len: 2,
            num_negatives: 1,
            test_fraction: 0.0,
            val_fraction: 0.0,
            seed: 42,
            no_input_token: false,
            skip_input_steps: false,
            negatives_from_corpus: false,
        }),
        verbose: 1,
        dry_run: false,
    }
}

fn run(args: Args) -> Result<()> {
    simple_logging::log_to_stderr(log::LevelFilter::Trace);
    let settings = args.try_into()?;
    let app = App::new(settings);
    app.run()
}

fn write_export(dir: &Path) -> Result<std::path::PathBuf> {
    let export = json!({
        // 1 -> 2 -> 3
        "wf1": {
            "1": {"step_id": "1", "tool_id": "a", "next_steps": ["2"]},
            "2": {"step_id": "2", "tool_id": "b", "next_steps": ["3"]},
            "3": {"step_id": "3", "tool_id": "c", "next_steps": []},
        },
        // 1 -> {2, 3} -> 4
        "wf2": {
            "1": {"step_id": "1", "tool_id": "a", "next_steps": ["2", "3"]},
            "2": {"step_id": "2", "tool_id": "d", "next_steps": ["4"]},
            "3": {"step_id": "3", "tool_id": "e", "next_steps": ["4"]},
            "4": {"step_id": "4", "tool_id": "f"},
        },
        // step id doesn't match its key
        "wf3": {
            "1": {"step_id": "7", "tool_id": "a"},
        },
    });
    let path = dir.join("export.json");
    std::fs::write(&path, serde_json::to_string(&export)?)?;
    Ok(path)
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

#[test]
fn test_extract() -> Result<()> {
    let dir = tempdir()?;
    let input = write_export(dir.path())?;
    let out = dir.path().join("out");
    run(extract_args(&input, &out))?;

    let results = read_json(&out.join("workflow_sequences.json"))?;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2, "malformed workflow is skipped");
    assert_eq!(results[0]["workflow_id"], "wf1");
    assert_eq!(results[0]["steps"], json!(["1", "2", "3"]));
    assert_eq!(results[1]["steps"], json!(["1", "2", "4", "3"]));
    assert_eq!(results[1]["branching_steps"], json!(["1"]));

    let tsv = std::fs::read_to_string(out.join("workflow_sequences.tsv"))?;
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "workflow_id\tsteps_count\tbranching_count\tmissing_next_count\tno_tool_count\tcycle_count"
    );
    assert_eq!(lines[2], "wf2\t4\t1\t0\t0\t0");

    let metrics = read_json(&out.join("extraction_metrics.json"))?;
    assert_eq!(metrics["total_workflows"], 3);
    assert_eq!(metrics["failed_workflows"], 1);
    assert_eq!(metrics["workflows_with_branching"], 1);
    assert_eq!(metrics["duplicate_step_ids"], 0);

    dir.close()?;
    Ok(())
}

#[test]
fn test_extract_then_prepare() -> Result<()> {
    let dir = tempdir()?;
    let input = write_export(dir.path())?;
    let out = dir.path().join("out");
    run(extract_args(&input, &out))?;

    let processed = out.join("processed");
    run(prepare_args(&out.join("workflow_sequences.json"), &processed))?;

    let vocab_json = read_json(&processed.join("vocab.json"))?;
    assert_eq!(vocab_json["stoi"]["<PAD>"], 0);
    assert_eq!(vocab_json["stoi"]["<UNK>"], 1);
    assert_eq!(vocab_json["stoi"]["<INPUT_DATA>"], 2);
    assert_eq!(vocab_json["itos"]["0"], "<PAD>");
    // 3 reserved + a b c d e f
    assert_eq!(vocab_json["itos"].as_object().unwrap().len(), 9);
    let persisted: vocab::PersistedVocab = serde_json::from_value(vocab_json)?;
    let loaded = vocab::Vocabulary::load(persisted, true)?;
    assert_eq!(loaded.len(), 9);
    assert_eq!(loaded.num_reserved(), 3);

    let splits = read_json(&processed.join("splits.json"))?;
    assert_eq!(splits["train"].as_array().unwrap().len(), 2);
    assert_eq!(splits["val"], json!([]));
    assert_eq!(splits["test"], json!([]));
    // branching workflow is cleaned in topological order
    assert!(splits["train"]
        .as_array()
        .unwrap()
        .contains(&json!(["a", "d", "e", "f"])));

    let transitions = std::fs::read_to_string(processed.join("transitions.tsv"))?;
    assert_eq!(transitions.lines().next(), Some("from\tto"));
    assert!(transitions.lines().any(|l| l == "a\tb"));
    assert!(transitions.lines().any(|l| l == "a\td"));

    let train = std::fs::read_to_string(processed.join("train.tsv"))?;
    let lines: Vec<&str> = train.lines().collect();
    assert_eq!(lines[0], "context_0\tcontext_1\ttarget\tneg_0");
    // (3 - 1) + (4 - 1) examples
    assert_eq!(lines.len(), 1 + 5);
    assert!(!processed.join("val.tsv").exists());
    assert!(!processed.join("test.tsv").exists());

    let negatives = read_json(&processed.join("negative_candidates.json"))?;
    // reserved tokens never get candidates
    assert_eq!(negatives["0"], json!([]));

    let summary = read_json(&processed.join("prepare_summary.json"))?;
    assert_eq!(summary["workflows"], 2);
    assert_eq!(summary["splits"]["train"]["examples"], 5);

    dir.close()?;
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let dir = tempdir()?;
    let input = write_export(dir.path())?;
    let out = dir.path().join("out");
    let mut args = extract_args(&input, &out);
    args.dry_run = true;
    run(args)?;

    assert!(!out.exists());
    dir.close()?;
    Ok(())
}

#[test]
fn test_missing_input_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let out = dir.path().join("out");
    assert!(run(extract_args(&dir.path().join("nope.json"), &out)).is_err());
    assert!(!out.exists());
    Ok(())
}
