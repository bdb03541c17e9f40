//! Per-file pipelines: read input → transform → write output → report counts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use qatidy_markdown::{Cleaner, FluffRemover};
use qatidy_shared::{QaTidyError, Result, Summary};

/// What to do with each input file.
#[derive(Debug, Clone)]
pub enum Task {
    /// Remove fluff, classify lines, renumber per topic.
    Clean(Cleaner),
    /// Remove fluff only and close up the gaps.
    Strip(FluffRemover),
    /// Sort numbered pairs by original number and renumber from 1.
    Reorder { strip_arrows: bool },
}

impl Task {
    /// Suffix appended to the input's file stem for the default output path.
    pub fn output_suffix(&self) -> &'static str {
        match self {
            Task::Clean(_) => "_clean",
            Task::Strip(_) => "_simple_clean",
            Task::Reorder { .. } => "_ordered",
        }
    }

    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Task::Clean(_) => "clean",
            Task::Strip(_) => "strip",
            Task::Reorder { .. } => "reorder",
        }
    }

    /// Transform `text`, returning the output text and its counts.
    pub fn apply(&self, text: &str) -> (String, Summary) {
        match self {
            Task::Clean(cleaner) => {
                let out = cleaner.clean(text);
                (out.markdown, out.summary)
            }
            Task::Strip(fluff) => {
                let out = qatidy_markdown::strip(text, fluff);
                (out.text, out.summary)
            }
            Task::Reorder { strip_arrows } => {
                let out = qatidy_markdown::reorder(text, *strip_arrows);
                let summary = out.document.summary();
                (out.markdown, summary)
            }
        }
    }
}

/// Outcome of processing one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Task that produced this report.
    pub task: &'static str,
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub summary: Summary,
    /// Wall-clock time for read, transform and write.
    pub elapsed_ms: u64,
}

/// Progress callback for multi-file runs.
pub trait ProgressReporter: Send + Sync {
    /// Called before a file is read.
    fn file_started(&self, path: &Path, current: usize, total: usize);
    /// Called after a file is written.
    fn file_done(&self, report: &FileReport, current: usize, total: usize);
    /// Called once every file is processed.
    fn finish(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn file_started(&self, _path: &Path, _current: usize, _total: usize) {}
    fn file_done(&self, _report: &FileReport, _current: usize, _total: usize) {}
    fn finish(&self) {}
}

/// Default output path: `<dir>/<stem><suffix>.md` next to the input.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}{suffix}.md"))
}

/// Process one file: a single read, a single write.
#[instrument(skip_all, fields(task = task.name(), input = %input.display()))]
pub async fn process_file(task: &Task, input: &Path, output: &Path) -> Result<FileReport> {
    let start = Instant::now();

    if same_file(input, output) {
        return Err(QaTidyError::validation(format!(
            "output {} would overwrite its input",
            output.display()
        )));
    }

    let text = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| QaTidyError::io(input, e))?;
    debug!(bytes = text.len(), "input read");

    let (rendered, summary) = task.apply(&text);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| QaTidyError::io(parent, e))?;
    }
    tokio::fs::write(output, rendered.as_bytes())
        .await
        .map_err(|e| QaTidyError::io(output, e))?;

    let report = FileReport {
        task: task.name(),
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        summary,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        output = %output.display(),
        topics = summary.topics,
        questions = summary.questions,
        answers = summary.answers,
        "file processed"
    );

    Ok(report)
}

/// Process each input in turn. `out` is only allowed with a single input;
/// otherwise every output goes next to its input.
pub async fn process_files(
    task: &Task,
    inputs: &[PathBuf],
    out: Option<&Path>,
    progress: &dyn ProgressReporter,
) -> Result<Vec<FileReport>> {
    if inputs.is_empty() {
        return Err(QaTidyError::validation("no input files given"));
    }
    if out.is_some() && inputs.len() > 1 {
        return Err(QaTidyError::validation(
            "--out can only be used with a single input file",
        ));
    }

    let total = inputs.len();
    let mut reports = Vec::with_capacity(total);

    for (i, input) in inputs.iter().enumerate() {
        progress.file_started(input, i + 1, total);

        let output = match out {
            Some(path) => path.to_path_buf(),
            None => default_output_path(input, task.output_suffix()),
        };
        let report = process_file(task, input, &output).await?;

        progress.file_done(&report, i + 1, total);
        reports.push(report);
    }

    progress.finish();
    Ok(reports)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
