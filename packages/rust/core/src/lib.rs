//! File-level orchestration for qatidy.
//!
//! Ties the text passes from `qatidy-markdown` to the filesystem: one read and
//! one write per input file, with tracing spans and a progress-reporter seam.

pub mod pipeline;

pub use pipeline::{
    FileReport, ProgressReporter, SilentProgress, Task, default_output_path, process_file,
    process_files,
};
