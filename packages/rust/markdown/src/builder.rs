//! Document builder: one linear pass over classified lines.
//!
//! State is the running question counter and the position of the line being
//! looked at. A question looks ahead past blank and noise lines for its answer;
//! if the next meaningful line is not an answer, that line is left for the main
//! loop to classify again.

use tracing::{debug, trace, warn};

use qatidy_shared::{Block, Numbering, QaDocument, QaPair, UnansweredPolicy};

use crate::classify::{LineClassifier, LineKind};
use crate::normalize::normalize_answer;

/// Shape options for [`build_document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub unanswered: UnansweredPolicy,
    pub numbering: Numbering,
    /// Emit `Other` lines longer than 3 characters verbatim.
    pub passthrough: bool,
    pub strip_arrows: bool,
}

/// Build a [`QaDocument`] from fluff-free text.
pub fn build_document(text: &str, classifier: &LineClassifier, opts: &BuildOptions) -> QaDocument {
    let lines: Vec<&str> = text.lines().collect();
    let mut doc = QaDocument::default();
    let mut next_number = 1usize;
    let mut dropped = 0usize;
    let mut i = 0;

    while i < lines.len() {
        let kind = classifier.classify(lines[i]);
        i += 1;

        match kind {
            LineKind::Blank | LineKind::Noise => {}
            LineKind::Topic(title) => {
                doc.blocks.push(Block::Topic {
                    title: title.to_string(),
                });
                if opts.numbering == Numbering::PerTopic {
                    next_number = 1;
                }
            }
            LineKind::Question(question) if question.is_empty() => {
                trace!(line = i, "empty question marker skipped");
            }
            LineKind::Question(question) => {
                let (answer, resume_at) = find_answer(&lines, i, classifier, opts.strip_arrows);
                i = resume_at;

                if answer.is_none() && opts.unanswered == UnansweredPolicy::Drop {
                    dropped += 1;
                    warn!(question, "unanswered question dropped");
                    continue;
                }

                doc.blocks.push(Block::Pair(QaPair {
                    number: next_number,
                    original_number: None,
                    question: question.to_string(),
                    answer,
                }));
                next_number += 1;
            }
            LineKind::Answer(_) => {
                trace!(line = i, "answer without a question skipped");
            }
            LineKind::Other(line) => {
                if opts.passthrough && line.chars().count() > 3 {
                    doc.blocks.push(Block::Text {
                        line: line.to_string(),
                    });
                }
            }
        }
    }

    let summary = doc.summary();
    debug!(
        topics = summary.topics,
        questions = summary.questions,
        answers = summary.answers,
        dropped,
        "document built"
    );

    doc
}

/// Look for the answer to a question whose line precedes `start`.
///
/// Returns the normalized answer (`None` if missing or empty after
/// normalization) and the index the main loop should continue from.
fn find_answer(
    lines: &[&str],
    start: usize,
    classifier: &LineClassifier,
    strip_arrows: bool,
) -> (Option<String>, usize) {
    let mut j = start;

    while j < lines.len() {
        match classifier.classify(lines[j]) {
            LineKind::Blank | LineKind::Noise => j += 1,
            LineKind::Answer(raw) => {
                let answer = normalize_answer(raw, strip_arrows);
                let answer = (!answer.is_empty()).then_some(answer);
                return (answer, j + 1);
            }
            _ => return (None, j),
        }
    }

    (None, j)
}
