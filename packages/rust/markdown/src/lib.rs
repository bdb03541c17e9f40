//! Q&A transcript cleanup passes.
//!
//! Removes conversational filler from exported chat transcripts, classifies
//! the remaining lines, and re-emits a normalized Markdown document with
//! questions renumbered per topic. Everything here is pure text in, text out;
//! file handling lives in `qatidy-core`.

mod builder;
mod classify;
mod fluff;
mod normalize;
mod render;
mod reorder;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use qatidy_shared::{CleanConfig, QaDocument, Result, Summary};

pub use builder::{BuildOptions, build_document};
pub use classify::{LineClassifier, LineKind};
pub use fluff::{FluffRemover, collapse_gaps, profile_patterns};
pub use normalize::normalize_answer;
pub use render::render_document;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Result of cleaning one transcript.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    /// Rendered Markdown.
    pub markdown: String,
    /// Structured document the Markdown was rendered from.
    pub document: QaDocument,
    /// Topic/question/answer counts.
    pub summary: Summary,
}

/// Result of reordering one Q&A document.
#[derive(Debug, Clone)]
pub struct ReorderOutput {
    pub markdown: String,
    pub document: QaDocument,
}

/// Result of fluff-only stripping.
#[derive(Debug, Clone)]
pub struct StripOutput {
    /// Text with fluff removed and gaps closed up.
    pub text: String,
    /// Counts of `## ` headings, numbered questions and answer lines.
    pub summary: Summary,
}

// ---------------------------------------------------------------------------
// Cleaner
// ---------------------------------------------------------------------------

/// Compiled cleaning pipeline: fluff remover, line classifier, build options.
#[derive(Debug, Clone)]
pub struct Cleaner {
    fluff: FluffRemover,
    classifier: LineClassifier,
    options: BuildOptions,
}

impl Cleaner {
    /// Compile all patterns named by `config`.
    pub fn new(config: &CleanConfig) -> Result<Self> {
        let fluff = FluffRemover::for_profile(config.profile, &config.extra_patterns)?;
        let classifier = LineClassifier::new(config.min_topic_len, &config.noise_patterns)?;
        let options = BuildOptions {
            unanswered: config.unanswered,
            numbering: config.numbering,
            passthrough: config.passthrough,
            strip_arrows: config.strip_arrows,
        };

        debug!(
            profile = %config.profile,
            fluff_patterns = fluff.len(),
            "cleaner compiled"
        );

        Ok(Self {
            fluff,
            classifier,
            options,
        })
    }

    /// Remove fluff, build the document, and render it.
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn clean(&self, text: &str) -> CleanOutput {
        let defluffed = self.fluff.remove(text);
        let document = build_document(&defluffed, &self.classifier, &self.options);
        let markdown = render_document(&document);
        let summary = document.summary();

        CleanOutput {
            markdown,
            document,
            summary,
        }
    }
}

// ---------------------------------------------------------------------------
// Strip and reorder
// ---------------------------------------------------------------------------

/// Remove fluff and close up the gaps, leaving structure untouched.
#[instrument(skip_all, fields(len = text.len()))]
pub fn strip(text: &str, fluff: &FluffRemover) -> StripOutput {
    let text = collapse_gaps(&fluff.remove(text));
    let summary = count_lines(&text);
    StripOutput { text, summary }
}

/// Sort numbered pairs by their original number and renumber from 1.
pub fn reorder(text: &str, strip_arrows: bool) -> ReorderOutput {
    let document = reorder::reorder(text, strip_arrows);
    let markdown = render_document(&document);
    ReorderOutput { markdown, document }
}

/// Count headings, numbered questions and answers line by line.
fn count_lines(text: &str) -> Summary {
    static TOPIC_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^##\s").expect("valid regex"));
    static QUESTION_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s*Q:").expect("valid regex"));
    static ANSWER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^A:").expect("valid regex"));

    Summary {
        topics: TOPIC_RE.find_iter(text).count(),
        questions: QUESTION_RE.find_iter(text).count(),
        answers: ANSWER_RE.find_iter(text).count(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use qatidy_shared::{Block, FluffProfile, UnansweredPolicy};

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn load_fixture(name: &str) -> String {
        fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    fn cleaner() -> Cleaner {
        Cleaner::new(&CleanConfig::default()).expect("default cleaner")
    }

    fn question_line_re() -> Regex {
        Regex::new(r"^[1-9]\d*\. Q: \S").unwrap()
    }

    // --- Core cleaning ---

    #[test]
    fn cleans_single_pair() {
        let out = cleaner().clean("Q: What is a primary key?\nA: A column that uniquely identifies a row.\n");
        assert_eq!(
            out.markdown,
            "1. Q: What is a primary key?\nA: A column that uniquely identifies a row.\n\n"
        );
        assert_eq!(
            out.summary,
            Summary {
                topics: 0,
                questions: 1,
                answers: 1
            }
        );
    }

    #[test]
    fn filler_line_never_reaches_output() {
        let input = "Q: Index types?\nA: B-tree and hash.\nDo you want me to continue?\n";
        let out = cleaner().clean(input);
        assert!(!out.markdown.contains("Do you want me to continue?"));

        let passthrough = Cleaner::new(&CleanConfig {
            passthrough: true,
            profile: FluffProfile::None,
            ..Default::default()
        })
        .unwrap();
        let out = passthrough.clean(input);
        assert!(!out.markdown.contains("Do you want me to continue?"));
    }

    #[test]
    fn topic_restarts_numbering() {
        let input = "1. Database Operations & Reliability\nQ: a?\nA: 1\nQ: b?\nA: 2\n\
                     2. Networking & Load Balancing\nQ: c?\nA: 3\nQ: d?\nA: 4\nQ: e?\nA: 5\n";
        let out = cleaner().clean(input);
        assert!(out.markdown.contains("\n## 2. Networking & Load Balancing\n\n1. Q: c?\n"));
        assert!(out.markdown.contains("3. Q: e?\nA: 5\n"));
    }

    #[test]
    fn clean_is_stable_on_its_own_output() {
        let input = load_fixture("transcripts/db_qa_init.md");
        let first = cleaner().clean(&input);
        let second = cleaner().clean(&first.markdown);
        assert_eq!(first.markdown, second.markdown);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn invalid_user_pattern_fails_construction() {
        let config = CleanConfig {
            extra_patterns: vec!["(".into()],
            ..Default::default()
        };
        assert!(Cleaner::new(&config).is_err());
    }

    // --- Fixture-based tests ---

    #[test]
    fn db_fixture_structure() {
        let input = load_fixture("transcripts/db_qa_init.md");
        let out = cleaner().clean(&input);

        assert_eq!(out.summary.topics, 3);
        assert!(!out.markdown.contains("ChatGPT"));
        assert!(!out.markdown.contains("Do you want me"));
        assert!(!out.markdown.contains("Here's a comprehensive"));
        assert!(!out.markdown.contains("â†’"));

        let re = question_line_re();
        for line in out.markdown.lines().filter(|l| l.contains(" Q: ")) {
            assert!(re.is_match(line), "bad question line: {line}");
        }
    }

    #[test]
    fn db_fixture_numbers_are_contiguous_per_topic() {
        let input = load_fixture("transcripts/db_qa_init.md");
        let out = cleaner().clean(&input);

        let mut expected = 1;
        for block in &out.document.blocks {
            match block {
                Block::Topic { .. } => expected = 1,
                Block::Pair(pair) => {
                    assert_eq!(pair.number, expected, "question {:?}", pair.question);
                    expected += 1;
                }
                Block::Text { .. } => {}
            }
        }
    }

    #[test]
    fn db_fixture_drop_policy() {
        let input = load_fixture("transcripts/db_qa_init.md");
        let keep = cleaner().clean(&input);
        let drop = Cleaner::new(&CleanConfig {
            unanswered: UnansweredPolicy::Drop,
            ..Default::default()
        })
        .unwrap()
        .clean(&input);

        assert!(keep.summary.questions > keep.summary.answers);
        assert_eq!(drop.summary.questions, drop.summary.answers);
        assert_eq!(drop.summary.answers, keep.summary.answers);
    }

    #[test]
    fn cicd_fixture_strip() {
        let input = load_fixture("transcripts/cicd_qa_only.md");
        let fluff = FluffRemover::for_profile::<&str>(FluffProfile::Cicd, &[]).unwrap();
        let out = strip(&input, &fluff);

        assert!(!out.text.contains("Do you want me to"));
        assert!(!out.text.contains("This brings us to"));
        assert!(!out.text.contains("  "));
        assert!(!out.text.contains(".."));
        assert_eq!(out.summary.questions, 4);
        assert_eq!(out.summary.answers, 4);
    }

    #[test]
    fn strip_removes_standalone_filler_line() {
        let fluff = FluffRemover::for_profile::<&str>(FluffProfile::Cicd, &[]).unwrap();
        let out = strip("1. Q: a?\nA: b.\nDo you want me to proceed with that?\n", &fluff);
        assert!(!out.text.contains("Do you want me"));
        assert_eq!(out.text, "1. Q: a?\nA: b.\n\n");
        assert_eq!(out.summary.questions, 1);
    }

    #[test]
    fn cicd_clean_with_passthrough_drops_filler_lines() {
        let cleaner = Cleaner::new(&CleanConfig {
            profile: FluffProfile::Cicd,
            passthrough: true,
            ..Default::default()
        })
        .unwrap();
        let input = "1. Q: a?\nA: b.\nDo you want me to proceed with that?\n\
                     This brings us to 65 questions so far.\nA longer remark stays\n";
        let out = cleaner.clean(input);
        assert!(!out.markdown.contains("Do you want me"));
        assert!(!out.markdown.contains("This brings us to"));
        assert!(out.markdown.contains("A longer remark stays\n"));
    }

    #[test]
    fn strip_is_noop_on_clean_text() {
        let fluff = FluffRemover::for_profile::<&str>(FluffProfile::Cicd, &[]).unwrap();
        let clean = "1. Q: What is a pipeline?\nA: An automated path to production.\n";
        assert_eq!(strip(clean, &fluff).text, clean);
    }

    #[test]
    fn cicd_fixture_reorder() {
        let input = load_fixture("transcripts/cicd_qa.md");
        let out = reorder(&input, true);

        let originals: Vec<u64> = out
            .document
            .pairs()
            .filter_map(|p| p.original_number)
            .collect();
        let mut sorted = originals.clone();
        sorted.sort();
        assert_eq!(originals, sorted);

        let numbers: Vec<usize> = out.document.pairs().map(|p| p.number).collect();
        assert_eq!(numbers, (1..=numbers.len()).collect::<Vec<_>>());
        assert!(out.markdown.starts_with("1. Q: "));
    }
}
