//! Line classification.
//!
//! Every trimmed line is exactly one of blank, topic heading, question,
//! answer, noise, or other text. Precedence is fixed: topic, question, answer,
//! then noise versus other.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use qatidy_shared::{QaTidyError, Result};

/// Line-start patterns for whole lines of chat filler.
const NOISE_PATTERNS: &[&str] = &[
    r"^Perfect\.",
    r"^You said:",
    r"^ChatGPT said:",
    r"^If you want",
    r"^Do you want",
    r"^Here's a",
    r"^\d+\+.*practical",
    r"^covering.*specifically",
    r"^I can expand",
    r"^continuing from",
];

/// Classification of a single line. Borrowed text has markers stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// Topic heading text, without any `## ` prefix.
    Topic(&'a str),
    /// Question text after `Q:`, with any old `<n>.` label dropped.
    Question(&'a str),
    /// Answer text after `A:`, not yet normalized.
    Answer(&'a str),
    /// Known filler line.
    Noise,
    /// Anything else.
    Other(&'a str),
}

/// Compile a noise pattern: case-insensitive.
fn compile_noise(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| QaTidyError::pattern(pattern, e))
}

/// Classifies lines by topic length threshold and noise patterns.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    min_topic_len: usize,
    extra_noise: Vec<Regex>,
}

impl LineClassifier {
    /// Build a classifier. `extra_noise` regexes add to the built-in noise set.
    pub fn new<S: AsRef<str>>(min_topic_len: usize, extra_noise: &[S]) -> Result<Self> {
        let extra_noise = extra_noise
            .iter()
            .map(|p| compile_noise(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            min_topic_len,
            extra_noise,
        })
    }

    /// Classify one line. Surrounding whitespace is ignored.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        let line = line.trim();

        if line.is_empty() {
            return LineKind::Blank;
        }
        if let Some(title) = self.topic_title(line) {
            return LineKind::Topic(title);
        }
        if let Some(question) = question_text(line) {
            return LineKind::Question(question);
        }
        if let Some(answer) = line.strip_prefix("A:") {
            return LineKind::Answer(answer.trim());
        }
        if self.is_noise(line) {
            return LineKind::Noise;
        }
        LineKind::Other(line)
    }

    /// A topic is `<n>. <Capitalized phrase>` longer than the threshold, with
    /// no question mark, that is not itself a numbered question.
    fn topic_title<'a>(&self, line: &'a str) -> Option<&'a str> {
        static TOPIC_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(?:##\s+)?(\d+\.\s+[A-Z][a-zA-Z\s&/]+)$").expect("valid regex")
        });
        static NUMBERED_Q_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^\d+\.\s*Q:").expect("valid regex"));

        let title = TOPIC_RE.captures(line)?.get(1)?.as_str();

        if title.chars().count() <= self.min_topic_len
            || title.contains('?')
            || NUMBERED_Q_RE.is_match(title)
        {
            return None;
        }
        Some(title)
    }

    fn is_noise(&self, line: &str) -> bool {
        static BUILTIN_NOISE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
            NOISE_PATTERNS
                .iter()
                .map(|p| compile_noise(p).expect("valid regex"))
                .collect()
        });

        BUILTIN_NOISE
            .iter()
            .chain(self.extra_noise.iter())
            .any(|re| re.is_match(line))
    }
}

/// Question text for `Q: ...` or `<n>. Q: ...`; `None` if not a question.
fn question_text(line: &str) -> Option<&str> {
    static QUESTION_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(?:\d+\.\s*)?Q:(.*)$").expect("valid regex"));

    QUESTION_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new::<&str>(15, &[]).expect("classifier")
    }

    #[test]
    fn detects_topic_heading() {
        let c = classifier();
        assert_eq!(
            c.classify("2. Networking & Load Balancing"),
            LineKind::Topic("2. Networking & Load Balancing")
        );
        assert_eq!(
            c.classify("  3. Backup & Recovery  "),
            LineKind::Topic("3. Backup & Recovery")
        );
    }

    #[test]
    fn accepts_rendered_topic_heading() {
        let c = classifier();
        assert_eq!(
            c.classify("## 1. Database Operations & Reliability"),
            LineKind::Topic("1. Database Operations & Reliability")
        );
    }

    #[test]
    fn short_or_questioning_numbered_lines_are_not_topics() {
        let c = classifier();
        // Too short for the threshold.
        assert_eq!(c.classify("4. Caching"), LineKind::Other("4. Caching"));
        // Lowercase start.
        assert!(matches!(c.classify("5. use a connection pool always"), LineKind::Other(_)));
        // Question mark or punctuation outside the phrase alphabet.
        assert!(matches!(c.classify("6. Why Use Read Replicas Here?"), LineKind::Other(_)));
        assert!(matches!(c.classify("7. Sharding, Partitioning"), LineKind::Other(_)));
    }

    #[test]
    fn threshold_is_configurable() {
        let c = LineClassifier::new::<&str>(5, &[]).unwrap();
        assert_eq!(c.classify("4. Caching"), LineKind::Topic("4. Caching"));
    }

    #[test]
    fn numbered_question_is_question_not_topic() {
        let c = classifier();
        assert_eq!(
            c.classify("12. Q: What is WAL shipping?"),
            LineKind::Question("What is WAL shipping?")
        );
        assert_eq!(
            c.classify("Q:   What is a primary key?"),
            LineKind::Question("What is a primary key?")
        );
    }

    #[test]
    fn answer_marker() {
        let c = classifier();
        assert_eq!(
            c.classify("A: A column that uniquely identifies a row."),
            LineKind::Answer("A column that uniquely identifies a row.")
        );
        assert_eq!(c.classify("A:"), LineKind::Answer(""));
    }

    #[test]
    fn noise_and_other() {
        let c = classifier();
        assert_eq!(c.classify("ChatGPT said:"), LineKind::Noise);
        assert_eq!(c.classify("perfect. let's go on"), LineKind::Noise);
        assert_eq!(c.classify("200+ practical questions"), LineKind::Noise);
        assert_eq!(c.classify("Some remark"), LineKind::Other("Some remark"));
        assert_eq!(c.classify("   "), LineKind::Blank);
    }

    #[test]
    fn extra_noise_patterns() {
        let c = LineClassifier::new(15, &["^sure thing"]).unwrap();
        assert_eq!(c.classify("Sure thing, here you go"), LineKind::Noise);

        let err = LineClassifier::new(15, &["^[oops"]).unwrap_err();
        assert!(matches!(err, QaTidyError::Pattern { .. }));
    }
}
