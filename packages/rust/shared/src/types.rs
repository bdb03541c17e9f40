//! Core domain types for cleaned Q&A documents.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// QaPair
// ---------------------------------------------------------------------------

/// One question and its (optional) answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaPair {
    /// Display number, 1-based within its numbering scope.
    pub number: usize,
    /// Numeric label the question carried in the source file, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_number: Option<u64>,
    /// Question text without the `Q:` marker.
    pub question: String,
    /// Normalized answer text without the `A:` marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

// ---------------------------------------------------------------------------
// QaDocument
// ---------------------------------------------------------------------------

/// A single block of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// A topic heading line, as it appeared in the source.
    Topic { title: String },
    /// A renumbered question/answer pair.
    Pair(QaPair),
    /// A passed-through line of other content.
    Text { line: String },
}

/// Ordered output document: topics interleaved with renumbered pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QaDocument {
    pub blocks: Vec<Block>,
}

impl QaDocument {
    /// Iterate over the Q&A pairs in document order.
    pub fn pairs(&self) -> impl Iterator<Item = &QaPair> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Pair(pair) => Some(pair),
            _ => None,
        })
    }

    /// Count topics, questions and answers.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for block in &self.blocks {
            match block {
                Block::Topic { .. } => summary.topics += 1,
                Block::Pair(pair) => {
                    summary.questions += 1;
                    if pair.answer.is_some() {
                        summary.answers += 1;
                    }
                }
                Block::Text { .. } => {}
            }
        }
        summary
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Counts printed after each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub topics: usize,
    pub questions: usize,
    pub answers: usize,
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Built-in fluff pattern sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FluffProfile {
    /// Chat hand-offs and offers from database Q&A transcripts.
    #[default]
    Transcript,
    /// Continuation chatter from CI/CD interview transcripts.
    Cicd,
    /// No built-in patterns; only user-supplied ones.
    None,
}

/// What to do with a question that has no answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnansweredPolicy {
    /// Emit the question without an `A:` line.
    #[default]
    Keep,
    /// Omit the question; it does not consume a number.
    Drop,
}

/// Scope within which question numbers restart at 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Numbering {
    /// Restart at 1 after every topic heading.
    #[default]
    PerTopic,
    /// Number all questions in the file 1..N.
    Global,
}

impl FluffProfile {
    /// Config/CLI spelling of this profile.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transcript => "transcript",
            Self::Cicd => "cicd",
            Self::None => "none",
        }
    }
}

impl UnansweredPolicy {
    /// Config/CLI spelling of this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Drop => "drop",
        }
    }
}

impl Numbering {
    /// Config/CLI spelling of this numbering scope.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PerTopic => "per-topic",
            Self::Global => "global",
        }
    }
}

impl std::str::FromStr for FluffProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transcript" => Ok(Self::Transcript),
            "cicd" => Ok(Self::Cicd),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown profile '{other}': expected transcript, cicd, none"
            )),
        }
    }
}

impl std::str::FromStr for UnansweredPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "drop" => Ok(Self::Drop),
            other => Err(format!("unknown policy '{other}': expected keep, drop")),
        }
    }
}

impl std::str::FromStr for Numbering {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "per-topic" => Ok(Self::PerTopic),
            "global" => Ok(Self::Global),
            other => Err(format!(
                "unknown numbering '{other}': expected per-topic, global"
            )),
        }
    }
}

impl std::fmt::Display for FluffProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for UnansweredPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Numbering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
