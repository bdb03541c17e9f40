//! Filler-phrase removal.
//!
//! A [`FluffRemover`] holds an ordered list of case-insensitive regexes whose
//! `.` also matches newlines. Patterns run in order, so a broad pattern late in
//! the list sees text already reduced by the narrower ones before it.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use qatidy_shared::{FluffProfile, QaTidyError, Result};

/// Chat hand-offs and offers seen in database Q&A transcripts.
const TRANSCRIPT_PATTERNS: &[&str] = &[
    r"If you want, I can expand this.*?Do you want me to do that next\?",
    r"You said:\s*Proceed\s*ChatGPT said:\s*Perfect\.",
    r"Here's a comprehensive[^\n]*?migrations\.",
    r"Comprehensive Practical DevOps DB Q&A",
    r"Do you want me to[^?\n]*\?",
    r"I can expand[^\n]*?specifically\.",
    r"covering[^\n]*?cloud operations specifically\.",
    r"continuing from what we've covered[^\n]*?\.",
];

/// Continuation chatter seen in CI/CD interview transcripts.
///
/// Each pattern eats its leading space or tab so the surrounding sentence
/// closes up. At the start of a line there is nothing to eat, and the newline
/// before it is left alone.
const CICD_PATTERNS: &[&str] = &[
    r"(?:^|[ \t])I can keep going and expand this all the way to 100\+ questions[^.]*\.",
    r"(?:^|[ \t])Do you want me to continue to #100\?[^.]*\.",
    r"(?:^|[ \t])You said:\s*Proceed\s*ChatGPT said:\s*Perfect\.[^.]*\.",
    r"(?:^|[ \t])If you want, I can continue[^.]*\.",
    r"(?:^|[ \t])Do you want me to proceed with that\?",
    r"(?:^|[ \t])Do you want me to continue with that\?",
    r"(?:^|[ \t])Do you want me to make that next\?",
    r"(?:^|[ \t])I can also create[^.]*\.",
    r"(?:^|[ \t])This brings us to \d+[^.]*\.",
    r"(?:^|[ \t])We've now covered[^.]*\.",
    r"(?:^|[ \t])At this point[^.]*\.",
    r"(?:^|[ \t])to #100\? Perfect\. Let's continue expanding your practical CI/CD interview Q&A from #66 onward, keeping it highly realistic, scenario-driven, and DevOps-focused\.",
    r"(?:^|[ \t])Perfect\. Let's continue[^.]*DevOps-focused\.",
    r"(?:^|[ \t])continuing from #\d+ onward[^.]*\.",
    r"(?:^|[ \t])from #\d+ all the way to[^.]*\.",
    r"(?:^|[ \t])going into extreme[^.]*\.",
    r"(?:^|[ \t])covering[^.]*interview[^.]*\.",
    r"(?:^|[ \t])giving you a[^.]*Q&A[^.]*\.",
    r"(?:^|[ \t])create a[^.]*master-level[^.]*\.",
    r"(?:^|[ \t])DevOps interview[^.]*\.",
    r"(?:^|[ \t])me to continue\.",
    r"(?:^|[ \t])me to proceed\.",
];

/// Built-in pattern list for a profile.
pub fn profile_patterns(profile: FluffProfile) -> &'static [&'static str] {
    match profile {
        FluffProfile::Transcript => TRANSCRIPT_PATTERNS,
        FluffProfile::Cicd => CICD_PATTERNS,
        FluffProfile::None => &[],
    }
}

/// Compile a fluff pattern: case-insensitive, `.` spans newlines, `^` and `$`
/// match at line boundaries.
fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .multi_line(true)
        .build()
        .map_err(|e| QaTidyError::pattern(pattern, e))
}

/// Ordered set of filler patterns removed from raw text.
#[derive(Debug, Clone)]
pub struct FluffRemover {
    patterns: Vec<Regex>,
}

impl FluffRemover {
    /// Compile `patterns` in order. Fails on the first invalid pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Built-in profile patterns followed by `extra` user patterns.
    pub fn for_profile<S: AsRef<str>>(profile: FluffProfile, extra: &[S]) -> Result<Self> {
        let mut all: Vec<&str> = profile_patterns(profile).to_vec();
        all.extend(extra.iter().map(|p| p.as_ref()));
        Self::new(all.as_slice())
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Remove every match of every pattern, in order.
    pub fn remove(&self, text: &str) -> String {
        let mut result = text.to_string();
        let mut removed = 0usize;

        for re in &self.patterns {
            let hits = re.find_iter(&result).count();
            if hits == 0 {
                continue;
            }
            removed += hits;
            result = re.replace_all(&result, "").into_owned();
        }

        debug!(removed, before = text.len(), after = result.len(), "fluff removed");
        result
    }
}

/// Close up the gaps sentence-level removal leaves behind: runs of spaces
/// become one space, runs of periods become one period.
pub fn collapse_gaps(text: &str) -> String {
    static SPACES_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"  +").expect("valid regex"));
    static PERIODS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\.+").expect("valid regex"));

    let result = SPACES_RE.replace_all(text, " ");
    PERIODS_RE.replace_all(&result, ".").into_owned()
}
