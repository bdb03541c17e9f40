//! Sequential reorder of an already numbered Q&A document.
//!
//! The text is cut at every `<n>. Q:` marker. Each chunk yields its original
//! number, the question (rest of the marker line, up to any ` A:` on it) and
//! an answer (everything after the first `A:` marker). Pairs are
//! stably sorted by original number and renumbered 1..N, so gaps and
//! duplicates in the source numbering disappear.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, warn};

use qatidy_shared::{Block, QaDocument, QaPair};

use crate::normalize::normalize_answer;

/// A pair as found in the source, before renumbering.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawPair {
    original_number: u64,
    question: String,
    answer: String,
}

/// Parse numbered pairs out of `text`, sort them by original number and
/// renumber them from 1. Pairs without question or answer text are dropped.
#[instrument(skip_all, fields(len = text.len()))]
pub fn reorder(text: &str, strip_arrows: bool) -> QaDocument {
    let mut pairs = parse_pairs(text, strip_arrows);
    pairs.sort_by_key(|p| p.original_number);

    let blocks = pairs
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            Block::Pair(QaPair {
                number: i + 1,
                original_number: Some(p.original_number),
                question: p.question,
                answer: Some(p.answer),
            })
        })
        .collect::<Vec<_>>();

    debug!(pairs = blocks.len(), "pairs reordered");
    QaDocument { blocks }
}

fn parse_pairs(text: &str, strip_arrows: bool) -> Vec<RawPair> {
    static MARKER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(\d+)\.\s*Q:").expect("valid regex"));

    let markers: Vec<_> = MARKER_RE.captures_iter(text).collect();
    let mut pairs = Vec::with_capacity(markers.len());

    for (idx, caps) in markers.iter().enumerate() {
        let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = markers
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let chunk = &text[whole.end()..end];

        let Ok(original_number) = num.as_str().parse::<u64>() else {
            debug!(label = num.as_str(), "unparseable question number skipped");
            continue;
        };

        let (question, answer) = split_chunk(chunk);
        let question = question.trim();
        let answer = answer
            .map(|a| normalize_answer(a, strip_arrows))
            .unwrap_or_default();

        if question.is_empty() || answer.is_empty() {
            warn!(original_number, "pair without question or answer dropped");
            continue;
        }

        pairs.push(RawPair {
            original_number,
            question: question.to_string(),
            answer,
        });
    }

    pairs
}

/// Split the text after a `Q:` marker into question and raw answer text.
///
/// The question is the rest of the marker line, cut short at an ` A:` on the
/// same line. The answer is everything after the first `A:` marker, up to the
/// next Markdown heading.
fn split_chunk(chunk: &str) -> (&str, Option<&str>) {
    static HEADING_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]").expect("valid regex"));
    static ANSWER_MARKER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)(?:^|[ \t])A:").expect("valid regex"));

    let (line, rest) = chunk.split_once('\n').unwrap_or((chunk, ""));
    let rest_end = HEADING_RE.find(rest).map_or(rest.len(), |m| m.start());
    let region = &chunk[..chunk.len() - rest.len() + rest_end];

    match ANSWER_MARKER_RE.find(region) {
        Some(m) if m.start() < line.len() => (&line[..m.start()], Some(&region[m.end()..])),
        Some(m) => (line, Some(&region[m.end()..])),
        None => (line, None),
    }
}
