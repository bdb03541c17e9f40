//! Markdown serialization of a [`QaDocument`].

use std::fmt::Write;

use qatidy_shared::{Block, QaDocument};

/// Render a document.
///
/// Topics become a blank line, `## <title>` and another blank line. Each pair
/// is `<n>. Q: <question>`, then `A: <answer>` when present, then a blank line.
pub fn render_document(doc: &QaDocument) -> String {
    let mut out = String::new();

    for block in &doc.blocks {
        match block {
            Block::Topic { title } => {
                let _ = write!(out, "\n## {title}\n\n");
            }
            Block::Pair(pair) => {
                let _ = writeln!(out, "{}. Q: {}", pair.number, pair.question);
                if let Some(answer) = &pair.answer {
                    let _ = writeln!(out, "A: {answer}");
                }
                out.push('\n');
            }
            Block::Text { line } => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out
}
