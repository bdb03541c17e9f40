//! Answer text normalization.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Collapse whitespace runs to single spaces and trim.
///
/// With `strip_arrows`, a mis-decoded `→` (`â†’`) is removed along with the
/// rest of the token it starts.
pub fn normalize_answer(text: &str, strip_arrows: bool) -> String {
    static ARROW_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"â†’\S*").expect("valid regex"));

    let text = if strip_arrows {
        ARROW_RE.replace_all(text, "")
    } else {
        Cow::Borrowed(text)
    };

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
