//! Substitution and match counting over a single text value

use crate::context::RunMode;
use crate::pattern::CompiledPattern;

/// Result of running a pattern over one text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Text after substitution; equal to the input in search-only mode.
    pub new_text: String,
    /// Number of matches found (and substituted, when replacing).
    pub match_count: usize,
}

impl Applied {
    /// Whether the text differs from `old_text`.
    ///
    /// A replacement identical to the matched text yields no change even
    /// though matches were counted.
    pub fn is_changed(&self, old_text: &str) -> bool {
        self.new_text != old_text
    }
}

/// Run `pattern` over `old_text`.
///
/// The replacement is inserted literally; `$1`-style references are not
/// expanded.
pub fn apply(old_text: &str, pattern: &CompiledPattern, replacement: &str, mode: RunMode) -> Applied {
    if !mode.commits() {
        return Applied {
            new_text: old_text.to_string(),
            match_count: pattern.count(old_text),
        };
    }

    let mut new_text = String::with_capacity(old_text.len());
    let mut last = 0;
    let mut match_count = 0;
    for range in pattern.find_iter(old_text) {
        new_text.push_str(&old_text[last..range.start]);
        new_text.push_str(replacement);
        last = range.end;
        match_count += 1;
    }
    new_text.push_str(&old_text[last..]);

    Applied {
        new_text,
        match_count,
    }
}
