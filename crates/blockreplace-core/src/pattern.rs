//! Search pattern compilation
//!
//! Search text is used as a regular expression fragment as typed, so `.` or
//! `(` keep their regex meaning. Every match is filtered through an HTML
//! boundary guard: a match may neither start nor end inside an open `<...`
//! tag, which keeps markup embedded in rich-text values intact.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

/// A compiled search pattern for one search/replace operation.
///
/// An empty or syntactically invalid search text compiles to a pattern that
/// matches nothing.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Option<Regex>,
    source: String,
    case_sensitive: bool,
    invalid: Option<String>,
}

impl CompiledPattern {
    /// Compile `search` with the given case sensitivity.
    ///
    /// Case-insensitive matching uses Unicode case folding.
    pub fn compile(search: &str, case_sensitive: bool) -> Self {
        if search.is_empty() {
            return Self::never(case_sensitive);
        }

        match RegexBuilder::new(search)
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(regex) => Self {
                regex: Some(regex),
                source: search.to_string(),
                case_sensitive,
                invalid: None,
            },
            Err(e) => {
                tracing::warn!(pattern = search, error = %e, "Search text is not a valid pattern; matching nothing");
                Self {
                    regex: None,
                    source: search.to_string(),
                    case_sensitive,
                    invalid: Some(e.to_string()),
                }
            }
        }
    }

    /// A pattern that never matches.
    pub fn never(case_sensitive: bool) -> Self {
        Self {
            regex: None,
            source: String::new(),
            case_sensitive,
            invalid: None,
        }
    }

    /// The search text this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// True when the pattern can never match (empty or invalid input).
    pub fn matches_nothing(&self) -> bool {
        self.regex.is_none()
    }

    /// Reason the search text was rejected, if it was.
    pub fn invalid_reason(&self) -> Option<&str> {
        self.invalid.as_deref()
    }

    /// All non-overlapping, guard-respecting matches in `text`, left to right.
    pub fn find_iter<'p, 't>(&'p self, text: &'t str) -> Matches<'p, 't> {
        Matches {
            regex: self.regex.as_ref(),
            text,
            pos: 0,
        }
    }

    /// Number of matches in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.find_iter(text).count()
    }
}

/// Iterator over the byte ranges of matches. See [`CompiledPattern::find_iter`].
#[derive(Debug)]
pub struct Matches<'p, 't> {
    regex: Option<&'p Regex>,
    text: &'t str,
    pos: usize,
}

impl Iterator for Matches<'_, '_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let regex = self.regex?;
        while self.pos <= self.text.len() {
            let found = regex.find_at(self.text, self.pos)?;
            let start = found.start();

            let accepted = if inside_tag(self.text, start) {
                None
            } else {
                self.shorten_outside_tag(regex, found.range())
            };
            let Some(range) = accepted else {
                // Retry from the next character, as a lookaround-guarded scan would.
                self.pos = next_char_boundary(self.text, start)?;
                continue;
            };

            self.pos = if range.is_empty() {
                next_char_boundary(self.text, range.end).unwrap_or(self.text.len() + 1)
            } else {
                range.end
            };
            return Some(range);
        }
        None
    }
}

impl Matches<'_, '_> {
    /// Find the preferred match at `range.start` whose end is outside a tag.
    ///
    /// While the end falls inside an unclosed `<...`, the haystack is cut at
    /// that `<` and the regex is re-run anchored to the same start, so
    /// shorter alternatives are tried before the start is given up.
    fn shorten_outside_tag(&self, regex: &Regex, mut range: Range<usize>) -> Option<Range<usize>> {
        while inside_tag(self.text, range.end) {
            let limit = self.text[..range.end].rfind('<')?;
            let shorter = regex.find_at(&self.text[..limit], range.start)?;
            if shorter.start() != range.start {
                return None;
            }
            range = shorter.range();
        }
        Some(range)
    }
}

/// True when byte offset `at` lies inside an unterminated `<...` tag.
pub fn inside_tag(text: &str, at: usize) -> bool {
    let prefix = &text[..at];
    match prefix.rfind('<') {
        Some(open) => !prefix[open..].contains('>'),
        None => false,
    }
}

fn next_char_boundary(text: &str, at: usize) -> Option<usize> {
    text[at..].chars().next().map(|c| at + c.len_utf8())
}
