//! Per-pass run context and counters

use serde::{Deserialize, Serialize};

use crate::pattern::CompiledPattern;

/// Whether a pass only counts matches or also writes substitutions back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Count matches, never mutate.
    #[default]
    SearchOnly,
    /// Substitute every match and commit changed attributes.
    ReplaceAndCommit,
}

impl RunMode {
    pub fn commits(&self) -> bool {
        matches!(self, RunMode::ReplaceAndCommit)
    }
}

/// Everything one traversal needs besides the tree itself.
///
/// Built fresh for every pass and dropped when it completes.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub pattern: CompiledPattern,
    pub replacement: String,
    pub mode: RunMode,
}

impl RunContext {
    pub fn new(pattern: CompiledPattern, replacement: impl Into<String>, mode: RunMode) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
            mode,
        }
    }

    /// A search-only context.
    pub fn search(pattern: CompiledPattern) -> Self {
        Self::new(pattern, String::new(), RunMode::SearchOnly)
    }
}

/// Running totals for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Matches found, in either mode.
    pub matches: usize,
    /// Substitutions written through successful commits.
    pub replacements: usize,
    /// Blocks visited by the traversal.
    pub visited: usize,
}

impl std::ops::AddAssign for Counters {
    fn add_assign(&mut self, other: Self) {
        self.matches += other.matches;
        self.replacements += other.replacements;
        self.visited += other.visited;
    }
}
