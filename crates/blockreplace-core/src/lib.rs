//! Search and replace over block-structured documents.
//!
//! # Architecture
//!
//! A pass flows through these pieces:
//!
//! 1. [`CompiledPattern`] turns the search text into a regex guarded against
//!    matching inside HTML tags.
//! 2. [`TraversalEngine`] walks the block tree depth-first and asks the
//!    [`DispatchTable`] which attributes to process for each block type.
//! 3. A [`ReplacementStrategy`] (text or table section by default) runs the
//!    pattern over an attribute value and counts matches.
//! 4. The [`CommitGate`] writes changed attributes back to the host
//!    [`BlockStore`](blockreplace_tree::BlockStore) in replace mode only.
//!
//! [`SearchReplace`] ties these together for callers.

pub mod accumulate;
pub mod capability;
pub mod commit;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod logging;
pub mod pattern;
pub mod run;
pub mod strategy;
pub mod traverse;

pub use accumulate::{Applied, apply};
pub use capability::HostCapabilities;
pub use commit::{CommitFailure, CommitGate, PassWarning};
pub use config::{BlockFilter, EngineConfig};
pub use context::{Counters, RunContext, RunMode};
pub use dispatch::{AttributeDescriptor, AttributeShape, DispatchTable};
pub use error::{Error, Result};
pub use extract::{extract_table, extract_text};
pub use pattern::CompiledPattern;
pub use run::{RunOutcome, RunRequest, SearchReplace};
pub use strategy::{
    PassInput, Replacement, ReplacementStrategy, TableSectionStrategy, TextStrategy,
};
pub use traverse::TraversalEngine;
