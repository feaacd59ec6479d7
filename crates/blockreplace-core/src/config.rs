//! Engine configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! case_sensitive = false
//! blocks = "text"            # "all", "text", or a list of type names
//! host_version = "6.5.2"
//! log_filter = "blockreplace_core=debug"
//!
//! [dispatch]
//! "acme/card" = ["title", "body"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capability::HostCapabilities;
use crate::dispatch::{AttributeDescriptor, DispatchTable, qualified_name, text_block_types};
use crate::error::{Error, Result};

/// Which block types a pass processes.
///
/// Blocks outside the filter are still traversed so that their children are
/// reached; only their own attributes are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlockFilterRepr", into = "BlockFilterRepr")]
pub enum BlockFilter {
    /// Every block type.
    #[default]
    All,
    /// The built-in list of text block types.
    TextBlocks,
    /// An explicit allow-list of (qualified) type names.
    Only(BTreeSet<String>),
}

impl BlockFilter {
    /// Allow-list from arbitrary type names; bare names are qualified.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Only(
            names
                .into_iter()
                .map(|n| qualified_name(n.as_ref()).into_owned())
                .collect(),
        )
    }

    /// Check if a block type is processed.
    pub fn allows(&self, type_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::TextBlocks => text_block_types().contains(&&*qualified_name(type_name)),
            Self::Only(names) => names.contains(&*qualified_name(type_name)),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BlockFilterRepr {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<BlockFilterRepr> for BlockFilter {
    type Error = String;

    fn try_from(repr: BlockFilterRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            BlockFilterRepr::Keyword(k) => match k.to_lowercase().as_str() {
                "all" => Ok(Self::All),
                "text" => Ok(Self::TextBlocks),
                other => Err(format!(
                    "unknown block filter '{other}' (expected \"all\", \"text\" or a list)"
                )),
            },
            BlockFilterRepr::List(names) => Ok(Self::only(names)),
        }
    }
}

impl From<BlockFilter> for BlockFilterRepr {
    fn from(filter: BlockFilter) -> Self {
        match filter {
            BlockFilter::All => Self::Keyword("all".into()),
            BlockFilter::TextBlocks => Self::Keyword("text".into()),
            BlockFilter::Only(names) => Self::List(names.into_iter().collect()),
        }
    }
}

impl fmt::Display for BlockFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::TextBlocks => write!(f, "text"),
            Self::Only(names) => write!(f, "{} type(s)", names.len()),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Force case-sensitive matching regardless of the request flag
    pub case_sensitive: bool,
    /// Block types to process
    pub blocks: BlockFilter,
    /// Extra `type name -> attributes` dispatch entries
    pub dispatch: BTreeMap<String, Vec<String>>,
    /// Host editor version, used only for capability checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_version: Option<String>,
    /// Tracing filter directives for [`crate::logging::init`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl EngineConfig {
    /// Parse a configuration from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(?path, "Loading engine config");
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<()> {
        for (type_name, attributes) in &self.dispatch {
            if type_name.trim().is_empty() {
                return Err(Error::config("dispatch entry with empty type name"));
            }
            if attributes.iter().any(|a| a.trim().is_empty()) {
                return Err(Error::config(format!(
                    "dispatch entry '{type_name}' has an empty attribute name"
                )));
            }
        }
        self.capabilities()?;
        if let Some(directives) = self.log_filter.as_deref() {
            crate::logging::filter(Some(directives))?;
        }
        Ok(())
    }

    /// Host capabilities for the configured version, if one is set.
    pub fn capabilities(&self) -> Result<Option<HostCapabilities>> {
        self.host_version
            .as_deref()
            .map(HostCapabilities::from_version)
            .transpose()
    }

    /// Apply the configured dispatch entries to `table`.
    pub fn apply_dispatch(&self, table: &mut DispatchTable) {
        for (type_name, attributes) in &self.dispatch {
            table.register(
                type_name,
                attributes.iter().map(AttributeDescriptor::text).collect(),
            );
        }
    }
}
