//! # Parameter Registry
//!
//! The static configuration table the scope generator iterates: which public
//! scope names exist, which option key each one writes, and how its arguments
//! are normalized.
//!
//! Two alias variants are supported and selected through configuration:
//!
//! ```text
//! aliased:  conditions order group having limit offset joins select from
//!           where -> conditions, with -> include
//! direct:   conditions order group having limit offset joins select from include
//! both:     readonly lock (switches), all (pass-through)
//! ```
//!
//! A table is validated when built: public names are unique and every alias
//! targets a registered collapse parameter. Colliding names are a start-up
//! misconfiguration and surface as [`ScopeError::Configuration`].

use crate::config::ScopeConfig;
use crate::constants::{self, aliases, params};
use crate::error::{Result, ScopeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which set of alias names the table exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasVariant {
    /// `where`/`with` aliases; `include` is only reachable through `with`
    #[default]
    Aliased,
    /// `include` registered under its own name, no aliases
    Direct,
}

impl AliasVariant {
    /// Collapse parameters registered under their canonical name
    pub fn parameters(self) -> Vec<&'static str> {
        let mut parameters = constants::COMMON_PARAMETERS.to_vec();
        if self == AliasVariant::Direct {
            parameters.push(params::INCLUDE);
        }
        parameters
    }

    /// `(public name, parameter key)` pairs
    pub fn aliases(self) -> Vec<(&'static str, &'static str)> {
        match self {
            AliasVariant::Aliased => vec![
                (aliases::WHERE, params::CONDITIONS),
                (aliases::WITH, params::INCLUDE),
            ],
            AliasVariant::Direct => Vec::new(),
        }
    }
}

impl fmt::Display for AliasVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasVariant::Aliased => write!(f, "aliased"),
            AliasVariant::Direct => write!(f, "direct"),
        }
    }
}

/// Argument-normalization rule attached to a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// none → `[]`, one → verbatim, many → ordered sequence
    Collapse,
    /// none → `true`, otherwise the first argument
    Switch,
    /// none → `{}`, otherwise the first argument as a whole options mapping
    PassThrough,
}

/// One registered public scope name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    pub name: String,
    pub key: String,
    pub rule: Normalization,
}

impl ScopeEntry {
    pub fn new(name: &str, key: &str, rule: Normalization) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
            rule,
        }
    }

    pub fn is_alias(&self) -> bool {
        self.name != self.key
    }
}

/// Ordered, validated set of scope entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTable {
    variant: AliasVariant,
    entries: Vec<ScopeEntry>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::for_variant(AliasVariant::default())
    }
}

impl ScopeTable {
    /// Built-in table for an alias variant
    pub fn for_variant(variant: AliasVariant) -> Self {
        let mut entries: Vec<ScopeEntry> = variant
            .parameters()
            .into_iter()
            .map(|key| ScopeEntry::new(key, key, Normalization::Collapse))
            .collect();

        entries.extend(
            variant
                .aliases()
                .into_iter()
                .map(|(name, key)| ScopeEntry::new(name, key, Normalization::Collapse)),
        );

        entries.extend(
            constants::BOOLEAN_SWITCHES
                .iter()
                .map(|key| ScopeEntry::new(key, key, Normalization::Switch)),
        );

        entries.push(ScopeEntry::new(
            constants::ALL,
            constants::ALL,
            Normalization::PassThrough,
        ));

        Self { variant, entries }
    }

    /// Start from the built-in table for `variant` and extend it
    pub fn builder(variant: AliasVariant) -> ScopeTableBuilder {
        ScopeTableBuilder {
            table: Self::for_variant(variant),
        }
    }

    /// Build the table described by a loaded configuration
    pub fn from_config(config: &ScopeConfig) -> Result<Self> {
        let mut builder = Self::builder(config.alias_variant);

        // Sorted so that validation failures are reported deterministically
        let mut extra: Vec<(&String, &String)> = config.extra_aliases.iter().collect();
        extra.sort();
        for (name, key) in extra {
            builder = builder.alias(name, key);
        }

        builder.build()
    }

    pub fn variant(&self) -> AliasVariant {
        self.variant
    }

    pub fn entries(&self) -> &[ScopeEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ScopeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn aliases(&self) -> impl Iterator<Item = &ScopeEntry> {
        self.entries.iter().filter(|entry| entry.is_alias())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the public-name and alias-target invariants
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ScopeError::configuration(format!(
                    "scope name '{}' is registered more than once",
                    entry.name
                )));
            }
        }

        let canonical: HashSet<&str> = self
            .entries
            .iter()
            .filter(|entry| !entry.is_alias() && entry.rule == Normalization::Collapse)
            .map(|entry| entry.key.as_str())
            .collect();

        for alias in self.aliases() {
            if alias.rule != Normalization::Collapse {
                return Err(ScopeError::configuration(format!(
                    "alias '{}' must use the collapse rule",
                    alias.name
                )));
            }
            // `include` has no canonical entry in the aliased variant but is still a valid target
            let known_key = canonical.contains(alias.key.as_str()) || alias.key == params::INCLUDE;
            if !known_key {
                return Err(ScopeError::configuration(format!(
                    "alias '{}' targets unknown parameter '{}'",
                    alias.name, alias.key
                )));
            }
        }

        Ok(())
    }
}

/// Adds configured aliases on top of a built-in table
#[derive(Debug, Clone)]
pub struct ScopeTableBuilder {
    table: ScopeTable,
}

impl ScopeTableBuilder {
    pub fn alias(mut self, name: &str, key: &str) -> Self {
        self.table
            .entries
            .push(ScopeEntry::new(name, key, Normalization::Collapse));
        self
    }

    pub fn build(self) -> Result<ScopeTable> {
        self.table.validate()?;
        Ok(self.table)
    }
}
