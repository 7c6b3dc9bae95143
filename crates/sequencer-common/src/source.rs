//! Dictionary source registry.
//!
//! Every assignment names the source its value is resolved from. A source is
//! usable only when it is registered against a source node type.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const SOURCE_INPUT: &str = "input";
pub const SOURCE_DEFAULT: &str = "default";
pub const SOURCE_DB: &str = "db";
pub const SOURCE_PROCESSOR_DB: &str = "processor-db";
pub const SOURCE_REST: &str = "rest";
pub const SOURCE_MDSAL: &str = "mdsal";
pub const SOURCE_CAPABILITY: &str = "capability";

/// A registered source and the node type that implements it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub node_type: String,
}

/// Errors from a source lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceLookupError {
    #[error("Failed to get node type for dictionary source({0})")]
    NotRegistered(String),

    #[error("Dictionary source is not defined")]
    Undefined,
}

/// Lookup of registered dictionary sources.
pub trait SourceRegistry: Send + Sync {
    fn lookup(&self, source: &str) -> Result<SourceDescriptor, SourceLookupError>;
}

impl<T: SourceRegistry + ?Sized> SourceRegistry for &T {
    fn lookup(&self, source: &str) -> Result<SourceDescriptor, SourceLookupError> {
        (**self).lookup(source)
    }
}

impl<T: SourceRegistry + ?Sized> SourceRegistry for Arc<T> {
    fn lookup(&self, source: &str) -> Result<SourceDescriptor, SourceLookupError> {
        (**self).lookup(source)
    }
}

impl<T: SourceRegistry + ?Sized> SourceRegistry for Box<T> {
    fn lookup(&self, source: &str) -> Result<SourceDescriptor, SourceLookupError> {
        (**self).lookup(source)
    }
}

/// Source name to node type mapping, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceMappings {
    mappings: IndexMap<String, String>,
}

impl SourceMappings {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in sources.
    pub fn with_defaults() -> Self {
        let mut mappings = Self::new();
        mappings.register(SOURCE_INPUT, "source-input");
        mappings.register(SOURCE_DEFAULT, "source-default");
        mappings.register(SOURCE_DB, "source-db");
        mappings.register(SOURCE_PROCESSOR_DB, "source-db");
        mappings.register(SOURCE_REST, "source-rest");
        mappings.register(SOURCE_MDSAL, "source-rest");
        mappings.register(SOURCE_CAPABILITY, "source-capability");
        mappings
    }

    /// Register a source, replacing any previous node type for it.
    pub fn register(&mut self, name: &str, node_type: &str) -> &mut Self {
        self.mappings
            .insert(name.to_string(), node_type.to_string());
        self
    }

    /// Add every mapping of `other`, overriding existing names.
    pub fn extend(&mut self, other: &SourceMappings) {
        for (name, node_type) in other.iter() {
            self.register(name, node_type);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.mappings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Iterate `(source name, node type)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings
            .iter()
            .map(|(name, node_type)| (name.as_str(), node_type.as_str()))
    }
}

impl SourceRegistry for SourceMappings {
    fn lookup(&self, source: &str) -> Result<SourceDescriptor, SourceLookupError> {
        if source.is_empty() {
            return Err(SourceLookupError::Undefined);
        }
        self.mappings
            .get(source)
            .map(|node_type| SourceDescriptor {
                name: source.to_string(),
                node_type: node_type.clone(),
            })
            .ok_or_else(|| SourceLookupError::NotRegistered(source.to_string()))
    }
}
