//! Resource assignment model.
//!
//! A resource assignment is one named configuration parameter of a blueprint,
//! together with the dictionary entry it maps to, the source used to resolve
//! it, and the other assignments that must be resolved first.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Property name inside a source definition listing the assignments a
/// source lookup is keyed on.
pub const KEY_DEPENDENCIES: &str = "key-dependencies";

/// A `key-dependencies` property that is not a list of assignment names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed key-dependencies ({value}), expected a list of assignment names")]
pub struct MalformedKeyDependencies {
    /// The property value as JSON
    pub value: String,
}

/// One named configuration parameter to be resolved.
///
/// Field names follow the kebab-case keys of the blueprint mapping files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceAssignment {
    /// Unique key of the assignment within a resolution request
    pub name: String,
    /// Whether the value is supplied as a request input
    #[serde(default)]
    pub input_param: bool,
    /// Type information of the resolved value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyDefinition>,
    /// Logical dictionary entry this assignment maps to
    #[serde(default)]
    pub dictionary_name: String,
    /// Name of the resolution source (`input`, `default`, `db`, ...)
    #[serde(default)]
    pub dictionary_source: String,
    /// Structured definition of the resolution source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_source_definition: Option<SourceDefinition>,
    /// Names of assignments that must resolve before this one
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub dependencies: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResourceAssignment {
    /// Create an assignment whose dictionary name equals its name.
    pub fn new(name: &str, dictionary_source: &str) -> Self {
        Self {
            name: name.to_string(),
            input_param: false,
            property: None,
            dictionary_name: name.to_string(),
            dictionary_source: dictionary_source.to_string(),
            dictionary_source_definition: None,
            dependencies: Vec::new(),
        }
    }

    /// Set the plain dependency list.
    pub fn with_dependencies(mut self, dependencies: &[&str]) -> Self {
        self.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Set the dictionary name.
    pub fn with_dictionary_name(mut self, dictionary_name: &str) -> Self {
        self.dictionary_name = dictionary_name.to_string();
        self
    }

    /// Attach a source definition carrying `key-dependencies`.
    pub fn with_key_dependencies(mut self, key_dependencies: &[&str]) -> Self {
        let definition = self
            .dictionary_source_definition
            .get_or_insert_with(|| SourceDefinition::new(&self.dictionary_source));
        definition.properties.insert(
            KEY_DEPENDENCIES.to_string(),
            Value::Array(
                key_dependencies
                    .iter()
                    .map(|d| Value::String(d.to_string()))
                    .collect(),
            ),
        );
        self
    }

    /// The `key-dependencies` of the source definition, if declared.
    pub fn key_dependencies(&self) -> Result<Option<Vec<&str>>, MalformedKeyDependencies> {
        match &self.dictionary_source_definition {
            Some(definition) => definition.key_dependencies(),
            None => Ok(None),
        }
    }

    /// Dependencies that become graph edges.
    ///
    /// Non-empty `key-dependencies` take precedence over `dependencies`.
    /// An empty result means the assignment hangs off the graph root.
    pub fn edge_dependencies(&self) -> Result<Vec<&str>, MalformedKeyDependencies> {
        Ok(match self.key_dependencies()? {
            Some(keys) if !keys.is_empty() => keys,
            _ => self.dependencies.iter().map(String::as_str).collect(),
        })
    }

    /// Every dependency name the assignment mentions, plain and keyed.
    ///
    /// Malformed `key-dependencies` contribute nothing here; they are
    /// reported through [`key_dependencies`](Self::key_dependencies).
    pub fn declared_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .map(String::as_str)
            .chain(self.key_dependencies().ok().flatten().unwrap_or_default())
    }
}

/// Definition of the source an assignment resolves from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Node type of the source (e.g. `source-db`)
    #[serde(rename = "type", default)]
    pub source_type: String,
    /// Free-form source properties
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
}

impl SourceDefinition {
    pub fn new(source_type: &str) -> Self {
        Self {
            source_type: source_type.to_string(),
            properties: serde_json::Map::new(),
        }
    }

    /// Entries of the `key-dependencies` property.
    ///
    /// `Ok(None)` when the property is absent or null; an error when it is
    /// anything but a list of strings.
    pub fn key_dependencies(&self) -> Result<Option<Vec<&str>>, MalformedKeyDependencies> {
        let Some(value) = self.properties.get(KEY_DEPENDENCIES) else {
            return Ok(None);
        };
        let malformed = || MalformedKeyDependencies {
            value: value.to_string(),
        };

        match value {
            Value::Null => Ok(None),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().ok_or_else(malformed))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            _ => Err(malformed()),
        }
    }
}

/// Type information of a resolved value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PropertyDefinition {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}
