//! Shared domain types for the resource sequencer workspace.
//!
//! - [`ResourceAssignment`] and its source/property definitions, as they appear
//!   in a blueprint's resource-mapping files
//! - [`SourceRegistry`], the lookup used to check that a dictionary source is
//!   registered, and [`SourceMappings`], its in-memory implementation

pub mod assignment;
pub mod source;

pub use assignment::{
    MalformedKeyDependencies, PropertyDefinition, ResourceAssignment, SourceDefinition,
};
pub use source::{SourceDescriptor, SourceLookupError, SourceMappings, SourceRegistry};
