pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod mapping;
pub mod sequencer;
pub mod validator;

// Shared domain types live in sequencer-common
pub use sequencer_common::{
    MalformedKeyDependencies, PropertyDefinition, ResourceAssignment, SourceDefinition,
    SourceDescriptor, SourceLookupError, SourceMappings, SourceRegistry,
};

pub use errors::{SequenceError, ValidationError, ValidationIssue};
pub use sequencer::{Batch, sequence};
pub use validator::{AssignmentValidator, ValidatedAssignments};
