//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled     |
//! |------------|----------------------|
//! | `validate` | `Validate`           |
//! | `sequence` | `Sequence`           |
//! | `graph`    | `Graph`              |
//! | `sources`  | `Sources`            |
//! | `config`   | `Config`             |

pub mod config;
pub mod graph;
pub mod sequence;
pub mod sources;
pub mod validate;

pub use config::{cmd_config, cmd_config_init};
pub use graph::cmd_graph;
pub use sequence::cmd_sequence;
pub use sources::cmd_sources;
pub use validate::cmd_validate;
