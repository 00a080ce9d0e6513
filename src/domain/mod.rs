//! Domain layer: records, relations and the record forest
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod reader;
pub mod record;
pub mod relations;

pub use arena::{Ancestors, DepthFirst, Forest, NodeId, NodeRef, TreeNode};
pub use builder::{build_forest, ForestBuilder};
pub use error::{DomainError, DomainResult};
pub use reader::{records, RecordReader};
pub use record::{LineFormat, Record, DELIMITER, TYPE_TAG_WIDTH};
pub use relations::{RecordRelations, RelationTable};
