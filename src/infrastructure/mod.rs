//! Infrastructure layer: file access and relation table loading
//!
//! Everything the domain treats as an external collaborator lives here.

pub mod error;
pub mod relations;
pub mod source;

pub use error::{InfraError, InfraResult, IoResultExt};
pub use relations::{load_relations, parse_relations};
pub use source::{decode, encode, read_text, write_text, Encoding};
