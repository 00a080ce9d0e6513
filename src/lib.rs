//! Rebuild the record hierarchy of flat, pipe-delimited SPED files.
//!
//! A file is read as a sequence of [`domain::Record`]s. A relation table maps
//! each record type to the type of its parent, and [`domain::ForestBuilder`]
//! turns the flat sequence into a [`domain::Forest`] that can be queried,
//! filtered, edited and rendered back to the same flat text.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
