//! YAML parsing for master data files
//!
//! Parse failures carry the file's text and the failing offset so miette
//! can point at the offending line.

pub mod diagnostics;
pub mod parser;

pub use diagnostics::{YamlError, YamlSyntaxError};
pub use parser::parse_yaml;
