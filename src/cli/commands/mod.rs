//! Command implementations

pub mod bom;
pub mod completions;
pub mod explode;
pub mod import;
pub mod lookup;
pub mod validate;
pub mod where_used;
