//! The `sitebook` operator CLI: argument schema, handlers and text output.

pub mod cli;
pub mod commands;
pub mod fields;
pub mod render;
