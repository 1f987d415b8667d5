//! CLI command implementations

pub(crate) mod common;
pub(crate) mod containers;
pub(crate) mod migrate;
pub(crate) mod shell;
pub(crate) mod status;
