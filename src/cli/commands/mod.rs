//! CLI command implementations.

pub mod actions;
pub mod import;
pub mod init;
pub mod train;
