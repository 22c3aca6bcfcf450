//! # nppatch-core
//!
//! Label catalog, save-error formatting, permission set generation,
//! configuration, and error handling for the NPPatch UI components.

pub mod config;
pub mod error;
pub mod labels;
pub mod package;
pub mod permission_set;
pub mod save_result;
