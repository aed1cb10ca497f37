pub mod build_info;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod registry;
pub mod resolver;
pub mod ui;

pub use error::{Result, SverError};
