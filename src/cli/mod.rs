//! Command line workflows

pub mod orchestration;

pub use orchestration::{run_tags, run_version, TagsArgs, VersionArgs};
