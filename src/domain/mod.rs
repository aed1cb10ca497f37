//! Domain logic - pure version rules independent of git and registries

pub mod grammar;
pub mod tag;
pub mod version;

pub use grammar::SemverGrammar;
pub use tag::TagPlanner;
pub use version::{Version, VersionBump};
