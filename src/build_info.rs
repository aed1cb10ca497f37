//! Build stamp printed by `sver version`.

use chrono::{SecondsFormat, Utc};
use std::fmt;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const COMMIT: &str = env!("SVER_COMMIT");
const BUILD_DATE: &str = env!("SVER_BUILD_DATE");

const UNKNOWN_COMMIT: &str = "????????";

/// Version stamp information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub version: String,
    pub date: String,
    pub commit: String,
}

impl Info {
    /// Stamp of the running binary, with fallbacks for missing build data
    pub fn current() -> Self {
        Self::from_parts(VERSION, BUILD_DATE, COMMIT)
    }

    /// Empty date falls back to now, empty commit to `????????`
    pub fn from_parts(version: &str, date: &str, commit: &str) -> Self {
        let date = if date.is_empty() {
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        } else {
            date.to_string()
        };
        let commit = if commit.is_empty() {
            UNKNOWN_COMMIT
        } else {
            commit
        };

        Info {
            version: version.to_string(),
            date,
            commit: commit.to_string(),
        }
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} g{} {}-{} [{}]",
            self.version,
            self.commit,
            std::env::consts::OS,
            std::env::consts::ARCH,
            self.date
        )
    }
}
