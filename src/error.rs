use thiserror::Error;

/// Unified error type for sver operations
#[derive(Error, Debug)]
pub enum SverError {
    #[error("{binary} not found in your PATH; please install it")]
    ToolNotFound { binary: String },

    #[error("could not determine if the current directory is a git working tree: {0}")]
    NotAWorkingTree(String),

    #[error("'{0}' doesn't seem to be a semantic version")]
    InvalidSemver(String),

    #[error("looks like your git tag '{0}' has a semver with a + sign - that's not supported by this tool")]
    UnsupportedBuildMetadata(String),

    #[error("'{input}' {component} part of version is not a 64 bit unsigned integer")]
    ComponentOverflow {
        component: &'static str,
        input: String,
    },

    #[error(
        "invalid value '{0}' for next version. Supported values are 'patch', 'minor' and 'major'"
    )]
    InvalidIncrementKind(String),

    #[error("not on a tag, this is a pre release version")]
    NotAReleaseVersion,

    #[error("version is dirty")]
    DirtyRelease,

    #[error("authentication to registry failed: {0}")]
    RegistryAuthFailed(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("unexpected result from '{command}'; output:\n{output}")]
    Command { command: String, output: String },

    #[error("failed to parse output of {query}: '{output}'")]
    UnexpectedOutput { query: &'static str, output: String },

    #[error("'{version}' is a development version - can't use the {flag} flag")]
    DevelopmentVersion { version: String, flag: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("registry request failed: {0}")]
    Oci(#[from] oci_distribution::errors::OciDistributionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in sver
pub type Result<T> = std::result::Result<T, SverError>;

impl SverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SverError::Config(msg.into())
    }

    /// Create a registry error with context
    pub fn registry(msg: impl Into<String>) -> Self {
        SverError::Registry(msg.into())
    }

    /// Create a usage error for conflicting command line flags
    pub fn usage(msg: impl Into<String>) -> Self {
        SverError::Usage(msg.into())
    }
}
