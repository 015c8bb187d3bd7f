use std::path::PathBuf;
use thiserror::Error;

/// Contract violations detected while wiring a renderer to its surface and data source.
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("analysis window size {0} must be a power of two between 32 and 32768")]
    InvalidWindowSize(usize),

    #[error("drawing surface is empty ({width}x{height})")]
    EmptySurface { width: usize, height: usize },

    #[error("data source reports {actual} frequency bins, expected {expected}")]
    BinCountMismatch { expected: usize, actual: usize },

    #[error("kick range {start}..{end} does not fit inside {bins} frequency bins")]
    InvalidKickRange { start: usize, end: usize, bins: usize },

    #[error("pass '{0}' appears more than once in the pass list")]
    DuplicatePass(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),
}

/// Problems reading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the config directory")]
    NoConfigDir,

    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Param(#[from] ParamError),
}
