//! Typed errors for the library boundaries.
//!
//! The layout and fitting algorithms themselves are total; these errors only
//! come from the environment (fonts, measurement hosts) or from user-supplied
//! configuration.

use thiserror::Error;

/// Failure of a measurement host. Fatal for the current layout pass.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The host could not create or attach a surface.
    #[error("measurement surface unavailable: {0}")]
    Unavailable(String),
    /// A font could not be loaded or resolved.
    #[error("font error: {0}")]
    Font(String),
    /// The surface was attached but measuring failed.
    #[error("measurement failed for {text:?} at {font_px}px: {reason}")]
    Measure {
        text: String,
        font_px: f64,
        reason: String,
    },
}

/// Problems with a widget configuration file or CLI overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid color {0:?}, expected #rgb or #rrggbb")]
    InvalidColor(String),
    #[error("invalid widget dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
