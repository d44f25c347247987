//! Error types for configuration, preferences and the host widget.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Errors that can occur when persisting view preferences.
#[derive(Debug, Error)]
pub enum PrefsError {
	/// No per-user state directory could be determined.
	#[error("no state directory available for preferences")]
	MissingStateDir,

	/// Error writing the preferences file.
	#[error("I/O error writing {path}: {error}")]
	Io {
		/// Path that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Preferences could not be encoded.
	#[error("failed to encode preferences: {0}")]
	Encode(#[from] serde_json::Error),
}

/// Errors reported by the host editor widget.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
	/// The widget failed to initialize.
	#[error("editor failed to load: {0}")]
	Load(String),

	/// The widget was already torn down.
	#[error("editor already disposed")]
	Disposed,
}
