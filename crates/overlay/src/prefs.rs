//! Persisted view preferences.
//!
//! Preferences live in one JSON document under the user state directory.
//! Loading never fails: a missing or unreadable file, a document that is not
//! an object, or any single malformed entry falls back to that entry's
//! default. Saving replaces the file atomically.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::PrefsError;
use crate::fetch::DataKind;

pub const DEFAULT_THEME: &str = "dark";
pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 32;

/// Which overlays are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayVisibility {
	pub annotations: bool,
	pub chunks: bool,
	pub quality: bool,
	pub references: bool,
}

impl Default for OverlayVisibility {
	fn default() -> Self {
		Self {
			annotations: true,
			chunks: true,
			quality: true,
			references: true,
		}
	}
}

impl OverlayVisibility {
	pub fn get(&self, kind: DataKind) -> bool {
		match kind {
			DataKind::Annotations => self.annotations,
			DataKind::Chunks => self.chunks,
			DataKind::Quality => self.quality,
			DataKind::References => self.references,
		}
	}

	pub fn set(&mut self, kind: DataKind, visible: bool) {
		let slot = match kind {
			DataKind::Annotations => &mut self.annotations,
			DataKind::Chunks => &mut self.chunks,
			DataKind::Quality => &mut self.quality,
			DataKind::References => &mut self.references,
		};
		*slot = visible;
	}

	fn from_value(value: Option<&Value>) -> Self {
		let defaults = Self::default();
		let Some(map) = value.and_then(Value::as_object) else {
			return defaults;
		};
		Self {
			annotations: bool_entry(map, "annotations", defaults.annotations),
			chunks: bool_entry(map, "chunks", defaults.chunks),
			quality: bool_entry(map, "quality", defaults.quality),
			references: bool_entry(map, "references", defaults.references),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
	pub theme: String,
	pub font_size: u32,
	pub line_numbers: bool,
	pub minimap: bool,
	pub word_wrap: bool,
	pub overlays: OverlayVisibility,
}

impl Default for Preferences {
	fn default() -> Self {
		Self {
			theme: DEFAULT_THEME.to_owned(),
			font_size: DEFAULT_FONT_SIZE,
			line_numbers: true,
			minimap: true,
			word_wrap: false,
			overlays: OverlayVisibility::default(),
		}
	}
}

fn bool_entry(map: &Map<String, Value>, key: &str, default: bool) -> bool {
	map.get(key).and_then(Value::as_bool).unwrap_or(default)
}

impl Preferences {
	/// Parses a stored document entry by entry.
	pub fn from_json_str(input: &str) -> Self {
		let defaults = Self::default();
		let map = match serde_json::from_str::<Value>(input) {
			Ok(Value::Object(map)) => map,
			Ok(_) => {
				debug!("preferences.not_an_object");
				return defaults;
			}
			Err(error) => {
				debug!(%error, "preferences.malformed");
				return defaults;
			}
		};
		let theme = map
			.get("theme")
			.and_then(Value::as_str)
			.map(str::trim)
			.filter(|theme| !theme.is_empty())
			.map_or(defaults.theme, str::to_owned);
		let font_size = map
			.get("font_size")
			.and_then(Value::as_f64)
			.filter(|size| size.is_finite())
			.map_or(DEFAULT_FONT_SIZE, |size| {
				size.round().clamp(MIN_FONT_SIZE as f64, MAX_FONT_SIZE as f64) as u32
			});
		Self {
			theme,
			font_size,
			line_numbers: bool_entry(&map, "line_numbers", defaults.line_numbers),
			minimap: bool_entry(&map, "minimap", defaults.minimap),
			word_wrap: bool_entry(&map, "word_wrap", defaults.word_wrap),
			overlays: OverlayVisibility::from_value(map.get("overlays")),
		}
	}

	/// Sets the font size, clamped to the supported range.
	pub fn set_font_size(&mut self, size: u32) {
		self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
	}
}

/// Returns the default preferences path under the user state directory.
pub fn default_prefs_path() -> Result<PathBuf, PrefsError> {
	let state_dir = dirs::state_dir()
		.or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
		.ok_or(PrefsError::MissingStateDir)?;
	Ok(state_dir.join("marginalia").join("view-preferences.json"))
}

/// Reads and writes [`Preferences`] at a fixed path.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
	path: PathBuf,
}

impl PreferenceStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Store at [`default_prefs_path`].
	pub fn open_default() -> Result<Self, PrefsError> {
		default_prefs_path().map(Self::new)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn load(&self) -> Preferences {
		match std::fs::read_to_string(&self.path) {
			Ok(input) => Preferences::from_json_str(&input),
			Err(error) => {
				if error.kind() != std::io::ErrorKind::NotFound {
					warn!(path = %self.path.display(), %error, "preferences.read_failed");
				}
				Preferences::default()
			}
		}
	}

	/// Writes `prefs` to a sibling temp file, then renames it into place.
	pub fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
		let json = serde_json::to_vec_pretty(prefs)?;
		if let Some(dir) = self.path.parent() {
			std::fs::create_dir_all(dir).map_err(|error| PrefsError::Io {
				path: dir.to_path_buf(),
				error,
			})?;
		}
		let tmp = self.path.with_extension("json.tmp");
		std::fs::write(&tmp, json).map_err(|error| PrefsError::Io { path: tmp.clone(), error })?;
		std::fs::rename(&tmp, &self.path).map_err(|error| PrefsError::Io {
			path: self.path.clone(),
			error,
		})?;
		debug!(path = %self.path.display(), "preferences.saved");
		Ok(())
	}
}
