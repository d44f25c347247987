use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub String);

		impl $name {
			/// Creates an id from any string-like value.
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			/// Returns the id as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.to_owned())
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(id)
			}
		}
	};
}

string_id!(
	/// Identifies a resource (a file) whose text the editor displays.
	ResourceId
);
string_id!(
	/// Identifies a user-authored annotation.
	AnnotationId
);
string_id!(
	/// Identifies a server-computed semantic chunk.
	ChunkId
);
string_id!(
	/// Identifies an extracted reference.
	ReferenceId
);
string_id!(
	/// Identifies the owner of an annotation.
	UserId
);
