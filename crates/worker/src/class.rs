/// Classification attached to spawned tasks for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Resource data fetch (annotations, chunks, quality, references).
	Fetch,
	/// Hover enrichment lookup.
	Hover,
	/// Annotation create/update/delete.
	Mutation,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Fetch => "fetch",
			Self::Hover => "hover",
			Self::Mutation => "mutation",
		}
	}
}
