//! Per-data-kind degradation flags and the banners derived from them.
//!
//! The fetch coordinator writes these flags on its transitions; rendering
//! and UI code only read them. Kinds are independent of one another.

use crate::fetch::DataKind;

/// Fetch health of one data kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KindStatus {
	#[default]
	Ok,
	/// Latest fetch failed; the previously cached copy is still shown.
	Stale { reason: String },
	/// Latest fetch failed with nothing cached.
	Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	Warning,
	Error,
}

/// A user-facing notice for one data kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
	pub kind: DataKind,
	pub severity: Severity,
	pub message: String,
	/// Whether a retry action should be offered.
	pub retryable: bool,
}

#[derive(Debug, Default)]
pub struct FallbackState {
	statuses: [KindStatus; DataKind::ALL.len()],
	dismissed: [bool; DataKind::ALL.len()],
	mutation_error: Option<String>,
}

impl FallbackState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn status(&self, kind: DataKind) -> &KindStatus {
		&self.statuses[kind.index()]
	}

	pub fn is_stale(&self, kind: DataKind) -> bool {
		matches!(self.status(kind), KindStatus::Stale { .. })
	}

	pub fn is_failed(&self, kind: DataKind) -> bool {
		matches!(self.status(kind), KindStatus::Failed { .. })
	}

	/// Quality badges are hidden when quality could not be loaded at all.
	pub fn quality_hidden(&self) -> bool {
		self.is_failed(DataKind::Quality)
	}

	/// Chunk boundaries fall back to fixed line windows when chunks could not be loaded.
	pub fn chunks_line_fallback(&self) -> bool {
		self.is_failed(DataKind::Chunks)
	}

	pub fn mutation_error(&self) -> Option<&str> {
		self.mutation_error.as_deref()
	}

	pub(crate) fn mark_resolved(&mut self, kind: DataKind) {
		self.set(kind, KindStatus::Ok);
	}

	/// Records a failed fetch. Exactly one of stale/failed ends up set.
	pub(crate) fn mark_failed(&mut self, kind: DataKind, has_cached: bool, reason: String) {
		let status = if has_cached { KindStatus::Stale { reason } } else { KindStatus::Failed { reason } };
		self.set(kind, status);
	}

	/// Optimistically clears the failure while a retry is in flight.
	pub(crate) fn begin_retry(&mut self, kind: DataKind) {
		self.set(kind, KindStatus::Ok);
		if kind == DataKind::Annotations {
			self.mutation_error = None;
		}
	}

	pub(crate) fn mark_mutation_failed(&mut self, reason: String) {
		self.mutation_error = Some(reason);
		self.dismissed[DataKind::Annotations.index()] = false;
	}

	/// Hides the banner of `kind` until its status changes again.
	pub fn dismiss(&mut self, kind: DataKind) {
		self.dismissed[kind.index()] = true;
		if kind == DataKind::Annotations {
			self.mutation_error = None;
		}
	}

	/// Clears every flag; used when the active resource changes.
	pub(crate) fn reset(&mut self) {
		*self = Self::default();
	}

	fn set(&mut self, kind: DataKind, status: KindStatus) {
		let slot = &mut self.statuses[kind.index()];
		if *slot != status {
			self.dismissed[kind.index()] = false;
		}
		*slot = status;
	}

	/// Independent banners for every degraded kind that was not dismissed.
	pub fn banners(&self) -> Vec<Banner> {
		let mut banners = Vec::new();
		for kind in DataKind::ALL {
			if self.dismissed[kind.index()] {
				continue;
			}
			match self.status(kind) {
				KindStatus::Ok => {}
				KindStatus::Stale { reason } => banners.push(Banner {
					kind,
					severity: Severity::Warning,
					message: format!("Showing cached {} ({reason})", kind.label()),
					retryable: true,
				}),
				KindStatus::Failed { reason } => banners.push(Banner {
					kind,
					severity: Severity::Error,
					message: failed_message(kind, reason),
					retryable: true,
				}),
			}
			if kind == DataKind::Annotations {
				if let Some(reason) = &self.mutation_error {
					banners.push(Banner {
						kind,
						severity: Severity::Error,
						message: format!("Annotation change was not saved ({reason})"),
						retryable: false,
					});
				}
			}
		}
		banners
	}
}

fn failed_message(kind: DataKind, reason: &str) -> String {
	match kind {
		DataKind::Annotations => format!("Annotations could not be loaded ({reason})"),
		DataKind::Chunks => format!("Semantic chunks unavailable, showing line-based sections ({reason})"),
		DataKind::Quality => format!("Quality badges hidden ({reason})"),
		DataKind::References => format!("References could not be loaded ({reason})"),
	}
}
