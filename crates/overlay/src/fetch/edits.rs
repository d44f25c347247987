//! Local annotation edits layered over the fetched list.
//!
//! The fetched list is never written by a mutation. Each mutation appends an
//! [`EditOp`] to the resource's [`EditLog`] and the visible list is the fetched
//! list with every logged op replayed in order. A fetch that lands while edits
//! are outstanding therefore cannot drop them.
//!
//! Ops are keyed by annotation id and idempotent, so replaying an op the
//! server already reflects is harmless. A confirmed op stays logged until a
//! fetch issued after its confirmation arrives, or until it can be folded
//! into the fetched list with no fetch pending.

use chrono::{DateTime, Utc};
use marginalia_model::{Annotation, AnnotationPatch};
use marginalia_primitives::AnnotationId;

#[derive(Debug, Clone)]
pub(crate) enum EditOp {
	/// Replaces the record with the same id, or appends it.
	Upsert(Annotation),
	Patch {
		id: AnnotationId,
		patch: AnnotationPatch,
		at: DateTime<Utc>,
	},
	Remove(AnnotationId),
}

impl EditOp {
	fn apply(&self, annotations: &mut Vec<Annotation>) {
		match self {
			Self::Upsert(record) => match annotations.iter_mut().find(|a| a.id == record.id) {
				Some(slot) => *slot = record.clone(),
				None => annotations.push(record.clone()),
			},
			Self::Patch { id, patch, at } => {
				if let Some(slot) = annotations.iter_mut().find(|a| &a.id == id) {
					slot.apply_patch(patch, *at);
				}
			}
			Self::Remove(id) => annotations.retain(|a| &a.id != id),
		}
	}
}

#[derive(Debug, Clone)]
struct LoggedEdit {
	mutation: u64,
	op: EditOp,
	/// Stamp of the server acknowledgement; `None` while unconfirmed.
	confirmed_at: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct EditLog {
	entries: Vec<LoggedEdit>,
}

impl EditLog {
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn push(&mut self, mutation: u64, op: EditOp) {
		self.entries.push(LoggedEdit {
			mutation,
			op,
			confirmed_at: None,
		});
	}

	/// Marks `mutation` acknowledged at `stamp`, optionally replacing its op
	/// with the server's record. Returns false for unknown mutations.
	pub fn confirm(&mut self, mutation: u64, replacement: Option<EditOp>, stamp: u64) -> bool {
		let Some(entry) = self.entries.iter_mut().find(|e| e.mutation == mutation) else {
			return false;
		};
		if let Some(op) = replacement {
			entry.op = op;
		}
		entry.confirmed_at = Some(stamp);
		true
	}

	/// Drops `mutation`, undoing its effect on the visible list.
	pub fn discard(&mut self, mutation: u64) -> bool {
		let before = self.entries.len();
		self.entries.retain(|e| e.mutation != mutation);
		self.entries.len() != before
	}

	/// Forgets ops confirmed before a fetch stamped `issued` was sent.
	pub fn prune_confirmed_before(&mut self, issued: u64) {
		self.entries.retain(|e| !e.confirmed_at.is_some_and(|at| at < issued));
	}

	/// Moves the leading run of confirmed ops into `base`.
	pub fn fold_confirmed(&mut self, base: &mut Vec<Annotation>) {
		let confirmed = self.entries.iter().take_while(|e| e.confirmed_at.is_some()).count();
		for entry in self.entries.drain(..confirmed) {
			entry.op.apply(base);
		}
	}

	/// `base` with every logged op replayed in order.
	pub fn replay(&self, base: &[Annotation]) -> Vec<Annotation> {
		let mut annotations = base.to_vec();
		for entry in &self.entries {
			entry.op.apply(&mut annotations);
		}
		annotations
	}
}
