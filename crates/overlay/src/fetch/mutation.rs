//! Optimistic create, update and delete of annotations.
//!
//! A mutation is logged as an edit on its resource and shows up immediately;
//! the request runs in the background. Success confirms the edit (with the
//! stored record for creates and updates), failure discards it and raises
//! the annotation error banner. Fetched annotations are never modified here,
//! see [`super::edits`].

use std::sync::Arc;

use chrono::Utc;
use marginalia_client::SourceError;
use marginalia_model::{Annotation, AnnotationPatch, NewAnnotation};
use marginalia_primitives::{AnnotationId, ResourceId};
use marginalia_worker::TaskClass;
use tracing::{debug, warn};
use uuid::Uuid;

use super::edits::EditOp;
use super::{Completion, DataKind, FetchCoordinator, SlotState};

/// Server answer to a background annotation mutation.
#[derive(Debug)]
pub enum MutationOutcome {
	Created(Result<Annotation, SourceError>),
	Updated(Result<Annotation, SourceError>),
	Deleted(Result<(), SourceError>),
}

impl FetchCoordinator {
	/// Adds `annotation` to the active resource under a provisional id.
	///
	/// Returns the provisional id, or `None` when no resource is open.
	pub fn create_annotation(&mut self, annotation: NewAnnotation) -> Option<AnnotationId> {
		let resource = self.active.clone()?;
		let provisional = AnnotationId::new(format!("provisional-{}", Uuid::new_v4()));
		let local = annotation.provisional(provisional.clone(), Utc::now());
		let mutation = self.log_edit(&resource, EditOp::Upsert(local));

		let source = Arc::clone(&self.source);
		self.spawn_mutation(resource, mutation, async move {
			MutationOutcome::Created(source.create_annotation(&annotation).await)
		});
		Some(provisional)
	}

	/// Applies `patch` locally and sends it. Returns false for unknown ids.
	pub fn update_annotation(&mut self, id: &AnnotationId, patch: AnnotationPatch) -> bool {
		let Some(resource) = self.visible_owner(id) else {
			return false;
		};
		let op = EditOp::Patch {
			id: id.clone(),
			patch: patch.clone(),
			at: Utc::now(),
		};
		let mutation = self.log_edit(&resource, op);

		let source = Arc::clone(&self.source);
		let id = id.clone();
		self.spawn_mutation(resource, mutation, async move {
			MutationOutcome::Updated(source.update_annotation(&id, &patch).await)
		});
		true
	}

	/// Hides the annotation locally and sends the delete. Returns false for unknown ids.
	pub fn delete_annotation(&mut self, id: &AnnotationId) -> bool {
		let Some(resource) = self.visible_owner(id) else {
			return false;
		};
		let mutation = self.log_edit(&resource, EditOp::Remove(id.clone()));

		let source = Arc::clone(&self.source);
		let id = id.clone();
		self.spawn_mutation(resource, mutation, async move {
			MutationOutcome::Deleted(source.delete_annotation(&id).await)
		});
		true
	}

	/// The active resource, when `id` is among its visible annotations.
	fn visible_owner(&self, id: &AnnotationId) -> Option<ResourceId> {
		let resource = self.active.clone()?;
		self.annotations().iter().any(|a| &a.id == id).then_some(resource)
	}

	fn log_edit(&mut self, resource: &ResourceId, op: EditOp) -> u64 {
		let mutation = self.next_stamp();
		let data = self.cache.entry_mut(resource);
		data.edits.push(mutation, op);
		data.refresh_annotations();
		self.dirty.insert(DataKind::Annotations);
		mutation
	}

	fn spawn_mutation<F>(&mut self, resource: ResourceId, mutation: u64, fut: F)
	where
		F: Future<Output = MutationOutcome> + Send + 'static,
	{
		let tx = self.tx.clone();
		self.in_flight += 1;
		marginalia_worker::spawn(TaskClass::Mutation, async move {
			let outcome = fut.await;
			let _ = tx.send(Completion::Mutation {
				resource,
				mutation,
				outcome,
			});
		});
	}

	pub(super) fn apply_mutation(&mut self, resource: ResourceId, mutation: u64, outcome: MutationOutcome) {
		let stamp = self.next_stamp();
		let Some(data) = self.cache.peek_mut(&resource) else {
			debug!(resource = %resource, mutation, "mutation.cache_evicted");
			return;
		};
		let failure = match outcome {
			MutationOutcome::Created(Ok(stored)) | MutationOutcome::Updated(Ok(stored)) => {
				data.edits.confirm(mutation, Some(EditOp::Upsert(stored)), stamp);
				None
			}
			MutationOutcome::Deleted(Ok(())) => {
				data.edits.confirm(mutation, None, stamp);
				None
			}
			MutationOutcome::Created(Err(error))
			| MutationOutcome::Updated(Err(error))
			| MutationOutcome::Deleted(Err(error)) => {
				data.edits.discard(mutation);
				Some(error)
			}
		};
		let is_active = self.active.as_ref() == Some(&resource);
		if let Some(error) = failure {
			warn!(resource = %resource, mutation, %error, "mutation.rolled_back");
			if is_active {
				self.flags.mark_mutation_failed(error.to_string());
			}
		}
		self.reconcile_edits(&resource);
		if is_active {
			self.dirty.insert(DataKind::Annotations);
		}
	}

	/// Folds confirmed edits into the fetched list unless a fetch that may
	/// predate them is still outstanding, then recomputes the visible list.
	pub(super) fn reconcile_edits(&mut self, resource: &ResourceId) {
		let fetching = self.slots.get(&(resource.clone(), DataKind::Annotations)) == Some(&SlotState::Pending);
		let Some(data) = self.cache.peek_mut(resource) else {
			return;
		};
		if !fetching {
			data.fold_confirmed();
		}
		data.refresh_annotations();
		debug!(resource = %resource, fetching, outstanding = data.edits.len(), "annotations.reconciled");
	}
}
