//! Lazy, single-flight data loading per resource and data kind.
//!
//! Every `(resource, kind)` pair runs the state machine
//! `Idle -> Pending -> (Resolved | Failed)`. A fetch is only issued when the
//! pair has no cached value and nothing is pending for it, so bursts of
//! triggers collapse into a single request. Scroll triggers are debounced;
//! mount and resource-change triggers fire immediately; retries bypass the
//! cache check.
//!
//! Fetches run as spawned tasks that report back over a channel. Completions
//! are applied on [`FetchCoordinator::tick`] or [`FetchCoordinator::settle`]
//! and dropped when the resource or generation they were issued for is no
//! longer current.

mod cache;
mod edits;
mod mutation;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use marginalia_client::{DataSource, SourceError};
use marginalia_model::{Annotation, QualityDetails, Reference, SemanticChunk};
use marginalia_primitives::ResourceId;
use marginalia_worker::{Debounced, GenerationClock, TaskClass};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

use self::cache::DataCache;
pub use self::mutation::MutationOutcome;
use crate::channel::Channel;
use crate::config::EngineConfig;
use crate::fallback::FallbackState;

/// Independently fetched kinds of overlay data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataKind {
	Annotations,
	Chunks,
	Quality,
	References,
}

impl DataKind {
	pub const ALL: [DataKind; 4] = [Self::Annotations, Self::Chunks, Self::Quality, Self::References];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Annotations => "annotations",
			Self::Chunks => "chunks",
			Self::Quality => "quality",
			Self::References => "references",
		}
	}

	/// Human readable name used in banners.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Annotations => "annotations",
			Self::Chunks => "semantic chunks",
			Self::Quality => "quality scores",
			Self::References => "references",
		}
	}

	/// Decoration channels rendered from this kind.
	pub const fn channels(self) -> &'static [Channel] {
		match self {
			Self::Annotations => &[Channel::AnnotationGutter, Channel::AnnotationHighlights],
			Self::Chunks => &[Channel::ChunkBoundaries],
			Self::Quality => &[Channel::QualityBadges],
			Self::References => &[Channel::ReferenceIcons],
		}
	}

	pub(crate) const fn index(self) -> usize {
		self as usize
	}
}

/// What caused a fetch to be considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
	Mount,
	ResourceChange,
	Scroll,
	/// A hidden overlay was made visible.
	OverlayShown,
	Retry,
}

/// Per `(resource, kind)` fetch state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotState {
	#[default]
	Idle,
	Pending,
	Resolved,
	Failed,
}

/// A successfully fetched value.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
	Annotations(Vec<Annotation>),
	Chunks(Vec<SemanticChunk>),
	Quality(QualityDetails),
	References(Vec<Reference>),
}

impl Payload {
	fn kind(&self) -> DataKind {
		match self {
			Self::Annotations(_) => DataKind::Annotations,
			Self::Chunks(_) => DataKind::Chunks,
			Self::Quality(_) => DataKind::Quality,
			Self::References(_) => DataKind::References,
		}
	}
}

pub(crate) enum Completion {
	Fetch {
		resource: ResourceId,
		kind: DataKind,
		generation: u64,
		/// Stamp taken when the request was sent.
		issued: u64,
		/// `None` when the task observed cancellation before finishing.
		result: Option<Result<Payload, SourceError>>,
	},
	Mutation {
		resource: ResourceId,
		mutation: u64,
		outcome: MutationOutcome,
	},
}

async fn load(source: &dyn DataSource, resource: &ResourceId, kind: DataKind) -> Result<Payload, SourceError> {
	Ok(match kind {
		DataKind::Annotations => Payload::Annotations(source.annotations(resource).await?),
		DataKind::Chunks => Payload::Chunks(source.chunks(resource).await?),
		DataKind::Quality => Payload::Quality(source.quality(resource).await?),
		DataKind::References => Payload::References(source.references(resource).await?),
	})
}

pub struct FetchCoordinator {
	source: Arc<dyn DataSource>,
	cache: DataCache,
	slots: HashMap<(ResourceId, DataKind), SlotState>,
	active: Option<ResourceId>,
	clock: GenerationClock,
	scroll: Debounced<()>,
	flags: FallbackState,
	enabled: [bool; DataKind::ALL.len()],
	in_flight: usize,
	/// Orders fetch issues against mutation confirmations.
	stamp: u64,
	tx: UnboundedSender<Completion>,
	rx: UnboundedReceiver<Completion>,
	dirty: BTreeSet<DataKind>,
}

impl FetchCoordinator {
	pub fn new(source: Arc<dyn DataSource>, config: &EngineConfig) -> Self {
		let (tx, rx) = unbounded_channel();
		Self {
			source,
			cache: DataCache::new(config.cache_capacity()),
			slots: HashMap::new(),
			active: None,
			clock: GenerationClock::new(),
			scroll: Debounced::new(config.fetch_debounce()),
			flags: FallbackState::new(),
			enabled: [true; DataKind::ALL.len()],
			in_flight: 0,
			stamp: 0,
			tx,
			rx,
			dirty: BTreeSet::new(),
		}
	}

	pub fn active(&self) -> Option<&ResourceId> {
		self.active.as_ref()
	}

	pub fn flags(&self) -> &FallbackState {
		&self.flags
	}

	pub fn flags_mut(&mut self) -> &mut FallbackState {
		&mut self.flags
	}

	pub fn state(&self, kind: DataKind) -> SlotState {
		self.active
			.as_ref()
			.and_then(|resource| self.slots.get(&(resource.clone(), kind)).copied())
			.unwrap_or_default()
	}

	pub fn is_enabled(&self, kind: DataKind) -> bool {
		self.enabled[kind.index()]
	}

	/// Enables or disables fetching of `kind`. Enabling does not fetch by itself.
	pub fn set_enabled(&mut self, kind: DataKind, enabled: bool) {
		self.enabled[kind.index()] = enabled;
	}

	/// Number of spawned tasks whose completion has not been applied yet.
	pub fn pending_count(&self) -> usize {
		self.in_flight
	}

	pub fn annotations(&self) -> &[Annotation] {
		self.active_data().map(|d| d.visible_annotations()).unwrap_or_default()
	}

	pub fn chunks(&self) -> &[SemanticChunk] {
		self.active_data().and_then(|d| d.chunks.as_deref()).unwrap_or_default()
	}

	pub fn quality(&self) -> Option<&QualityDetails> {
		self.active_data().and_then(|d| d.quality.as_ref())
	}

	pub fn references(&self) -> &[Reference] {
		self.active_data().and_then(|d| d.references.as_deref()).unwrap_or_default()
	}

	fn next_stamp(&mut self) -> u64 {
		self.stamp += 1;
		self.stamp
	}

	fn active_data(&self) -> Option<&cache::ResourceData> {
		self.active.as_ref().and_then(|resource| self.cache.peek(resource))
	}

	/// Kinds whose visible state changed since the last call.
	pub fn take_dirty(&mut self) -> Vec<DataKind> {
		std::mem::take(&mut self.dirty).into_iter().collect()
	}

	/// Makes `resource` active and immediately fetches every enabled kind it lacks.
	///
	/// Switching away from another resource invalidates its in-flight fetches,
	/// drops pending scroll work and clears all fallback flags.
	pub fn open(&mut self, resource: ResourceId, trigger: Trigger) {
		if self.active.as_ref() != Some(&resource) {
			if let Some(previous) = self.active.take() {
				self.leave(&previous);
			}
			self.flags.reset();
			self.cache.promote(&resource);
			self.active = Some(resource);
			self.dirty.extend(DataKind::ALL);
		}
		for kind in DataKind::ALL {
			self.ensure(kind, trigger);
		}
	}

	fn leave(&mut self, previous: &ResourceId) {
		let generation = self.clock.advance();
		self.scroll.cancel();
		for kind in DataKind::ALL {
			// Pending work was invalidated and failures are forgotten.
			if let Some(slot) = self.slots.get_mut(&(previous.clone(), kind)) {
				if matches!(slot, SlotState::Pending | SlotState::Failed) {
					*slot = SlotState::Idle;
				}
			}
		}
		debug!(resource = %previous, generation, "fetch.resource_left");
	}

	/// Records a viewport change; due scroll work runs on a later [`Self::tick`].
	pub fn scroll(&mut self, now: Instant) {
		if self.active.is_some() {
			self.scroll.schedule(now, ());
		}
	}

	/// Fires due scroll work and applies finished completions.
	pub fn tick(&mut self, now: Instant) {
		if self.scroll.take_due(now).is_some() {
			debug!("fetch.scroll_debounce_fired");
			for kind in DataKind::ALL {
				self.ensure(kind, Trigger::Scroll);
			}
		}
		while let Ok(completion) = self.rx.try_recv() {
			self.apply(completion);
		}
	}

	/// Issues a fetch for `kind` on the active resource when `trigger` allows it.
	///
	/// Returns true when a request was spawned.
	pub fn ensure(&mut self, kind: DataKind, trigger: Trigger) -> bool {
		let Some(resource) = self.active.clone() else {
			return false;
		};
		if !self.is_enabled(kind) && trigger != Trigger::Retry {
			return false;
		}
		let key = (resource.clone(), kind);
		let slot = self.slots.get(&key).copied().unwrap_or_default();
		let eligible = match (trigger, slot) {
			(_, SlotState::Pending) => false,
			(Trigger::Retry, _) => true,
			(Trigger::Scroll, SlotState::Idle) => !self.cache.has(&resource, kind),
			(Trigger::Scroll, _) => false,
			(Trigger::Mount | Trigger::ResourceChange | Trigger::OverlayShown, _) => !self.cache.has(&resource, kind),
		};
		if !eligible {
			return false;
		}
		self.slots.insert(key, SlotState::Pending);
		self.spawn_fetch(resource, kind, trigger);
		true
	}

	/// Explicit user retry of one failed kind.
	///
	/// Clears the kind's flag optimistically; a failing retry sets it again.
	pub fn retry(&mut self, kind: DataKind) -> bool {
		if self.state(kind) == SlotState::Pending {
			return false;
		}
		self.flags.begin_retry(kind);
		self.dirty.insert(kind);
		self.ensure(kind, Trigger::Retry)
	}

	fn spawn_fetch(&mut self, resource: ResourceId, kind: DataKind, trigger: Trigger) {
		let token = self.clock.token();
		let issued = self.next_stamp();
		let source = Arc::clone(&self.source);
		let tx = self.tx.clone();
		debug!(resource = %resource, kind = kind.as_str(), ?trigger, generation = token.generation(), "fetch.issued");
		self.in_flight += 1;
		marginalia_worker::spawn(TaskClass::Fetch, async move {
			let result = tokio::select! {
				_ = token.cancelled() => None,
				result = load(&*source, &resource, kind) => Some(result),
			};
			let _ = tx.send(Completion::Fetch {
				resource,
				kind,
				generation: token.generation(),
				issued,
				result,
			});
		});
	}

	/// Awaits and applies one completion. Returns false when nothing is in flight.
	pub async fn next_completion(&mut self) -> bool {
		if self.in_flight == 0 {
			return false;
		}
		match self.rx.recv().await {
			Some(completion) => {
				self.apply(completion);
				true
			}
			None => false,
		}
	}

	/// Awaits every in-flight fetch and mutation.
	pub async fn settle(&mut self) {
		while self.next_completion().await {}
	}

	fn apply(&mut self, completion: Completion) {
		self.in_flight = self.in_flight.saturating_sub(1);
		match completion {
			Completion::Fetch {
				resource,
				kind,
				generation,
				issued,
				result,
			} => self.apply_fetch(resource, kind, generation, issued, result),
			Completion::Mutation {
				resource,
				mutation,
				outcome,
			} => self.apply_mutation(resource, mutation, outcome),
		}
	}

	fn apply_fetch(
		&mut self,
		resource: ResourceId,
		kind: DataKind,
		generation: u64,
		issued: u64,
		result: Option<Result<Payload, SourceError>>,
	) {
		let current = self.clock.is_current(generation) && self.active.as_ref() == Some(&resource);
		let Some(result) = result.filter(|_| current) else {
			debug!(resource = %resource, kind = kind.as_str(), generation, "fetch.stale_discarded");
			return;
		};
		let key = (resource.clone(), kind);
		match result {
			Ok(payload) => {
				debug_assert_eq!(payload.kind(), kind);
				self.cache.store(resource.clone(), payload, issued);
				self.slots.insert(key, SlotState::Resolved);
				self.flags.mark_resolved(kind);
				debug!(resource = %resource, kind = kind.as_str(), "fetch.resolved");
			}
			Err(error) => {
				let has_cached = self.cache.has(&resource, kind);
				warn!(
					resource = %resource,
					kind = kind.as_str(),
					has_cached,
					transient = error.is_transient(),
					%error,
					"fetch.failed"
				);
				self.slots.insert(key, SlotState::Failed);
				self.flags.mark_failed(kind, has_cached, error.to_string());
			}
		}
		if kind == DataKind::Annotations {
			self.reconcile_edits(&resource);
		}
		self.dirty.insert(kind);
	}
}
