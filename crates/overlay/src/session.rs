//! The per-mount service object tying the engine to one host widget.
//!
//! An [`EditorSession`] is created for each editor mount with its data
//! source, configuration and preferences injected, and is torn down with
//! [`EditorSession::dispose`] (or on drop). Nothing is shared between
//! sessions, so several editors can run side by side.
//!
//! Hosts forward their events to the matching methods and call
//! [`EditorSession::tick`] regularly; every tick fires due debounces, applies
//! finished fetches and lookups, and re-renders the channels whose data
//! changed.

use std::sync::Arc;
use std::time::Instant;

use marginalia_client::DataSource;
use marginalia_model::{AnnotationPatch, NewAnnotation, ResourceMeta};
use marginalia_primitives::{AnnotationId, Rope, RopeSlice};
use marginalia_worker::DisposalList;
use tracing::{debug, warn};

use crate::channel::Channel;
use crate::config::EngineConfig;
use crate::decoration::Decoration;
use crate::dispatch::{EntityRef, HitTargets, dispatch_click, dispatch_hover};
use crate::error::HostError;
use crate::fallback::{Banner, FallbackState};
use crate::fetch::{DataKind, FetchCoordinator, Trigger};
use crate::host::{EditorHost, HostEventKind, PointerEvent, TargetKind};
use crate::hover::{HoverCard, HoverController};
use crate::layers::DecorationLayers;
use crate::prefs::Preferences;
use crate::render;

/// Lifecycle of the host widget as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostStatus {
	Unmounted,
	Mounted,
	/// The widget failed to load; the read-only fallback view applies.
	Failed { reason: String },
	Disposed,
}

/// Read-only stand-in shown when the host widget failed to load.
#[derive(Debug, Clone, Copy)]
pub struct FallbackView<'a> {
	pub meta: &'a ResourceMeta,
	pub text: RopeSlice<'a>,
	pub reason: &'a str,
}

type HoverCallback = Box<dyn FnMut(Option<EntityRef<'_>>)>;
type ClickCallback = Box<dyn FnMut(EntityRef<'_>)>;

struct OpenResource {
	meta: ResourceMeta,
	text: Rope,
}

pub struct EditorSession<H: EditorHost> {
	host: H,
	source: Arc<dyn DataSource>,
	config: EngineConfig,
	prefs: Preferences,
	status: HostStatus,
	resource: Option<OpenResource>,
	fetch: FetchCoordinator,
	hover: HoverController,
	layers: DecorationLayers,
	subscriptions: DisposalList,
	on_hover: Option<HoverCallback>,
	on_click: Option<ClickCallback>,
}

impl<H: EditorHost> EditorSession<H> {
	pub fn new(host: H, source: Arc<dyn DataSource>, config: EngineConfig, prefs: Preferences) -> Self {
		let mut fetch = FetchCoordinator::new(Arc::clone(&source), &config);
		for kind in DataKind::ALL {
			fetch.set_enabled(kind, prefs.overlays.get(kind));
		}
		let hover = HoverController::new(config.hover_debounce());
		Self {
			host,
			source,
			config,
			prefs,
			status: HostStatus::Unmounted,
			resource: None,
			fetch,
			hover,
			layers: DecorationLayers::new(),
			subscriptions: DisposalList::new(),
			on_hover: None,
			on_click: None,
		}
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn status(&self) -> &HostStatus {
		&self.status
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn preferences(&self) -> &Preferences {
		&self.prefs
	}

	pub fn layers(&self) -> &DecorationLayers {
		&self.layers
	}

	pub fn fetch(&self) -> &FetchCoordinator {
		&self.fetch
	}

	pub fn flags(&self) -> &FallbackState {
		self.fetch.flags()
	}

	pub fn hover_card(&self) -> Option<&HoverCard> {
		self.hover.card()
	}

	/// Receives the entity under the pointer, or `None`, on every pointer move.
	pub fn on_hover(&mut self, callback: impl FnMut(Option<EntityRef<'_>>) + 'static) {
		self.on_hover = Some(Box::new(callback));
	}

	/// Receives the entity under the pointer on pointer down, when there is one.
	pub fn on_click(&mut self, callback: impl FnMut(EntityRef<'_>) + 'static) {
		self.on_click = Some(Box::new(callback));
	}

	fn is_mounted(&self) -> bool {
		self.status == HostStatus::Mounted
	}

	/// Mounts the host widget, or retries a failed mount.
	///
	/// On failure the session switches to the read-only fallback view and
	/// returns the host's error.
	pub fn mount(&mut self) -> Result<(), HostError> {
		if self.status == HostStatus::Disposed {
			return Err(HostError::Disposed);
		}
		self.subscriptions.dispose();
		if let Err(error) = self.host.mount() {
			warn!(%error, "session.mount_failed");
			self.status = HostStatus::Failed { reason: error.to_string() };
			return Err(error);
		}
		for kind in HostEventKind::ALL {
			self.subscriptions.push(self.host.subscribe(kind));
		}
		self.status = HostStatus::Mounted;
		debug!(subscriptions = self.subscriptions.len(), "session.mounted");

		if let Some(resource) = &self.resource {
			self.fetch.open(resource.meta.id.clone(), Trigger::Mount);
		}
		self.render_all();
		Ok(())
	}

	/// The fallback view, while the host widget is in a failed state.
	pub fn fallback_view(&self) -> Option<FallbackView<'_>> {
		let HostStatus::Failed { reason } = &self.status else {
			return None;
		};
		let resource = self.resource.as_ref()?;
		Some(FallbackView {
			meta: &resource.meta,
			text: resource.text.slice(..),
			reason,
		})
	}

	/// Shows `meta` with `text`. Switching resources resets hover state and
	/// every fallback flag, and invalidates work for the previous resource.
	pub fn open_resource(&mut self, meta: ResourceMeta, text: &str) {
		if self.status == HostStatus::Disposed {
			return;
		}
		let trigger = match &self.resource {
			None => Trigger::Mount,
			Some(current) if current.meta.id == meta.id => Trigger::Mount,
			Some(_) => Trigger::ResourceChange,
		};
		if trigger == Trigger::ResourceChange {
			self.hover.reset();
		}
		let id = meta.id.clone();
		debug!(resource = %id, ?trigger, "session.open_resource");
		self.resource = Some(OpenResource {
			meta,
			text: Rope::from_str(text),
		});
		self.fetch.open(id, trigger);
		self.render_all();
	}

	pub fn scroll(&mut self, now: Instant) {
		if self.is_mounted() {
			self.fetch.scroll(now);
		}
	}

	/// Dispatches hover and restarts the hover-card window.
	pub fn pointer_move(&mut self, now: Instant, event: PointerEvent) {
		if !self.is_mounted() {
			return;
		}
		let symbol_position = match event.target.kind {
			TargetKind::ContentText => event.target.position,
			_ => None,
		};
		self.hover.pointer_moved(now, symbol_position);

		let Some(mut on_hover) = self.on_hover.take() else {
			return;
		};
		match self.hit_targets() {
			Some(targets) => dispatch_hover(&targets, &event, |entity| on_hover(entity)),
			None => on_hover(None),
		}
		self.on_hover = Some(on_hover);
	}

	/// Dispatches a click. Returns whether an entity was hit.
	pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
		if !self.is_mounted() {
			return false;
		}
		let Some(mut on_click) = self.on_click.take() else {
			return false;
		};
		let hit = match self.hit_targets() {
			Some(targets) => dispatch_click(&targets, &event, |entity| on_click(entity)),
			None => false,
		};
		self.on_click = Some(on_click);
		hit
	}

	/// Closes the hover card immediately.
	pub fn blur(&mut self) {
		self.hover.blur();
	}

	/// Fires due debounces, applies finished work and re-renders what changed.
	pub fn tick(&mut self, now: Instant) {
		if self.status == HostStatus::Disposed {
			return;
		}
		self.fetch.tick(now);
		if let Some(request) = self.hover.poll(now, &self.host) {
			match &self.resource {
				Some(resource) => self.hover.start(request, Arc::clone(&self.source), resource.meta.id.clone()),
				None => self.hover.blur(),
			}
		}
		self.hover.drain(&self.host);
		self.render_dirty();
	}

	/// Awaits every in-flight fetch, mutation and hover lookup, then re-renders.
	pub async fn settle(&mut self) {
		while self.fetch.pending_count() > 0 || self.hover.pending_count() > 0 {
			self.fetch.settle().await;
			self.hover.settle(&self.host).await;
		}
		self.render_dirty();
	}

	/// Retries one failed data kind.
	pub fn retry(&mut self, kind: DataKind) -> bool {
		let issued = self.fetch.retry(kind);
		self.render_dirty();
		issued
	}

	pub fn banners(&self) -> Vec<Banner> {
		self.fetch.flags().banners()
	}

	pub fn dismiss_banner(&mut self, kind: DataKind) {
		self.fetch.flags_mut().dismiss(kind);
	}

	/// Shows or hides one overlay. Hiding clears exactly its channels.
	pub fn set_overlay_visible(&mut self, kind: DataKind, visible: bool) {
		if self.prefs.overlays.get(kind) == visible {
			return;
		}
		self.prefs.overlays.set(kind, visible);
		self.fetch.set_enabled(kind, visible);
		if visible {
			self.fetch.ensure(kind, Trigger::OverlayShown);
		}
		self.render_kind(kind);
	}

	pub fn create_annotation(&mut self, annotation: NewAnnotation) -> Option<AnnotationId> {
		let id = self.fetch.create_annotation(annotation);
		self.render_dirty();
		id
	}

	pub fn update_annotation(&mut self, id: &AnnotationId, patch: AnnotationPatch) -> bool {
		let updated = self.fetch.update_annotation(id, patch);
		self.render_dirty();
		updated
	}

	pub fn delete_annotation(&mut self, id: &AnnotationId) -> bool {
		let deleted = self.fetch.delete_annotation(id);
		self.render_dirty();
		deleted
	}

	/// Clears every channel and releases every host subscription. Idempotent.
	pub fn dispose(&mut self) {
		if self.status == HostStatus::Disposed {
			return;
		}
		self.hover.reset();
		self.layers.dispose(&mut self.host);
		self.subscriptions.dispose();
		self.status = HostStatus::Disposed;
		debug!("session.disposed");
	}

	fn hit_targets(&self) -> Option<HitTargets<'_>> {
		let resource = self.resource.as_ref()?;
		let visible = |kind| self.prefs.overlays.get(kind);
		Some(HitTargets {
			text: resource.text.slice(..),
			annotations: if visible(DataKind::Annotations) { self.fetch.annotations() } else { &[] },
			references: if visible(DataKind::References) { self.fetch.references() } else { &[] },
			chunks: if visible(DataKind::Chunks) { self.fetch.chunks() } else { &[] },
		})
	}

	fn render_dirty(&mut self) {
		for kind in self.fetch.take_dirty() {
			self.render_kind(kind);
		}
	}

	fn render_all(&mut self) {
		self.fetch.take_dirty();
		for kind in DataKind::ALL {
			self.render_kind(kind);
		}
	}

	fn render_kind(&mut self, kind: DataKind) {
		if !self.is_mounted() {
			return;
		}
		for &channel in kind.channels() {
			let decorations = self.build_channel(channel);
			self.layers.update(&mut self.host, channel, &decorations);
		}
	}

	fn build_channel(&self, channel: Channel) -> Vec<Decoration> {
		let Some(resource) = &self.resource else {
			return Vec::new();
		};
		let text = resource.text.slice(..);
		let flags = self.fetch.flags();
		match channel {
			_ if !self.prefs.overlays.get(channel_kind(channel)) => Vec::new(),
			Channel::AnnotationGutter => render::annotation_gutter(text, self.fetch.annotations()),
			Channel::AnnotationHighlights => render::annotation_highlights(text, self.fetch.annotations()),
			Channel::ChunkBoundaries if flags.chunks_line_fallback() => {
				render::line_fallback_boundaries(text, self.config.fallback_chunk_lines())
			}
			Channel::ChunkBoundaries => render::chunk_boundaries(self.fetch.chunks()),
			Channel::QualityBadges if flags.quality_hidden() => Vec::new(),
			Channel::QualityBadges => render::quality_badge(self.fetch.quality(), flags.is_stale(DataKind::Quality)),
			Channel::ReferenceIcons => render::reference_icons(self.fetch.references()),
		}
	}
}

fn channel_kind(channel: Channel) -> DataKind {
	match channel {
		Channel::AnnotationGutter | Channel::AnnotationHighlights => DataKind::Annotations,
		Channel::ChunkBoundaries => DataKind::Chunks,
		Channel::QualityBadges => DataKind::Quality,
		Channel::ReferenceIcons => DataKind::References,
	}
}

impl<H: EditorHost> Drop for EditorSession<H> {
	fn drop(&mut self) {
		self.dispose();
	}
}
