//! Overlay coordination for an embedded code editor.
//!
//! Several independent overlays (annotation chips and highlights, semantic
//! chunk boundaries, quality badges, reference icons) share one decoration
//! surface of a host editor widget. This crate keeps them apart and in sync:
//!
//! ```text
//! host events ──▶ EditorSession ──▶ FetchCoordinator ──▶ DataSource
//!                     │    ▲               │
//!                     │    └── completions ┘
//!                     ▼
//!         resolver + render ──▶ DecorationLayers ──▶ host delta_decorations
//!                     │
//!                     └──▶ dispatch (hover/click) ──▶ callbacks
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`resolver`] | Same-line stacking order, innermost-chunk and first-reference rules |
//! | [`layers`] | Per-channel decoration handle ownership |
//! | [`render`] | Domain data to channel decoration lists |
//! | [`dispatch`] | Pointer event to entity resolution |
//! | [`fetch`] | Debounced, single-flight, stale-checked data loading and optimistic annotation edits |
//! | [`hover`] | Hover-card sessions with fallback chain |
//! | [`fallback`] | Per-data-kind error/stale flags and banners |
//! | [`prefs`] | Persisted view preferences |
//! | [`session`] | Per-mount service object wiring it all to a host |
//!
//! Scheduling is tick driven: every entry point that depends on time takes an
//! [`std::time::Instant`], and asynchronous results are drained on the next
//! tick.

pub mod channel;
pub mod config;
pub mod decoration;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod host;
pub mod hover;
pub mod layers;
pub mod prefs;
pub mod render;
pub mod resolver;
pub mod session;

#[cfg(test)]
mod testing;

pub use channel::Channel;
pub use config::EngineConfig;
pub use decoration::{Decoration, DecorationHandle, DecorationOptions, DecorationRange};
pub use dispatch::{EntityRef, HitTargets, dispatch_click, dispatch_hover};
pub use error::{ConfigError, HostError, PrefsError};
pub use fallback::{Banner, FallbackState, KindStatus, Severity};
pub use fetch::{DataKind, FetchCoordinator, MutationOutcome, SlotState, Trigger};
pub use host::{EditorHost, HostEventKind, PointerEvent, PointerTarget, TargetKind};
pub use hover::{HoverCard, HoverController, HoverRequest};
pub use layers::DecorationLayers;
pub use prefs::{OverlayVisibility, PreferenceStore, Preferences};
pub use session::{EditorSession, FallbackView, HostStatus};
