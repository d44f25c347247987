use std::cell::RefCell;
use std::rc::Rc;

use marginalia_client::{Endpoint, MemorySource};
use marginalia_overlay::render::{
	ANNOTATION_CHIP_CLASS, ANNOTATION_HIGHLIGHT_CLASS, CHUNK_BOUNDARY_CLASS, CHUNK_FALLBACK_CLASS,
};
use marginalia_overlay::{Channel, DataKind, EditorSession, EngineConfig, EntityRef, PointerEvent, Preferences, Severity};

use crate::common::{RecordingHost, TEXT, meta, mounted_session, seeded_source};

fn entity_id(entity: EntityRef<'_>) -> String {
	match entity {
		EntityRef::Annotation(a) => format!("annotation:{}", a.id),
		EntityRef::Reference(r) => format!("reference:{}", r.id),
		EntityRef::Chunk(c) => format!("chunk:{}", c.id),
	}
}

#[tokio::test]
async fn every_overlay_renders_into_its_own_channel() {
	let source = seeded_source();
	let session = mounted_session(&source).await;
	let host = session.host();

	assert_eq!(host.live_with_class(ANNOTATION_CHIP_CLASS).len(), 2);
	assert_eq!(host.live_with_class(ANNOTATION_HIGHLIGHT_CLASS).len(), 2);
	assert_eq!(host.live_with_class(CHUNK_BOUNDARY_CLASS).len(), 2);
	assert_eq!(host.live_with_class("quality-badge-high").len(), 1);
	assert_eq!(host.live_with_class("reference-icon-documentation").len(), 1);
	for channel in Channel::ALL {
		assert!(!session.layers().handles(channel).is_empty(), "{channel}");
	}
	assert!(session.banners().is_empty());
}

#[tokio::test]
async fn hiding_quality_leaves_other_channels_untouched() {
	let source = seeded_source();
	let mut session = mounted_session(&source).await;
	let gutter = session.layers().handles(Channel::AnnotationGutter).to_vec();
	let chunks = session.layers().handles(Channel::ChunkBoundaries).to_vec();

	session.set_overlay_visible(DataKind::Quality, false);

	assert!(session.layers().handles(Channel::QualityBadges).is_empty());
	assert_eq!(session.layers().handles(Channel::AnnotationGutter), gutter.as_slice());
	assert_eq!(session.layers().handles(Channel::ChunkBoundaries), chunks.as_slice());
	for handle in &gutter {
		assert!(session.host().live.contains_key(handle));
	}
	assert!(!session.preferences().overlays.quality);

	// showing it again renders from cache
	session.set_overlay_visible(DataKind::Quality, true);
	assert_eq!(session.host().live_with_class("quality-badge-high").len(), 1);
	assert_eq!(source.calls(Endpoint::Quality), 1);
}

#[tokio::test]
async fn hidden_overlay_fetches_when_first_shown() {
	let source = seeded_source();
	let mut prefs = Preferences::default();
	prefs.overlays.references = false;
	let mut session = EditorSession::new(RecordingHost::new(), source.clone(), EngineConfig::default(), prefs);
	session.mount().unwrap();
	session.open_resource(meta("a"), TEXT);
	session.settle().await;
	assert_eq!(source.calls(Endpoint::References), 0);
	assert!(session.layers().handles(Channel::ReferenceIcons).is_empty());

	session.set_overlay_visible(DataKind::References, true);
	session.settle().await;
	assert_eq!(source.calls(Endpoint::References), 1);
	assert_eq!(session.layers().handles(Channel::ReferenceIcons).len(), 1);
}

#[tokio::test]
async fn chunk_failure_falls_back_to_line_windows() {
	let source = seeded_source();
	source.fail(Endpoint::Chunks);
	let session = mounted_session(&source).await;

	let windows = session.host().live_with_class(CHUNK_FALLBACK_CLASS);
	assert_eq!(windows.len(), 1);
	assert_eq!(windows[0].options.label.as_deref(), Some("Lines 1-6"));

	let banners = session.banners();
	assert_eq!(banners.len(), 1);
	assert_eq!(banners[0].kind, DataKind::Chunks);
	assert_eq!(banners[0].severity, Severity::Error);
	assert!(banners[0].retryable);
}

#[tokio::test]
async fn retry_recovers_a_failed_kind() {
	let source = seeded_source();
	source.fail(Endpoint::Quality);
	let mut session = mounted_session(&source).await;
	assert!(session.flags().quality_hidden());
	assert!(session.layers().handles(Channel::QualityBadges).is_empty());

	source.recover(Endpoint::Quality);
	assert!(session.retry(DataKind::Quality));
	session.settle().await;

	assert!(session.banners().is_empty());
	assert_eq!(session.host().live_with_class("quality-badge-high").len(), 1);
}

#[tokio::test]
async fn dismissed_banner_stays_hidden_until_status_changes() {
	let source = seeded_source();
	source.fail(Endpoint::References);
	let mut session = mounted_session(&source).await;
	assert_eq!(session.banners().len(), 1);

	session.dismiss_banner(DataKind::References);
	assert!(session.banners().is_empty());
	assert!(session.flags().is_failed(DataKind::References));
}

#[tokio::test]
async fn switching_resources_clears_every_flag() {
	let source = seeded_source();
	source.fail(Endpoint::Quality);
	source.fail(Endpoint::Chunks);
	let mut session = mounted_session(&source).await;
	assert_eq!(session.banners().len(), 2);

	source.recover(Endpoint::Quality);
	source.recover(Endpoint::Chunks);
	session.open_resource(meta("b"), TEXT);
	assert!(session.banners().is_empty());
	assert!(!session.flags().chunks_line_fallback());

	session.settle().await;
	let gutter: Vec<_> = session
		.host()
		.live_with_class(ANNOTATION_CHIP_CLASS)
		.into_iter()
		.filter_map(|d| d.options.hover_message.clone())
		.collect();
	assert_eq!(gutter.len(), 2);
	assert!(session.host().live_with_class(CHUNK_FALLBACK_CLASS).is_empty());
	assert_eq!(session.host().live_with_class("quality-badge-high").len(), 1);
}

#[tokio::test]
async fn clicks_and_hovers_reach_callbacks() {
	let source = seeded_source();
	let mut session = mounted_session(&source).await;
	let clicks = Rc::new(RefCell::new(Vec::new()));
	let hovers = Rc::new(RefCell::new(Vec::new()));
	let sink = clicks.clone();
	session.on_click(move |entity| sink.borrow_mut().push(entity_id(entity)));
	let sink = hovers.clone();
	session.on_hover(move |entity| sink.borrow_mut().push(entity.map(entity_id)));

	let now = std::time::Instant::now();
	assert!(session.pointer_down(PointerEvent::gutter(1)));
	assert!(session.pointer_down(PointerEvent::gutter(4)));
	assert!(!session.pointer_down(PointerEvent::text(3, 1)));
	session.pointer_move(now, PointerEvent::text(1, 6));
	session.pointer_move(now, PointerEvent::outside());

	assert_eq!(*clicks.borrow(), vec!["annotation:a-1".to_owned(), "reference:a-ref".to_owned()]);
	assert_eq!(*hovers.borrow(), vec![Some("annotation:a-2".to_owned()), None]);

	// a hidden overlay cannot be hit
	session.set_overlay_visible(DataKind::References, false);
	assert!(session.pointer_down(PointerEvent::gutter(4)));
	assert_eq!(clicks.borrow().last().map(String::as_str), Some("chunk:Reader"));
}

#[tokio::test]
async fn empty_source_renders_nothing_but_quality_banner() {
	let source = std::sync::Arc::new(MemorySource::new());
	let mut session = EditorSession::new(RecordingHost::new(), source, EngineConfig::default(), Preferences::default());
	session.mount().unwrap();
	session.open_resource(meta("empty"), "");
	session.settle().await;

	assert!(session.host().live.is_empty());
	let banners = session.banners();
	assert_eq!(banners.len(), 1);
	assert_eq!(banners[0].kind, DataKind::Quality);
}
