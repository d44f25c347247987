use std::time::{Duration, Instant};

use marginalia_client::Endpoint;
use marginalia_overlay::{EditorSession, EngineConfig, HostError, HostEventKind, HostStatus, Preferences};

use crate::common::{RecordingHost, TEXT, meta, mounted_session, seeded_source};

#[tokio::test]
async fn dispose_releases_listeners_and_decorations() {
	let source = seeded_source();
	let mut session = mounted_session(&source).await;
	let listeners = session.host().listeners.clone();
	assert_eq!(listeners.get(), HostEventKind::ALL.len());
	assert!(!session.host().live.is_empty());

	session.dispose();
	assert_eq!(listeners.get(), 0);
	assert!(session.host().live.is_empty());
	assert_eq!(session.status(), &HostStatus::Disposed);

	// nothing reaches the host afterwards
	let deltas = session.host().deltas;
	session.open_resource(meta("b"), TEXT);
	session.tick(Instant::now());
	session.settle().await;
	assert_eq!(session.host().deltas, deltas);
	assert_eq!(session.mount(), Err(HostError::Disposed));
}

#[tokio::test]
async fn dropping_the_session_releases_listeners() {
	let source = seeded_source();
	let session = mounted_session(&source).await;
	let listeners = session.host().listeners.clone();
	drop(session);
	assert_eq!(listeners.get(), 0);
}

#[tokio::test]
async fn failed_mount_shows_fallback_until_retried() {
	let source = seeded_source();
	let mut host = RecordingHost::new();
	host.fail_mount = Some("worker script blocked".into());
	let mut session = EditorSession::new(host, source.clone(), EngineConfig::default(), Preferences::default());
	session.open_resource(meta("a"), TEXT);

	assert!(matches!(session.mount(), Err(HostError::Load(_))));
	assert!(matches!(session.status(), HostStatus::Failed { .. }));
	let view = session.fallback_view().expect("fallback view");
	assert_eq!(view.meta.name, "a.py");
	assert_eq!(view.text.to_string(), TEXT);
	assert!(view.reason.contains("worker script blocked"));
	assert_eq!(session.host().deltas, 0);
	assert_eq!(session.host().listeners.get(), 0);

	session.host_mut().fail_mount = None;
	session.mount().unwrap();
	session.settle().await;
	assert!(session.fallback_view().is_none());
	assert_eq!(session.status(), &HostStatus::Mounted);
	assert!(!session.host().live.is_empty());
	assert_eq!(source.calls(Endpoint::Annotations), 1);
}

#[tokio::test]
async fn scroll_bursts_fetch_missing_kinds_once() {
	let source = seeded_source();
	source.fail(Endpoint::Annotations);
	let mut prefs = Preferences::default();
	prefs.overlays.chunks = false;
	let mut session = EditorSession::new(RecordingHost::new(), source.clone(), EngineConfig::default(), prefs);
	session.mount().unwrap();
	session.open_resource(meta("a"), TEXT);
	session.settle().await;
	assert_eq!(source.calls(Endpoint::Chunks), 0);

	let start = Instant::now();
	for step in 0..10 {
		session.scroll(start + Duration::from_millis(step * 20));
	}
	session.tick(start + Duration::from_millis(200));
	assert_eq!(session.fetch().pending_count(), 0);

	session.tick(start + Duration::from_millis(180 + 300));
	session.settle().await;
	// chunks stay disabled and failed annotations wait for an explicit retry
	assert_eq!(source.calls(Endpoint::Chunks), 0);
	assert_eq!(source.calls(Endpoint::Annotations), 1);
}

#[tokio::test]
async fn returning_to_a_resource_refetches_dropped_kinds() {
	let source = seeded_source();
	let mut session = EditorSession::new(RecordingHost::new(), source.clone(), EngineConfig::default(), Preferences::default());
	session.mount().unwrap();
	session.open_resource(meta("a"), TEXT);
	// switch away before anything completes, then back
	session.open_resource(meta("b"), TEXT);
	session.open_resource(meta("a"), TEXT);
	session.settle().await;

	assert_eq!(session.fetch().annotations().len(), 2);
	assert!(session.banners().is_empty());

	let start = Instant::now();
	session.scroll(start);
	session.tick(start + Duration::from_millis(300));
	// everything is cached, so scrolling has nothing to do
	assert_eq!(session.fetch().pending_count(), 0);
}
