use marginalia_client::Endpoint;
use marginalia_model::{AnnotationPatch, NewAnnotation};
use marginalia_overlay::{DataKind, EditorSession, EngineConfig, Preferences};
use marginalia_overlay::render::ANNOTATION_CHIP_CLASS;
use marginalia_primitives::{AnnotationId, OffsetSpan};

use crate::common::{RecordingHost, TEXT, meta, mounted_session, seeded_source};

fn chip_notes(host: &RecordingHost) -> Vec<String> {
	let mut notes: Vec<_> = host
		.live_with_class(ANNOTATION_CHIP_CLASS)
		.into_iter()
		.filter_map(|d| d.options.hover_message.clone())
		.collect();
	notes.sort();
	notes
}

fn new_note(note: &str) -> NewAnnotation {
	NewAnnotation::new("a".into(), "u".into(), OffsetSpan::new(40, 44), "pass").with_note(note)
}

#[tokio::test]
async fn created_annotation_renders_before_the_server_answers() {
	let source = seeded_source();
	let mut session = mounted_session(&source).await;

	let provisional = session.create_annotation(new_note("later")).expect("resource open");
	assert!(provisional.as_str().starts_with("provisional-"));
	assert_eq!(chip_notes(session.host()), ["first", "later", "second"]);

	session.settle().await;
	let ids: Vec<_> = session.fetch().annotations().iter().map(|a| a.id.to_string()).collect();
	assert!(ids.iter().all(|id| !id.starts_with("provisional-")));
	assert_eq!(chip_notes(session.host()), ["first", "later", "second"]);
	assert_eq!(source.stored_annotations(&"a".into()).len(), 3);
}

#[tokio::test]
async fn rejected_create_rolls_back_and_raises_a_banner() {
	let source = seeded_source();
	source.fail(Endpoint::CreateAnnotation);
	let mut session = mounted_session(&source).await;

	session.create_annotation(new_note("doomed"));
	assert_eq!(chip_notes(session.host()).len(), 3);

	session.settle().await;
	assert_eq!(chip_notes(session.host()), ["first", "second"]);
	let banners = session.banners();
	assert_eq!(banners.len(), 1);
	assert_eq!(banners[0].kind, DataKind::Annotations);
	assert!(!banners[0].retryable);
	assert!(banners[0].message.starts_with("Annotation change was not saved"));

	session.dismiss_banner(DataKind::Annotations);
	assert!(session.banners().is_empty());
}

#[tokio::test]
async fn update_applies_locally_then_confirms() {
	let source = seeded_source();
	let mut session = mounted_session(&source).await;
	let patch = AnnotationPatch {
		note: Some("edited".into()),
		..Default::default()
	};

	assert!(session.update_annotation(&AnnotationId::new("a-1"), patch));
	assert_eq!(chip_notes(session.host()), ["edited", "second"]);
	session.settle().await;
	assert_eq!(chip_notes(session.host()), ["edited", "second"]);
	assert!(session.banners().is_empty());

	assert!(!session.update_annotation(&AnnotationId::new("missing"), AnnotationPatch::default()));
}

#[tokio::test]
async fn rejected_delete_restores_the_annotation_in_place() {
	let source = seeded_source();
	source.fail(Endpoint::DeleteAnnotation);
	let mut session = mounted_session(&source).await;

	assert!(session.delete_annotation(&AnnotationId::new("a-1")));
	assert_eq!(chip_notes(session.host()), ["second"]);

	session.settle().await;
	let ids: Vec<_> = session.fetch().annotations().iter().map(|a| a.id.to_string()).collect();
	assert_eq!(ids, ["a-1", "a-2"]);
	assert_eq!(chip_notes(session.host()), ["first", "second"]);
	assert!(session.flags().mutation_error().is_some());
}

#[tokio::test]
async fn mutation_finishing_after_a_switch_does_not_touch_the_new_resource() {
	let source = seeded_source();
	source.fail(Endpoint::UpdateAnnotation);
	let mut session = mounted_session(&source).await;
	let patch = AnnotationPatch {
		note: Some("edited".into()),
		..Default::default()
	};
	assert!(session.update_annotation(&AnnotationId::new("a-1"), patch));

	session.open_resource(meta("b"), TEXT);
	session.settle().await;

	assert_eq!(chip_notes(session.host()), ["first", "second"]);
	assert!(session.banners().is_empty());
	let ids: Vec<_> = session.fetch().annotations().iter().map(|a| a.id.to_string()).collect();
	assert_eq!(ids, ["b-1", "b-2"]);
}

#[tokio::test]
async fn annotation_created_while_hidden_appears_with_the_fetched_ones_when_shown() {
	let source = seeded_source();
	let mut prefs = Preferences::default();
	prefs.overlays.set(DataKind::Annotations, false);
	let mut session = EditorSession::new(RecordingHost::new(), source.clone(), EngineConfig::default(), prefs);
	session.mount().expect("mount");
	session.open_resource(meta("a"), TEXT);
	session.settle().await;

	session.create_annotation(new_note("hidden"));
	session.settle().await;
	assert!(chip_notes(session.host()).is_empty());
	assert_eq!(source.calls(Endpoint::Annotations), 0);

	session.set_overlay_visible(DataKind::Annotations, true);
	session.settle().await;
	assert_eq!(source.calls(Endpoint::Annotations), 1);
	assert_eq!(chip_notes(session.host()), ["first", "hidden", "second"]);
}

#[tokio::test]
async fn create_issued_before_the_first_fetch_lands_is_kept_once() {
	let source = seeded_source();
	let mut session = EditorSession::new(RecordingHost::new(), source.clone(), EngineConfig::default(), Preferences::default());
	session.mount().expect("mount");
	session.open_resource(meta("a"), TEXT);

	session.create_annotation(new_note("early"));
	session.settle().await;
	assert_eq!(chip_notes(session.host()), ["early", "first", "second"]);
	let ids: Vec<_> = session.fetch().annotations().iter().map(|a| a.id.to_string()).collect();
	assert_eq!(ids, ["a-1", "a-2", "mem-1"]);
}
