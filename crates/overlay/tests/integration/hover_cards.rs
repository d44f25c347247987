use std::time::{Duration, Instant};

use marginalia_client::Endpoint;
use marginalia_model::SymbolSummary;
use marginalia_overlay::{HoverCard, PointerEvent};
use marginalia_primitives::Position;

use crate::common::{TEXT, meta, mounted_session, seeded_source};

const WINDOW: Duration = Duration::from_millis(300);

fn summary(name: &str) -> SymbolSummary {
	SymbolSummary {
		name: name.into(),
		summary: format!("{name} summary"),
		connections: Vec::new(),
	}
}

#[tokio::test]
async fn card_opens_after_quiescence_and_enriches() {
	let source = seeded_source();
	source.set_summary("a".into(), summary("parse"));
	let mut session = mounted_session(&source).await;
	session.host_mut().words.insert(Position::new(1, 6), "parse".into());

	let start = Instant::now();
	session.pointer_move(start, PointerEvent::text(1, 6));
	session.tick(start + Duration::from_millis(100));
	assert_eq!(session.hover_card(), None);

	session.tick(start + WINDOW);
	assert!(matches!(session.hover_card(), Some(HoverCard::Loading { symbol }) if symbol == "parse"));

	session.settle().await;
	assert_eq!(session.hover_card(), Some(&HoverCard::Enriched(summary("parse"))));
	assert_eq!(source.calls(Endpoint::SymbolSummary), 1);
}

#[tokio::test]
async fn burst_of_moves_issues_one_lookup() {
	let source = seeded_source();
	source.set_summary("a".into(), summary("parse"));
	let mut session = mounted_session(&source).await;
	session.host_mut().words.insert(Position::new(1, 6), "parse".into());

	let start = Instant::now();
	for step in 0..10 {
		let now = start + Duration::from_millis(step * 50);
		session.pointer_move(now, PointerEvent::text(1, 6));
		session.tick(now);
	}
	session.tick(start + Duration::from_millis(450) + WINDOW);
	session.settle().await;
	assert_eq!(source.calls(Endpoint::SymbolSummary), 1);
}

#[tokio::test]
async fn failed_enrichment_falls_back_to_builtin_hover() {
	let source = seeded_source();
	source.fail(Endpoint::SymbolSummary);
	let mut session = mounted_session(&source).await;
	let position = Position::new(4, 8);
	session.host_mut().words.insert(position, "Reader".into());
	session.host_mut().builtin.insert(position, "class Reader".into());

	let start = Instant::now();
	session.pointer_move(start, PointerEvent::text(4, 8));
	session.tick(start + WINDOW);
	session.settle().await;

	assert_eq!(
		session.hover_card(),
		Some(&HoverCard::Builtin {
			symbol: "Reader".into(),
			contents: "class Reader".into(),
		})
	);
}

#[tokio::test]
async fn gutter_move_and_blur_close_the_card() {
	let source = seeded_source();
	source.set_summary("a".into(), summary("parse"));
	let mut session = mounted_session(&source).await;
	session.host_mut().words.insert(Position::new(1, 6), "parse".into());

	let start = Instant::now();
	session.pointer_move(start, PointerEvent::text(1, 6));
	session.tick(start + WINDOW);
	session.settle().await;
	assert!(session.hover_card().is_some());

	let later = start + WINDOW * 2;
	session.pointer_move(later, PointerEvent::gutter(1));
	session.tick(later + WINDOW);
	assert_eq!(session.hover_card(), None);

	// the same symbol again reuses the last card without a lookup
	let again = later + WINDOW * 2;
	session.pointer_move(again, PointerEvent::text(1, 6));
	session.tick(again + WINDOW);
	assert_eq!(session.hover_card(), Some(&HoverCard::Enriched(summary("parse"))));
	assert_eq!(source.calls(Endpoint::SymbolSummary), 1);

	session.blur();
	assert_eq!(session.hover_card(), None);
}

#[tokio::test]
async fn switching_resources_drops_the_card() {
	let source = seeded_source();
	source.set_summary("a".into(), summary("parse"));
	let mut session = mounted_session(&source).await;
	session.host_mut().words.insert(Position::new(1, 6), "parse".into());

	let start = Instant::now();
	session.pointer_move(start, PointerEvent::text(1, 6));
	session.tick(start + WINDOW);
	assert!(session.hover_card().is_some());

	session.open_resource(meta("b"), TEXT);
	assert_eq!(session.hover_card(), None);
	session.settle().await;
	// the lookup for resource a finished after the switch and was discarded
	assert_eq!(session.hover_card(), None);
}
