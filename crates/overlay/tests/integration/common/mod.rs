//! Common utilities for session integration tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use chrono::Utc;
use marginalia_client::MemorySource;
use marginalia_model::{
	Annotation, ChunkMetadata, NewAnnotation, QualityDetails, QualityDimensions, Reference, ReferenceType, ResourceMeta,
	SemanticChunk,
};
use marginalia_overlay::{
	Decoration, DecorationHandle, EditorHost, EditorSession, EngineConfig, HostError, HostEventKind, Preferences,
};
use marginalia_primitives::{OffsetSpan, Position};
use marginalia_worker::Subscription;

pub const TEXT: &str = "def parse(text):\n    return text\n\nclass Reader:\n    pass\n";

/// Host double that records every delta it is asked to apply.
#[derive(Default)]
pub struct RecordingHost {
	pub deltas: usize,
	pub live: HashMap<DecorationHandle, Decoration>,
	pub disposed: bool,
	pub fail_mount: Option<String>,
	pub words: HashMap<Position, String>,
	pub builtin: HashMap<Position, String>,
	pub listeners: Rc<Cell<usize>>,
	next: u64,
}

impl RecordingHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Live decorations whose glyph or inline class contains `class`.
	pub fn live_with_class(&self, class: &str) -> Vec<&Decoration> {
		let matches = |value: &Option<String>| value.as_deref().is_some_and(|c| c.split(' ').any(|c| c == class));
		self.live
			.values()
			.filter(|d| matches(&d.options.glyph_class) || matches(&d.options.inline_class))
			.collect()
	}
}

impl EditorHost for RecordingHost {
	fn mount(&mut self) -> Result<(), HostError> {
		match &self.fail_mount {
			Some(reason) => Err(HostError::Load(reason.clone())),
			None => Ok(()),
		}
	}

	fn is_disposed(&self) -> bool {
		self.disposed
	}

	fn delta_decorations(&mut self, old: &[DecorationHandle], new: &[Decoration]) -> Vec<DecorationHandle> {
		self.deltas += 1;
		for handle in old {
			self.live.remove(handle);
		}
		new.iter()
			.map(|decoration| {
				self.next += 1;
				let handle = DecorationHandle(format!("h{}", self.next));
				self.live.insert(handle.clone(), decoration.clone());
				handle
			})
			.collect()
	}

	fn word_at(&self, position: Position) -> Option<String> {
		self.words.get(&position).cloned()
	}

	fn builtin_hover(&self, position: Position) -> Option<String> {
		self.builtin.get(&position).cloned()
	}

	fn subscribe(&mut self, kind: HostEventKind) -> Subscription {
		let listeners = self.listeners.clone();
		listeners.set(listeners.get() + 1);
		Subscription::new(kind.as_str(), move || listeners.set(listeners.get() - 1))
	}
}

pub fn meta(id: &str) -> ResourceMeta {
	ResourceMeta {
		id: id.into(),
		name: format!("{id}.py"),
		language: Some("python".into()),
		size_bytes: TEXT.len() as u64,
	}
}

pub fn annotation(resource: &str, id: &str, span: (usize, usize), note: &str) -> Annotation {
	NewAnnotation::new(resource.into(), "u".into(), OffsetSpan::new(span.0, span.1), "")
		.with_note(note)
		.provisional(id.into(), Utc::now())
}

pub fn chunk(resource: &str, name: &str, start_line: u32, end_line: u32) -> SemanticChunk {
	SemanticChunk {
		id: name.into(),
		resource_id: resource.into(),
		content: String::new(),
		chunk_index: 0,
		chunk_metadata: ChunkMetadata {
			start_line,
			end_line,
			function_name: Some(name.into()),
			class_name: None,
			language: "python".into(),
		},
	}
}

pub fn reference(resource: &str, id: &str, line: u32) -> Reference {
	Reference {
		id: id.into(),
		resource_id: resource.into(),
		line_number: line,
		reference_type: ReferenceType::Documentation,
		title: id.into(),
		authors: None,
		url: None,
		library_item_id: None,
		citation: None,
		created_at: Utc::now(),
	}
}

pub fn quality(resource: &str, overall: f64) -> QualityDetails {
	QualityDetails {
		resource_id: resource.into(),
		dimensions: QualityDimensions {
			accuracy: overall,
			completeness: overall,
			consistency: overall,
			timeliness: overall,
			relevance: overall,
		},
		overall,
		weights: QualityDimensions::default(),
		computed_at: None,
		is_quality_outlier: false,
		needs_quality_review: false,
	}
}

/// A source with every kind seeded for resources `a` and `b`.
pub fn seeded_source() -> Arc<MemorySource> {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let source = Arc::new(MemorySource::new());
	for resource in ["a", "b"] {
		source.set_annotations(
			resource.into(),
			vec![
				annotation(resource, &format!("{resource}-1"), (0, 2), "first"),
				annotation(resource, &format!("{resource}-2"), (4, 8), "second"),
			],
		);
		source.set_chunks(resource.into(), vec![chunk(resource, "parse", 1, 2), chunk(resource, "Reader", 4, 5)]);
		source.set_quality(resource.into(), quality(resource, 0.9));
		source.set_references(resource.into(), vec![reference(resource, &format!("{resource}-ref"), 4)]);
	}
	source
}

/// A mounted session showing resource `a`, with every fetch settled.
pub async fn mounted_session(source: &Arc<MemorySource>) -> EditorSession<RecordingHost> {
	let mut session = EditorSession::new(RecordingHost::new(), source.clone(), EngineConfig::default(), Preferences::default());
	session.mount().expect("mount");
	session.open_resource(meta("a"), TEXT);
	session.settle().await;
	session
}
