//! In-crate test double for the host editor widget.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use marginalia_primitives::Position;
use marginalia_worker::Subscription;

use crate::decoration::{Decoration, DecorationHandle};
use crate::error::HostError;
use crate::host::{EditorHost, HostEventKind};

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub(crate) struct DeltaCall {
	pub old: Vec<DecorationHandle>,
	pub new: Vec<Decoration>,
}

#[derive(Default)]
pub(crate) struct FakeHost {
	pub calls: Vec<DeltaCall>,
	pub live: HashMap<DecorationHandle, Decoration>,
	pub disposed: bool,
	pub fail_mount: Option<String>,
	pub words: HashMap<Position, String>,
	pub builtin: HashMap<Position, String>,
	pub active_subscriptions: Rc<Cell<usize>>,
	next: u64,
}

impl FakeHost {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn live_count(&self) -> usize {
		self.live.len()
	}

	pub fn is_live(&self, handle: &DecorationHandle) -> bool {
		self.live.contains_key(handle)
	}
}

impl EditorHost for FakeHost {
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
		for handle in old {
			self.live.remove(handle);
		}
		let handles: Vec<_> = new
			.iter()
			.map(|decoration| {
				self.next += 1;
				let handle = DecorationHandle(format!("d{}", self.next));
				self.live.insert(handle.clone(), decoration.clone());
				handle
			})
			.collect();
		self.calls.push(DeltaCall {
			old: old.to_vec(),
			new: new.to_vec(),
		});
		handles
	}

	fn word_at(&self, position: Position) -> Option<String> {
		self.words.get(&position).cloned()
	}

	fn builtin_hover(&self, position: Position) -> Option<String> {
		self.builtin.get(&position).cloned()
	}

	fn subscribe(&mut self, kind: HostEventKind) -> Subscription {
		let active = self.active_subscriptions.clone();
		active.set(active.get() + 1);
		Subscription::new(kind.as_str(), move || active.set(active.get() - 1))
	}
}
