//! Ownership of the host's decoration handles, one list per channel.
//!
//! Each channel remembers exactly the handles its last update produced and
//! hands only those back to the host on the next delta, so no operation on
//! one channel can remove or replace another channel's decorations.

use tracing::trace;

use crate::channel::Channel;
use crate::decoration::{Decoration, DecorationHandle};
use crate::host::EditorHost;

#[derive(Debug, Default)]
pub struct DecorationLayers {
	handles: [Vec<DecorationHandle>; Channel::ALL.len()],
	disposed: bool,
}

impl DecorationLayers {
	pub fn new() -> Self {
		Self::default()
	}

	/// Handles currently applied for `channel`.
	pub fn handles(&self, channel: Channel) -> &[DecorationHandle] {
		&self.handles[channel.index()]
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Replaces the channel's decorations with exactly `decorations`.
	///
	/// Silently does nothing once either side has been disposed.
	pub fn update<H: EditorHost + ?Sized>(&mut self, host: &mut H, channel: Channel, decorations: &[Decoration]) {
		if self.disposed || host.is_disposed() {
			trace!(channel = %channel, "decoration update dropped, host gone");
			return;
		}
		let slot = &mut self.handles[channel.index()];
		if slot.is_empty() && decorations.is_empty() {
			return;
		}
		let old = std::mem::take(slot);
		*slot = host.delta_decorations(&old, decorations);
		trace!(channel = %channel, removed = old.len(), applied = slot.len(), "decorations updated");
	}

	pub fn clear<H: EditorHost + ?Sized>(&mut self, host: &mut H, channel: Channel) {
		self.update(host, channel, &[]);
	}

	pub fn clear_all<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
		for channel in Channel::ALL {
			self.clear(host, channel);
		}
	}

	/// Clears every channel and forgets all handles. Idempotent.
	pub fn dispose<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
		if self.disposed {
			return;
		}
		self.clear_all(host);
		for slot in &mut self.handles {
			slot.clear();
		}
		self.disposed = true;
	}
}
