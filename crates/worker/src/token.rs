use tokio_util::sync::CancellationToken;

/// Monotonic generation counter for one asynchronous context (an active
/// resource, a hover session).
///
/// Advancing the clock cancels the previous generation's token. Completions
/// are matched against [`GenerationClock::is_current`] before being applied,
/// so results from an abandoned context are dropped even if the underlying
/// request ignored cancellation.
#[derive(Debug)]
pub struct GenerationClock {
	current: u64,
	cancel: CancellationToken,
}

impl Default for GenerationClock {
	fn default() -> Self {
		Self::new()
	}
}

impl GenerationClock {
	/// Creates a clock at generation 1.
	pub fn new() -> Self {
		Self {
			current: 1,
			cancel: CancellationToken::new(),
		}
	}

	/// Current generation ID.
	pub const fn current(&self) -> u64 {
		self.current
	}

	/// Starts a new generation, cancelling outstanding tokens of the old one.
	pub fn advance(&mut self) -> u64 {
		self.cancel.cancel();
		self.cancel = CancellationToken::new();
		self.current = self.current.wrapping_add(1);
		self.current
	}

	/// Issues a token bound to the current generation.
	pub fn token(&self) -> GenerationToken {
		GenerationToken {
			generation: self.current,
			cancel: self.cancel.child_token(),
		}
	}

	/// Returns true if `generation` is still the current one.
	pub const fn is_current(&self, generation: u64) -> bool {
		self.current == generation
	}
}

/// Generation-scoped cancellation token carried by spawned work.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when the owning generation has been superseded.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Future resolving when the owning generation is superseded.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
