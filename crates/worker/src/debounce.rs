use std::time::{Duration, Instant};

/// Cancel-and-reschedule timer carrying the latest payload of a burst.
///
/// Every [`schedule`](Self::schedule) replaces the payload and pushes the
/// deadline out to `now + window`, so only the final event of a burst
/// survives. The owner polls [`take_due`](Self::take_due) from its tick.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
	window: Duration,
	deadline: Option<Instant>,
	payload: Option<T>,
}

impl<T> Debounced<T> {
	pub fn new(window: Duration) -> Self {
		Self {
			window,
			deadline: None,
			payload: None,
		}
	}

	pub fn window(&self) -> Duration {
		self.window
	}

	/// Resets the timer to fire `window` after `now` with `payload`.
	pub fn schedule(&mut self, now: Instant, payload: T) {
		self.deadline = Some(now + self.window);
		self.payload = Some(payload);
	}

	/// Drops any scheduled firing.
	pub fn cancel(&mut self) {
		self.deadline = None;
		self.payload = None;
	}

	pub fn is_scheduled(&self) -> bool {
		self.deadline.is_some()
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Returns the payload once the quiescence window has elapsed, disarming the timer.
	pub fn take_due(&mut self, now: Instant) -> Option<T> {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				self.payload.take()
			}
			_ => None,
		}
	}
}
