use std::fmt;

/// Handle to a host event listener. Dropping it unsubscribes.
pub struct Subscription {
	label: &'static str,
	unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub fn new(label: &'static str, unsubscribe: impl FnOnce() + 'static) -> Self {
		Self {
			label,
			unsubscribe: Some(Box::new(unsubscribe)),
		}
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Releases the listener now.
	pub fn unsubscribe(mut self) {
		self.release();
	}

	fn release(&mut self) {
		if let Some(unsubscribe) = self.unsubscribe.take() {
			tracing::trace!(subscription = self.label, "unsubscribe");
			unsubscribe();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.release();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("label", &self.label)
			.field("active", &self.unsubscribe.is_some())
			.finish()
	}
}

/// Ordered collection of subscriptions released together, newest first.
#[derive(Debug, Default)]
pub struct DisposalList {
	items: Vec<Subscription>,
}

impl DisposalList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, subscription: Subscription) {
		self.items.push(subscription);
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Releases every held subscription. Safe to call repeatedly.
	pub fn dispose(&mut self) {
		while let Some(subscription) = self.items.pop() {
			subscription.unsubscribe();
		}
	}
}

impl Drop for DisposalList {
	fn drop(&mut self) {
		self.dispose();
	}
}
