//! Hover cards for symbols under the pointer.
//!
//! Pointer moves are debounced. When the window expires the word under the
//! pointer is looked up; an unchanged symbol reuses the last card, anything
//! else issues exactly one enrichment request. Failed requests fall back to
//! the host's own hover text and then to the bare symbol name, once each.
//!
//! Every lookup bumps a generation. A completion is applied only when its
//! generation and symbol are still current, so a slow answer for an earlier
//! symbol never replaces the card of a later one.


use std::sync::Arc;
use std::time::{Duration, Instant};

use marginalia_client::{DataSource, SourceError};
use marginalia_model::SymbolSummary;
use marginalia_primitives::{Position, ResourceId};
use marginalia_worker::{Debounced, GenerationClock, TaskClass};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

use crate::host::EditorHost;

/// Content of the hover card.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverCard {
	/// Enrichment request in flight.
	Loading { symbol: String },
	Enriched(SymbolSummary),
	/// Enrichment failed; the host's own hover text is shown.
	Builtin { symbol: String, contents: String },
	/// Nothing but the symbol name is known.
	Bare { symbol: String },
}

impl HoverCard {
	pub fn symbol(&self) -> &str {
		match self {
			Self::Loading { symbol } | Self::Builtin { symbol, .. } | Self::Bare { symbol } => symbol,
			Self::Enriched(summary) => &summary.name,
		}
	}
}

/// A lookup the controller decided to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverRequest {
	pub symbol: String,
	pub position: Position,
	generation: u64,
}

#[derive(Debug)]
pub(crate) struct HoverCompletion {
	symbol: String,
	position: Position,
	generation: u64,
	/// `None` when the lookup was cancelled.
	result: Option<Result<SymbolSummary, SourceError>>,
}

pub struct HoverController {
	debounce: Debounced<Option<Position>>,
	clock: GenerationClock,
	/// Symbol the card currently belongs to.
	current: Option<String>,
	/// Symbol whose lookup is running.
	in_flight: Option<String>,
	/// Hovered word and card of the last finished lookup.
	last_completed: Option<(String, HoverCard)>,
	card: Option<HoverCard>,
	pending: usize,
	tx: UnboundedSender<HoverCompletion>,
	rx: UnboundedReceiver<HoverCompletion>,
}

impl HoverController {
	pub fn new(window: Duration) -> Self {
		let (tx, rx) = unbounded_channel();
		Self {
			debounce: Debounced::new(window),
			clock: GenerationClock::new(),
			current: None,
			in_flight: None,
			last_completed: None,
			card: None,
			pending: 0,
			tx,
			rx,
		}
	}

	/// The card to display, if any.
	pub fn card(&self) -> Option<&HoverCard> {
		self.card.as_ref()
	}

	pub fn pending_count(&self) -> usize {
		self.pending
	}

	/// Restarts the quiescence window for a pointer at `position`.
	pub fn pointer_moved(&mut self, now: Instant, position: Option<Position>) {
		self.debounce.schedule(now, position);
	}

	/// Resolves a due pointer move into at most one lookup.
	pub fn poll<H: EditorHost + ?Sized>(&mut self, now: Instant, host: &H) -> Option<HoverRequest> {
		let position = self.debounce.take_due(now)?;
		let Some((position, symbol)) = position.and_then(|p| host.word_at(p).map(|word| (p, word))) else {
			if self.card.is_some() || self.in_flight.is_some() {
				debug!("hover.no_symbol");
			}
			self.close();
			return None;
		};

		if self.in_flight.as_deref() == Some(symbol.as_str()) {
			debug!(symbol = %symbol, "hover.already_in_flight");
			return None;
		}
		if let Some((_, last)) = self.last_completed.as_ref().filter(|(word, _)| *word == symbol) {
			debug!(symbol = %symbol, "hover.reused");
			self.card = Some(last.clone());
			self.clock.advance();
			self.in_flight = None;
			self.current = Some(symbol);
			return None;
		}

		let generation = self.clock.advance();
		self.current = Some(symbol.clone());
		self.in_flight = Some(symbol.clone());
		self.card = Some(HoverCard::Loading { symbol: symbol.clone() });
		debug!(symbol = %symbol, generation, "hover.lookup");
		Some(HoverRequest {
			symbol,
			position,
			generation,
		})
	}

	/// Runs `request` against `source` in the background.
	pub fn start(&mut self, request: HoverRequest, source: Arc<dyn DataSource>, resource: ResourceId) {
		let token = self.clock.token();
		if token.generation() != request.generation {
			return;
		}
		let tx = self.tx.clone();
		self.pending += 1;
		marginalia_worker::spawn(TaskClass::Hover, async move {
			let result = tokio::select! {
				_ = token.cancelled() => None,
				result = source.symbol_summary(&resource, &request.symbol) => Some(result),
			};
			let _ = tx.send(HoverCompletion {
				symbol: request.symbol,
				position: request.position,
				generation: request.generation,
				result,
			});
		});
	}

	/// Applies finished lookups.
	pub fn drain<H: EditorHost + ?Sized>(&mut self, host: &H) {
		while let Ok(completion) = self.rx.try_recv() {
			self.pending = self.pending.saturating_sub(1);
			self.complete(completion, host);
		}
	}

	/// Awaits every running lookup.
	pub async fn settle<H: EditorHost + ?Sized>(&mut self, host: &H) {
		while self.pending > 0 {
			let Some(completion) = self.rx.recv().await else {
				break;
			};
			self.pending -= 1;
			self.complete(completion, host);
		}
	}

	pub(crate) fn complete<H: EditorHost + ?Sized>(&mut self, completion: HoverCompletion, host: &H) {
		let HoverCompletion {
			symbol,
			position,
			generation,
			result,
		} = completion;
		let current = self.clock.is_current(generation) && self.current.as_deref() == Some(symbol.as_str());
		let Some(result) = result.filter(|_| current) else {
			debug!(symbol = %symbol, generation, "hover.stale_discarded");
			return;
		};
		self.in_flight = None;
		let word = symbol.clone();
		let card = match result {
			Ok(summary) => HoverCard::Enriched(summary),
			Err(error) => {
				warn!(symbol = %symbol, %error, "hover.enrichment_failed");
				match host.builtin_hover(position) {
					Some(contents) => HoverCard::Builtin { symbol, contents },
					None => HoverCard::Bare { symbol },
				}
			}
		};
		self.last_completed = Some((word, card.clone()));
		self.card = Some(card);
	}

	/// Closes the card at once and invalidates any running lookup.
	pub fn blur(&mut self) {
		self.debounce.cancel();
		self.close();
	}

	/// Forgets everything, including the reusable last card.
	pub fn reset(&mut self) {
		self.blur();
		self.last_completed = None;
	}

	fn close(&mut self) {
		if self.in_flight.is_some() {
			self.clock.advance();
		}
		self.current = None;
		self.in_flight = None;
		self.card = None;
	}
}
