//! Scheduling primitives shared by the fetch coordinator and the hover controller.
//!
//! * [`Debounced`] is a cancel-and-reschedule timer driven by caller-supplied
//!   instants, so every controller debounces the same way and tests can step
//!   time explicitly.
//! * [`GenerationClock`] hands out [`GenerationToken`]s. Async completions
//!   carry their token back and are applied only while it is still current.
//! * [`Subscription`] and [`DisposalList`] release host event listeners
//!   deterministically on teardown.

mod class;
mod debounce;
mod disposal;
mod spawn;
mod token;

pub use class::TaskClass;
pub use debounce::Debounced;
pub use disposal::{DisposalList, Subscription};
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken};
