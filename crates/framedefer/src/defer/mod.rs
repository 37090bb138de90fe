//! Frame-deferral counters.
//!
//! Intended usage:
//! - create one [`DeferCounter`] per staged view, sized to the number of frames
//!   the reveal should span
//! - each frame, show element `i` only if `counter.has_reached(i)`
//! - dispose (or drop) the counter when the view goes away
//!
//! [`use_defer`] and [`DeferScope`] are thin adapters for callers that want a
//! bare threshold closure or owner-bound cleanup.

mod counter;
mod scope;

pub use counter::{DEFAULT_MAX_COUNT, DeferCounter};
pub use scope::{DeferScope, use_defer};
