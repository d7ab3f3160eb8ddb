//! Eventbridge is:
//! * a small observer pattern based event system with a push based broadcast
//!   subject and a pull based asynchronous sequence.
//! * a set of models which turn discrete triggers (taps, timer ticks) into
//!   event values, and view-models which adapt those values into observable
//!   display state.
#[macro_use]
extern crate lazy_static;

pub mod error;
pub mod event;
pub mod model;
pub mod sync;
pub mod utils;
pub mod view_model;

pub use error::Error;
