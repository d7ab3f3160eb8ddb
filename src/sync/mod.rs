//! Eventbridge synchronization mechanisms.
//!
//! The event system needs exactly three primitives: a repeating timer that can
//! be cancelled from any thread (including its own tick), a worker thread that
//! drives futures suspended on an event sequence, and a ring buffer which
//! holds values a consumer has not pulled yet.
pub mod buffer;
pub mod executor;
pub mod task;
pub mod timer;
pub mod worker;
