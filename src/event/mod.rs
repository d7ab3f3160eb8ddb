//! This module contains eventbridge's core event system. The module is
//! organized into the following sub modules:
//! * `scheduler` which implements the execution contexts events can be
//!   handed over to.
//! * `sequence` which implements the pull based asynchronous sequence, a
//!   single consumer channel fed through a non blocking continuation.
//! * `subject` which implements the push based subjects. These subjects
//!   broadcast every value to the subscribers registered at that moment.
//! * `subscription` which implements the
//!   [Subscription](subscription::Subscription) type which is used to tie a
//!   subscriber to the current scope.
//!
pub mod scheduler;
pub mod sequence;
pub mod subject;
pub mod subscription;
