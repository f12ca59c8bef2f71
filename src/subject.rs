//! Pushable iterators.
//!
//! - [`PushSubject`]: values pushed by a producer reach every pending
//!   advance request; with nobody waiting they are dropped.
//! - [`ReplaySubject`]: a `PushSubject` whose views first replay the latest
//!   pushed value.

mod push_subject;
mod replay_subject;

pub use push_subject::*;
pub use replay_subject::*;
