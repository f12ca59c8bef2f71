//! # async-subject: pushable multicast async iterators
//!
//! A subject is an async iterator whose values come from a producer calling
//! `push`. Every consumer waiting on `advance` at that moment receives the
//! value; nothing is buffered for consumers that arrive later.
//!
//! ```rust
//! use async_subject::prelude::*;
//! use futures::FutureExt;
//!
//! let subject: LocalPushSubject<&str> = Local::subject();
//! let a = subject.iterate();
//! let b = subject.iterate();
//!
//! let (next_a, next_b) = (a.advance(None), b.advance(None));
//! subject.push("hello");
//! assert_eq!(next_a.now_or_never(), Some(Ok(Step::Yield("hello"))));
//! assert_eq!(next_b.now_or_never(), Some(Ok(Step::Yield("hello"))));
//!
//! let _ = subject.close(None);
//! assert_eq!(a.advance(None).now_or_never(), Some(Ok(Step::Done(None))));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Local`] / [`Shared`] | Scopes (single-thread vs thread-safe) |
//! | [`AsyncIterator`] | `advance` / `close` / `fail` / `iterate` / `dispose` |
//! | [`Terminable`] | The base iterator; races its resolvers |
//! | [`PushSubject`] | Broadcasts each push to the pending requests |
//! | [`ReplaySubject`] | Also replays the latest value to new views |
//! | [`IterStream`] | Consume any of them as a `futures::Stream` |
//!
//! [`Local`]: prelude::Local
//! [`Shared`]: prelude::Shared
//! [`AsyncIterator`]: iterator::AsyncIterator
//! [`Terminable`]: terminable::Terminable
//! [`PushSubject`]: subject::PushSubject
//! [`ReplaySubject`]: subject::ReplaySubject
//! [`IterStream`]: ops::into_stream::IterStream

pub mod error;
pub mod factory;
pub mod iterator;
pub mod next;
pub mod ops;
pub mod prelude;
pub mod promise;
pub mod rc;
pub mod scope;
pub mod step;
pub mod subject;
pub mod terminable;

#[cfg(test)]
pub(crate) mod test_utils;

pub use prelude::*;

#[cfg(all(doctest, not(target_arch = "wasm32")))]
mod __markdown_doctests {
  #![doc = include_str!("../README.md")]
}
