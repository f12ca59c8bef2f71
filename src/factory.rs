//! Subject factory
//!
//! [`SubjectFactory`] is implemented for every [`Scope`], so subjects and
//! bare iterators are created straight from the scope marker:
//!
//! ```rust
//! use async_subject::prelude::*;
//!
//! let local: LocalPushSubject<i32> = Local::subject();
//! let replay: SharedReplaySubject<String> = Shared::replay_subject();
//! let empty = Local::terminable::<i32, (), Failure, ()>();
//!
//! assert!(!local.is_closed() && !replay.is_closed() && !empty.is_closed());
//! ```

use crate::{
  scope::Scope,
  subject::{PushSubject, ReplaySubject},
  terminable::Terminable,
};

pub trait SubjectFactory: Scope {
  /// A [`PushSubject`] with nobody waiting yet.
  fn subject<T, R, E, N>() -> PushSubject<Self, T, R, E, N> { PushSubject::new() }

  /// A [`ReplaySubject`] with an empty cache.
  fn replay_subject<T, R, E, N>() -> ReplaySubject<Self, T, R, E, N> { ReplaySubject::new() }

  /// The empty iterator: pending until closed.
  fn terminable<T, R, E, N>() -> Terminable<Self, T, R, E, N> { Terminable::new() }
}

impl<S: Scope> SubjectFactory for S {}

#[cfg(test)]
mod tests {
  use futures::FutureExt;

  use super::*;
  use crate::{
    scope::{Local, Shared},
    step::Step,
    subject::{LocalReplaySubject, SharedPushSubject},
  };

  #[async_subject_macro::test]
  fn scopes_build_subjects() {
    let subject: SharedPushSubject<i32, &str, &str> = Shared::subject();
    let next = subject.advance(None);
    subject.push(1);
    assert_eq!(next.now_or_never(), Some(Ok(Step::Yield(1))));

    let replay: LocalReplaySubject<i32, &str, &str> = Local::replay_subject();
    assert_eq!(replay.latest(), None);
  }
}
