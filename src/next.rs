//! Futures returned by iterator operations.
//!
//! [`Next`] is a race over a handful of [`Promise`]s: it resolves with the
//! outcome of the first candidate found settled. Races compose by
//! concatenation, so a resolver that forwards to another iterator simply hands
//! back that iterator's race and the caller merges it into its own.
//!
//! A `Next` with no candidates never resolves. A bare [`Terminable`] with no
//! resolvers relies on exactly that: only `close`/`fail` end it.
//!
//! [`Terminable`]: crate::terminable::Terminable

use std::{
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};

use smallvec::SmallVec;

use crate::{
  scope::Scope,
  promise::Promise,
  step::{Outcome, Step},
};

#[must_use = "futures do nothing unless polled"]
pub struct Next<S: Scope, T, R, E> {
  candidates: SmallVec<[Promise<S, T, R, E>; 2]>,
}

impl<S: Scope, T, R, E> Clone for Next<S, T, R, E> {
  fn clone(&self) -> Self { Self { candidates: self.candidates.clone() } }
}

impl<S: Scope, T, R, E> Next<S, T, R, E> {
  /// A race with no candidates; it stays pending forever.
  pub fn pending() -> Self { Self { candidates: SmallVec::new() } }

  /// A race that is already won by `outcome`.
  pub fn ready(outcome: Outcome<T, R, E>) -> Self {
    Promise::<S, T, R, E>::settled(outcome).into()
  }

  /// Shorthand for `ready(Ok(Step::Done(value)))`.
  pub fn done(value: Option<R>) -> Self { Self::ready(Ok(Step::Done(value))) }

  /// Merge `other`'s candidates into this race. Candidates of `self` are
  /// checked first.
  pub fn race(mut self, other: Self) -> Self {
    self.candidates.extend(other.candidates);
    self
  }

  /// Whether some candidate has already settled, i.e. the next poll resolves.
  pub fn is_settled(&self) -> bool { self.candidates.iter().any(Promise::is_settled) }

  /// Whether the race has no candidate at all and will never resolve.
  pub fn is_never(&self) -> bool { self.candidates.is_empty() }

  pub(crate) fn poll_race(&self, cx: &mut Context<'_>) -> Poll<Outcome<T, R, E>>
  where
    T: Clone,
    R: Clone,
    E: Clone,
  {
    for candidate in self.candidates.iter() {
      if let Poll::Ready(outcome) = candidate.poll_outcome(cx) {
        return Poll::Ready(outcome);
      }
    }
    Poll::Pending
  }
}

impl<S: Scope, T, R, E> From<Promise<S, T, R, E>> for Next<S, T, R, E> {
  fn from(promise: Promise<S, T, R, E>) -> Self {
    let mut candidates = SmallVec::new();
    candidates.push(promise);
    Self { candidates }
  }
}

impl<S: Scope, T, R, E> FromIterator<Next<S, T, R, E>> for Next<S, T, R, E> {
  fn from_iter<I: IntoIterator<Item = Next<S, T, R, E>>>(iter: I) -> Self {
    iter.into_iter().fold(Self::pending(), Self::race)
  }
}

impl<S: Scope, T: Clone, R: Clone, E: Clone> Future for Next<S, T, R, E> {
  type Output = Outcome<T, R, E>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> { self.poll_race(cx) }
}

/// Future returned by `dispose`; resolves once the iterator is released.
#[must_use = "futures do nothing unless polled"]
pub struct Dispose<S: Scope, T, R, E> {
  close: Option<Next<S, T, R, E>>,
}

impl<S: Scope, T, R, E> Dispose<S, T, R, E> {
  /// Nothing to release.
  pub fn noop() -> Self { Self { close: None } }

  /// Release by waiting for `close`.
  pub fn closing(close: Next<S, T, R, E>) -> Self { Self { close: Some(close) } }
}

impl<S: Scope, T: Clone, R: Clone, E: Clone> Future for Dispose<S, T, R, E> {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    match &self.close {
      None => Poll::Ready(()),
      Some(close) => close.poll_race(cx).map(|_| ()),
    }
  }
}
