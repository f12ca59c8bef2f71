//! Single-settle cells.
//!
//! A [`Promise`] starts pending and settles at most once; every clone observes
//! the same outcome. Any number of tasks may wait on it at the same time,
//! which is what lets one `push` answer every pending advance request.

use std::task::{Context, Poll, Waker};

use smallvec::SmallVec;

use crate::{
  scope::{RcDeref, RcDerefMut, Scope},
  step::Outcome,
};

#[doc(hidden)]
pub struct PromiseState<T, R, E> {
  outcome: Option<Outcome<T, R, E>>,
  wakers: SmallVec<[Waker; 2]>,
}

impl<T, R, E> Default for PromiseState<T, R, E> {
  fn default() -> Self { Self { outcome: None, wakers: SmallVec::new() } }
}

pub struct Promise<S: Scope, T, R, E> {
  state: S::RcMut<PromiseState<T, R, E>>,
}

impl<S: Scope, T, R, E> Clone for Promise<S, T, R, E> {
  #[inline]
  fn clone(&self) -> Self { Self { state: self.state.clone() } }
}

impl<S: Scope, T, R, E> Default for Promise<S, T, R, E> {
  fn default() -> Self { Self::new() }
}

impl<S: Scope, T, R, E> Promise<S, T, R, E> {
  pub fn new() -> Self { Self { state: PromiseState::<T, R, E>::default().into() } }

  /// A promise that is already settled with `outcome`.
  pub fn settled(outcome: Outcome<T, R, E>) -> Self {
    Self { state: PromiseState { outcome: Some(outcome), wakers: SmallVec::new() }.into() }
  }

  /// Settle the promise and wake every waiter.
  ///
  /// Returns `false`, leaving the first outcome in place, if the promise was
  /// already settled.
  pub fn settle(&self, outcome: Outcome<T, R, E>) -> bool {
    let wakers = {
      let mut state = self.state.rc_deref_mut();
      if state.outcome.is_some() {
        return false;
      }
      state.outcome = Some(outcome);
      std::mem::take(&mut state.wakers)
    };
    wakers.into_iter().for_each(Waker::wake);
    true
  }

  pub fn is_settled(&self) -> bool { self.state.rc_deref().outcome.is_some() }

  /// Read the outcome, or register `cx`'s waker for when it arrives.
  pub fn poll_outcome(&self, cx: &mut Context<'_>) -> Poll<Outcome<T, R, E>>
  where
    T: Clone,
    R: Clone,
    E: Clone,
  {
    let mut state = self.state.rc_deref_mut();
    if let Some(outcome) = &state.outcome {
      return Poll::Ready(outcome.clone());
    }
    if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
      state.wakers.push(cx.waker().clone());
    }
    Poll::Pending
  }
}
