use tracing::trace;

use crate::{
  error::Failure,
  iterator::AsyncIterator,
  next::{Dispose, Next},
  promise::Promise,
  scope::{Local, RcDeref, RcDerefMut, Scope, Shared},
  step::Step,
  terminable::Terminable,
};

/// PushSubject: a hot, pushable async iterator that multicasts.
///
/// A producer hands values over with [`push`](Self::push); every advance
/// request pending at that moment resolves with the value. There is no
/// buffer: pushing while nobody waits drops the value.
///
/// # Architecture
///
/// The subject owns one *slot*, a single [`Promise`] created lazily by the
/// first advance that finds none. Every advance issued before the next push
/// waits on that same slot, so a single push answers all of them, and the
/// push clears the slot so later requests wait for a later push.
///
/// Each advance races the slot against the base [`Terminable`]'s resolvers
/// (none by default, see [`with_base`](Self::with_base)). `close` and `fail`
/// settle the slot themselves, so nothing is left waiting.
///
/// The subject's closed flag lives next to the slot, under the same lock: a
/// slot is only ever opened while the subject is open, and closing takes
/// whatever slot is there in the same critical section.
///
/// Handles are cheap clones of the same subject. Dropping the last one while a
/// request is pending settles it with `Done(None)`, as `close(None)` would.
///
/// # Example
///
/// ```rust
/// use async_subject::prelude::*;
/// use futures::FutureExt;
///
/// let subject: LocalPushSubject<i32> = Local::subject();
///
/// // Nobody waits yet: this value is lost.
/// subject.push(13);
///
/// let a = subject.advance(None);
/// let b = subject.iterate().advance(None);
/// subject.push(28);
///
/// assert_eq!(a.now_or_never(), Some(Ok(Step::Yield(28))));
/// assert_eq!(b.now_or_never(), Some(Ok(Step::Yield(28))));
/// ```
pub struct PushSubject<S: Scope, T, R = (), E = Failure, N = ()> {
  base: Terminable<S, T, R, E, N>,
  slot: S::RcMut<Slot<S, T, R, E>>,
}

#[doc(hidden)]
pub struct Slot<S: Scope, T, R, E> {
  pending: Option<Promise<S, T, R, E>>,
  closed: bool,
}

impl<S: Scope, T, R, E> Slot<S, T, R, E> {
  /// Mark the subject closed and hand back the request left waiting, if any.
  fn shut(&mut self) -> Option<Promise<S, T, R, E>> {
    self.closed = true;
    self.pending.take()
  }
}

impl<S: Scope, T, R, E> Drop for Slot<S, T, R, E> {
  fn drop(&mut self) {
    if let Some(pending) = self.pending.take() {
      trace!("subject released with a pending request");
      pending.settle(Ok(Step::Done(None)));
    }
  }
}

pub type LocalPushSubject<T, R = (), E = Failure, N = ()> = PushSubject<Local, T, R, E, N>;
pub type SharedPushSubject<T, R = (), E = Failure, N = ()> = PushSubject<Shared, T, R, E, N>;

impl<S: Scope, T, R, E, N> Clone for PushSubject<S, T, R, E, N> {
  fn clone(&self) -> Self { Self { base: self.base.clone(), slot: self.slot.clone() } }
}

impl<S: Scope, T, R, E, N> Default for PushSubject<S, T, R, E, N> {
  fn default() -> Self { Self::new() }
}

impl<S: Scope, T, R, E, N> PushSubject<S, T, R, E, N> {
  pub fn new() -> Self { Self::with_base(Terminable::new()) }

  /// Build a subject whose advances also race `base`'s resolvers.
  pub fn with_base(base: Terminable<S, T, R, E, N>) -> Self {
    Self { base, slot: Slot { pending: None, closed: false }.into() }
  }

  /// Hand `value` to every pending advance request.
  ///
  /// Without a pending request the value is dropped; this is not an error.
  /// Once closed, every push is dropped.
  pub fn push(&self, value: T) {
    let pending = self.slot.rc_deref_mut().pending.take();
    match pending {
      Some(slot) => {
        slot.settle(Ok(Step::Yield(value)));
      }
      None => trace!("push dropped: no pending request"),
    }
  }

  /// Wait for the next push, or for the subject to be closed.
  pub fn advance(&self, resume: Option<N>) -> Next<S, T, R, E>
  where
    N: Clone,
  {
    let slot = {
      let mut state = self.slot.rc_deref_mut();
      if state.closed || self.base.is_closed() {
        return Next::done(None);
      }
      state
        .pending
        .get_or_insert_with(|| {
          trace!("slot opened");
          Promise::new()
        })
        .clone()
    };
    Next::from(slot).race(self.base.advance(resume))
  }

  /// Close the subject; pending requests resolve with `Done(value)`.
  pub fn close(&self, value: Option<R>) -> Next<S, T, R, E>
  where
    R: Clone,
  {
    let pending = self.slot.rc_deref_mut().shut();
    if let Some(slot) = pending {
      slot.settle(Ok(Step::Done(value.clone())));
    }
    self.base.close(value)
  }

  /// Fail the subject; pending requests resolve with `Err(err)`.
  pub fn fail(&self, err: E) -> Next<S, T, R, E>
  where
    E: Clone,
  {
    let pending = self.slot.rc_deref_mut().shut();
    if let Some(slot) = pending {
      slot.settle(Err(err.clone()));
    }
    self.base.fail(err)
  }

  /// Release the subject: `close(None)`.
  pub fn dispose(&self) -> Dispose<S, T, R, E>
  where
    R: Clone,
  {
    Dispose::closing(self.close(None))
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.slot.rc_deref().closed || self.base.is_closed() }

  /// Whether some advance request is waiting for a push.
  pub fn has_pending(&self) -> bool { self.slot.rc_deref().pending.is_some() }
}

// Views box a closure over the subject, which is `Send + Sync` only for the
// shared scope, so `iterate` is generated per scope.
macro_rules! impl_iterate_for_push_subject {
  ($scope:ident $(, $send:ident)?) => {
    impl<T, R, E, N> PushSubject<$scope, T, R, E, N>
    where
      T: 'static $(+ $send)?,
      R: Clone + 'static $(+ $send)?,
      E: Clone + 'static $(+ $send)?,
      N: Clone + 'static,
    {
      /// A view that forwards to this subject.
      ///
      /// The view closes independently of the subject; iterating the view
      /// again builds another view of this subject.
      pub fn iterate(&self) -> Terminable<$scope, T, R, E, N> {
        let subject = self.clone();
        let again = self.clone();
        Terminable::<$scope, T, R, E, N>::builder()
          .resolver($scope::resolver(move |resume| subject.advance(resume)))
          .reiterate($scope::reiterate(move || again.iterate()))
          .build()
      }
    }

    impl<T, R, E, N> AsyncIterator for PushSubject<$scope, T, R, E, N>
    where
      T: 'static $(+ $send)?,
      R: Clone + 'static $(+ $send)?,
      E: Clone + 'static $(+ $send)?,
      N: Clone + 'static,
    {
      type Scope = $scope;
      type Item = T;
      type Return = R;
      type Err = E;
      type Resume = N;
      type Iter = Terminable<$scope, T, R, E, N>;

      fn advance(&self, resume: Option<N>) -> Next<$scope, T, R, E> {
        PushSubject::advance(self, resume)
      }

      fn close(&self, value: Option<R>) -> Next<$scope, T, R, E> { PushSubject::close(self, value) }

      fn fail(&self, err: E) -> Next<$scope, T, R, E> { PushSubject::fail(self, err) }

      fn iterate(&self) -> Self::Iter { PushSubject::<$scope, T, R, E, N>::iterate(self) }

      fn dispose(&self) -> Dispose<$scope, T, R, E> { PushSubject::dispose(self) }

      fn is_closed(&self) -> bool { PushSubject::is_closed(self) }
    }
  };
}

impl_iterate_for_push_subject!(Local);
impl_iterate_for_push_subject!(Shared, Send);

#[cfg(test)]
mod tests {
  use futures::FutureExt;

  use super::*;
  use crate::test_utils::init_test_logging;

  type Subject = LocalPushSubject<i32, &'static str, &'static str>;

  #[async_subject_macro::test]
  fn push_reaches_a_pending_request() {
    let subject = Subject::new();
    let next = subject.advance(None);
    assert!(subject.has_pending());
    subject.push(28);
    assert!(!subject.has_pending());
    assert_eq!(next.now_or_never(), Some(Ok(Step::Yield(28))));
  }

  #[async_subject_macro::test]
  fn push_without_waiters_is_lost() {
    init_test_logging();
    let subject = Subject::new();
    subject.push(13);
    let mut next = subject.advance(None);
    assert_eq!((&mut next).now_or_never(), None);
    subject.push(28);
    assert_eq!(next.now_or_never(), Some(Ok(Step::Yield(28))));
  }

  #[async_subject_macro::test]
  fn one_push_broadcasts_to_every_waiter() {
    let subject = Subject::new();
    let view_a = subject.iterate();
    let view_b = view_a.iterate();
    let pending =
      vec![subject.advance(None), subject.advance(None), view_a.advance(None), view_b.advance(None)];
    subject.push(7);
    for next in pending {
      assert_eq!(next.now_or_never(), Some(Ok(Step::Yield(7))));
    }
  }

  #[async_subject_macro::test]
  fn request_after_push_waits_for_the_next_one() {
    let subject = Subject::new();
    let first = subject.advance(None);
    subject.push(1);
    let mut second = subject.advance(None);
    assert_eq!(first.now_or_never(), Some(Ok(Step::Yield(1))));
    assert_eq!((&mut second).now_or_never(), None);
    subject.push(2);
    assert_eq!(second.now_or_never(), Some(Ok(Step::Yield(2))));
  }

  #[async_subject_macro::test]
  fn close_settles_pending_requests() {
    let subject = Subject::new();
    let view = subject.iterate();
    let a = subject.advance(None);
    let b = view.advance(None);
    assert_eq!(subject.close(Some("rv")).now_or_never(), Some(Ok(Step::Done(Some("rv")))));
    assert_eq!(a.now_or_never(), Some(Ok(Step::Done(Some("rv")))));
    assert_eq!(b.now_or_never(), Some(Ok(Step::Done(Some("rv")))));

    subject.push(5);
    assert_eq!(subject.advance(None).now_or_never(), Some(Ok(Step::Done(None))));
    assert_eq!(view.advance(None).now_or_never(), Some(Ok(Step::Done(None))));
    assert!(!subject.has_pending());
  }

  #[async_subject_macro::test]
  fn fail_rejects_pending_requests_once() {
    let subject = Subject::new();
    let view = subject.iterate();
    let a = subject.advance(None);
    let b = view.advance(None);
    assert_eq!(subject.fail("error1").now_or_never(), Some(Err("error1")));
    assert_eq!(a.now_or_never(), Some(Err("error1")));
    assert_eq!(b.now_or_never(), Some(Err("error1")));

    assert_eq!(subject.advance(None).now_or_never(), Some(Ok(Step::Done(None))));
    assert_eq!(view.advance(None).now_or_never(), Some(Ok(Step::Done(None))));
  }

  #[async_subject_macro::test]
  fn repeated_close_keeps_the_first_value_for_earlier_waiters() {
    let subject = Subject::new();
    let view = subject.iterate();
    let a = subject.advance(None);
    let b = view.advance(None);
    assert_eq!(subject.close(Some("a")).now_or_never(), Some(Ok(Step::Done(Some("a")))));
    assert_eq!(subject.close(Some("b")).now_or_never(), Some(Ok(Step::Done(Some("b")))));
    assert_eq!(a.now_or_never(), Some(Ok(Step::Done(Some("a")))));
    assert_eq!(b.now_or_never(), Some(Ok(Step::Done(Some("a")))));
    assert_eq!(subject.advance(None).now_or_never(), Some(Ok(Step::Done(None))));
  }

  #[async_subject_macro::test]
  fn push_after_close_reaches_nobody() {
    let subject = SharedPushSubject::<i32, &'static str, &'static str>::new();
    let _ = subject.close(None);
    let next = subject.advance(None);
    assert!(!subject.has_pending());
    subject.push(99);
    assert_eq!(next.now_or_never(), Some(Ok(Step::Done(None))));
  }

  #[cfg(not(target_arch = "wasm32"))]
  #[async_subject_macro::test]
  fn shared_close_answers_concurrent_advances() {
    use std::sync::{Arc, Barrier};

    for _ in 0..200 {
      let subject = SharedPushSubject::<i32, &'static str, &'static str>::new();
      let barrier = Arc::new(Barrier::new(3));
      let advancers: Vec<_> = (0..2)
        .map(|_| {
          let subject = subject.clone();
          let barrier = barrier.clone();
          std::thread::spawn(move || {
            barrier.wait();
            (0..50).map(|_| subject.advance(None)).collect::<Vec<_>>()
          })
        })
        .collect();

      barrier.wait();
      let _ = subject.close(Some("rv"));
      let requests: Vec<_> = advancers.into_iter().flat_map(|h| h.join().unwrap()).collect();

      subject.push(99);
      assert!(subject.is_closed());
      assert!(!subject.has_pending());
      for next in requests {
        match next.now_or_never() {
          Some(Ok(Step::Done(_))) => {}
          other => panic!("advance not answered by close: {other:?}"),
        }
      }
    }
  }

  #[async_subject_macro::test]
  fn closing_a_view_leaves_the_subject_open() {
    let subject = Subject::new();
    let view = subject.iterate();
    let other = subject.iterate();
    assert_eq!(view.close(Some("rv")).now_or_never(), Some(Ok(Step::Done(Some("rv")))));
    assert!(view.is_closed());
    assert!(!subject.is_closed());

    let next = other.advance(None);
    subject.push(3);
    assert_eq!(next.now_or_never(), Some(Ok(Step::Yield(3))));
    assert_eq!(view.advance(None).now_or_never(), Some(Ok(Step::Done(None))));
  }

  #[async_subject_macro::test]
  fn failing_a_view_does_not_reject_subject_waiters() {
    let subject = Subject::new();
    let view = subject.iterate();
    let mut waiting = subject.advance(None);
    assert_eq!(view.fail("error1").now_or_never(), Some(Err("error1")));
    assert_eq!((&mut waiting).now_or_never(), None);
    let _ = subject.fail("error1");
    assert_eq!(waiting.now_or_never(), Some(Err("error1")));
  }

  #[async_subject_macro::test]
  fn dispose_closes() {
    let subject = Subject::new();
    let next = subject.advance(None);
    assert_eq!(subject.dispose().now_or_never(), Some(()));
    assert!(subject.is_closed());
    assert_eq!(next.now_or_never(), Some(Ok(Step::Done(None))));

    let after = subject.advance(None);
    subject.push(13);
    assert_eq!(after.now_or_never(), Some(Ok(Step::Done(None))));
  }

  #[async_subject_macro::test]
  fn dropping_the_last_handle_releases_waiters() {
    let subject = Subject::new();
    let next = subject.advance(None);
    drop(subject);
    assert_eq!(next.now_or_never(), Some(Ok(Step::Done(None))));
  }

  #[async_subject_macro::test]
  fn base_resolvers_race_the_slot() {
    let base = Terminable::<Local, i32, &str, &str, ()>::builder()
      .resolver(Local::resolver(|_| Next::ready(Ok(Step::Yield(-1)))))
      .build();
    let subject = PushSubject::with_base(base);
    assert_eq!(subject.advance(None).now_or_never(), Some(Ok(Step::Yield(-1))));
  }

  #[async_subject_macro::test(local)]
  async fn awaits_across_tasks() {
    let subject = Subject::new();
    let local = tokio::task::LocalSet::new();
    let got = local
      .run_until(async move {
        let view = subject.iterate();
        let consumer = tokio::task::spawn_local(async move {
          let mut got = vec![];
          while let Ok(Step::Yield(v)) = view.advance(None).await {
            got.push(v);
          }
          got
        });
        for v in 0..3 {
          while !subject.has_pending() {
            tokio::task::yield_now().await;
          }
          subject.push(v);
        }
        while !subject.has_pending() {
          tokio::task::yield_now().await;
        }
        let _ = subject.close(None);
        consumer.await.unwrap()
      })
      .await;
    assert_eq!(got, vec![0, 1, 2]);
  }

  #[async_subject_macro::test(shared)]
  async fn shared_subject_across_threads() {
    let subject = SharedPushSubject::<i32>::new();
    let view = subject.iterate();
    let consumer = tokio::spawn(async move {
      let mut got = vec![];
      while let Ok(Step::Yield(v)) = view.advance(None).await {
        got.push(v);
      }
      got
    });

    for v in 0..3 {
      while !subject.has_pending() {
        tokio::task::yield_now().await;
      }
      subject.push(v);
    }
    while !subject.has_pending() {
      tokio::task::yield_now().await;
    }
    let _ = subject.close(None);
    assert_eq!(consumer.await.unwrap(), vec![0, 1, 2]);
  }
}
