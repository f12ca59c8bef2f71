use tracing::trace;

use crate::{
  error::Failure,
  iterator::AsyncIterator,
  next::{Dispose, Next},
  scope::{Local, RcDeref, RcDerefMut, Scope, Shared},
  step::Step,
  subject::PushSubject,
  terminable::Terminable,
};

/// A [`PushSubject`] that remembers the last pushed value and hands it to
/// every new view on its first advance.
///
/// The subject handle itself behaves exactly like a `PushSubject`; only the
/// views returned by [`iterate`](Self::iterate) replay.
///
/// ```rust
/// use async_subject::prelude::*;
/// use futures::FutureExt;
///
/// let subject: LocalReplaySubject<i32> = Local::replay_subject();
/// subject.push(16);
///
/// let view = subject.iterate();
/// assert_eq!(view.advance(None).now_or_never(), Some(Ok(Step::Yield(16))));
/// // Replayed once; the next advance waits for a push.
/// assert_eq!(view.advance(None).now_or_never(), None);
/// ```
pub struct ReplaySubject<S: Scope, T, R = (), E = Failure, N = ()> {
  subject: PushSubject<S, T, R, E, N>,
  latest: S::RcMut<Option<T>>,
}

pub type LocalReplaySubject<T, R = (), E = Failure, N = ()> = ReplaySubject<Local, T, R, E, N>;
pub type SharedReplaySubject<T, R = (), E = Failure, N = ()> = ReplaySubject<Shared, T, R, E, N>;

impl<S: Scope, T, R, E, N> Clone for ReplaySubject<S, T, R, E, N> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone(), latest: self.latest.clone() } }
}

impl<S: Scope, T, R, E, N> Default for ReplaySubject<S, T, R, E, N> {
  fn default() -> Self { Self::new() }
}

impl<S: Scope, T, R, E, N> ReplaySubject<S, T, R, E, N> {
  pub fn new() -> Self { Self::with_subject(PushSubject::new()) }

  /// Add a replay cache in front of `subject`.
  pub fn with_subject(subject: PushSubject<S, T, R, E, N>) -> Self {
    Self { subject, latest: None.into() }
  }

  /// Record `value` as the latest, then push it to the pending requests.
  pub fn push(&self, value: T)
  where
    T: Clone,
  {
    *self.latest.rc_deref_mut() = Some(value.clone());
    self.subject.push(value);
  }

  /// The value new views replay, if anything was ever pushed.
  pub fn latest(&self) -> Option<T>
  where
    T: Clone,
  {
    self.latest.rc_deref().clone()
  }

  pub fn advance(&self, resume: Option<N>) -> Next<S, T, R, E>
  where
    N: Clone,
  {
    self.subject.advance(resume)
  }

  pub fn close(&self, value: Option<R>) -> Next<S, T, R, E>
  where
    R: Clone,
  {
    self.subject.close(value)
  }

  pub fn fail(&self, err: E) -> Next<S, T, R, E>
  where
    E: Clone,
  {
    self.subject.fail(err)
  }

  pub fn dispose(&self) -> Dispose<S, T, R, E>
  where
    R: Clone,
  {
    self.subject.dispose()
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.subject.is_closed() }

  pub fn has_pending(&self) -> bool { self.subject.has_pending() }

  fn replay(&self, advanced: &S::RcMut<bool>, resume: Option<N>) -> Next<S, T, R, E>
  where
    T: Clone,
    N: Clone,
  {
    let first = !std::mem::replace(&mut *advanced.rc_deref_mut(), true);
    if first {
      if let Some(value) = self.latest() {
        trace!("replaying latest value");
        return Next::ready(Ok(Step::Yield(value)));
      }
    }
    self.subject.advance(resume)
  }
}

macro_rules! impl_iterate_for_replay_subject {
  ($scope:ident $(, $send:ident)?) => {
    impl<T, R, E, N> ReplaySubject<$scope, T, R, E, N>
    where
      T: Clone + 'static $(+ $send)?,
      R: Clone + 'static $(+ $send)?,
      E: Clone + 'static $(+ $send)?,
      N: Clone + 'static,
    {
      /// A view whose first advance replays the latest value.
      pub fn iterate(&self) -> Terminable<$scope, T, R, E, N> {
        let subject = self.clone();
        let again = self.clone();
        let advanced: <$scope as Scope>::RcMut<bool> = false.into();
        Terminable::<$scope, T, R, E, N>::builder()
          .resolver($scope::resolver(move |resume| subject.replay(&advanced, resume)))
          .reiterate($scope::reiterate(move || again.iterate()))
          .build()
      }
    }

    impl<T, R, E, N> AsyncIterator for ReplaySubject<$scope, T, R, E, N>
    where
      T: Clone + 'static $(+ $send)?,
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
        ReplaySubject::advance(self, resume)
      }

      fn close(&self, value: Option<R>) -> Next<$scope, T, R, E> {
        ReplaySubject::close(self, value)
      }

      fn fail(&self, err: E) -> Next<$scope, T, R, E> { ReplaySubject::fail(self, err) }

      fn iterate(&self) -> Self::Iter { ReplaySubject::<$scope, T, R, E, N>::iterate(self) }

      fn dispose(&self) -> Dispose<$scope, T, R, E> { ReplaySubject::dispose(self) }

      fn is_closed(&self) -> bool { ReplaySubject::is_closed(self) }
    }
  };
}

impl_iterate_for_replay_subject!(Local);
impl_iterate_for_replay_subject!(Shared, Send);
