//! The protocol's base layer: an iterator that never produces anything itself.
//!
//! A [`Terminable`] answers `advance` by racing its registered resolvers and
//! answers `close` / `fail` by latching shut. With no resolvers it is the
//! empty iterator: `advance` stays pending until someone closes it. Subjects
//! build their views out of it by registering a single resolver that forwards
//! to the subject.
//!
//! ```rust
//! use async_subject::prelude::*;
//! use futures::FutureExt;
//!
//! let it = Local::terminable::<i32, &str, Failure, ()>();
//! let mut pending = it.advance(None);
//! assert!((&mut pending).now_or_never().is_none());
//!
//! let closed = it.close(Some("bye")).now_or_never();
//! assert_eq!(closed, Some(Ok(Step::Done(Some("bye")))));
//! assert_eq!(it.advance(None).now_or_never(), Some(Ok(Step::Done(None))));
//! ```

use tracing::debug;

use crate::{
  error::Failure,
  iterator::AsyncIterator,
  next::{Dispose, Next},
  scope::{RcDeref, RcDerefMut, Reiterate, Resolve, Scope},
};

struct Hooks<S: Scope, T, R, E, N> {
  resolvers: Vec<S::Resolver<T, R, E, N>>,
  reiterate: Option<S::Reiterate<T, R, E, N>>,
}

pub struct Terminable<S: Scope, T, R = (), E = Failure, N = ()> {
  closed: S::RcMut<bool>,
  hooks: S::Rc<Hooks<S, T, R, E, N>>,
}

impl<S: Scope, T, R, E, N> Clone for Terminable<S, T, R, E, N> {
  fn clone(&self) -> Self { Self { closed: self.closed.clone(), hooks: self.hooks.clone() } }
}

impl<S: Scope, T, R, E, N> Default for Terminable<S, T, R, E, N> {
  fn default() -> Self { Self::new() }
}

impl<S: Scope, T, R, E, N> Terminable<S, T, R, E, N> {
  /// The empty iterator: no resolvers, `iterate` returns itself.
  pub fn new() -> Self { Self::builder().build() }

  pub fn builder() -> TerminableBuilder<S, T, R, E, N> {
    TerminableBuilder { resolvers: Vec::new(), reiterate: None }
  }

  #[inline]
  pub fn is_closed(&self) -> bool { *self.closed.rc_deref() }

  pub fn resolver_count(&self) -> usize { self.hooks.resolvers.len() }

  /// Race every resolver; the first to settle wins. Resolves `Done(None)`
  /// immediately once closed, and never resolves without resolvers.
  pub fn advance(&self, resume: Option<N>) -> Next<S, T, R, E>
  where
    N: Clone,
  {
    if self.is_closed() {
      return Next::done(None);
    }
    self.hooks.resolvers.iter().map(|resolver| resolver.resolve(resume.clone())).collect()
  }

  pub fn close(&self, value: Option<R>) -> Next<S, T, R, E> {
    self.shut("close");
    Next::done(value)
  }

  pub fn fail(&self, err: E) -> Next<S, T, R, E> {
    self.shut("fail");
    Next::ready(Err(err))
  }

  pub fn iterate(&self) -> Self {
    match &self.hooks.reiterate {
      Some(hook) => hook.reiterate(),
      None => self.clone(),
    }
  }

  /// Nothing is held at this layer; resolves immediately.
  pub fn dispose(&self) -> Dispose<S, T, R, E> { Dispose::noop() }

  fn shut(&self, by: &'static str) {
    let was_closed = std::mem::replace(&mut *self.closed.rc_deref_mut(), true);
    if !was_closed {
      debug!(by, "iterator closed");
    }
  }
}

/// Configures the resolvers and re-iterate hook of a [`Terminable`].
pub struct TerminableBuilder<S: Scope, T, R, E, N> {
  resolvers: Vec<S::Resolver<T, R, E, N>>,
  reiterate: Option<S::Reiterate<T, R, E, N>>,
}

impl<S: Scope, T, R, E, N> TerminableBuilder<S, T, R, E, N> {
  /// Register a resolver to be raced on every advance.
  pub fn resolver(mut self, resolver: S::Resolver<T, R, E, N>) -> Self {
    self.resolvers.push(resolver);
    self
  }

  /// Replace what `iterate` hands out (by default the iterator itself).
  pub fn reiterate(mut self, hook: S::Reiterate<T, R, E, N>) -> Self {
    self.reiterate = Some(hook);
    self
  }

  pub fn build(self) -> Terminable<S, T, R, E, N> {
    let hooks = Hooks { resolvers: self.resolvers, reiterate: self.reiterate };
    Terminable { closed: false.into(), hooks: hooks.into() }
  }
}

impl<S, T, R, E, N> AsyncIterator for Terminable<S, T, R, E, N>
where
  S: Scope,
  N: Clone,
{
  type Scope = S;
  type Item = T;
  type Return = R;
  type Err = E;
  type Resume = N;
  type Iter = Self;

  fn advance(&self, resume: Option<N>) -> Next<S, T, R, E> { Terminable::advance(self, resume) }

  fn close(&self, value: Option<R>) -> Next<S, T, R, E> { Terminable::close(self, value) }

  fn fail(&self, err: E) -> Next<S, T, R, E> { Terminable::fail(self, err) }

  fn iterate(&self) -> Self { Terminable::iterate(self) }

  fn dispose(&self) -> Dispose<S, T, R, E> { Terminable::dispose(self) }

  fn is_closed(&self) -> bool { Terminable::is_closed(self) }
}
