//! Scope trait and the `Local` / `Shared` scopes.
//!
//! A scope decides how iterator state is shared between a subject and its
//! views, and how user hooks are boxed:
//!
//! | Scope | State | Hooks |
//! |-------|-------|-------|
//! | [`Local`] | `Rc<RefCell<_>>` | `Box<dyn Fn ..>` |
//! | [`Shared`] | `Arc<Mutex<_>>` | `Box<dyn Fn .. + Send + Sync>` |
//!
//! `Local` matches a single-threaded executor where nothing interleaves inside
//! an operation. `Shared` adds the mutual exclusion needed once subjects and
//! views are driven from several threads.

use std::{ops::Deref, rc::Rc, sync::Arc};

pub use crate::rc::*;
use crate::{next::Next, terminable::Terminable};

/// Type-level environment for iterators and subjects.
pub trait Scope: Sized + 'static {
  type RcMut<T>: From<T> + Clone + RcDerefMut<Target = T>;
  type Rc<T>: From<T> + Clone + Deref<Target = T>;
  type Resolver<T, R, E, N>: Resolve<Self, T, R, E, N>;
  type Reiterate<T, R, E, N>: Reiterate<Self, T, R, E, N>;
}

/// Single-threaded scope.
#[derive(Clone, Copy, Debug, Default)]
pub struct Local;

/// Thread-safe scope.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shared;

pub type LocalResolver<T, R, E, N> = Box<dyn Fn(Option<N>) -> Next<Local, T, R, E>>;
pub type SharedResolver<T, R, E, N> =
  Box<dyn Fn(Option<N>) -> Next<Shared, T, R, E> + Send + Sync>;

pub type LocalReiterate<T, R, E, N> = Box<dyn Fn() -> Terminable<Local, T, R, E, N>>;
pub type SharedReiterate<T, R, E, N> =
  Box<dyn Fn() -> Terminable<Shared, T, R, E, N> + Send + Sync>;

impl Scope for Local {
  type RcMut<T> = MutRc<T>;
  type Rc<T> = Rc<T>;
  type Resolver<T, R, E, N> = LocalResolver<T, R, E, N>;
  type Reiterate<T, R, E, N> = LocalReiterate<T, R, E, N>;
}

impl Scope for Shared {
  type RcMut<T> = MutArc<T>;
  type Rc<T> = Arc<T>;
  type Resolver<T, R, E, N> = SharedResolver<T, R, E, N>;
  type Reiterate<T, R, E, N> = SharedReiterate<T, R, E, N>;
}

/// A candidate answer to an advance request.
///
/// Every resolver registered on a [`Terminable`] is called with the same
/// resume argument; the first of the returned races to settle wins.
pub trait Resolve<S: Scope, T, R, E, N> {
  fn resolve(&self, resume: Option<N>) -> Next<S, T, R, E>;
}

impl<S, T, R, E, N, F> Resolve<S, T, R, E, N> for F
where
  S: Scope,
  F: Fn(Option<N>) -> Next<S, T, R, E> + ?Sized,
{
  #[inline]
  fn resolve(&self, resume: Option<N>) -> Next<S, T, R, E> { self(resume) }
}

/// Produces the view handed out by [`Terminable::iterate`].
pub trait Reiterate<S: Scope, T, R, E, N> {
  fn reiterate(&self) -> Terminable<S, T, R, E, N>;
}

impl<S, T, R, E, N, F> Reiterate<S, T, R, E, N> for F
where
  S: Scope,
  F: Fn() -> Terminable<S, T, R, E, N> + ?Sized,
{
  #[inline]
  fn reiterate(&self) -> Terminable<S, T, R, E, N> { self() }
}

impl Local {
  /// Box a closure as a local resolver.
  pub fn resolver<T, R, E, N, F>(f: F) -> LocalResolver<T, R, E, N>
  where
    F: Fn(Option<N>) -> Next<Local, T, R, E> + 'static,
  {
    Box::new(f)
  }

  /// Box a closure as a local re-iterate hook.
  pub fn reiterate<T, R, E, N, F>(f: F) -> LocalReiterate<T, R, E, N>
  where
    F: Fn() -> Terminable<Local, T, R, E, N> + 'static,
  {
    Box::new(f)
  }
}

impl Shared {
  /// Box a closure as a thread-safe resolver.
  pub fn resolver<T, R, E, N, F>(f: F) -> SharedResolver<T, R, E, N>
  where
    F: Fn(Option<N>) -> Next<Shared, T, R, E> + Send + Sync + 'static,
  {
    Box::new(f)
  }

  /// Box a closure as a thread-safe re-iterate hook.
  pub fn reiterate<T, R, E, N, F>(f: F) -> SharedReiterate<T, R, E, N>
  where
    F: Fn() -> Terminable<Shared, T, R, E, N> + Send + Sync + 'static,
  {
    Box::new(f)
  }
}
