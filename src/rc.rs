//! Shared mutable pointers behind the `Local` and `Shared` scopes.
//!
//! Every piece of state a subject shares with its views lives behind one of
//! these: [`MutRc`] (`Rc<RefCell<T>>`) for single-threaded use and [`MutArc`]
//! (`Arc<Mutex<T>>`) when the state crosses threads. Code that is generic over
//! the scope only talks to them through [`RcDeref`] / [`RcDerefMut`].

use std::{
  cell::{Ref, RefCell, RefMut},
  ops::{Deref, DerefMut},
  rc::Rc,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

pub trait RcDeref {
  type Target;
  type Ref<'a>: Deref<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref(&self) -> Self::Ref<'_>;
}

pub trait RcDerefMut: RcDeref {
  type RefMut<'a>: DerefMut<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref_mut(&self) -> Self::RefMut<'_>;
}

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  /// Whether both pointers refer to the same allocation.
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  /// Whether both pointers refer to the same allocation.
  pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl<T> From<T> for MutRc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> From<T> for MutArc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> RcDeref for MutRc<T> {
  type Target = T;
  type Ref<'a>
    = Ref<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Ref<'_> { self.0.borrow() }
}

impl<T> RcDerefMut for MutRc<T> {
  type RefMut<'a>
    = RefMut<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::RefMut<'_> { self.0.borrow_mut() }
}

// State behind a `MutArc` is only ever touched in short, non-panicking
// critical sections, so a poisoned lock still holds consistent data.
impl<T> RcDeref for MutArc<T> {
  type Target = T;
  type Ref<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Ref<'_> { self.0.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl<T> RcDerefMut for MutArc<T> {
  type RefMut<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::RefMut<'_> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mut_rc_clones_share_state() {
    let a = MutRc::own(1);
    let b = a.clone();
    *b.rc_deref_mut() += 1;
    assert_eq!(*a.rc_deref(), 2);
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&MutRc::own(2)));
  }

  #[test]
  fn mut_arc_crosses_threads() {
    let a = MutArc::own(vec![1]);
    let b = a.clone();
    std::thread::spawn(move || b.rc_deref_mut().push(2)).join().unwrap();
    assert_eq!(*a.rc_deref(), vec![1, 2]);
  }
}
