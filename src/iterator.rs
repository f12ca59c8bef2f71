//! The async iterator protocol.
//!
//! Every iterator in this crate (the bare [`Terminable`], subjects, and the
//! views they hand out) speaks the same five operations:
//!
//! | Operation | Resolves with |
//! |-----------|---------------|
//! | `advance(resume)` | `Ok(Step::Yield(v))` while open, `Ok(Step::Done(None))` once closed |
//! | `close(value)` | `Ok(Step::Done(value))` |
//! | `fail(err)` | `Err(err)` |
//! | `iterate()` | an equivalent view, synchronously |
//! | `dispose()` | `()` once released |
//!
//! [`Terminable`]: crate::terminable::Terminable

use crate::{
  next::{Dispose, Next},
  ops::into_stream::IterStream,
};

pub trait AsyncIterator: Sized {
  type Scope: crate::scope::Scope;
  type Item;
  type Return;
  type Err;
  type Resume;
  type Iter: AsyncIterator<
    Scope = Self::Scope,
    Item = Self::Item,
    Return = Self::Return,
    Err = Self::Err,
    Resume = Self::Resume,
  >;

  /// Request the next element.
  fn advance(&self, resume: Option<Self::Resume>) -> NextOf<Self>;

  /// Finish the sequence with an optional final value. Safe to call again.
  fn close(&self, value: Option<Self::Return>) -> NextOf<Self>;

  /// Finish the sequence with an error.
  fn fail(&self, err: Self::Err) -> NextOf<Self>;

  /// Obtain a view to drive, as a `for await` loop would.
  fn iterate(&self) -> Self::Iter;

  /// Release the iterator.
  fn dispose(&self) -> Dispose<Self::Scope, Self::Item, Self::Return, Self::Err>;

  fn is_closed(&self) -> bool;

  /// Consume a fresh view of this iterator as a `futures::Stream`.
  fn into_stream(self) -> IterStream<Self::Iter> { IterStream::new(self.iterate()) }
}

/// The future type `advance`, `close` and `fail` return for iterator `I`.
pub type NextOf<I> = Next<
  <I as AsyncIterator>::Scope,
  <I as AsyncIterator>::Item,
  <I as AsyncIterator>::Return,
  <I as AsyncIterator>::Err,
>;
