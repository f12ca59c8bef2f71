//! IntoStream adapter
//!
//! Drives an async iterator as a `futures::Stream`, the way a `for await` loop
//! would: each poll advances the iterator once, `Done` ends the stream, and an
//! error is yielded once before the stream ends.
//!
//! Dropping the stream before it finished closes the iterator, matching an
//! early `break` out of the loop.
//!
//! ```rust
//! use async_subject::prelude::*;
//! use futures::{FutureExt, StreamExt};
//!
//! let subject: LocalPushSubject<i32, &str> = Local::subject();
//! let mut stream = subject.clone().into_stream();
//!
//! assert_eq!(stream.next().now_or_never(), None);
//! subject.push(1);
//! assert_eq!(stream.next().now_or_never(), Some(Some(Ok(1))));
//!
//! let _ = subject.close(Some("bye"));
//! assert_eq!(stream.next().now_or_never(), Some(None));
//! assert_eq!(stream.return_value(), Some(&"bye"));
//! ```

use std::{
  pin::Pin,
  task::{Context, Poll},
};

use futures::{ready, stream::FusedStream, Stream};
use pin_project_lite::pin_project;
use tracing::debug;

use crate::{
  iterator::{AsyncIterator, NextOf},
  step::Step,
};

pin_project! {
  /// A `Stream` over the elements of an async iterator.
  ///
  /// Created by [`AsyncIterator::into_stream`]. Yields `Ok(item)` for each
  /// element and `Err(err)` when the iterator fails.
  pub struct IterStream<I: AsyncIterator> {
    iter: I,
    in_flight: Option<NextOf<I>>,
    finished: Option<Option<I::Return>>,
  }

  impl<I: AsyncIterator> PinnedDrop for IterStream<I> {
    fn drop(this: Pin<&mut Self>) {
      let this = this.project();
      if this.finished.is_none() {
        debug!("stream dropped early, closing iterator");
        let _ = this.iter.close(None);
      }
    }
  }
}

impl<I: AsyncIterator> IterStream<I> {
  pub fn new(iter: I) -> Self { Self { iter, in_flight: None, finished: None } }

  /// The value the iterator finished with, once the stream has ended on
  /// `Done(Some(value))`.
  pub fn return_value(&self) -> Option<&I::Return> { self.finished.as_ref()?.as_ref() }

  pub fn is_finished(&self) -> bool { self.finished.is_some() }

  /// The iterator this stream drives.
  pub fn get_ref(&self) -> &I { &self.iter }
}

impl<I> Stream for IterStream<I>
where
  I: AsyncIterator,
  I::Item: Clone,
  I::Return: Clone,
  I::Err: Clone,
{
  type Item = Result<I::Item, I::Err>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let this = self.project();
    if this.finished.is_some() {
      return Poll::Ready(None);
    }
    let next = this.in_flight.get_or_insert_with(|| this.iter.advance(None));
    let outcome = ready!(next.poll_race(cx));
    *this.in_flight = None;
    match outcome {
      Ok(Step::Yield(value)) => Poll::Ready(Some(Ok(value))),
      Ok(Step::Done(value)) => {
        *this.finished = Some(value);
        Poll::Ready(None)
      }
      Err(err) => {
        *this.finished = Some(None);
        Poll::Ready(Some(Err(err)))
      }
    }
  }
}

impl<I> FusedStream for IterStream<I>
where
  I: AsyncIterator,
  I::Item: Clone,
  I::Return: Clone,
  I::Err: Clone,
{
  fn is_terminated(&self) -> bool { self.finished.is_some() }
}
