/// The value an advance request settles with.
///
/// `Yield` carries the next element; `Done` marks the end of the sequence and
/// carries the optional final value handed to `close`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step<T, R> {
  Yield(T),
  Done(Option<R>),
}

/// What an advance request resolves to: a step, or the error passed to `fail`.
pub type Outcome<T, R, E> = Result<Step<T, R>, E>;

impl<T, R> Step<T, R> {
  #[inline]
  pub fn is_done(&self) -> bool { matches!(self, Step::Done(_)) }

  /// The yielded element, if any.
  pub fn into_yielded(self) -> Option<T> {
    match self {
      Step::Yield(v) => Some(v),
      Step::Done(_) => None,
    }
  }

  /// The final value of a finished sequence, if any.
  pub fn into_returned(self) -> Option<R> {
    match self {
      Step::Yield(_) => None,
      Step::Done(r) => r,
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Step<U, R> {
    match self {
      Step::Yield(v) => Step::Yield(f(v)),
      Step::Done(r) => Step::Done(r),
    }
  }
}
