//! The crate's default error type.
//!
//! Iterators are generic over their error type `E`; [`Failure`] is what they
//! use when the caller doesn't pick one. It is cheap to clone, since a single
//! `fail` is broadcast to every pending request.

use std::{borrow::Cow, error::Error, fmt, sync::Arc};

#[derive(Clone)]
pub struct Failure(Arc<Repr>);

enum Repr {
  Message(Cow<'static, str>),
  Source(Box<dyn Error + Send + Sync>),
}

impl Failure {
  /// A failure described by a message.
  pub fn msg(msg: impl Into<Cow<'static, str>>) -> Self { Self(Arc::new(Repr::Message(msg.into()))) }

  /// A failure caused by another error.
  pub fn new<E>(err: E) -> Self
  where
    E: Error + Send + Sync + 'static,
  {
    Self(Arc::new(Repr::Source(Box::new(err))))
  }
}

impl fmt::Display for Failure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &*self.0 {
      Repr::Message(msg) => f.write_str(msg),
      Repr::Source(err) => write!(f, "{err}"),
    }
  }
}

impl fmt::Debug for Failure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &*self.0 {
      Repr::Message(msg) => f.debug_tuple("Failure").field(msg).finish(),
      Repr::Source(err) => f.debug_tuple("Failure").field(err).finish(),
    }
  }
}

impl Error for Failure {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match &*self.0 {
      Repr::Message(_) => None,
      Repr::Source(err) => Some(&**err),
    }
  }
}

/// Clones of one failure are equal; message failures also compare by text.
impl PartialEq for Failure {
  fn eq(&self, other: &Self) -> bool {
    if Arc::ptr_eq(&self.0, &other.0) {
      return true;
    }
    match (&*self.0, &*other.0) {
      (Repr::Message(a), Repr::Message(b)) => a == b,
      _ => false,
    }
  }
}

impl From<&'static str> for Failure {
  fn from(msg: &'static str) -> Self { Self::msg(msg) }
}

impl From<String> for Failure {
  fn from(msg: String) -> Self { Self::msg(msg) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn message_failures_compare_by_text() {
    assert_eq!(Failure::msg("error1"), Failure::from("error1"));
    assert_ne!(Failure::msg("error1"), Failure::from(String::from("error2")));
    assert_eq!(Failure::msg("error1").to_string(), "error1");
  }

  #[test]
  fn wrapped_errors_keep_their_source() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
    let failure = Failure::new(io);
    assert_eq!(failure.to_string(), "disk gone");
    assert!(failure.source().is_some());
    assert_eq!(failure.clone(), failure);
    assert_ne!(failure, Failure::new(std::io::Error::new(std::io::ErrorKind::Other, "disk gone")));
  }

  #[test]
  fn is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Failure>();
  }
}
