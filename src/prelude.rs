//! Prelude module for convenient imports

pub use crate::{
  error::Failure,
  factory::SubjectFactory,
  iterator::{AsyncIterator, NextOf},
  next::{Dispose, Next},
  ops::into_stream::IterStream,
  promise::Promise,
  scope::{Local, Scope, Shared},
  step::{Outcome, Step},
  subject::*,
  terminable::{Terminable, TerminableBuilder},
};
