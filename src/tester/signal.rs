//! Test-level signals: skip, assertion failure, unexpected error.

use std::any::type_name;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

use crate::client::ClientError;
use crate::occi::StructureError;
use crate::tester::value::{ArgumentError, Value};

/// Why a test module stopped before returning a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Signal {
    /// Intentional skip with a reason.
    #[error("{0}")]
    Skip(String),

    /// An assertion did not hold.
    #[error("{0}")]
    Failure(String),

    /// Any other fault.
    #[error("{kind}: {details}")]
    Error { kind: String, details: String },
}

impl Signal {
    pub fn skip(reason: impl Into<String>) -> Self {
        Signal::Skip(reason.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Signal::Failure(message.into())
    }

    pub fn error(kind: impl Into<String>, details: impl fmt::Display) -> Self {
        Signal::Error {
            kind: kind.into(),
            details: details.to_string(),
        }
    }
}

/// What a test module returns.
pub type TestResult = Result<Value, Signal>;

impl From<ClientError> for Signal {
    fn from(err: ClientError) -> Self {
        let kind = match &err {
            ClientError::Status(_) => "OcciError",
            ClientError::Transport(_) => "TransportError",
            ClientError::InvalidHeader(_) => "HeaderError",
            ClientError::Structure(_) => "StructureError",
        };
        match &err {
            ClientError::Status(e) => Signal::error(kind, format_args!("HTTP {}: {}", e.status, e.body.trim())),
            _ => Signal::error(kind, &err),
        }
    }
}

impl From<StructureError> for Signal {
    fn from(err: StructureError) -> Self {
        Signal::error("StructureError", err)
    }
}

impl From<ArgumentError> for Signal {
    fn from(err: ArgumentError) -> Self {
        Signal::error("ArgumentError", err)
    }
}

/// Debug representation that survives a panicking `Debug` impl.
pub fn safe_repr<T: fmt::Debug + ?Sized>(value: &T) -> String {
    catch_unwind(AssertUnwindSafe(|| format!("{:?}", value)))
        .unwrap_or_else(|_| format!("<{} object>", type_name::<T>()))
}

/// Failure with the caller's message, or the formatted default.
fn failure(msg: Option<&str>, default: impl FnOnce() -> String) -> Signal {
    Signal::Failure(msg.map(str::to_string).unwrap_or_else(default))
}

/// The closed set of assertion primitives.
pub trait Assertions {
    /// Fail immediately.
    fn fail<T>(&self, msg: impl Into<String>) -> Result<T, Signal> {
        Err(Signal::failure(msg))
    }

    /// Skip the running module.
    fn skip<T>(&self, reason: impl Into<String>) -> Result<T, Signal> {
        Err(Signal::skip(reason))
    }

    fn assert_true(&self, expr: bool, msg: Option<&str>) -> Result<(), Signal> {
        if expr {
            return Ok(());
        }
        Err(failure(msg, || format!("{} is not true", safe_repr(&expr))))
    }

    fn assert_false(&self, expr: bool, msg: Option<&str>) -> Result<(), Signal> {
        if !expr {
            return Ok(());
        }
        Err(failure(msg, || format!("{} is not false", safe_repr(&expr))))
    }

    fn assert_equal<A, B>(&self, left: A, right: B, msg: Option<&str>) -> Result<(), Signal>
    where
        A: PartialEq<B> + fmt::Debug,
        B: fmt::Debug,
    {
        if left == right {
            return Ok(());
        }
        Err(failure(msg, || {
            format!("{} != {}", safe_repr(&left), safe_repr(&right))
        }))
    }

    fn assert_not_equal<A, B>(&self, left: A, right: B, msg: Option<&str>) -> Result<(), Signal>
    where
        A: PartialEq<B> + fmt::Debug,
        B: fmt::Debug,
    {
        if left != right {
            return Ok(());
        }
        Err(failure(msg, || {
            format!("{} == {}", safe_repr(&left), safe_repr(&right))
        }))
    }

    fn assert_in<T>(&self, item: &T, seq: &[T], msg: Option<&str>) -> Result<(), Signal>
    where
        T: PartialEq + fmt::Debug,
    {
        if seq.contains(item) {
            return Ok(());
        }
        Err(failure(msg, || {
            format!("{} is not in {}", safe_repr(item), safe_repr(seq))
        }))
    }

    fn assert_not_in<T>(&self, item: &T, seq: &[T], msg: Option<&str>) -> Result<(), Signal>
    where
        T: PartialEq + fmt::Debug,
    {
        if !seq.contains(item) {
            return Ok(());
        }
        Err(failure(msg, || format!("{} is in {}", safe_repr(item), safe_repr(seq))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Checker;
    impl Assertions for Checker {}

    struct Exploding;

    impl fmt::Debug for Exploding {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            panic!("no representation")
        }
    }

    #[test]
    fn test_default_messages() {
        let t = Checker;
        assert_eq!(t.assert_true(false, None), Err(Signal::failure("false is not true")));
        assert_eq!(t.assert_false(true, None), Err(Signal::failure("true is not false")));
        assert_eq!(t.assert_equal(1, 2, None), Err(Signal::failure("1 != 2")));
        assert_eq!(t.assert_not_equal("a", "a", None), Err(Signal::failure("\"a\" == \"a\"")));
        assert_eq!(t.assert_in(&3, &[1, 2], None), Err(Signal::failure("3 is not in [1, 2]")));
        assert_eq!(t.assert_not_in(&1, &[1, 2], None), Err(Signal::failure("1 is in [1, 2]")));
    }

    #[test]
    fn test_passing_assertions() {
        let t = Checker;
        assert!(t.assert_true(true, None).is_ok());
        assert!(t.assert_equal(String::from("x"), "x", None).is_ok());
        assert!(t.assert_in(&2, &[1, 2], None).is_ok());
        assert!(t.assert_not_in(&5, &[1, 2], None).is_ok());
    }

    #[test]
    fn test_custom_message_wins() {
        let t = Checker;
        assert_eq!(
            t.assert_equal(1, 2, Some("Invalid path argument")),
            Err(Signal::failure("Invalid path argument"))
        );
    }

    #[test]
    fn test_safe_repr_falls_back() {
        let repr = safe_repr(&Exploding);
        assert!(repr.starts_with('<'));
        assert!(repr.contains("Exploding"));
    }

    #[test]
    fn test_error_conversions() {
        let signal: Signal = ArgumentError::Missing {
            module: "retrieveResource".into(),
            name: "path".into(),
        }
        .into();
        assert_eq!(
            signal.to_string(),
            "ArgumentError: retrieveResource() missing required argument `path`"
        );
    }
}
