use crate::{BridgeError, BridgeResult, ObjectHandle};

/// Argument passed to a managed method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// A Java `int`.
    Int(i32),
    /// An object reference.
    Object(ObjectHandle),
}

/// Value returned from a managed call or field read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// `void` return.
    Void,
    /// A Java `boolean`.
    Bool(bool),
    /// A Java `int`.
    Int(i32),
    /// A Java `double`.
    Double(f64),
    /// An object reference, `None` for null.
    Object(Option<ObjectHandle>),
}

impl Value {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Object(_) => "object",
        }
    }

    const fn mismatch(self, expected: &'static str) -> BridgeError {
        BridgeError::UnexpectedValue {
            expected,
            found: self.kind(),
        }
    }

    /// Interpret as a `boolean`.
    ///
    /// # Errors
    /// [`BridgeError::UnexpectedValue`] for any other kind.
    pub const fn bool(self) -> BridgeResult<bool> {
        match self {
            Self::Bool(value) => Ok(value),
            other => Err(other.mismatch("boolean")),
        }
    }

    /// Interpret as an `int`.
    ///
    /// # Errors
    /// [`BridgeError::UnexpectedValue`] for any other kind.
    pub const fn int(self) -> BridgeResult<i32> {
        match self {
            Self::Int(value) => Ok(value),
            other => Err(other.mismatch("int")),
        }
    }

    /// Interpret as a `double`.
    ///
    /// # Errors
    /// [`BridgeError::UnexpectedValue`] for any other kind.
    pub const fn double(self) -> BridgeResult<f64> {
        match self {
            Self::Double(value) => Ok(value),
            other => Err(other.mismatch("double")),
        }
    }

    /// Interpret as a possibly-null object.
    ///
    /// # Errors
    /// [`BridgeError::UnexpectedValue`] for primitives.
    pub const fn nullable_object(self) -> BridgeResult<Option<ObjectHandle>> {
        match self {
            Self::Object(value) => Ok(value),
            other => Err(other.mismatch("object")),
        }
    }

    /// Interpret as a non-null object. `what` names the call for the error.
    ///
    /// # Errors
    /// [`BridgeError::NullObject`] for null, [`BridgeError::UnexpectedValue`]
    /// for primitives.
    pub fn object(self, what: &str) -> BridgeResult<ObjectHandle> {
        self.nullable_object()?.ok_or_else(|| BridgeError::NullObject {
            what: what.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_object_is_reported_with_call_name() {
        let err = Value::Object(None)
            .object("LocationManager.getLastKnownLocation")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "LocationManager.getLastKnownLocation returned null"
        );
    }

    #[test]
    fn primitive_accessors_reject_other_kinds() {
        assert_eq!(Value::Double(1.5).double(), Ok(1.5));
        assert_eq!(
            Value::Int(3).bool(),
            Err(BridgeError::UnexpectedValue {
                expected: "boolean",
                found: "int"
            })
        );
        assert!(Value::Void.nullable_object().is_err());
        assert_eq!(Value::Object(None).nullable_object(), Ok(None));
    }
}
