use thiserror::Error;

/// Errors raised while talking to the managed runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// No class with this name is loaded.
    #[error("class not found: {name}")]
    ClassNotFound {
        /// Slash-separated class name that was requested.
        name: String,
    },

    /// The class has no method with this name and signature.
    #[error("method not found: {name}{signature}")]
    MethodNotFound {
        /// Method name.
        name: String,
        /// JNI descriptor.
        signature: String,
    },

    /// The class has no field with this name and signature.
    #[error("field not found: {name} {signature}")]
    FieldNotFound {
        /// Field name.
        name: String,
        /// JNI descriptor.
        signature: String,
    },

    /// A call returned null where an object was required.
    #[error("{what} returned null")]
    NullObject {
        /// The call that produced null.
        what: String,
    },

    /// A value had a different type than the caller asked for.
    #[error("expected {expected} value, found {found}")]
    UnexpectedValue {
        /// Requested kind.
        expected: &'static str,
        /// Actual kind.
        found: &'static str,
    },

    /// A handle was not issued by this bridge.
    #[error("handle is not valid for this bridge")]
    InvalidHandle,

    /// The runtime threw; the exception has been cleared.
    #[error("exception thrown during {during}")]
    Exception {
        /// The operation that threw.
        during: String,
    },

    /// Any other failure reported by the platform binding.
    #[error("platform error: {0}")]
    Platform(String),
}
