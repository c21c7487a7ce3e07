//! Opaque handles for runtime entities.
//!
//! Each category gets its own type so a method handle can never be passed
//! where a class is expected. Constructors are crate-private.

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            #[allow(dead_code)]
            pub(crate) fn from_index(index: usize) -> Self {
                // Tables never outgrow u32 within a single native call.
                #[allow(clippy::cast_possible_truncation)]
                Self(index as u32)
            }

            #[allow(dead_code)]
            pub(crate) const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(
    /// A resolved class.
    ClassHandle
);

handle!(
    /// A resolved instance method.
    MethodHandle
);

handle!(
    /// A resolved static method.
    StaticMethodHandle
);

handle!(
    /// A resolved static field.
    FieldHandle
);

handle!(
    /// A live (non-null) object reference.
    ObjectHandle
);
