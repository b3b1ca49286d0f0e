use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// The reserved null handle.
            pub const NULL: Self = Self(0);

            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0
            }

            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            /// Returns the handle allocated after `self`.
            pub(crate) fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Interned handle for a name. `NULL` is the wildcard and matches any value.
    NameId,
    "name"
);

define_id!(
    /// Handle for one canonical combination of match criteria.
    ///
    /// `NULL` means "no relationship"; when embedded as a parent inside a
    /// finer criteria tuple it means the parent is unconstrained.
    RelateId,
    "relate"
);

define_id!(
    /// Handle for a concrete, externally stored parameter value. `NULL` means
    /// that no parameter is bound.
    ParamId,
    "param"
);
