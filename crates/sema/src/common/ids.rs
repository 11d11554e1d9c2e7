//! Strongly typed identifiers

use std::fmt;

macro_rules! define_id {
    ($name:ident, $raw:ty, $prefix:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
        pub struct $name($raw);

        impl $name {
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            pub const fn to_raw(self) -> $raw {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(NodeId, u64, "#");
define_id!(ScopeId, u32, "scope#");
