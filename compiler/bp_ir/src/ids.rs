//! Arena handles for expressions, patterns and clauses.
//!
//! Children are referenced by `u32` indices into the owning [`ExprArena`]
//! rather than boxed. Lists are contiguous `(start, len)` slices of a
//! flattened side table.
//!
//! [`ExprArena`]: crate::ExprArena

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Sentinel for an absent optional child.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}::INVALID", stringify!($name))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

macro_rules! arena_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            /// Half-open index range into the side table.
            #[inline]
            pub const fn as_range(&self) -> std::ops::Range<usize> {
                self.start as usize..self.start as usize + self.len as usize
            }
        }
    };
}

arena_id!(
    /// Index into the expression table.
    ExprId
);
arena_id!(
    /// Index into the pattern table.
    PatternId
);
arena_range!(
    /// Slice of the flattened expression-list table.
    ExprRange
);
arena_range!(
    /// Slice of the flattened pattern-list table.
    PatternRange
);
arena_range!(
    /// Slice of the clause table.
    ClauseRange
);
