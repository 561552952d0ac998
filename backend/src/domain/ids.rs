//! Numeric identifiers for domain entities.
//!
//! Every entity in the objectives domain is keyed by a database-assigned
//! `BIGSERIAL`. Wrapping the raw integer in a dedicated newtype keeps an
//! objective id from being passed where a review id is expected.

macro_rules! define_numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Return the raw database identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

define_numeric_id! {
    /// Identifier of an employee record in the directory.
    EmployeeId
}

define_numeric_id! {
    /// Identifier of a performance review.
    ReviewId
}

define_numeric_id! {
    /// Identifier of an objective.
    ObjectiveId
}

define_numeric_id! {
    /// Identifier of a key result.
    KeyResultId
}
