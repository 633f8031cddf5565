//! Opaque visitor and board identifiers.
//!
//! Identifiers are compared and used as store keys, never parsed for meaning.
//! Values arriving from clients are only rejected when empty or padded with
//! whitespace; fresh identifiers are v4 UUID strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised when accepting identifiers from callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierValidationError {
    /// The identifier was empty.
    #[error("{kind} id must not be empty")]
    Empty {
        /// Which identifier failed validation.
        kind: &'static str,
    },
    /// The identifier carried leading or trailing whitespace.
    #[error("{kind} id must not contain surrounding whitespace")]
    Padded {
        /// Which identifier failed validation.
        kind: &'static str,
    },
}

fn validate(kind: &'static str, raw: &str) -> Result<(), IdentifierValidationError> {
    if raw.is_empty() {
        return Err(IdentifierValidationError::Empty { kind });
    }
    if raw.trim() != raw {
        return Err(IdentifierValidationError::Padded { kind });
    }
    Ok(())
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier from caller input.
            pub fn new(id: impl Into<String>) -> Result<Self, IdentifierValidationError> {
                let raw = id.into();
                validate($kind, &raw)?;
                Ok(Self(raw))
            }

            /// Generate a fresh random identifier.
            ///
            /// Backed by the operating system's randomness source; if that
            /// source is unavailable the process aborts, as nothing can be
            /// served without identities.
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

opaque_id!(
    /// Opaque visitor identifier handed out on first contact.
    UserId,
    "user"
);

opaque_id!(
    /// Opaque board identifier, unrelated to (and unguessable from) its owner.
    BoardId,
    "board"
);

/// Produce a fresh visitor identity.
///
/// Nothing is written to the store: a user only becomes visible once a board
/// has been pushed onto their board list.
///
/// # Examples
/// ```
/// use lovelio::domain::create_user;
///
/// let a = create_user();
/// let b = create_user();
/// assert_ne!(a, b);
/// ```
pub fn create_user() -> UserId {
    UserId::random()
}
