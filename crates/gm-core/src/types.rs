//! Validated identifiers and names for discipline and task records.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for discipline and task fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Course codes are three letters followed by four digits.
    #[error("invalid course code {value:?} (expected three letters and four digits, e.g. IMD1012)")]
    InvalidCourseCode { value: String },

    /// A name or title was too short or too long.
    #[error("{field} must be between {min} and {max} characters, got {len}")]
    NameLength {
        field: &'static str,
        len: usize,
        min: usize,
        max: usize,
    },

    /// Grades and grade weights are on a 0 to 10 scale.
    #[error("{field} must be between 0 and 10, got {value}")]
    GradeOutOfRange { field: &'static str, value: String },
}

/// Generates a validated string newtype with common trait implementations.
macro_rules! define_validated_string {
    (
        $(#[$meta:meta])*
        $name:ident, $validate:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validates and normalizes the value.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let validate: fn(String) -> Result<String, ValidationError> = $validate;
                validate(value.into()).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 100;
const TITLE_MAX_CHARS: usize = 200;
const GRADE_MAX: f64 = 10.0;

/// Trims `value` and checks its length in characters.
fn bounded_text(
    value: &str,
    field: &'static str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(ValidationError::Empty { field });
    }
    if !(min..=max).contains(&len) {
        return Err(ValidationError::NameLength {
            field,
            len,
            min,
            max,
        });
    }
    Ok(trimmed.to_string())
}

/// Checks a grade or grade weight against the 0 to 10 scale.
pub fn validate_grade(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && (0.0..=GRADE_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::GradeOutOfRange {
            field,
            value: value.to_string(),
        })
    }
}

define_validated_string!(
    /// Identifies the student who owns a set of disciplines.
    ///
    /// Any non-blank string; uniqueness is the caller's concern.
    StudentId,
    |value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "student ID" });
        }
        Ok(trimmed.to_string())
    }
);

define_validated_string!(
    /// Institutional course code such as `IMD1012`.
    ///
    /// Trimmed and uppercased before validation.
    CourseCode,
    |value| {
        let code = value.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ValidationError::Empty { field: "course code" });
        }
        let bytes = code.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[..3].iter().all(u8::is_ascii_uppercase)
            && bytes[3..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(ValidationError::InvalidCourseCode { value });
        }
        Ok(code)
    }
);

define_validated_string!(
    /// Discipline display name, 3 to 100 characters after trimming.
    DisciplineName,
    |value| bounded_text(&value, "discipline name", NAME_MIN_CHARS, NAME_MAX_CHARS)
);

define_validated_string!(
    /// Task title, 3 to 200 characters after trimming.
    TaskTitle,
    |value| bounded_text(&value, "task title", NAME_MIN_CHARS, TITLE_MAX_CHARS)
);
