//! Student registry aggregate and its identifier formats.
//!
//! Students are keyed externally by a nine-digit institutional identifier
//! supplied by callers, distinct from the internally minted record UUID.
//! Karma is derived state: only the recompute path may write it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::review::ReviewSnapshot;

/// Smallest accepted external student identifier (first nine-digit value).
pub const STUDENT_ID_MIN: u32 = 100_000_000;
/// Largest accepted external student identifier (last nine-digit value).
pub const STUDENT_ID_MAX: u32 = 999_999_999;

/// Maximum allowed length for a student display name.
pub const STUDENT_NAME_MAX: usize = 64;

/// Validation errors returned by the student constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    /// External identifier is not a nine-digit positive integer.
    IdOutOfRange {
        /// The rejected value.
        id: u64,
    },
    /// Display name was missing or blank once trimmed.
    EmptyName,
    /// Display name longer than the maximum length.
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for StudentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdOutOfRange { id } => {
                write!(f, "student id must be a nine-digit positive integer, got {id}")
            }
            Self::EmptyName => write!(f, "student name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "student name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for StudentValidationError {}

/// External student identifier in the institution's numbering scheme.
///
/// ## Invariants
/// - Exactly nine decimal digits, i.e. within
///   [`STUDENT_ID_MIN`]`..=`[`STUDENT_ID_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct StudentId(u32);

impl StudentId {
    /// Validate and construct a [`StudentId`] from a raw integer.
    pub fn new(raw: u64) -> Result<Self, StudentValidationError> {
        u32::try_from(raw)
            .ok()
            .filter(|id| (STUDENT_ID_MIN..=STUDENT_ID_MAX).contains(id))
            .map(Self)
            .ok_or(StudentValidationError::IdOutOfRange { id: raw })
    }

    /// The numeric identifier value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StudentId> for u64 {
    fn from(value: StudentId) -> Self {
        Self::from(value.0)
    }
}

impl TryFrom<u64> for StudentId {
    type Error = StudentValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name for a student.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`STUDENT_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentName(String);

impl StudentName {
    /// Validate and construct a [`StudentName`] from raw input.
    pub fn new(name: impl Into<String>) -> Result<Self, StudentValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, StudentValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if trimmed.chars().count() > STUDENT_NAME_MAX {
            return Err(StudentValidationError::NameTooLong {
                max: STUDENT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for StudentName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<StudentName> for String {
    fn from(value: StudentName) -> Self {
        value.0
    }
}

impl TryFrom<String> for StudentName {
    type Error = StudentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Student record with derived karma.
///
/// ## Invariants
/// - `student_id` is globally unique (enforced by the repository).
/// - `karma` always equals the karma engine applied to the current tallies
///   of the student's reviews once a mutation completes. Callers cannot set
///   it; only the recompute path writes it.
#[derive(Debug, Clone)]
pub struct Student {
    id: Uuid,
    student_id: StudentId,
    name: StudentName,
    karma: f64,
}

impl Student {
    /// Build a freshly enrolled student with zero karma and no reviews.
    pub fn new(id: Uuid, student_id: StudentId, name: StudentName) -> Self {
        Self {
            id,
            student_id,
            name,
            karma: 0.0,
        }
    }

    /// Internal record identifier.
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// External student identifier.
    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    /// Display name.
    pub fn name(&self) -> &StudentName {
        &self.name
    }

    /// Stored karma value.
    pub fn karma(&self) -> f64 {
        self.karma
    }

    /// Write a recomputed karma value. Restricted to the persistence and
    /// recompute paths; never driven by caller input.
    pub(crate) fn set_karma(&mut self, karma: f64) {
        self.karma = karma;
    }

    /// Plain-field view embedding the student's reviews in insertion order.
    pub fn snapshot(&self, reviews: Vec<ReviewSnapshot>) -> StudentSnapshot {
        StudentSnapshot {
            id: self.id,
            student_id: self.student_id,
            name: self.name.to_string(),
            karma: self.karma,
            reviews,
        }
    }
}

/// Serialisable view of a student with its reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSnapshot {
    /// Internal record identifier.
    pub id: Uuid,
    /// External student identifier.
    pub student_id: StudentId,
    /// Display name.
    pub name: String,
    /// Derived karma score.
    pub karma: f64,
    /// Owned reviews in insertion order.
    pub reviews: Vec<ReviewSnapshot>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(100_000_000)]
    #[case(812_394_821)]
    #[case(816_014_286)]
    #[case(999_999_999)]
    fn accepts_nine_digit_ids(#[case] raw: u64) {
        let id = StudentId::new(raw).expect("nine-digit id is valid");
        assert_eq!(u64::from(id), raw);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(99_999_999)]
    #[case(1_000_000_000)]
    #[case(81_239_482_100)]
    fn rejects_other_digit_lengths(#[case] raw: u64) {
        let err = StudentId::new(raw).expect_err("wrong magnitude must fail");
        assert_eq!(err, StudentValidationError::IdOutOfRange { id: raw });
    }

    #[test]
    fn student_id_serialises_as_number() {
        let id = StudentId::new(812_394_821).expect("valid id");
        let value = serde_json::to_value(id).expect("serialize id");
        assert_eq!(value, serde_json::json!(812_394_821));
    }

    #[rstest]
    #[case("", StudentValidationError::EmptyName)]
    #[case("   ", StudentValidationError::EmptyName)]
    fn rejects_blank_names(#[case] raw: &str, #[case] expected: StudentValidationError) {
        assert_eq!(StudentName::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn rejects_overlong_name() {
        let raw = "a".repeat(STUDENT_NAME_MAX + 1);
        assert_eq!(
            StudentName::new(raw).expect_err("must fail"),
            StudentValidationError::NameTooLong {
                max: STUDENT_NAME_MAX
            }
        );
    }

    #[test]
    fn new_students_start_with_zero_karma() {
        let student = Student::new(
            Uuid::new_v4(),
            StudentId::new(812_394_821).expect("valid id"),
            StudentName::new("Richard").expect("valid name"),
        );
        assert_eq!(student.karma(), 0.0);
    }

    #[test]
    fn snapshot_embeds_reviews_and_karma() {
        let mut student = Student::new(
            Uuid::new_v4(),
            StudentId::new(812_394_821).expect("valid id"),
            StudentName::new("Richard").expect("valid name"),
        );
        student.set_karma(100.0);
        let snapshot = student.snapshot(Vec::new());
        assert_eq!(snapshot.karma, 100.0);
        assert_eq!(snapshot.name, "Richard");
        assert!(snapshot.reviews.is_empty());

        let value = serde_json::to_value(&snapshot).expect("serialize snapshot");
        assert_eq!(
            value.get("studentId").and_then(serde_json::Value::as_u64),
            Some(812_394_821)
        );
    }
}
