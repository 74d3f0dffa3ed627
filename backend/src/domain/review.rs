//! Review ledger aggregate and vote tally parsing.
//!
//! Vote payloads arrive as loosely shaped JSON. They are parsed once at the
//! boundary into [`VoteTally`] (absolute counts) or [`VoteAdjustment`]
//! (signed deltas); downstream code never re-checks shape. Tallies are
//! non-negative by construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::student::StudentId;

/// Maximum allowed length for a review message.
pub const REVIEW_MESSAGE_MAX: usize = 2000;

/// Validation errors returned by the vote and review constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteValidationError {
    /// The payload did not carry an upvote count.
    MissingUpvote,
    /// The payload did not carry a downvote count.
    MissingDownvote,
    /// A vote count was negative.
    Negative {
        /// Which field carried the value.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A vote count exceeded the storable range.
    TooLarge {
        /// Which field carried the value.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// Applying a delta would drive a tally below zero.
    WouldGoNegative {
        /// Which field the delta applies to.
        field: &'static str,
    },
    /// Applying a delta would overflow the storable range.
    WouldOverflow {
        /// Which field the delta applies to.
        field: &'static str,
    },
}

impl fmt::Display for VoteValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUpvote => write!(f, "vote payload is missing an upvote count"),
            Self::MissingDownvote => write!(f, "vote payload is missing a downvote count"),
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::TooLarge { field, value } => {
                write!(f, "{field} exceeds the storable range, got {value}")
            }
            Self::WouldGoNegative { field } => {
                write!(f, "adjustment would drive {field} below zero")
            }
            Self::WouldOverflow { field } => {
                write!(f, "adjustment would overflow {field}")
            }
        }
    }
}

impl std::error::Error for VoteValidationError {}

/// Validation errors returned by the review message constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    /// Message was missing or blank once trimmed.
    EmptyMessage,
    /// Message longer than the maximum length.
    MessageTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "review message must not be empty"),
            Self::MessageTooLong { max } => {
                write!(f, "review message must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ReviewValidationError {}

/// Stable review identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Validate and construct a [`ReviewId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.as_ref()).map(Self)
    }

    /// Construct a review identifier from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`ReviewId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-text body of a review.
///
/// ## Invariants
/// - Non-blank, at most [`REVIEW_MESSAGE_MAX`] characters. Interior
///   whitespace is preserved as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewMessage(String);

impl ReviewMessage {
    /// Validate and construct a [`ReviewMessage`] from raw input.
    pub fn new(message: impl Into<String>) -> Result<Self, ReviewValidationError> {
        Self::from_owned(message.into())
    }

    fn from_owned(message: String) -> Result<Self, ReviewValidationError> {
        if message.trim().is_empty() {
            return Err(ReviewValidationError::EmptyMessage);
        }
        if message.chars().count() > REVIEW_MESSAGE_MAX {
            return Err(ReviewValidationError::MessageTooLong {
                max: REVIEW_MESSAGE_MAX,
            });
        }
        Ok(Self(message))
    }
}

impl AsRef<str> for ReviewMessage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReviewMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ReviewMessage> for String {
    fn from(value: ReviewMessage) -> Self {
        value.0
    }
}

impl TryFrom<String> for ReviewMessage {
    type Error = ReviewValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Loose vote payload as received on the wire, before validation.
///
/// Both fields are optional signed integers so that missing keys and
/// negative values surface as typed diagnostics rather than opaque
/// deserialisation failures.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VoteTallyDraft {
    /// Upvote count, if present.
    pub upvote: Option<i64>,
    /// Downvote count, if present.
    pub downvote: Option<i64>,
}

/// Validated absolute vote counts for a review.
///
/// ## Invariants
/// - Counts are non-negative by construction; zero votes on both sides is a
///   valid state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    upvote: u32,
    downvote: u32,
}

impl VoteTally {
    /// Build a tally from already-validated counts.
    pub fn new(upvote: u32, downvote: u32) -> Self {
        Self { upvote, downvote }
    }

    /// Upvote count.
    pub fn upvote(self) -> u32 {
        self.upvote
    }

    /// Downvote count.
    pub fn downvote(self) -> u32 {
        self.downvote
    }

    /// Tally as the `(upvotes, downvotes)` pair the karma engine consumes.
    pub fn as_counts(self) -> (u64, u64) {
        (u64::from(self.upvote), u64::from(self.downvote))
    }

    fn checked_count(
        field: &'static str,
        value: Option<i64>,
        missing: VoteValidationError,
    ) -> Result<u32, VoteValidationError> {
        let value = value.ok_or(missing)?;
        if value < 0 {
            return Err(VoteValidationError::Negative { field, value });
        }
        u32::try_from(value).map_err(|_| VoteValidationError::TooLarge { field, value })
    }
}

impl TryFrom<VoteTallyDraft> for VoteTally {
    type Error = VoteValidationError;

    fn try_from(draft: VoteTallyDraft) -> Result<Self, Self::Error> {
        let upvote =
            Self::checked_count("upvote", draft.upvote, VoteValidationError::MissingUpvote)?;
        let downvote = Self::checked_count(
            "downvote",
            draft.downvote,
            VoteValidationError::MissingDownvote,
        )?;
        Ok(Self { upvote, downvote })
    }
}

/// Signed vote deltas applied to an existing tally.
///
/// Updates are incremental: each delta is added to the stored count. An
/// adjustment that would drive a count below zero (or past the storable
/// range) is rejected and leaves the stored tally untouched.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VoteAdjustment {
    /// Delta added to the upvote count.
    #[serde(default)]
    pub upvote: i64,
    /// Delta added to the downvote count.
    #[serde(default)]
    pub downvote: i64,
}

impl VoteAdjustment {
    /// Apply the deltas to a tally, checking range on both sides.
    pub fn apply(self, tally: VoteTally) -> Result<VoteTally, VoteValidationError> {
        let upvote = Self::adjusted("upvote", tally.upvote(), self.upvote)?;
        let downvote = Self::adjusted("downvote", tally.downvote(), self.downvote)?;
        Ok(VoteTally::new(upvote, downvote))
    }

    fn adjusted(
        field: &'static str,
        current: u32,
        delta: i64,
    ) -> Result<u32, VoteValidationError> {
        let next = i64::from(current)
            .checked_add(delta)
            .ok_or(VoteValidationError::WouldOverflow { field })?;
        if next < 0 {
            return Err(VoteValidationError::WouldGoNegative { field });
        }
        u32::try_from(next).map_err(|_| VoteValidationError::WouldOverflow { field })
    }
}

/// Review record owned by exactly one student.
///
/// ## Invariants
/// - `student_id` resolves to an existing student for the review's entire
///   lifetime and is immutable after creation.
#[derive(Debug, Clone)]
pub struct Review {
    id: ReviewId,
    student_id: StudentId,
    message: ReviewMessage,
    votes: VoteTally,
}

impl Review {
    /// Build a new review from validated components.
    pub fn new(
        id: ReviewId,
        student_id: StudentId,
        message: ReviewMessage,
        votes: VoteTally,
    ) -> Self {
        Self {
            id,
            student_id,
            message,
            votes,
        }
    }

    /// Stable review identifier.
    pub fn id(&self) -> &ReviewId {
        &self.id
    }

    /// Owning student's external identifier.
    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    /// Free-text body.
    pub fn message(&self) -> &ReviewMessage {
        &self.message
    }

    /// Current vote tally.
    pub fn votes(&self) -> VoteTally {
        self.votes
    }

    /// Replace the vote tally with an already-validated one.
    pub(crate) fn set_votes(&mut self, votes: VoteTally) {
        self.votes = votes;
    }

    /// Plain-field view safe to expose to the presentation layer.
    pub fn snapshot(&self) -> ReviewSnapshot {
        ReviewSnapshot {
            id: *self.id.as_uuid(),
            student_id: self.student_id,
            message: self.message.to_string(),
            upvote: self.votes.upvote(),
            downvote: self.votes.downvote(),
        }
    }
}

/// Serialisable view of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnapshot {
    /// Stable review identifier.
    pub id: Uuid,
    /// Owning student's external identifier.
    pub student_id: StudentId,
    /// Free-text body.
    pub message: String,
    /// Upvote count.
    pub upvote: u32,
    /// Downvote count.
    pub downvote: u32,
}
