//! Claim aggregate: taxonomy enums, the lifecycle state machine, and display
//! identifier derivation.
//!
//! Display identifiers are pure functions of the store-assigned numeric
//! identity and the calendar year at assignment time. They can only be derived
//! once the insert has completed; a claim observed with null identifiers is
//! re-derivable state, not corruption.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Money, Probability};
use super::principal::UserId;
use super::Error;

/// Store-assigned numeric claim identity. Monotonic and unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(i64);

impl ClaimId {
    /// Wrap a store-assigned identity.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw numeric identity.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

macro_rules! string_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Stable storage/wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

string_enum! {
    /// Kind of disaster a claim relates to.
    pub enum DisasterType {
        Wildfire => "wildfire",
        Flood => "flood",
        Earthquake => "earthquake",
        Hurricane => "hurricane",
        Tornado => "tornado",
        Other => "other",
    }
}

string_enum! {
    /// Kind of property the claim covers.
    pub enum PropertyType {
        Automobile => "automobile",
        House => "house",
        Business => "business",
        Other => "other",
    }
}

string_enum! {
    /// Claim lifecycle status.
    pub enum ClaimStatus {
        Pending => "pending",
        UnderReview => "under_review",
        Approved => "approved",
        Rejected => "rejected",
        Settled => "settled",
    }
}

impl ClaimStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// Legal moves: pending to under_review or rejected, under_review to
    /// approved or rejected, approved to settled. Everything else is refused.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::UnderReview)
                | (Self::Pending, Self::Rejected)
                | (Self::UnderReview, Self::Approved)
                | (Self::UnderReview, Self::Rejected)
                | (Self::Approved, Self::Settled)
        )
    }

    /// Whether no further transition is expected from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Settled)
    }
}

/// Unique display identifiers derived from the claim identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimIdentifiers {
    /// Human-readable claim number, e.g. `CLM-202417`.
    pub claim_number: String,
    /// Insurance policy number, e.g. `POL202417`.
    pub insurance_policy_number: String,
}

/// Derive display identifiers from the store identity and the current year.
///
/// Uniqueness is inherited from the identity; no extra check is performed.
pub fn derive_identifiers(id: ClaimId, year: i32) -> ClaimIdentifiers {
    ClaimIdentifiers {
        claim_number: format!("CLM-{year}{id}"),
        insurance_policy_number: format!("POL{year}{id}"),
    }
}

/// A persisted claim.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub id: ClaimId,
    pub owner: UserId,
    pub disaster_type: DisasterType,
    pub property_type: PropertyType,
    pub description: String,
    pub estimated_loss: Money,
    pub status: ClaimStatus,
    pub predicted_approval: Option<Probability>,
    pub predicted_limit: Option<Money>,
    pub claim_number: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new claim submission.
///
/// Server-assigned fields (status, predictions, identifiers, timestamps) are
/// deliberately absent; clients cannot supply them.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaim {
    pub owner: UserId,
    pub disaster_type: DisasterType,
    pub property_type: PropertyType,
    pub description: String,
    pub estimated_loss: Money,
}

impl NewClaim {
    /// Validate and construct a new claim submission.
    pub fn try_new(
        owner: UserId,
        disaster_type: DisasterType,
        property_type: PropertyType,
        description: impl Into<String>,
        estimated_loss: Money,
    ) -> Result<Self, Error> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(Error::invalid_request("description must not be empty"));
        }
        Ok(Self {
            owner,
            disaster_type,
            property_type,
            description,
            estimated_loss,
        })
    }
}

/// Owner-editable fields of a pending claim.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimAmendment {
    pub description: Option<String>,
    pub estimated_loss: Option<Money>,
}

/// Adjudication outcome written by the review workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimReview {
    pub status: ClaimStatus,
    pub predicted_approval: Option<Probability>,
    pub predicted_limit: Option<Money>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ClaimStatus::Pending, ClaimStatus::UnderReview, true)]
    #[case(ClaimStatus::Pending, ClaimStatus::Rejected, true)]
    #[case(ClaimStatus::UnderReview, ClaimStatus::Approved, true)]
    #[case(ClaimStatus::UnderReview, ClaimStatus::Rejected, true)]
    #[case(ClaimStatus::Approved, ClaimStatus::Settled, true)]
    #[case(ClaimStatus::Pending, ClaimStatus::Approved, false)]
    #[case(ClaimStatus::Pending, ClaimStatus::Settled, false)]
    #[case(ClaimStatus::UnderReview, ClaimStatus::Pending, false)]
    #[case(ClaimStatus::UnderReview, ClaimStatus::Settled, false)]
    #[case(ClaimStatus::Approved, ClaimStatus::Rejected, false)]
    #[case(ClaimStatus::Rejected, ClaimStatus::Settled, false)]
    #[case(ClaimStatus::Settled, ClaimStatus::Pending, false)]
    #[case(ClaimStatus::Pending, ClaimStatus::Pending, false)]
    fn transition_guard_matches_adjacency_list(
        #[case] from: ClaimStatus,
        #[case] to: ClaimStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn rejected_and_settled_are_terminal() {
        assert!(ClaimStatus::Rejected.is_terminal());
        assert!(ClaimStatus::Settled.is_terminal());
        assert!(!ClaimStatus::Approved.is_terminal());
    }

    #[test]
    fn identifiers_are_deterministic_in_id_and_year() {
        let identifiers = derive_identifiers(ClaimId::new(17), 2024);
        assert_eq!(identifiers.claim_number, "CLM-202417");
        assert_eq!(identifiers.insurance_policy_number, "POL202417");

        let again = derive_identifiers(ClaimId::new(17), 2024);
        assert_eq!(identifiers, again);
    }

    #[test]
    fn distinct_ids_yield_distinct_identifiers() {
        let a = derive_identifiers(ClaimId::new(41), 2025);
        let b = derive_identifiers(ClaimId::new(42), 2025);
        assert_ne!(a.claim_number, b.claim_number);
        assert_ne!(a.insurance_policy_number, b.insurance_policy_number);
    }

    #[rstest]
    #[case("wildfire", DisasterType::Wildfire)]
    #[case("flood", DisasterType::Flood)]
    #[case("other", DisasterType::Other)]
    fn disaster_types_round_trip(#[case] text: &str, #[case] expected: DisasterType) {
        assert_eq!(text.parse::<DisasterType>(), Ok(expected));
        assert_eq!(expected.as_str(), text);
    }

    #[test]
    fn unknown_enum_text_is_rejected() {
        assert!("volcano".parse::<DisasterType>().is_err());
        assert!("boat".parse::<PropertyType>().is_err());
        assert!("open".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn new_claim_requires_a_description() {
        let err = NewClaim::try_new(
            UserId::random(),
            DisasterType::Flood,
            PropertyType::House,
            "  ",
            Money::from_cents(100).expect("non-negative"),
        )
        .expect_err("blank description must fail");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }
}
