//! Fact domain model.
//!
//! # Responsibility
//! - Define the canonical fact record exchanged with the persistence gateway.
//! - Provide the derived dispute classification.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store and never change.
//! - Vote counters only grow, by exactly one per vote.
//! - Dispute status is derived on every read and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned fact identifier.
pub type FactId = i64;

/// Persisted fact record.
///
/// Serialized field names match the store columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub text: String,
    pub source: String,
    pub category: String,
    #[serde(rename = "v_interest")]
    pub votes_interest: u32,
    #[serde(rename = "v_mindblow")]
    pub votes_mindblow: u32,
    #[serde(rename = "v_false")]
    pub votes_false: u32,
    /// Unix epoch milliseconds; ordering only.
    pub created_at: i64,
}

impl Fact {
    /// Returns whether false votes outweigh interest and mind-blown votes
    /// combined.
    pub fn is_disputed(&self) -> bool {
        u64::from(self.votes_interest) + u64::from(self.votes_mindblow)
            < u64::from(self.votes_false)
    }

    /// Current counter value for one vote field.
    pub fn votes(&self, field: VoteField) -> u32 {
        match field {
            VoteField::Interest => self.votes_interest,
            VoteField::Mindblow => self.votes_mindblow,
            VoteField::False => self.votes_false,
        }
    }
}

/// Insert payload for a new fact; the store fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFact {
    pub text: String,
    pub source: String,
    pub category: String,
}

/// One of the three independently incrementable vote counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteField {
    Interest,
    Mindblow,
    False,
}

impl VoteField {
    pub const ALL: [VoteField; 3] = [Self::Interest, Self::Mindblow, Self::False];

    /// Store column backing this counter.
    pub fn column(self) -> &'static str {
        match self {
            Self::Interest => "v_interest",
            Self::Mindblow => "v_mindblow",
            Self::False => "v_false",
        }
    }

    /// Parses a short field name (`interest`) or its column name
    /// (`v_interest`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "interest" | "v_interest" => Some(Self::Interest),
            "mindblow" | "v_mindblow" => Some(Self::Mindblow),
            "false" | "v_false" => Some(Self::False),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Interest => "interest",
            Self::Mindblow => "mindblow",
            Self::False => "false",
        }
    }
}

impl Display for VoteField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
