//! Movement reasons and the credit/debit direction they resolve to.

use serde::{Deserialize, Serialize};

use stockledger_core::ValueObject;

/// Effect of a movement on the balance.
///
/// Every line item resolves to exactly one direction when it is ingested, so
/// the balance calculation never has to look at reasons or nodes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

impl ValueObject for Direction {}

impl Direction {
    /// Apply `quantity` to `balance` in this direction.
    ///
    /// Returns `None` on `i64` overflow.
    pub fn apply(self, balance: i64, quantity: u32) -> Option<i64> {
        let quantity = i64::from(quantity);
        match self {
            Direction::Credit => balance.checked_add(quantity),
            Direction::Debit => balance.checked_sub(quantity),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason type as configured in the reason catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonType {
    Credit,
    Debit,
    /// Used by physical inventory adjustments; the sign comes from elsewhere.
    BalanceAdjustment,
}

impl ReasonType {
    /// Direction implied by the reason type alone, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            ReasonType::Credit => Some(Direction::Credit),
            ReasonType::Debit => Some(Direction::Debit),
            ReasonType::BalanceAdjustment => None,
        }
    }
}

/// Reason category (descriptive; has no effect on the balance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCategory {
    Transfer,
    Adjustment,
    PhysicalInventory,
    Aggregation,
}

/// Reason attached to a line item, already resolved by the reason-lookup
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockCardLineItemReason {
    pub name: String,
    pub reason_type: ReasonType,
    pub reason_category: ReasonCategory,
    #[serde(default)]
    pub is_free_text_allowed: bool,
}

impl ValueObject for StockCardLineItemReason {}

impl StockCardLineItemReason {
    pub fn new(name: impl Into<String>, reason_type: ReasonType, reason_category: ReasonCategory) -> Self {
        Self {
            name: name.into(),
            reason_type,
            reason_category,
            is_free_text_allowed: false,
        }
    }

    /// A credit adjustment reason (e.g. "Transfer In").
    pub fn credit(name: impl Into<String>) -> Self {
        Self::new(name, ReasonType::Credit, ReasonCategory::Adjustment)
    }

    /// A debit adjustment reason (e.g. "Damage").
    pub fn debit(name: impl Into<String>) -> Self {
        Self::new(name, ReasonType::Debit, ReasonCategory::Adjustment)
    }

    pub fn with_free_text_allowed(mut self) -> Self {
        self.is_free_text_allowed = true;
        self
    }

    pub fn is_credit(&self) -> bool {
        self.reason_type == ReasonType::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.reason_type == ReasonType::Debit
    }

    pub fn direction(&self) -> Option<Direction> {
        self.reason_type.direction()
    }
}
