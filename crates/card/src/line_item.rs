//! Stock card line items: one inventory movement each.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, LineItemId, NodeId, UserId};

use crate::reason::{Direction, StockCardLineItemReason};

/// Inbound shape of a line item as handed over by persistence.
///
/// Every field is optional here; [`StockCardLineItem::from_draft`] decides
/// whether the record is usable. `stock_on_hand` is accepted so stored rows
/// deserialize, but it is never read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItemDraft {
    pub id: Option<LineItemId>,
    pub occurred_date: Option<NaiveDate>,
    pub processed_date: Option<DateTime<Utc>>,
    pub quantity: Option<i64>,
    pub reason: Option<StockCardLineItemReason>,
    pub reason_free_text: Option<String>,
    pub source: Option<NodeId>,
    pub source_free_text: Option<String>,
    pub destination: Option<NodeId>,
    pub destination_free_text: Option<String>,
    pub document_number: Option<String>,
    pub signature: Option<String>,
    pub user_id: Option<UserId>,
    pub stock_on_hand: Option<i64>,
}

/// A validated movement record.
///
/// Dates and direction are guaranteed present; `stock_on_hand` stays `None`
/// until a stock card calculation writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockCardLineItem {
    id: LineItemId,
    occurred_date: NaiveDate,
    processed_date: DateTime<Utc>,
    quantity: u32,
    direction: Direction,
    reason: Option<StockCardLineItemReason>,
    reason_free_text: Option<String>,
    source: Option<NodeId>,
    source_free_text: Option<String>,
    destination: Option<NodeId>,
    destination_free_text: Option<String>,
    document_number: Option<String>,
    signature: Option<String>,
    user_id: Option<UserId>,
    stock_on_hand: Option<i64>,
}

impl StockCardLineItem {
    /// Create a bare movement with a fresh id and no metadata.
    pub fn new(
        occurred_date: NaiveDate,
        processed_date: DateTime<Utc>,
        quantity: u32,
        direction: Direction,
    ) -> Self {
        Self {
            id: LineItemId::new(),
            occurred_date,
            processed_date,
            quantity,
            direction,
            reason: None,
            reason_free_text: None,
            source: None,
            source_free_text: None,
            destination: None,
            destination_free_text: None,
            document_number: None,
            signature: None,
            user_id: None,
            stock_on_hand: None,
        }
    }

    /// Validate a draft and resolve its direction.
    ///
    /// A source node makes the movement a receipt (credit), a destination
    /// node makes it an issue (debit). Otherwise the reason type decides.
    /// A reason that contradicts the node is rejected rather than guessed.
    pub fn from_draft(draft: LineItemDraft) -> DomainResult<Self> {
        let occurred_date = draft
            .occurred_date
            .ok_or_else(|| DomainError::invalid_record("occurred_date is missing"))?;
        let processed_date = draft
            .processed_date
            .ok_or_else(|| DomainError::invalid_record("processed_date is missing"))?;
        let quantity = resolve_quantity(draft.quantity)?;
        let direction = resolve_direction(&draft)?;

        if draft.reason_free_text.is_some()
            && !draft.reason.as_ref().is_some_and(|r| r.is_free_text_allowed)
        {
            return Err(DomainError::invalid_record(
                "reason_free_text is not allowed for this reason",
            ));
        }

        Ok(Self {
            id: draft.id.unwrap_or_default(),
            occurred_date,
            processed_date,
            quantity,
            direction,
            reason: draft.reason,
            reason_free_text: draft.reason_free_text,
            source: draft.source,
            source_free_text: draft.source_free_text,
            destination: draft.destination,
            destination_free_text: draft.destination_free_text,
            document_number: draft.document_number,
            signature: draft.signature,
            user_id: draft.user_id,
            stock_on_hand: None,
        })
    }

    pub fn with_id(mut self, id: LineItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_document_number(mut self, document_number: impl Into<String>) -> Self {
        self.document_number = Some(document_number.into());
        self
    }

    pub fn id_typed(&self) -> LineItemId {
        self.id
    }

    pub fn occurred_date(&self) -> NaiveDate {
        self.occurred_date
    }

    pub fn processed_date(&self) -> DateTime<Utc> {
        self.processed_date
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Correct the quantity. Balances are stale until the card is recalculated.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }

    pub fn reason(&self) -> Option<&StockCardLineItemReason> {
        self.reason.as_ref()
    }

    pub fn reason_free_text(&self) -> Option<&str> {
        self.reason_free_text.as_deref()
    }

    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    pub fn source_free_text(&self) -> Option<&str> {
        self.source_free_text.as_deref()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    pub fn destination_free_text(&self) -> Option<&str> {
        self.destination_free_text.as_deref()
    }

    pub fn document_number(&self) -> Option<&str> {
        self.document_number.as_deref()
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Balance after this movement, or `None` if no calculation ran yet.
    pub fn stock_on_hand(&self) -> Option<i64> {
        self.stock_on_hand
    }

    /// Apply this movement on top of `previous` and record the result.
    pub fn calculate_stock_on_hand(&mut self, previous: i64) -> DomainResult<i64> {
        let soh = self.direction.apply(previous, self.quantity).ok_or_else(|| {
            DomainError::invariant(format!(
                "stock on hand overflow applying {} {} to {previous}",
                self.direction, self.quantity
            ))
        })?;
        self.stock_on_hand = Some(soh);
        Ok(soh)
    }

    pub(crate) fn clear_stock_on_hand(&mut self) {
        self.stock_on_hand = None;
    }
}

impl Entity for StockCardLineItem {
    type Id = LineItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn resolve_quantity(quantity: Option<i64>) -> DomainResult<u32> {
    let quantity = quantity.ok_or_else(|| DomainError::invalid_record("quantity is missing"))?;
    if quantity < 0 {
        return Err(DomainError::invalid_record(format!(
            "quantity must be non-negative, got {quantity}"
        )));
    }
    u32::try_from(quantity)
        .map_err(|_| DomainError::invalid_record(format!("quantity {quantity} is out of range")))
}

fn resolve_direction(draft: &LineItemDraft) -> DomainResult<Direction> {
    let from_node = match (draft.source, draft.destination) {
        (Some(_), Some(_)) => {
            return Err(DomainError::invalid_record(
                "line item cannot have both a source and a destination",
            ));
        }
        (Some(_), None) => Some(Direction::Credit),
        (None, Some(_)) => Some(Direction::Debit),
        (None, None) => None,
    };
    let from_reason = draft.reason.as_ref().and_then(StockCardLineItemReason::direction);

    match (from_node, from_reason) {
        (Some(node), Some(reason)) if node != reason => Err(DomainError::invalid_record(format!(
            "reason direction {reason} contradicts {node} implied by source/destination"
        ))),
        (Some(direction), _) | (None, Some(direction)) => Ok(direction),
        (None, None) => Err(DomainError::invalid_record(
            "no credit/debit direction: needs a credit or debit reason, a source or a destination",
        )),
    }
}

/// Shared handle to a line item.
///
/// Stock cards hold their items through this handle so a shallow copy can
/// own a separate sequence while pointing at the same records. Field changes
/// made through one handle are visible through every clone of it.
#[derive(Debug, Clone)]
pub struct SharedLineItem(Rc<RefCell<StockCardLineItem>>);

impl SharedLineItem {
    pub fn new(item: StockCardLineItem) -> Self {
        Self(Rc::new(RefCell::new(item)))
    }

    /// Panics if the item is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, StockCardLineItem> {
        self.0.borrow()
    }

    /// Panics if the item is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, StockCardLineItem> {
        self.0.borrow_mut()
    }

    /// `true` if both handles point at the same record.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Detached copy of the record's current contents.
    pub fn snapshot(&self) -> StockCardLineItem {
        self.0.borrow().clone()
    }
}

impl From<StockCardLineItem> for SharedLineItem {
    fn from(item: StockCardLineItem) -> Self {
        Self::new(item)
    }
}

impl Serialize for SharedLineItem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.borrow().serialize(serializer)
    }
}
