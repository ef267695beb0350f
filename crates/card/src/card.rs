use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockledger_core::{
    DomainResult, Entity, FacilityId, LotId, OrderableId, ProgramId, StockCardId,
};

use crate::line_item::{LineItemDraft, SharedLineItem, StockCardLineItem};
use crate::ordering;

/// What a stock card tracks: one orderable (optionally one lot) at one
/// facility under one program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockCardKey {
    pub facility_id: FacilityId,
    pub program_id: ProgramId,
    pub orderable_id: OrderableId,
    pub lot_id: Option<LotId>,
}

impl StockCardKey {
    pub fn new(facility_id: FacilityId, program_id: ProgramId, orderable_id: OrderableId) -> Self {
        Self {
            facility_id,
            program_id,
            orderable_id,
            lot_id: None,
        }
    }

    pub fn with_lot(mut self, lot_id: LotId) -> Self {
        self.lot_id = Some(lot_id);
        self
    }
}

/// Stock card: the movement ledger of one stock-keeping unit.
///
/// The card owns the *sequence* of its line items; the items themselves are
/// [`SharedLineItem`] handles and may be shared with shallow copies.
///
/// Balances are derived. [`StockCard::stock_on_hand`] is `None` until
/// [`StockCard::calculate_stock_on_hand`] runs, and goes back to `None`
/// whenever the sequence changes.
#[derive(Debug, Serialize)]
pub struct StockCard {
    id: StockCardId,
    key: StockCardKey,
    line_items: Vec<SharedLineItem>,
    stock_on_hand: Option<i64>,
}

impl StockCard {
    /// Empty card with a fresh id.
    pub fn new(key: StockCardKey) -> Self {
        Self {
            id: StockCardId::new(),
            key,
            line_items: Vec::new(),
            stock_on_hand: None,
        }
    }

    pub fn with_id(mut self, id: StockCardId) -> Self {
        self.id = id;
        self
    }

    /// Attach line items in whatever order storage returned them.
    pub fn with_line_items<I, T>(mut self, line_items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SharedLineItem>,
    {
        self.line_items.extend(line_items.into_iter().map(Into::into));
        self.stock_on_hand = None;
        self
    }

    /// Build a card from persisted rows, rejecting the batch on the first
    /// unusable row.
    pub fn from_drafts<I>(key: StockCardKey, drafts: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = LineItemDraft>,
    {
        let mut card = Self::new(key);
        for (index, draft) in drafts.into_iter().enumerate() {
            let item = StockCardLineItem::from_draft(draft).map_err(|err| {
                let err = err.at_index(index);
                tracing::warn!(stock_card_id = %card.id, error = %err, "rejected line item");
                err
            })?;
            card.line_items.push(SharedLineItem::new(item));
        }
        Ok(card)
    }

    pub fn id_typed(&self) -> StockCardId {
        self.id
    }

    pub fn key(&self) -> &StockCardKey {
        &self.key
    }

    /// Line items in current storage order (most recent first after a calculation).
    pub fn line_items(&self) -> &[SharedLineItem] {
        &self.line_items
    }

    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Current balance, or `None` if the card has not been calculated since
    /// its sequence last changed.
    pub fn stock_on_hand(&self) -> Option<i64> {
        self.stock_on_hand
    }

    pub fn push_line_item(&mut self, line_item: impl Into<SharedLineItem>) {
        self.line_items.push(line_item.into());
        self.stock_on_hand = None;
    }

    pub fn remove_line_item(&mut self, index: usize) -> Option<SharedLineItem> {
        if index >= self.line_items.len() {
            return None;
        }
        self.stock_on_hand = None;
        Some(self.line_items.remove(index))
    }

    pub fn retain_line_items<F>(&mut self, mut keep: F)
    where
        F: FnMut(&StockCardLineItem) -> bool,
    {
        let before = self.line_items.len();
        self.line_items.retain(|item| keep(&*item.borrow()));
        if self.line_items.len() != before {
            self.stock_on_hand = None;
        }
    }

    /// Recompute the running balance of every line item.
    ///
    /// Post-conditions on success:
    /// - the stored sequence is most recent first (iteration order changes);
    /// - each item's `stock_on_hand` is the balance after applying it, walking
    ///   oldest to newest from zero;
    /// - the card's balance is that of the most recent item (zero when empty).
    ///
    /// On overflow every balance on the card is cleared and the error returned.
    /// With `u32` quantities that takes billions of movements.
    pub fn calculate_stock_on_hand(&mut self) -> DomainResult<i64> {
        ordering::sequence(&mut self.line_items);
        self.accumulate_from(0)
    }

    /// Walk the (already sequenced) items oldest to newest starting at `opening`.
    fn accumulate_from(&mut self, opening: i64) -> DomainResult<i64> {
        self.stock_on_hand = None;

        let mut balance = opening;
        for item in self.line_items.iter().rev() {
            let applied = item.borrow_mut().calculate_stock_on_hand(balance);
            match applied {
                Ok(soh) => balance = soh,
                Err(err) => {
                    tracing::warn!(stock_card_id = %self.id, error = %err, "stock on hand calculation failed");
                    for item in &self.line_items {
                        item.borrow_mut().clear_stock_on_hand();
                    }
                    return Err(err);
                }
            }
        }

        self.stock_on_hand = Some(balance);
        tracing::debug!(
            stock_card_id = %self.id,
            line_items = self.line_items.len(),
            stock_on_hand = balance,
            "calculated stock on hand"
        );
        Ok(balance)
    }

    /// Most recent line item that occurred on or before `date`.
    ///
    /// Ranks by the canonical ordering itself, so it answers correctly even
    /// when the card has not been calculated yet.
    pub fn line_item_as_of_date(&self, date: NaiveDate) -> Option<SharedLineItem> {
        self.line_items
            .iter()
            .filter(|item| item.borrow().occurred_date() <= date)
            .min_by(|a, b| ordering::most_recent_first(&a.borrow(), &b.borrow()))
            .cloned()
    }

    /// Balance in effect at the end of `date`.
    ///
    /// `None` when nothing had happened yet by then, or when the card needs
    /// recalculating (per-item balances may be stale after a container change).
    pub fn stock_on_hand_as_of(&self, date: NaiveDate) -> Option<i64> {
        self.stock_on_hand?;
        self.line_item_as_of_date(date)
            .and_then(|item| item.borrow().stock_on_hand())
    }

    /// New card with its own sequence but the same line item records.
    ///
    /// Adding, removing or reordering items on the copy never touches this
    /// card. Changing a shared item's fields is visible through both, and that
    /// includes balances: calculating the copy overwrites the per-item
    /// `stock_on_hand` this card's items report, while this card keeps its own
    /// cached total.
    pub fn shallow_copy(&self) -> Self {
        Self {
            id: self.id,
            key: self.key,
            line_items: self.line_items.clone(),
            stock_on_hand: self.stock_on_hand,
        }
    }
}

impl Entity for StockCard {
    type Id = StockCardId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
