//! Chronological ordering of line items.
//!
//! Canonical order is **most recent first** by `(occurred_date, processed_date)`,
//! both descending. The occurred date always dominates: a correction recorded
//! today for last week's event still ranks as last week's event. Records tied
//! on both keys keep their relative input order (the sort is stable).

use core::cmp::Ordering;

use crate::line_item::{SharedLineItem, StockCardLineItem};

/// Comparator placing the more recent movement first.
pub fn most_recent_first(a: &StockCardLineItem, b: &StockCardLineItem) -> Ordering {
    b.occurred_date()
        .cmp(&a.occurred_date())
        .then_with(|| b.processed_date().cmp(&a.processed_date()))
}

fn compare_shared(a: &SharedLineItem, b: &SharedLineItem) -> Ordering {
    most_recent_first(&a.borrow(), &b.borrow())
}

/// Sort in place into canonical order.
pub fn sequence(line_items: &mut [SharedLineItem]) {
    line_items.sort_by(compare_shared);
}

/// `true` if `line_items` is already in canonical order.
pub fn is_most_recent_first(line_items: &[SharedLineItem]) -> bool {
    line_items
        .windows(2)
        .all(|pair| compare_shared(&pair[0], &pair[1]) != Ordering::Greater)
}
