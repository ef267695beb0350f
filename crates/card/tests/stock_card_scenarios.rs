//! End-to-end scenarios through the public API: rows come in as JSON the way
//! a persistence layer would hand them over.

use chrono::{Duration, NaiveDate};
use serde_json::json;

use stockledger_card::{Direction, LineItemDraft, StockCard, StockCardKey};
use stockledger_core::{DomainError, FacilityId, LotId, OrderableId, ProgramId};

fn init_logging() {
    stockledger_observability::init();
}

fn key() -> StockCardKey {
    StockCardKey::new(FacilityId::new(), ProgramId::new(), OrderableId::new()).with_lot(LotId::new())
}

fn drafts(rows: serde_json::Value) -> Vec<LineItemDraft> {
    serde_json::from_value(rows).unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn receive_issue_and_adjust_over_a_month() {
    init_logging();
    let receive_node = FacilityId::new().to_string();
    let issue_node = FacilityId::new().to_string();
    let rows = json!([
        {
            "occurred_date": "2017-03-20",
            "processed_date": "2017-03-20T09:00:00Z",
            "quantity": 30,
            "destination": issue_node,
            "document_number": "ISS-7"
        },
        {
            "occurred_date": "2017-03-01",
            "processed_date": "2017-03-02T10:00:00Z",
            "quantity": 100,
            "source": receive_node
        },
        {
            "occurred_date": "2017-03-10",
            "processed_date": "2017-03-25T16:30:00Z",
            "quantity": 5,
            "reason": {"name": "Damage", "reason_type": "DEBIT", "reason_category": "ADJUSTMENT"},
            "stock_on_hand": 12345
        }
    ]);

    let mut card = StockCard::from_drafts(key(), drafts(rows)).unwrap();
    assert_eq!(card.stock_on_hand(), None);

    assert_eq!(card.calculate_stock_on_hand().unwrap(), 65);

    let occurred: Vec<NaiveDate> = card
        .line_items()
        .iter()
        .map(|item| item.borrow().occurred_date())
        .collect();
    assert_eq!(occurred, vec![date("2017-03-20"), date("2017-03-10"), date("2017-03-01")]);

    let balances: Vec<Option<i64>> = card
        .line_items()
        .iter()
        .map(|item| item.borrow().stock_on_hand())
        .collect();
    assert_eq!(balances, vec![Some(65), Some(95), Some(100)]);

    assert_eq!(card.stock_on_hand_as_of(date("2017-02-28")), None);
    assert_eq!(card.stock_on_hand_as_of(date("2017-03-05")), Some(100));
    assert_eq!(card.stock_on_hand_as_of(date("2017-03-15")), Some(95));
    assert_eq!(card.stock_on_hand_as_of(date("2017-04-01")), Some(65));

    let issue = card.line_item_as_of_date(date("2017-03-31")).unwrap();
    assert_eq!(issue.borrow().direction(), Direction::Debit);
    assert_eq!(issue.borrow().document_number(), Some("ISS-7"));
}

#[test]
fn invalid_row_aborts_the_whole_card() {
    init_logging();
    let rows = json!([
        {
            "occurred_date": "2017-03-01",
            "processed_date": "2017-03-01T10:00:00Z",
            "quantity": 10,
            "reason": {"name": "Receive", "reason_type": "CREDIT", "reason_category": "TRANSFER"}
        },
        {
            "occurred_date": "2017-03-02",
            "quantity": 10,
            "reason": {"name": "Receive", "reason_type": "CREDIT", "reason_category": "TRANSFER"}
        }
    ]);

    let err = StockCard::from_drafts(key(), drafts(rows)).unwrap_err();
    match err {
        DomainError::InvalidRecord(msg) => {
            assert!(msg.starts_with("line item #1"));
            assert!(msg.contains("processed_date"));
        }
        other => panic!("expected invalid record, got {other:?}"),
    }
}

#[test]
fn shallow_copy_survives_independent_recalculation() {
    init_logging();
    let rows = json!([
        {
            "occurred_date": "2017-03-01",
            "processed_date": "2017-03-01T10:00:00Z",
            "quantity": 10,
            "reason": {"name": "Receive", "reason_type": "CREDIT", "reason_category": "TRANSFER"}
        }
    ]);
    let mut card = StockCard::from_drafts(key(), drafts(rows)).unwrap();
    card.calculate_stock_on_hand().unwrap();

    let mut preview = card.shallow_copy();
    let extra = LineItemDraft {
        occurred_date: Some(date("2017-03-02")),
        processed_date: Some(date("2017-03-02").and_hms_opt(8, 0, 0).unwrap().and_utc()),
        quantity: Some(4),
        reason: card.line_items()[0].borrow().reason().cloned(),
        ..LineItemDraft::default()
    };
    preview.push_line_item(stockledger_card::StockCardLineItem::from_draft(extra).unwrap());

    assert_eq!(preview.calculate_stock_on_hand().unwrap(), 14);
    assert_eq!(card.len(), 1);
    assert_eq!(card.stock_on_hand(), Some(10));
    assert_eq!(card.stock_on_hand_as_of(date("2017-03-01") + Duration::days(5)), Some(10));
}

#[test]
fn line_items_serialize_for_reporting() {
    init_logging();
    let rows = json!([
        {
            "occurred_date": "2017-03-01",
            "processed_date": "2017-03-01T10:00:00Z",
            "quantity": 3,
            "reason": {"name": "Receive", "reason_type": "CREDIT", "reason_category": "TRANSFER"}
        }
    ]);
    let mut card = StockCard::from_drafts(key(), drafts(rows)).unwrap();
    card.calculate_stock_on_hand().unwrap();

    let value = serde_json::to_value(&card).unwrap();
    assert_eq!(value["stock_on_hand"], json!(3));
    assert_eq!(value["line_items"][0]["stock_on_hand"], json!(3));
    assert_eq!(value["line_items"][0]["direction"], json!("credit"));
    assert_eq!(value["line_items"][0]["occurred_date"], json!("2017-03-01"));
}
