mod common;

use common::{date, make_input};
use std::sync::Arc;
use tradedesk::application::query_builder::FilterState;
use tradedesk::domain::entities::working_row::RowEdits;
use tradedesk::domain::error::DomainError;
use tradedesk::domain::ports::record_store::{ListQuery, RecordStore};
use tradedesk::domain::values::trade_status::TradeStatus;
use tradedesk::infrastructure::sqlite::trade_repo::SqliteTradeStore;
use tradedesk::TradeDesk;

fn memory_store() -> SqliteTradeStore {
    SqliteTradeStore::open(":memory:").unwrap()
}

async fn seeded_desk() -> TradeDesk {
    let desk = TradeDesk::with_store(Arc::new(memory_store()));
    desk.seed().await.unwrap();
    desk
}

#[tokio::test]
async fn test_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trades.db");
    let path = path.to_str().unwrap();

    let created = {
        let store = SqliteTradeStore::open(path).unwrap();
        store
            .create(make_input("2025-10-01", "VWX Paper", 6.0, 25.0))
            .await
            .unwrap()
    };

    let reopened = SqliteTradeStore::open(path).unwrap();
    let fetched = reopened.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.amount, 150.0);
}

#[tokio::test]
async fn test_list_orders_newest_first_with_total() {
    let desk = seeded_desk().await;
    let page = desk.list(&FilterState::default()).await.unwrap();
    assert_eq!(page.total, 3);
    let parties: Vec<&str> = page.rows.iter().map(|t| t.counterparty.as_str()).collect();
    assert_eq!(parties, vec!["GHI Imports", "DEF Goods", "ABC Trading"]);
}

#[tokio::test]
async fn test_same_day_rows_list_latest_created_first() {
    let store = memory_store();
    for name in ["first", "second", "third"] {
        store
            .create(make_input("2025-10-01", name, 1.0, 1.0))
            .await
            .unwrap();
    }
    let page = store.list(&ListQuery::default()).await.unwrap();
    let parties: Vec<&str> = page.rows.iter().map(|t| t.counterparty.as_str()).collect();
    assert_eq!(parties, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_filters_combine() {
    let desk = seeded_desk().await;

    let inclusive = desk
        .list(&FilterState {
            from: Some(date("2025-09-15")),
            to: Some(date("2025-09-18")),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(inclusive.total, 2);

    let text_and_status = desk
        .list(&FilterState {
            q: Some("goods".into()),
            status: Some("new".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(text_and_status.total, 1);
    assert_eq!(text_and_status.rows[0].item_name, "bread");

    let none = desk
        .list(&FilterState {
            q: Some("goods".into()),
            status: Some("CANCELLED".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(none.total, 0);
    assert!(none.rows.is_empty());
}

#[tokio::test]
async fn test_like_wildcards_are_literal() {
    let store = memory_store();
    store
        .create(make_input("2025-10-01", "100% Cotton", 1.0, 1.0))
        .await
        .unwrap();
    store
        .create(make_input("2025-10-01", "1000 Cotton", 1.0, 1.0))
        .await
        .unwrap();

    let page = store
        .list(&ListQuery {
            text: Some("0%".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].counterparty, "100% Cotton");
}

#[tokio::test]
async fn test_pagination_reports_full_total() {
    let store = memory_store();
    for day in 1..=7 {
        store
            .create(make_input(&format!("2025-10-{day:02}"), "bulk", 1.0, 1.0))
            .await
            .unwrap();
    }
    let page = store
        .list(&ListQuery {
            page: 2,
            page_size: 3,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 7);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].trade_date, date("2025-10-01"));
}

#[tokio::test]
async fn test_update_delete_and_not_found() {
    let store = memory_store();
    let created = store
        .create(make_input("2025-10-01", "YZ Mart", 2.0, 2.0))
        .await
        .unwrap();

    let mut input = created.to_input();
    input.status = TradeStatus::Confirmed;
    input.notes = Some("rush".into());
    let updated = store.update(&created.id, input.clone()).await.unwrap();
    assert_eq!(updated.status, TradeStatus::Confirmed);
    assert_eq!(updated.notes.as_deref(), Some("rush"));

    assert!(matches!(
        store.update("missing", input).await,
        Err(DomainError::NotFound(_))
    ));
    store.delete(&created.id).await.unwrap();
    assert!(matches!(
        store.delete(&created.id).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_editor_save_against_sqlite() {
    let desk = seeded_desk().await;
    let mut editor = desk.editor(FilterState::default()).await.unwrap();
    let target = editor.rows()[0].id().to_string();

    editor
        .edit_row(
            &target,
            &RowEdits {
                quantity: Some("2".into()),
                ..Default::default()
            },
        )
        .unwrap();
    let report = editor.save().await.unwrap();
    assert_eq!(report.updated(), 1);

    let stored = desk.get(&target).await.unwrap();
    assert_eq!(stored.quantity, 2.0);
    assert_eq!(stored.amount, 32000.0);
}

#[tokio::test]
async fn test_page_beyond_addressable_range_is_empty() {
    let desk = seeded_desk().await;
    let query = ListQuery {
        page: usize::MAX / 2,
        page_size: 50,
        ..Default::default()
    };
    let page = desk.store().list(&query).await.unwrap();
    assert_eq!(page.total, 3);
    assert!(page.rows.is_empty());

    let memory = tradedesk::infrastructure::memory::store::InMemoryRecordStore::seeded();
    let reference = memory.list(&query).await.unwrap();
    assert_eq!(reference.total, page.total);
    assert_eq!(reference.rows.len(), page.rows.len());
}

#[tokio::test]
async fn test_undecodable_row_fails_the_listing() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    tradedesk::infrastructure::sqlite::migrations::run_migrations(&conn).unwrap();
    conn.execute(
        "INSERT INTO trades (id, trade_date, counterparty, trade_type, item_sku, item_name, quantity, price, amount, status, created_at, updated_at)
         VALUES ('bad', 'not-a-date', 'x', 'food', 'S', 'milk', 1, 1, 1, 'NEW', '', '')",
        [],
    )
    .unwrap();
    let store = SqliteTradeStore::new(conn);

    let result = store.list(&ListQuery::default()).await;
    assert!(matches!(result, Err(DomainError::Database(_))));
}
