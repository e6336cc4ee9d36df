mod common;

use common::{date, setup, RecordingStore};
use std::sync::Arc;
use tradedesk::application::query_builder::FilterState;
use tradedesk::application::staged_script::{parse_script, run_script};
use tradedesk::application::trade_editor::TradeEditor;
use tradedesk::domain::error::DomainError;

#[tokio::test]
async fn test_script_stages_then_saves_once() {
    let store = Arc::new(RecordingStore::new());
    let mut editor = TradeEditor::new(store.clone());
    editor.fetch().await.unwrap();

    let actions = parse_script(
        r#"[
            {"op": "add", "edits": {"counterparty": "JKL Co", "quantity": "3"}},
            {"op": "edit", "id": "$1", "edits": {"price": 20, "itemName": "pen"}},
            {"op": "add", "edits": {"counterparty": "throwaway"}},
            {"op": "delete", "id": "$2"},
            {"op": "edit", "id": "t1", "edits": {"notes": "call back"}},
            {"op": "delete", "id": "t3"}
        ]"#,
    )
    .unwrap();

    let report = run_script(&mut editor, &actions, date("2025-10-05"))
        .await
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(store.calls(), vec!["create:JKL Co", "update:t1", "delete:t3"]);

    let added = editor
        .rows()
        .iter()
        .find(|r| r.trade.counterparty == "JKL Co")
        .unwrap();
    assert_eq!(added.trade.trade_date, date("2025-10-05"));
    assert_eq!(added.trade.amount, 60.0);
    assert_eq!(
        editor.row("t1").unwrap().trade.notes.as_deref(),
        Some("call back")
    );
}

#[tokio::test]
async fn test_bad_reference_aborts_before_any_call() {
    let store = Arc::new(RecordingStore::new());
    let mut editor = TradeEditor::new(store.clone());
    editor.fetch().await.unwrap();

    let actions = parse_script(
        r#"[
            {"op": "delete", "id": "t1"},
            {"op": "edit", "id": "$1", "edits": {"price": 1}}
        ]"#,
    )
    .unwrap();

    let err = run_script(&mut editor, &actions, date("2025-10-05"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_deleting_unknown_row_aborts() {
    let desk = setup();
    let actions = parse_script(r#"[{"op": "delete", "id": "t99"}]"#).unwrap();
    assert!(desk.apply(&actions, date("2025-10-05")).await.is_err());
    assert_eq!(desk.list(&FilterState::default()).await.unwrap().total, 3);
}

#[tokio::test]
async fn test_desk_apply_persists_changes() {
    let desk = setup();
    let actions = parse_script(
        r#"[{"op": "edit", "id": "t2", "edits": {"status": "CONFIRMED", "quantity": 5}}]"#,
    )
    .unwrap();
    let report = desk.apply(&actions, date("2025-10-05")).await.unwrap();
    assert_eq!(report.updated(), 1);

    let t2 = desk.get("t2").await.unwrap();
    assert_eq!(t2.quantity, 5.0);
    assert_eq!(t2.amount, 400.0);
}
