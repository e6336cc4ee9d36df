pub mod csv_export;
pub mod diff_tracker;
pub mod edit_reconciler;
pub mod query_builder;
pub mod save_orchestrator;
pub mod staged_script;
pub mod trade;
pub mod trade_editor;
