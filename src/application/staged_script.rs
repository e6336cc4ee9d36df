//! Scripted editing sessions: a list of staged actions applied to a
//! [`TradeEditor`] as a user would, followed by one save.
//!
//! Rows added by the script have no id the author can know in advance, so
//! later actions refer to them as `"$1"`, `"$2"`, ... in order of addition.

use crate::application::save_orchestrator::SaveReport;
use crate::application::trade_editor::TradeEditor;
use crate::domain::entities::working_row::RowEdits;
use crate::domain::error::DomainError;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum StagedAction {
    Add {
        #[serde(default)]
        edits: RowEdits,
    },
    Edit {
        id: String,
        edits: RowEdits,
    },
    Delete {
        id: String,
    },
}

pub fn parse_script(json: &str) -> Result<Vec<StagedAction>, DomainError> {
    serde_json::from_str(json).map_err(|e| DomainError::InvalidInput(format!("Bad script: {e}")))
}

fn resolve<'a>(id: &'a str, added: &'a [String]) -> Result<&'a str, DomainError> {
    match id.strip_prefix('$') {
        None => Ok(id),
        Some(n) => n
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| added.get(i))
            .map(String::as_str)
            .ok_or_else(|| DomainError::InvalidInput(format!("No added row for reference {id}"))),
    }
}

/// Stage every action on `editor` (which must already be fetched), then save.
/// A bad action aborts before anything is sent to the store.
pub async fn run_script(
    editor: &mut TradeEditor,
    actions: &[StagedAction],
    today: NaiveDate,
) -> Result<SaveReport, DomainError> {
    let mut added: Vec<String> = Vec::new();
    for action in actions {
        match action {
            StagedAction::Add { edits } => {
                let id = editor.add_row(today);
                if !edits.is_empty() {
                    editor.edit_row(&id, edits)?;
                }
                added.push(id);
            }
            StagedAction::Edit { id, edits } => {
                let id = resolve(id, &added)?.to_string();
                editor.edit_row(&id, edits)?;
            }
            StagedAction::Delete { id } => {
                let id = resolve(id, &added)?.to_string();
                if editor.delete_rows(&[id.clone()]) == 0 {
                    return Err(DomainError::InvalidInput(format!("No row with id {id}")));
                }
            }
        }
    }
    tracing::debug!(actions = actions.len(), "script staged, saving");
    editor.save().await
}
