use crate::application::diff_tracker::DiffTracker;
use crate::domain::entities::trade::compute_amount;
use crate::domain::entities::working_row::WorkingRow;
use crate::domain::values::numeric::finite_or_zero;

/// Reconciles a user edit: derived fields are recomputed from the edited
/// row, never taken from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditReconciler;

impl EditReconciler {
    pub fn new() -> Self {
        Self
    }

    pub fn apply_edit(
        &self,
        old_row: &WorkingRow,
        new_row: WorkingRow,
        tracker: &mut DiffTracker,
    ) -> WorkingRow {
        let mut row = new_row;
        // Identity and persistence state are not editable.
        row.trade.id = old_row.trade.id.clone();
        row.is_new = old_row.is_new;

        row.trade.quantity = finite_or_zero(row.trade.quantity);
        row.trade.price = finite_or_zero(row.trade.price);
        row.trade.amount = compute_amount(row.trade.quantity, row.trade.price);

        if row.trade.trade_type != old_row.trade.trade_type
            && !row.trade.trade_type.allows_item(&row.trade.item_name)
        {
            tracing::debug!(
                id = %row.trade.id,
                item = %row.trade.item_name,
                category = %row.trade.trade_type,
                "item not offered in new category, clearing"
            );
            row.trade.item_name.clear();
        }

        if !row.is_new {
            tracker.mark_edited(&row.trade.id);
        }
        tracker.mark_dirty();
        row
    }
}
