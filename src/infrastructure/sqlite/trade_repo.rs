use crate::domain::entities::trade::{Trade, TradeInput};
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::{ListQuery, RecordStore, TradePage};
use crate::domain::values::trade_id::resolve_create_id;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::NaiveDate;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};

const SELECT_COLS: &str = "id, trade_date, counterparty, trade_type, item_sku, item_name, quantity, price, amount, status, notes";

pub struct SqliteTradeStore {
    conn: Mutex<Connection>,
}

impl SqliteTradeStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (or create) the database at `path` and bring its schema up to date.
    /// `:memory:` gives a private throwaway database.
    pub fn open(path: &str) -> Result<Self, DomainError> {
        let conn = Connection::open(path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        if path != ":memory:" {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        }
        run_migrations(&conn)?;
        Ok(Self::new(conn))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    fn row_to_trade(row: &rusqlite::Row) -> Result<Trade, rusqlite::Error> {
        let date_str: String = row.get(1)?;
        let type_str: String = row.get(3)?;
        let status_str: String = row.get(9)?;

        let trade_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Trade {
            id: row.get(0)?,
            trade_date,
            counterparty: row.get(2)?,
            trade_type: type_str.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %type_str, "invalid category in trade row, using default");
                Default::default()
            }),
            item_sku: row.get(4)?,
            item_name: row.get(5)?,
            quantity: row.get(6)?,
            price: row.get(7)?,
            amount: row.get(8)?,
            status: status_str.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %status_str, "invalid status in trade row, using NEW");
                Default::default()
            }),
            notes: row.get(10)?,
        })
    }

    fn where_clause(query: &ListQuery) -> (String, Vec<Box<dyn ToSql>>) {
        let mut sql = String::from(" WHERE 1=1");
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(text) = &query.text {
            let n = param_values.len() + 1;
            sql.push_str(&format!(
                " AND (counterparty LIKE ?{n} ESCAPE '\\' OR item_sku LIKE ?{n} ESCAPE '\\' OR item_name LIKE ?{n} ESCAPE '\\')"
            ));
            param_values.push(Box::new(format!("%{}%", escape_like(text))));
        }
        if let Some(status) = query.status {
            sql.push_str(&format!(" AND status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status.to_string()));
        }
        if let Some(from) = query.from {
            sql.push_str(&format!(" AND trade_date >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = query.to {
            sql.push_str(&format!(" AND trade_date <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(to.format("%Y-%m-%d").to_string()));
        }
        (sql, param_values)
    }
}

fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn not_found(id: &str) -> DomainError {
    DomainError::NotFound(format!("Trade not found: {id}"))
}

// Statements run synchronously under the connection lock; the async trait
// methods below only delegate, so no lock is ever held across an await.
impl SqliteTradeStore {
    fn list_rows(&self, query: &ListQuery) -> Result<TradePage, DomainError> {
        let conn = self.lock()?;
        let (where_sql, mut param_values) = Self::where_clause(query);

        let total: i64 = {
            let refs: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
            conn.query_row(
                &format!("SELECT COUNT(*) FROM trades{where_sql}"),
                refs.as_slice(),
                |row| row.get(0),
            )?
        };

        let total = total as usize;
        // A page past what SQLite can address is simply empty.
        let Some(offset) = query
            .page
            .checked_mul(query.page_size)
            .and_then(|start| i64::try_from(start).ok())
        else {
            return Ok(TradePage {
                total,
                rows: Vec::new(),
            });
        };
        let limit = i64::try_from(query.page_size).unwrap_or(i64::MAX);

        let mut sql = format!("SELECT {SELECT_COLS} FROM trades{where_sql}");
        sql.push_str(" ORDER BY trade_date DESC, seq DESC");
        sql.push_str(&format!(
            " LIMIT ?{} OFFSET ?{}",
            param_values.len() + 1,
            param_values.len() + 2
        ));
        param_values.push(Box::new(limit));
        param_values.push(Box::new(offset));

        let refs: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(refs.as_slice(), Self::row_to_trade)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                tracing::warn!(error = %e, "undecodable trade row");
                DomainError::from(e)
            })?;

        Ok(TradePage { total, rows })
    }

    fn find_row(&self, id: &str) -> Result<Trade, DomainError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {SELECT_COLS} FROM trades WHERE id = ?1"),
            params![id],
            Self::row_to_trade,
        )
        .optional()?
        .ok_or_else(|| not_found(id))
    }

    fn insert_row(&self, input: TradeInput) -> Result<Trade, DomainError> {
        input.validate()?;
        let conn = self.lock()?;
        let id = resolve_create_id(input.id.as_deref());
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM trades WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(DomainError::Validation(format!("Trade id already exists: {id}")));
        }

        let trade = Trade::from_input(id, input);
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO trades (id, trade_date, counterparty, trade_type, item_sku, item_name, quantity, price, amount, status, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                trade.id,
                trade.trade_date.format("%Y-%m-%d").to_string(),
                trade.counterparty,
                trade.trade_type.to_string(),
                trade.item_sku,
                trade.item_name,
                trade.quantity,
                trade.price,
                trade.amount,
                trade.status.to_string(),
                trade.notes,
                now,
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add trade: {e}")))?;
        tracing::info!(id = %trade.id, "trade created");
        Ok(trade)
    }

    fn replace_row(&self, id: &str, input: TradeInput) -> Result<Trade, DomainError> {
        input.validate()?;
        let conn = self.lock()?;
        let trade = Trade::from_input(id.to_string(), input);
        let rows = conn
            .execute(
                "UPDATE trades SET trade_date = ?1, counterparty = ?2, trade_type = ?3, item_sku = ?4, item_name = ?5,
                 quantity = ?6, price = ?7, amount = ?8, status = ?9, notes = ?10, updated_at = ?11 WHERE id = ?12",
                params![
                    trade.trade_date.format("%Y-%m-%d").to_string(),
                    trade.counterparty,
                    trade.trade_type.to_string(),
                    trade.item_sku,
                    trade.item_name,
                    trade.quantity,
                    trade.price,
                    trade.amount,
                    trade.status.to_string(),
                    trade.notes,
                    chrono::Utc::now().to_rfc3339(),
                    id,
                ],
            )
            .map_err(|e| DomainError::Database(format!("Failed to update trade: {e}")))?;
        if rows == 0 {
            return Err(not_found(id));
        }
        tracing::info!(%id, "trade updated");
        Ok(trade)
    }

    fn delete_row(&self, id: &str) -> Result<(), DomainError> {
        let conn = self.lock()?;
        let rows = conn
            .execute("DELETE FROM trades WHERE id = ?1", params![id])
            .map_err(|e| DomainError::Database(format!("Failed to delete trade: {e}")))?;
        if rows == 0 {
            return Err(not_found(id));
        }
        tracing::info!(%id, "trade deleted");
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for SqliteTradeStore {
    async fn list(&self, query: &ListQuery) -> Result<TradePage, DomainError> {
        self.list_rows(query)
    }

    async fn get(&self, id: &str) -> Result<Trade, DomainError> {
        self.find_row(id)
    }

    async fn create(&self, input: TradeInput) -> Result<Trade, DomainError> {
        self.insert_row(input)
    }

    async fn update(&self, id: &str, input: TradeInput) -> Result<Trade, DomainError> {
        self.replace_row(id, input)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.delete_row(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
