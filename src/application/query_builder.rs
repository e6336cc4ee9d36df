//! Translation of list-screen filter state into store queries, and the
//! reference evaluation of a query over an in-memory row set.

use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::{ListQuery, TradePage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Filter controls as the list screen holds them: raw text, a status string
/// that may or may not be valid, and the paging position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: Option<usize>,
}

pub struct QueryBuilder;

impl QueryBuilder {
    pub fn build(state: &FilterState) -> ListQuery {
        ListQuery {
            text: state
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from),
            // Unrecognized statuses mean "no status filter".
            status: state.status.as_deref().and_then(|s| s.parse().ok()),
            from: state.from,
            to: state.to,
            page: state.page,
            page_size: clamp_page_size(state.page_size),
        }
    }

    /// Parse the list endpoint's query string (`q`, `status`, `from`, `to`,
    /// `page`, `pageSize`).
    pub fn from_params(params: &HashMap<String, String>) -> Result<ListQuery, DomainError> {
        let state = FilterState {
            q: params.get("q").cloned(),
            status: params.get("status").cloned(),
            from: parse_date_param(params, "from")?,
            to: parse_date_param(params, "to")?,
            page: parse_usize_param(params, "page")?.unwrap_or(0),
            page_size: parse_usize_param(params, "pageSize")?,
        };
        Ok(Self::build(&state))
    }

    /// Inverse of [`QueryBuilder::from_params`], for clients of the endpoint.
    pub fn to_params(query: &ListQuery) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(text) = &query.text {
            params.push(("q", text.clone()));
        }
        if let Some(status) = query.status {
            params.push(("status", status.to_string()));
        }
        if let Some(from) = query.from {
            params.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = query.to {
            params.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        params.push(("page", query.page.to_string()));
        params.push(("pageSize", query.page_size.to_string()));
        params
    }
}

fn clamp_page_size(requested: Option<usize>) -> usize {
    match requested {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(n) => n.min(MAX_PAGE_SIZE),
    }
}

fn parse_date_param(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<NaiveDate>, DomainError> {
    match params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DomainError::Validation(format!("{key} must be YYYY-MM-DD, got {raw}"))),
    }
}

fn parse_usize_param(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<usize>, DomainError> {
    match params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| DomainError::Validation(format!("{key} must be a non-negative integer"))),
    }
}

pub fn matches(query: &ListQuery, trade: &Trade) -> bool {
    if let Some(text) = &query.text {
        let needle = text.to_lowercase();
        let hit = [&trade.counterparty, &trade.item_sku, &trade.item_name]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if let Some(status) = query.status {
        if trade.status != status {
            return false;
        }
    }
    if let Some(from) = query.from {
        if trade.trade_date < from {
            return false;
        }
    }
    if let Some(to) = query.to {
        if trade.trade_date > to {
            return false;
        }
    }
    true
}

/// Filter, sort by trade date descending and cut out the requested page.
/// `rows` must be ordered newest-created first so that equal dates keep that order.
pub fn select_page<'a, I>(query: &ListQuery, rows: I) -> TradePage
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut matched: Vec<&Trade> = rows.into_iter().filter(|t| matches(query, t)).collect();
    matched.sort_by(|a, b| b.trade_date.cmp(&a.trade_date));

    let total = matched.len();
    let start = query.page.saturating_mul(query.page_size);
    let rows = matched
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .cloned()
        .collect();
    TradePage { total, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::category::Category;
    use crate::domain::values::trade_status::TradeStatus;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn trade(id: &str, day: &str, counterparty: &str, status: TradeStatus) -> Trade {
        Trade {
            id: id.into(),
            trade_date: date(day),
            counterparty: counterparty.into(),
            trade_type: Category::Stationery,
            item_sku: format!("SKU-{id}"),
            item_name: "notebook".into(),
            quantity: 1.0,
            price: 1.0,
            amount: 1.0,
            status,
            notes: None,
        }
    }

    fn sample() -> Vec<Trade> {
        vec![
            trade("t1", "2025-09-12", "ABC Trading", TradeStatus::Confirmed),
            trade("t2", "2025-09-15", "DEF Goods", TradeStatus::New),
            trade("t3", "2025-09-18", "GHI Imports", TradeStatus::Cancelled),
        ]
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let query = QueryBuilder::build(&FilterState {
            from: Some(date("2025-09-13")),
            to: Some(date("2025-09-18")),
            ..Default::default()
        });
        let page = select_page(&query, &sample());
        let ids: Vec<&str> = page.rows.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2"]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_second_page_holds_remainder() {
        let query = QueryBuilder::build(&FilterState {
            page: 1,
            page_size: Some(2),
            ..Default::default()
        });
        let page = select_page(&query, &sample());
        assert_eq!(page.total, 3);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, "t1");
    }

    #[test]
    fn test_text_matches_any_field_case_insensitively() {
        let rows = sample();
        let by_party = QueryBuilder::build(&FilterState {
            q: Some("def".into()),
            ..Default::default()
        });
        assert_eq!(select_page(&by_party, &rows).total, 1);

        let by_sku = QueryBuilder::build(&FilterState {
            q: Some("sku-T3".into()),
            ..Default::default()
        });
        assert_eq!(select_page(&by_sku, &rows).rows[0].id, "t3");

        let by_item = QueryBuilder::build(&FilterState {
            q: Some("NOTE".into()),
            ..Default::default()
        });
        assert_eq!(select_page(&by_item, &rows).total, 3);
    }

    #[test]
    fn test_unknown_status_is_ignored() {
        let query = QueryBuilder::build(&FilterState {
            status: Some("SHIPPED".into()),
            ..Default::default()
        });
        assert_eq!(query.status, None);
        assert_eq!(select_page(&query, &sample()).total, 3);

        let confirmed = QueryBuilder::build(&FilterState {
            status: Some("confirmed".into()),
            ..Default::default()
        });
        assert_eq!(select_page(&confirmed, &sample()).total, 1);
    }

    #[test]
    fn test_blank_text_and_page_size_defaults() {
        let query = QueryBuilder::build(&FilterState {
            q: Some("   ".into()),
            page_size: Some(0),
            ..Default::default()
        });
        assert_eq!(query.text, None);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);

        let huge = QueryBuilder::build(&FilterState {
            page_size: Some(50_000),
            ..Default::default()
        });
        assert_eq!(huge.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_params_round_trip() {
        let query = QueryBuilder::build(&FilterState {
            q: Some("abc".into()),
            status: Some("NEW".into()),
            from: Some(date("2025-09-01")),
            to: Some(date("2025-09-30")),
            page: 2,
            page_size: Some(10),
        });
        let params: HashMap<String, String> = QueryBuilder::to_params(&query)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(QueryBuilder::from_params(&params).unwrap(), query);
    }

    #[test]
    fn test_bad_date_param_is_rejected() {
        let mut params = HashMap::new();
        params.insert("from".to_string(), "09/13/2025".to_string());
        assert!(matches!(
            QueryBuilder::from_params(&params),
            Err(DomainError::Validation(_))
        ));
    }
}
