use crate::domain::error::DomainError;
use crate::domain::values::category::Category;
use crate::domain::values::numeric::finite_or_zero;
use crate::domain::values::trade_status::TradeStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A persisted trade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub trade_date: NaiveDate,
    pub counterparty: String,
    #[serde(rename = "type")]
    pub trade_type: Category,
    pub item_sku: String,
    pub item_name: String,
    pub quantity: f64,
    pub price: f64,
    /// Always `quantity * price`; recomputed on every write.
    pub amount: f64,
    pub status: TradeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Write payload for create and update. Unknown keys are rejected; a
/// client-supplied `amount` is accepted on the wire but never used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TradeInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub trade_date: NaiveDate,
    pub counterparty: String,
    #[serde(rename = "type")]
    pub trade_type: Category,
    pub item_sku: String,
    pub item_name: String,
    pub quantity: f64,
    pub price: f64,
    pub status: TradeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing)]
    pub amount: Option<f64>,
}

pub fn compute_amount(quantity: f64, price: f64) -> f64 {
    finite_or_zero(quantity) * finite_or_zero(price)
}

impl TradeInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_quantity("quantity", self.quantity)?;
        check_quantity("price", self.price)?;
        Ok(())
    }

    /// Parse a JSON payload, mapping shape errors (unknown or missing fields,
    /// bad dates, wrong types) to validation failures.
    pub fn from_json(body: &str) -> Result<Self, DomainError> {
        let input: TradeInput =
            serde_json::from_str(body).map_err(|e| DomainError::Validation(e.to_string()))?;
        input.validate()?;
        Ok(input)
    }
}

fn check_quantity(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() {
        return Err(DomainError::Validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(DomainError::Validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

impl Trade {
    /// Build the stored form of a validated input. The amount is derived here,
    /// whatever the client sent.
    pub fn from_input(id: String, input: TradeInput) -> Self {
        Self {
            id,
            amount: compute_amount(input.quantity, input.price),
            trade_date: input.trade_date,
            counterparty: input.counterparty,
            trade_type: input.trade_type,
            item_sku: input.item_sku,
            item_name: input.item_name,
            quantity: input.quantity,
            price: input.price,
            status: input.status,
            notes: input.notes,
        }
    }

    pub fn to_input(&self) -> TradeInput {
        TradeInput {
            id: Some(self.id.clone()),
            trade_date: self.trade_date,
            counterparty: self.counterparty.clone(),
            trade_type: self.trade_type,
            item_sku: self.item_sku.clone(),
            item_name: self.item_name.clone(),
            quantity: self.quantity,
            price: self.price,
            status: self.status,
            notes: self.notes.clone(),
            amount: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "tradeDate": "2025-09-12",
        "counterparty": "ABC Trading",
        "type": "stationery",
        "itemSku": "SKU-0001",
        "itemName": "notebook",
        "quantity": 10,
        "price": 150,
        "status": "CONFIRMED"
    }"#;

    #[test]
    fn test_from_input_recomputes_amount() {
        let mut input = TradeInput::from_json(VALID).unwrap();
        input.amount = Some(1.0);
        let trade = Trade::from_input("t1".into(), input);
        assert_eq!(trade.amount, 1500.0);
    }

    #[test]
    fn test_client_amount_is_accepted_and_ignored() {
        let body = VALID.replace("\"status\"", "\"amount\": 99999, \"status\"");
        let input = TradeInput::from_json(&body).unwrap();
        assert_eq!(Trade::from_input("t1".into(), input).amount, 1500.0);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let body = VALID.replace("\"status\"", "\"discount\": 5, \"status\"");
        assert!(matches!(
            TradeInput::from_json(&body),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let body = VALID.replace("\"itemSku\": \"SKU-0001\",", "");
        assert!(matches!(
            TradeInput::from_json(&body),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let body = VALID.replace("\"price\": 150", "\"price\": -1");
        assert!(matches!(
            TradeInput::from_json(&body),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_wire_format_uses_camel_case_and_type_key() {
        let trade = Trade::from_input("t1".into(), TradeInput::from_json(VALID).unwrap());
        let json = serde_json::to_value(&trade).unwrap();
        assert_eq!(json["tradeDate"], "2025-09-12");
        assert_eq!(json["type"], "stationery");
        assert_eq!(json["itemName"], "notebook");
        assert_eq!(json["amount"], 1500.0);
        assert!(json.get("notes").is_none());
    }
}
