use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use chrono::NaiveDateTime;

const UTF8_BOM: &str = "\u{feff}";

const HEADER: [&str; 7] = [
    "Trade Date",
    "Counterparty",
    "Type",
    "Item Name",
    "Quantity",
    "Price",
    "Amount",
];

/// Render trades as a spreadsheet-friendly CSV blob: BOM first, CRLF line
/// endings, and fields quoted only when they hold a comma, quote or newline.
pub fn export_csv<'a, I>(rows: I) -> Result<String, DomainError>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    wtr.write_record(HEADER)
        .map_err(|e| DomainError::InvalidInput(format!("CSV write error: {e}")))?;
    for t in rows {
        wtr.write_record([
            t.trade_date.format("%Y-%m-%d").to_string(),
            t.counterparty.clone(),
            t.trade_type.to_string(),
            t.item_name.clone(),
            t.quantity.to_string(),
            t.price.to_string(),
            t.amount.to_string(),
        ])
        .map_err(|e| DomainError::InvalidInput(format!("CSV write error: {e}")))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| DomainError::InvalidInput(format!("CSV flush error: {e}")))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| DomainError::InvalidInput(format!("CSV encoding error: {e}")))?;
    Ok(format!("{UTF8_BOM}{body}"))
}

pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("trades_{}.csv", at.format("%Y%m%d_%H%M%S"))
}
