pub mod category;
pub mod numeric;
pub mod trade_id;
pub mod trade_status;
