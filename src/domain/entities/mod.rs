pub mod trade;
pub mod working_row;
