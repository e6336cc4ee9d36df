pub mod http;
pub mod memory;
pub mod seed;
pub mod sqlite;
