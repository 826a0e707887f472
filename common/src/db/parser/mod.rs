pub mod grid;
pub mod tileconn;
