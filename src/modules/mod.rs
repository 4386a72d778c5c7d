pub mod car;
pub mod common;
