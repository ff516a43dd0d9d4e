pub mod check;
pub mod config;
pub mod monitor;
pub mod replay;
pub mod simulate;
