pub mod calculator;
pub mod session;
