pub mod bar;
pub mod envelope;
pub mod page;
pub mod symbol;
pub mod timeframe;
