//! Order sizing against the account's buying power.

mod position_sizer;

pub use position_sizer::OrderSizer;
