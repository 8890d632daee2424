pub mod price;
pub mod synthetic;
pub mod ticker;

pub use price::{display_decimals, format_price, parse_display_price};
pub use synthetic::{Candle, LineKind, PriceLine, SyntheticChart};
pub use ticker::{LiveTicker, TickDirection};
