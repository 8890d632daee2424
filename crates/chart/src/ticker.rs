use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::price::{format_price, parse_display_price};

/// Largest single-tick move as a fraction of the current price.
const TICK_DRIFT: f64 = 0.00005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickDirection {
    Up,
    Down,
    #[default]
    Flat,
}

impl TickDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "•",
        }
    }
}

pub struct LiveTicker {
    price: f64,
    direction: TickDirection,
    rng: StdRng,
}

impl LiveTicker {
    pub fn from_display(initial: &str, seed: u64) -> Option<Self> {
        parse_display_price(initial).map(|price| Self::new(price, seed))
    }

    pub fn new(price: f64, seed: u64) -> Self {
        Self {
            price,
            direction: TickDirection::Flat,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn tick(&mut self) -> f64 {
        let change = self.rng.gen_range(-1.0..1.0) * self.price * TICK_DRIFT;
        let next = self.price + change;

        self.direction = match next.partial_cmp(&self.price) {
            Some(Ordering::Greater) => TickDirection::Up,
            Some(Ordering::Less) => TickDirection::Down,
            _ => TickDirection::Flat,
        };
        self.price = next;
        next
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn direction(&self) -> TickDirection {
        self.direction
    }

    pub fn display(&self) -> String {
        format_price(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_flat_at_parsed_price() {
        let ticker = LiveTicker::from_display("$64,250.00", 3).unwrap();
        assert_eq!(ticker.price(), 64250.0);
        assert_eq!(ticker.direction(), TickDirection::Flat);
        assert_eq!(ticker.display(), "64250.00");
    }

    #[test]
    fn unparsable_price_has_no_ticker() {
        assert!(LiveTicker::from_display("pending", 3).is_none());
    }

    #[test]
    fn ticks_stay_within_drift_and_report_direction() {
        let mut ticker = LiveTicker::new(1.0842, 11);
        for _ in 0..500 {
            let before = ticker.price();
            let after = ticker.tick();

            assert!((after - before).abs() <= before * TICK_DRIFT);
            let expected = if after > before {
                TickDirection::Up
            } else if after < before {
                TickDirection::Down
            } else {
                TickDirection::Flat
            };
            assert_eq!(ticker.direction(), expected);
        }
    }

    #[test]
    fn seeded_tickers_agree() {
        let mut a = LiveTicker::new(100.0, 5);
        let mut b = LiveTicker::new(100.0, 5);
        for _ in 0..20 {
            assert_eq!(a.tick(), b.tick());
        }
    }
}
