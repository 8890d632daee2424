use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use common::models::Signal;

use crate::price::parse_display_price;

const BAR_SECONDS: i64 = 3600;
/// Typical one-hour move as a fraction of price.
const BAR_VOLATILITY: f64 = 0.004;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candle {
    /// Unix seconds at bar open.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineKind {
    TakeProfit1,
    TakeProfit2,
    Entry,
    StopLoss,
}

impl LineKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::TakeProfit1 => "TP1",
            Self::TakeProfit2 => "TP2",
            Self::Entry => "Entry",
            Self::StopLoss => "SL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceLine {
    pub kind: LineKind,
    pub price: f64,
}

/// Simulated candles, not market data. The last close is the entry price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticChart {
    pub candles: Vec<Candle>,
    pub price_lines: Vec<PriceLine>,
}

impl SyntheticChart {
    /// `None` when the entry price is not a number.
    pub fn from_signal(signal: &Signal, bars: usize, seed: u64) -> Option<Self> {
        let entry = parse_display_price(&signal.entry_price)?;
        let mut rng = StdRng::seed_from_u64(seed);

        let ts = signal.update_time.timestamp();
        let last_open = ts - ts.rem_euclid(BAR_SECONDS);

        Some(Self {
            candles: random_walk(entry, bars, last_open, &mut rng),
            price_lines: price_lines(signal),
        })
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    pub fn line(&self, kind: LineKind) -> Option<f64> {
        self.price_lines
            .iter()
            .find(|l| l.kind == kind)
            .map(|l| l.price)
    }
}

fn random_walk(end_price: f64, bars: usize, last_open: i64, rng: &mut StdRng) -> Vec<Candle> {
    if bars == 0 {
        return Vec::new();
    }
    let step = end_price.abs() * BAR_VOLATILITY;

    // Walk backwards so the final close lands exactly on the end price.
    let mut closes = vec![end_price; bars];
    for i in (0..bars - 1).rev() {
        closes[i] = closes[i + 1] + rng.gen_range(-1.0..=1.0) * step;
    }

    let first_offset = i64::try_from(bars - 1).unwrap_or(i64::MAX / BAR_SECONDS);
    let mut open = closes[0] + rng.gen_range(-0.5..=0.5) * step;

    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let wick_up = rng.gen_range(0.0..=0.5) * step;
            let wick_down = rng.gen_range(0.0..=0.5) * step;
            let candle = Candle {
                time: last_open - (first_offset - i as i64) * BAR_SECONDS,
                open,
                high: open.max(close) + wick_up,
                low: open.min(close) - wick_down,
                close,
            };
            open = close;
            candle
        })
        .collect()
}

fn price_lines(signal: &Signal) -> Vec<PriceLine> {
    [
        (LineKind::TakeProfit1, &signal.tp1),
        (LineKind::TakeProfit2, &signal.tp2),
        (LineKind::Entry, &signal.entry_price),
        (LineKind::StopLoss, &signal.sl),
    ]
    .into_iter()
    .filter_map(|(kind, raw)| parse_display_price(raw).map(|price| PriceLine { kind, price }))
    .collect()
}
