use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNKNOWN_SOURCE_TITLE: &str = "Unknown Source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown trade direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("BUY") {
            Ok(Self::Buy)
        } else if trimmed.eq_ignore_ascii_case("SELL") {
            Ok(Self::Sell)
        } else {
            Err(ParseDirectionError(s.to_string()))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiInterpretation {
    Overbought,
    Oversold,
    #[default]
    Neutral,
}

impl RsiInterpretation {
    /// Unrecognised labels read as `Neutral`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("overbought") {
            Self::Overbought
        } else if label.eq_ignore_ascii_case("oversold") {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for RsiInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Overbought => "Overbought",
            Self::Oversold => "Oversold",
            Self::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotPoints {
    pub r2: String,
    pub r1: String,
    pub pivot: String,
    pub s1: String,
    pub s2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rsi {
    pub value: f64,
    pub interpretation: RsiInterpretation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sma {
    pub sma20: String,
    pub sma50: String,
    pub sma100: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSource {
    pub title: String,
    pub uri: String,
}

/// A web page the AI platform reports as grounding for its answer.
/// Either half may be missing; see `SignalSource` for the filtered form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingCitation {
    pub title: Option<String>,
    pub uri: Option<String>,
}

impl GroundingCitation {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            uri: Some(uri.into()),
        }
    }
}

/// `sources` is positional: a `[n]` marker in `strategy_description` or
/// `risk_tip` refers to `sources[n - 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub asset_name: String,
    pub update_time: DateTime<Utc>,
    pub direction: Direction,
    pub confidence: u8,
    pub entry_price: String,
    pub tp1: String,
    pub tp2: String,
    pub sl: String,
    pub pivot_points: PivotPoints,
    pub rsi: Rsi,
    pub sma: Sma,
    pub strategy_description: String,
    pub risk_tip: String,
    pub sources: Vec<SignalSource>,
}
