use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use common::models::{
    Direction, GroundingCitation, PivotPoints, Rsi, RsiInterpretation, Signal, SignalSource, Sma,
    UNKNOWN_SOURCE_TITLE,
};

use crate::NormalizeError;

const PLACEHOLDER_URI: &str = "#";
const FENCE: &str = "```";

pub fn extract_json(raw: &str) -> Result<Value, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::EmptyResponse);
    }

    let body = strip_code_fence(trimmed);
    let candidate = locate_structure(body);
    let parsed = match candidate.map(serde_json::from_str::<Value>) {
        Some(Ok(value)) => return Ok(value),
        other => other,
    };

    // A `[` in leading prose fixes the kind to array; the object may still be intact.
    if let Some(object) = span(body, '{', '}').filter(|o| Some(*o) != candidate) {
        if let Ok(value) = serde_json::from_str(object) {
            debug!("Recovered JSON object after a stray bracket in the reply");
            return Ok(value);
        }
    }

    match (candidate, parsed) {
        (Some(content), Some(Err(source))) => Err(NormalizeError::MalformedContent {
            content: content.to_string(),
            source,
        }),
        _ => Err(NormalizeError::NoStructureFound),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };
    // Drop the info string ("json") that follows the opening fence.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let rest = rest.trim_end();
    rest.strip_suffix(FENCE).unwrap_or(rest).trim()
}

/// First `{` or `[` up to the last closer of the same kind.
fn locate_structure(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    if text[start..].starts_with('{') {
        span(text, '{', '}')
    } else {
        span(text, '[', ']')
    }
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

pub fn normalize_signal(
    raw: &str,
    citations: &[GroundingCitation],
    asset_name: &str,
    update_time: DateTime<Utc>,
) -> Result<Signal, NormalizeError> {
    let value = extract_json(raw)?;
    let empty = Map::new();
    let fields = top_level_object(&value).unwrap_or(&empty);

    let direction = read_direction(fields)?;

    Ok(Signal {
        asset_name: asset_name.to_string(),
        update_time,
        direction,
        confidence: read_confidence(fields.get("confidence")),
        entry_price: display_string(fields.get("entryPrice")),
        tp1: display_string(fields.get("tp1")),
        tp2: display_string(fields.get("tp2")),
        sl: display_string(fields.get("sl")),
        pivot_points: read_pivot_points(fields.get("pivotPoints")),
        rsi: read_rsi(fields.get("rsi")),
        sma: read_sma(fields.get("sma")),
        strategy_description: display_string(fields.get("strategyDescription")),
        risk_tip: display_string(fields.get("riskTip")),
        sources: filter_sources(citations),
    })
}

pub fn filter_sources(citations: &[GroundingCitation]) -> Vec<SignalSource> {
    citations
        .iter()
        .filter_map(|citation| {
            let uri = citation.uri.as_deref()?.trim();
            if uri.is_empty() || uri == PLACEHOLDER_URI {
                return None;
            }
            let title = citation
                .title
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(UNKNOWN_SOURCE_TITLE);
            Some(SignalSource {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

fn top_level_object(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::Array(items) => items.iter().find_map(Value::as_object),
        _ => None,
    }
}

fn read_direction(fields: &Map<String, Value>) -> Result<Direction, NormalizeError> {
    // Older prompt revisions named the field "signal".
    let raw = fields.get("direction").or_else(|| fields.get("signal"));
    match raw {
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| NormalizeError::UnknownDirection(s.clone())),
        Some(other) => Err(NormalizeError::UnknownDirection(other.to_string())),
        None => Err(NormalizeError::UnknownDirection(String::new())),
    }
}

fn display_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn read_confidence(value: Option<&Value>) -> u8 {
    let Some(raw) = number(value) else {
        return 0;
    };
    let (confidence, clamped) = clamp_confidence(raw);
    if clamped {
        warn!("AI confidence {} is outside 0..=100, clamped to {}", raw, confidence);
    }
    confidence
}

fn clamp_confidence(raw: f64) -> (u8, bool) {
    let rounded = raw.round();
    let clamped = rounded.clamp(0.0, 100.0);
    (clamped as u8, clamped != rounded)
}

fn read_pivot_points(value: Option<&Value>) -> PivotPoints {
    let Some(map) = value.and_then(Value::as_object) else {
        return PivotPoints::default();
    };
    PivotPoints {
        r2: display_string(map.get("r2")),
        r1: display_string(map.get("r1")),
        pivot: display_string(map.get("pivot").or_else(|| map.get("pp"))),
        s1: display_string(map.get("s1")),
        s2: display_string(map.get("s2")),
    }
}

fn read_rsi(value: Option<&Value>) -> Rsi {
    let Some(map) = value.and_then(Value::as_object) else {
        return Rsi::default();
    };
    Rsi {
        value: number(map.get("value")).unwrap_or(0.0),
        interpretation: map
            .get("interpretation")
            .and_then(Value::as_str)
            .map(RsiInterpretation::from_label)
            .unwrap_or_default(),
    }
}

fn read_sma(value: Option<&Value>) -> Sma {
    let Some(map) = value.and_then(Value::as_object) else {
        return Sma::default();
    };
    Sma {
        sma20: display_string(map.get("sma20")),
        sma50: display_string(map.get("sma50")),
        sma100: display_string(map.get("sma100")),
    }
}
