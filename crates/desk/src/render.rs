use chart::{LineKind, SyntheticChart, format_price};
use common::assets::{Asset, AssetCategory};
use common::citations::{CitationPart, TextSegment, render_citations};
use common::models::{DataSource, NewsArticle, Signal, SignalSource};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn hyperlink(uri: &str, label: &str) -> String {
    format!("\x1b]8;;{uri}\x1b\\{label}\x1b]8;;\x1b\\")
}

pub fn linked_text(text: &str, sources: &[SignalSource]) -> String {
    render_citations(text, sources)
        .iter()
        .map(|segment| match segment {
            TextSegment::Literal(text) => text.to_string(),
            TextSegment::Citation(parts) => {
                let inner: String = parts
                    .iter()
                    .map(|part| match part {
                        CitationPart::Link { number, source } => {
                            hyperlink(&source.uri, &number.to_string())
                        }
                        CitationPart::Text(text) => text.to_string(),
                    })
                    .collect();
                format!("[{inner}]")
            }
        })
        .collect()
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

pub fn signal_card(signal: &Signal) -> String {
    let mut lines = vec![
        format!(
            "{}  {}  {}% confidence",
            signal.asset_name, signal.direction, signal.confidence
        ),
        format!("Updated {}", signal.update_time.format("%Y-%m-%d %H:%M UTC")),
        String::new(),
        format!("Entry  {}", or_dash(&signal.entry_price)),
        format!("TP1    {}", or_dash(&signal.tp1)),
        format!("TP2    {}", or_dash(&signal.tp2)),
        format!("SL     {}", or_dash(&signal.sl)),
        String::new(),
    ];

    let pp = &signal.pivot_points;
    lines.push(format!(
        "Pivots  R2 {} | R1 {} | P {} | S1 {} | S2 {}",
        or_dash(&pp.r2),
        or_dash(&pp.r1),
        or_dash(&pp.pivot),
        or_dash(&pp.s1),
        or_dash(&pp.s2)
    ));
    lines.push(format!(
        "RSI     {:.1} ({})",
        signal.rsi.value, signal.rsi.interpretation
    ));
    lines.push(format!(
        "SMA     20 {} | 50 {} | 100 {}",
        or_dash(&signal.sma.sma20),
        or_dash(&signal.sma.sma50),
        or_dash(&signal.sma.sma100)
    ));

    if !signal.strategy_description.is_empty() {
        lines.push(String::new());
        lines.push("Strategy".to_string());
        lines.push(linked_text(&signal.strategy_description, &signal.sources));
    }
    if !signal.risk_tip.is_empty() {
        lines.push(String::new());
        lines.push("Risk".to_string());
        lines.push(linked_text(&signal.risk_tip, &signal.sources));
    }
    if !signal.sources.is_empty() {
        lines.push(String::new());
        lines.push("Sources".to_string());
        lines.extend(
            signal
                .sources
                .iter()
                .enumerate()
                .map(|(i, s)| format!("  [{}] {}", i + 1, hyperlink(&s.uri, &s.title))),
        );
    }

    lines.join("\n")
}

pub fn history_table(history: &[Signal]) -> String {
    if history.is_empty() {
        return "No signals yet.".to_string();
    }
    history
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{:>3}  {}  {:<22} {:<4} {:>3}%  entry {}",
                i,
                s.update_time.format("%Y-%m-%d %H:%M"),
                s.asset_name,
                s.direction,
                s.confidence,
                or_dash(&s.entry_price)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn news_list(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return "No news articles found.".to_string();
    }
    articles
        .iter()
        .map(|a| {
            format!(
                "{}\n  {} ({})",
                hyperlink(&a.url, &a.title),
                a.snippet,
                or_dash(&a.source_name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn asset_groups(groups: &[(AssetCategory, Vec<&Asset>)]) -> String {
    if groups.is_empty() {
        return "No matching assets.".to_string();
    }
    groups
        .iter()
        .map(|(category, assets)| {
            let names: Vec<_> = assets.iter().map(|a| format!("  {}", a.name)).collect();
            format!("{category}\n{}", names.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn featured_sites(sites: &[DataSource]) -> String {
    if sites.is_empty() {
        return "No featured sites yet.".to_string();
    }
    sites
        .iter()
        .map(|s| format!("  {}  {}", hyperlink(&s.url, &s.name), s.url))
        .collect::<Vec<_>>()
        .join("\n")
}

fn sparkline(values: &[f64]) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= 0.0 {
                return SPARK[SPARK.len() / 2];
            }
            let idx = ((v - min) / span * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect()
}

pub fn chart_view(asset_name: &str, chart: &SyntheticChart) -> String {
    let closes: Vec<f64> = chart.candles.iter().map(|c| c.close).collect();
    let mut lines = vec![
        format!("{asset_name}  ({} hourly bars, simulated)", closes.len()),
        sparkline(&closes),
    ];

    for kind in [
        LineKind::TakeProfit2,
        LineKind::TakeProfit1,
        LineKind::Entry,
        LineKind::StopLoss,
    ] {
        if let Some(price) = chart.line(kind) {
            lines.push(format!("{:<6}{}", kind.title(), format_price(price)));
        }
    }
    lines.join("\n")
}
