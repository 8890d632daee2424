pub fn signal_prompt(asset_name: &str) -> String {
    format!(
        r#"Perform a detailed technical and fundamental analysis for {asset_name} using the most recent web data available.
This request is for informational and educational purposes ONLY. The output is a hypothetical analysis and MUST NOT be considered financial advice.

Respond with exactly one JSON object and nothing else: no markdown fences, no commentary. Use this shape:
{{
  "direction": "BUY" or "SELL",
  "confidence": integer between 70 and 95,
  "entryPrice": "hypothetical entry price as a string",
  "tp1": "first take-profit level as a string",
  "tp2": "second take-profit level as a string",
  "sl": "stop-loss level as a string",
  "pivotPoints": {{"r2": "", "r1": "", "pivot": "", "s1": "", "s2": ""}},
  "rsi": {{"value": number, "interpretation": "Overbought" or "Oversold" or "Neutral"}},
  "sma": {{"sma20": "", "sma50": "", "sma100": ""}},
  "strategyDescription": "2-3 sentences explaining the strategy",
  "riskTip": "one sentence on the main risk"
}}

When a statement in strategyDescription or riskTip relies on a web source, cite it inline with its 1-based source number, e.g. [1] or [2, 3]."#
    )
}

pub fn news_prompt(category: &str) -> String {
    let scope = if category.eq_ignore_ascii_case("all") {
        "Forex, Crypto, Indices and Commodities markets".to_string()
    } else {
        format!("the {category} market")
    };

    format!(
        r#"Find 6 to 9 of the most recent, market-moving financial news articles about {scope} using live web search.

Respond with exactly one JSON array and nothing else: no markdown fences, no commentary. Each element must be:
{{"title": "headline", "snippet": "one or two sentence summary", "url": "direct link to the article", "sourceName": "publisher name"}}"#
    )
}
