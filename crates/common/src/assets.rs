use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    Forex,
    Commodities,
    Indices,
    Crypto,
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Forex => "Forex",
            Self::Commodities => "Commodities",
            Self::Indices => "Indices",
            Self::Crypto => "Crypto",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub name: &'static str,
    pub category: AssetCategory,
}

const fn asset(name: &'static str, category: AssetCategory) -> Asset {
    Asset { name, category }
}

pub const ASSETS: &[Asset; 30] = &[
    // Crypto
    asset("Bitcoin (BTCUSD)", AssetCategory::Crypto),
    asset("Ethereum (ETHUSD)", AssetCategory::Crypto),
    asset("Solana (SOLUSD)", AssetCategory::Crypto),
    asset("XRP (XRPUSD)", AssetCategory::Crypto),
    asset("Litecoin (LTCUSD)", AssetCategory::Crypto),
    asset("Bitcoin Cash (BCHUSD)", AssetCategory::Crypto),
    asset("Dogecoin (DOGEUSD)", AssetCategory::Crypto),
    asset("BNB (BNBUSD)", AssetCategory::Crypto),
    asset("Tether (USDTUSD)", AssetCategory::Crypto),
    // Indices
    asset("Nasdaq (IXIC)", AssetCategory::Indices),
    asset("Dow Jones (DJI)", AssetCategory::Indices),
    asset("S&P 500 (INX)", AssetCategory::Indices),
    asset("U.S. Dollar Index (DXY)", AssetCategory::Indices),
    asset("NASDAQ 100 (NDX)", AssetCategory::Indices),
    asset("Hang Seng (HK50)", AssetCategory::Indices),
    asset("Nikkei 225 (JPN225)", AssetCategory::Indices),
    asset("DAX (GER40)", AssetCategory::Indices),
    // Forex
    asset("EUR/USD", AssetCategory::Forex),
    asset("GBP/USD", AssetCategory::Forex),
    asset("USD/JPY", AssetCategory::Forex),
    asset("USD/CHF", AssetCategory::Forex),
    asset("AUD/USD", AssetCategory::Forex),
    asset("USD/CAD", AssetCategory::Forex),
    asset("NZD/USD", AssetCategory::Forex),
    asset("EUR/JPY", AssetCategory::Forex),
    asset("GBP/JPY", AssetCategory::Forex),
    asset("EUR/GBP", AssetCategory::Forex),
    // Commodities
    asset("Gold (XAU/USD)", AssetCategory::Commodities),
    asset("Silver (XAG/USD)", AssetCategory::Commodities),
    asset("WTI Crude Oil", AssetCategory::Commodities),
];

pub const INITIAL_WATCHLIST: &[&str; 4] = &[
    "Bitcoin (BTCUSD)",
    "EUR/USD",
    "Gold (XAU/USD)",
    "Nasdaq (IXIC)",
];

pub fn find_asset(name: &str) -> Option<&'static Asset> {
    ASSETS.iter().find(|a| a.name == name)
}

/// Groups assets by category, keeping first-seen category order and the
/// catalog order inside each group. Empty groups are omitted.
pub fn group_by_category<'a, I>(assets: I) -> Vec<(AssetCategory, Vec<&'a Asset>)>
where
    I: IntoIterator<Item = &'a Asset>,
{
    let mut groups: Vec<(AssetCategory, Vec<&'a Asset>)> = Vec::new();
    for asset in assets {
        match groups.iter_mut().find(|(c, _)| *c == asset.category) {
            Some((_, members)) => members.push(asset),
            None => groups.push((asset.category, vec![asset])),
        }
    }
    groups
}

pub fn search(term: &str) -> Vec<(AssetCategory, Vec<&'static Asset>)> {
    let needle = term.trim().to_lowercase();
    group_by_category(
        ASSETS
            .iter()
            .filter(|a| needle.is_empty() || a.name.to_lowercase().contains(&needle)),
    )
}

pub fn available_for_watchlist(watchlist: &[String]) -> Vec<&'static Asset> {
    ASSETS
        .iter()
        .filter(|a| !watchlist.iter().any(|w| w == a.name))
        .collect()
}
