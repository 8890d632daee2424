use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use tokio::time;
use tracing::{info, warn};

use advisor::{GeminiClient, NewsService, SignalService};
use chart::{LiveTicker, SyntheticChart};
use common::assets;
use common::models::{NEWS_CATEGORIES, Signal};
use storage::KeyValueStore;

use crate::config::Settings;
use crate::render;
use crate::state::{AppError, AppState};

const TICK_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "desk", version, about = "AI trading signals with grounded sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Request a fresh signal for an asset
    Analyze { asset: String },
    /// List saved signals, newest first
    History,
    /// Forget every saved signal
    ClearHistory,
    /// Fetch market headlines
    News {
        #[arg(long, short, default_value = "All")]
        category: String,
    },
    /// Show or edit the watchlist
    Watchlist {
        #[command(subcommand)]
        action: Option<WatchlistAction>,
    },
    /// Browse the asset catalog
    Assets {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Publishers cited by past signals
    Sites,
    /// Simulated price chart for a saved signal
    Chart {
        /// Position in `history`, 0 is the newest
        #[arg(default_value_t = 0)]
        index: usize,
        #[arg(long, default_value_t = 48)]
        bars: usize,
    },
    /// Simulated live price for a saved signal
    Ticker {
        #[arg(default_value_t = 0)]
        index: usize,
        #[arg(long, default_value_t = 10)]
        ticks: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum WatchlistAction {
    List,
    Add { asset: String },
    Remove { asset: String },
}

pub async fn run<S: KeyValueStore>(
    command: Command,
    settings: &Settings,
    state: &mut AppState<S>,
) -> anyhow::Result<()> {
    match command {
        Command::Analyze { asset } => analyze(settings, state, &asset).await,
        Command::History => {
            println!("{}", render::history_table(state.history()));
            Ok(())
        }
        Command::ClearHistory => {
            let count = state.history().len();
            state.clear_history().await;
            println!("Cleared {count} signals.");
            Ok(())
        }
        Command::News { category } => news(settings, &category).await,
        Command::Watchlist { action } => watchlist(state, action.unwrap_or(WatchlistAction::List)).await,
        Command::Assets { search } => {
            let groups = assets::search(search.as_deref().unwrap_or_default());
            println!("{}", render::asset_groups(&groups));
            Ok(())
        }
        Command::Sites => {
            println!("{}", render::featured_sites(state.featured_sites()));
            Ok(())
        }
        Command::Chart { index, bars } => {
            let signal = saved_signal(state.history(), index)?;
            let chart = SyntheticChart::from_signal(signal, bars, seed_for(signal))
                .ok_or_else(|| anyhow!("entry price {:?} is not a number", signal.entry_price))?;
            println!("{}", render::chart_view(&signal.asset_name, &chart));
            Ok(())
        }
        Command::Ticker { index, ticks } => {
            let signal = saved_signal(state.history(), index)?;
            ticker(signal, ticks).await
        }
    }
}

async fn analyze<S: KeyValueStore>(
    settings: &Settings,
    state: &mut AppState<S>,
    asset: &str,
) -> anyhow::Result<()> {
    if assets::find_asset(asset).is_none() {
        warn!("{} is not in the asset catalog, asking anyway", asset);
    }

    let client = GeminiClient::new(settings.gemini()).map_err(|e| anyhow!(e.user_message()))?;
    let service = SignalService::new(client).with_retry(settings.retry);

    match state.analyze(&service, asset).await {
        Ok(signal) => {
            println!("{}", render::signal_card(signal));
            Ok(())
        }
        Err(AppError::Advisor(e)) => Err(anyhow!(e.user_message())),
        Err(e) => Err(e.into()),
    }
}

async fn news(settings: &Settings, category: &str) -> anyhow::Result<()> {
    let Some(category) = NEWS_CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(category.trim()))
    else {
        bail!(
            "unknown news category {:?}, expected one of {}",
            category,
            NEWS_CATEGORIES.join(", ")
        );
    };

    let client = GeminiClient::new(settings.gemini()).map_err(|e| anyhow!(e.news_user_message()))?;
    let articles = NewsService::new(client)
        .with_retry(settings.retry)
        .fetch_news(category)
        .await
        .map_err(|e| anyhow!(e.news_user_message()))?;

    println!("{}", render::news_list(&articles));
    Ok(())
}

async fn watchlist<S: KeyValueStore>(
    state: &mut AppState<S>,
    action: WatchlistAction,
) -> anyhow::Result<()> {
    match action {
        WatchlistAction::List => {
            for asset in state.watchlist() {
                println!("  {asset}");
            }
            let available = assets::available_for_watchlist(state.watchlist());
            println!("{} more assets available to add.", available.len());
        }
        WatchlistAction::Add { asset } => {
            let known = assets::find_asset(&asset)
                .with_context(|| format!("{asset:?} is not in the asset catalog"))?;
            if state.add_to_watchlist(known.name).await {
                info!("Added {} to watchlist", known.name);
            } else {
                println!("{} is already on the watchlist.", known.name);
            }
        }
        WatchlistAction::Remove { asset } => {
            if state.remove_from_watchlist(&asset).await {
                info!("Removed {} from watchlist", asset);
            } else {
                println!("{asset} is not on the watchlist.");
            }
        }
    }
    Ok(())
}

fn saved_signal(history: &[Signal], index: usize) -> anyhow::Result<&Signal> {
    if history.is_empty() {
        bail!("no saved signals, run `desk analyze <ASSET>` first");
    }
    history
        .get(index)
        .with_context(|| format!("history has {} signals, index {index} is out of range", history.len()))
}

/// Same signal, same simulated prices.
fn seed_for(signal: &Signal) -> u64 {
    signal.update_time.timestamp().unsigned_abs()
}

async fn ticker(signal: &Signal, ticks: u32) -> anyhow::Result<()> {
    let mut ticker = LiveTicker::from_display(&signal.entry_price, seed_for(signal))
        .ok_or_else(|| anyhow!("entry price {:?} is not a number", signal.entry_price))?;

    println!("{}  {}", signal.asset_name, ticker.display());
    let mut interval = time::interval(TICK_INTERVAL);
    interval.tick().await;

    for _ in 0..ticks {
        interval.tick().await;
        ticker.tick();
        println!(
            "{}  {} {}",
            signal.asset_name,
            ticker.direction().arrow(),
            ticker.display()
        );
    }
    Ok(())
}
