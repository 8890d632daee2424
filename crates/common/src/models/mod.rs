pub mod featured_site;
pub mod news;
pub mod signal;

pub use featured_site::{DataSource, merge_featured_sites};
pub use news::{NEWS_CATEGORIES, NewsArticle};
pub use signal::{
    Direction, GroundingCitation, ParseDirectionError, PivotPoints, Rsi, RsiInterpretation,
    Signal, SignalSource, Sma, UNKNOWN_SOURCE_TITLE,
};
