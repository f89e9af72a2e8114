pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use datasource::{
    parse_trade_csv, FileTradeSource, ParseError, SampleDataSource, SourceError,
    StaticTradeSource, TradeSource,
};
pub use domain::{Action, Coin, Decimal, PositionResult, Side, TimeMs, TradeRecord};
pub use engine::{
    aggregate, analyze, calculate_tax, match_positions, AggregateMetrics, MatchOutcome,
    TaxBreakdown, TaxSettings,
};
pub use error::AppError;
