//! ledgerfeed-prices: incremental commodity price backfill driven by an
//! external `bean-price`-style tool.

pub mod backfill;
pub mod error;
pub mod fetcher;
pub mod job;

pub use backfill::{
    default_end, determine_start_date, update_prices, write_output, Backfill, DateRange,
};
pub use error::{FetchError, PriceError};
pub use fetcher::{BeanPrice, PriceFetcher};
pub use job::{BackfillReport, PriceJob};
