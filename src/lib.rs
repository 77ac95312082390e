pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod images;
pub mod output;
pub mod plays;
pub mod view;

pub use analyzers::aggregate::aggregate;
pub use analyzers::analyzer::{build_table, rate_plays};
pub use analyzers::rating::rate;
pub use analyzers::types::{QbRating, QbSummary, RatingTable};
pub use config::RatingConfig;
pub use error::{LoadError, RatingError, SourceError};
pub use plays::{PlayRecord, load_plays};
