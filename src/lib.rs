pub mod dataframe;
pub mod error;
pub mod index;
pub mod series;
pub mod stats;

// Re-export commonly used types
pub use dataframe::{DataFrame, MeltOptions};
pub use error::{Error, Result};
pub use index::{Index, RangeIndex};
pub use series::Series;
pub use stats::{
    AlphaMetric, CohenKappaResult, ContingencyTable, IccEntry, IccModel, IccResults,
    RaterColumns, RatingCounts,
};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
