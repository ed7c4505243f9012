mod engine;
mod error;
mod format;
mod ticks;
mod types;

pub use engine::{chart_rows, project};
pub use error::InvalidDomainError;
pub use format::{format_compact, format_currency};
pub use ticks::{DEFAULT_TICK_COUNT, axis_ticks};
pub use types::{
    ChartRow, CompoundFrequency, ContributionFrequency, MAX_COMPOUNDS_PER_YEAR,
    MAX_CONTRIBUTIONS_PER_YEAR, MAX_PERIODS, MAX_YEARS, Projection, ProjectionInput, YearSnapshot,
};
