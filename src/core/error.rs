use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidDomainError {
    #[error("{field} must be a finite number >= 0, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("{field} must be > 0")]
    ZeroFrequency { field: &'static str },

    #[error("{field} must be <= {max}, got {value}")]
    FrequencyTooLarge {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("years must be <= {max}, got {value}")]
    TooManyYears { value: u32, max: u32 },

    #[error("projection needs {periods} compounding periods, limit is {max}")]
    TooManyPeriods { periods: u64, max: u64 },
}
