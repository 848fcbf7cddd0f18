use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("value {value} lies outside histogram range [{start}, {end}]")]
    HistogramOutOfRange { value: f64, start: f64, end: f64 },

    #[error("histogram needs at least one bucket")]
    InvalidBucketCount,

    #[error("invalid histogram range [{start}, {end}]")]
    InvalidRange { start: f64, end: f64 },
}

pub type StatsResult<T> = Result<T, StatsError>;
