use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("End must be >= start (got start={start}, end={end})")]
    InvalidRange { start: i64, end: i64 },
}
