use thiserror::Error;

pub type HtResult<T> = Result<T, HtError>;

#[derive(Error, Debug)]
pub enum HtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown unit token: {token}")]
    UnknownUnit { token: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
