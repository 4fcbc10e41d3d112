use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("minEmployees ({min}) cannot be greater than maxEmployees ({max})")]
    InvertedRange { min: f64, max: f64 },
}
