use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Indicates that the contexts of two operands differ.
    #[error("Invalid context")]
    InvalidContext,

    /// Indicates that the polynomial degree is not supported.
    #[error("Invalid degree: {0} is not a power of 2 larger or equal to 8")]
    InvalidDegree(usize),

    /// Indicates that a modulus is not usable.
    #[error("Invalid modulus: {0}")]
    InvalidModulus(u64),

    /// Indicates that too many coefficients were provided.
    #[error("Too many coefficients: {actual} exceeds the degree {degree}")]
    TooManyCoefficients {
        /// Number of coefficients provided.
        actual: usize,
        /// Polynomial degree.
        degree: usize,
    },

    /// Indicates that the modulus chain has no further modulus to drop.
    #[error("The modulus chain is exhausted")]
    ChainExhausted,

    /// Indicates a default error.
    #[error("{0}")]
    Default(String),
}
