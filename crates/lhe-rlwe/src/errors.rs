use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Indicates that an error from the underlying mathematical library was
    /// encountered.
    #[error("{0}")]
    MathError(lhe_math::Error),

    /// Indicates that too many values were provided.
    #[error("Too many values provided: {0} exceeds limit {1}")]
    TooManyValues(usize, usize),

    /// Indicates that the value cannot be encoded for this scheme family.
    #[error("Encoding mismatch: found {0}, expected {1}")]
    EncodingMismatch(String, String),

    /// Indicates that the parameters do not support relinearization of this
    /// degree.
    #[error("Relinearization of degree {degree} is not supported (maximum {max})")]
    UnsupportedRelinDegree {
        /// Requested degree.
        degree: usize,
        /// Largest supported degree.
        max: usize,
    },

    /// Indicates that the ciphertext degree does not match the operation.
    #[error("Invalid ciphertext degree {0}")]
    InvalidCiphertextDegree(usize),

    /// Indicates that two operands live at different levels.
    #[error("Level mismatch: {0} and {1}")]
    LevelMismatch(usize, usize),

    /// Indicates that two operands are encoded at different scales.
    #[error("Scale mismatch: {0} and {1}")]
    ScaleMismatch(f64, f64),

    /// Indicates that the level is not in the modulus chain.
    #[error("Invalid level {level}, the maximum level is {max_level}")]
    InvalidLevel {
        /// Requested level.
        level: usize,
        /// Maximum level of the parameters.
        max_level: usize,
    },

    /// Indicates that two objects were created with different parameters.
    #[error("Incompatible parameters")]
    ParametersMismatch,

    /// Indicates a parameter error.
    #[error("{0}")]
    ParametersError(ParametersError),

    /// Indicates a default error
    #[error("{0}")]
    DefaultError(String),
}

impl From<lhe_math::Error> for Error {
    fn from(e: lhe_math::Error) -> Self {
        Error::MathError(e)
    }
}

impl From<ParametersError> for Error {
    fn from(e: ParametersError) -> Self {
        Error::ParametersError(e)
    }
}

/// Separate enum to indicate parameters-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParametersError {
    /// Indicates that the degree is invalid.
    #[error("Invalid degree: {0} is not a power of 2 larger than 8")]
    InvalidDegree(usize),

    /// Indicates that the moduli sizes are invalid.
    #[error("Invalid modulus size: {0}, expected an integer between {1} and {2}")]
    InvalidModulusSize(usize, usize, usize),

    /// Indicates that there exists not enough primes of this size.
    #[error("Not enough primes of size {0} for polynomials of degree {1}")]
    NotEnoughPrimes(usize, usize),

    /// Indicates that a ciphertext modulus is not congruent to 1 modulo the
    /// plaintext modulus.
    #[error("Modulus {0} is not congruent to 1 modulo {1}")]
    IncompatibleModulus(u64, u64),

    /// Indicates that the plaintext is invalid.
    #[error("{0}")]
    InvalidPlaintext(String),

    /// Indicates that the scale is invalid.
    #[error("{0}")]
    InvalidScale(String),

    /// Indicates that a parameter is out of its range.
    #[error("{0}")]
    OutOfRange(String),

    /// Indicates that too many parameters were specified.
    #[error("{0}")]
    TooManySpecified(String),

    /// Indicates that too few parameters were specified.
    #[error("{0}")]
    TooFewSpecified(String),
}
