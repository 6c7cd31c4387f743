use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from the evaluator.
///
/// Every variant is fatal for the evaluation that raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// Indicates that the scheme profile is invalid or does not match the
    /// provider.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Indicates that the provider could not produce the requested keys.
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Indicates that a multiplication would leave no level for its rescale.
    #[error("Depth exceeded: cannot multiply at level {level} with a chain of {chain_length} moduli")]
    DepthExceeded {
        /// Level at which the multiplication was requested.
        level: usize,
        /// Length of the modulus chain.
        chain_length: usize,
    },

    /// Indicates that no relinearization key exists for this degree.
    #[error("No relinearization key for degree {0}")]
    MissingRelinKey(usize),

    /// Indicates that a rescale or modulus drop would go past the end of the
    /// modulus chain.
    #[error("Level exhausted: cannot leave level {level} with a chain of {chain_length} moduli")]
    LevelExhausted {
        /// Current level.
        level: usize,
        /// Length of the modulus chain.
        chain_length: usize,
    },

    /// Indicates that two operands are at different levels.
    #[error("Level mismatch: {0} and {1}")]
    LevelMismatch(usize, usize),

    /// Indicates that two operands are at different scales.
    #[error("Scale mismatch: {0} and {1}")]
    ScaleMismatch(f64, f64),

    /// Indicates that a ciphertext was produced under another session's keys.
    #[error("The ciphertext was not produced by this session")]
    KeyMismatch,

    /// Indicates that a ciphertext degree exceeds the largest degree that can
    /// be relinearized.
    #[error("Degree {degree} exceeds the maximum relinearization degree {max}")]
    DegreeExceeded {
        /// Degree of the ciphertext.
        degree: usize,
        /// Maximum relinearization degree of the profile.
        max: usize,
    },

    /// Indicates that a scale no longer fits the modulus at its level.
    #[error("Scale 2^{log_scale:.2} out of bounds for a {modulus_bits:.2}-bit modulus")]
    ScaleOutOfBounds {
        /// Base-2 logarithm of the scale.
        log_scale: f64,
        /// Number of bits of the modulus at the current level.
        modulus_bits: f64,
    },

    /// Indicates that a chain was requested over too few operands.
    #[error("Too few operands: {0}, expected at least 2")]
    TooFewOperands(usize),

    /// Indicates that a provider operator failed after passing the checks.
    #[error("Provider error: {0}")]
    Provider(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn provider<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        Error::Provider(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    #[test]
    fn error_strings() {
        assert_eq!(
            Error::InvalidParameter("0".to_string()).to_string(),
            "Invalid parameter: 0"
        );
        assert_eq!(
            Error::DepthExceeded {
                level: 1,
                chain_length: 2
            }
            .to_string(),
            "Depth exceeded: cannot multiply at level 1 with a chain of 2 moduli"
        );
        assert_eq!(
            Error::MissingRelinKey(3).to_string(),
            "No relinearization key for degree 3"
        );
        assert_eq!(
            Error::LevelExhausted {
                level: 1,
                chain_length: 2
            }
            .to_string(),
            "Level exhausted: cannot leave level 1 with a chain of 2 moduli"
        );
        assert_eq!(
            Error::LevelMismatch(0, 1).to_string(),
            "Level mismatch: 0 and 1"
        );
        assert_eq!(
            Error::DegreeExceeded { degree: 4, max: 3 }.to_string(),
            "Degree 4 exceeds the maximum relinearization degree 3"
        );
        assert_eq!(
            Error::ScaleOutOfBounds {
                log_scale: 120.0,
                modulus_bits: 119.5
            }
            .to_string(),
            "Scale 2^120.00 out of bounds for a 119.50-bit modulus"
        );
        assert_eq!(
            Error::TooFewOperands(1).to_string(),
            "Too few operands: 1, expected at least 2"
        );
        assert_eq!(
            Error::KeyMismatch.to_string(),
            "The ciphertext was not produced by this session"
        );
    }

    #[test]
    fn provider_error() {
        let e = Error::provider(std::fmt::Error);
        assert!(matches!(e, Error::Provider(_)));
        assert_eq!(
            e.to_string(),
            "Provider error: an error occurred when formatting an argument"
        );
    }
}
