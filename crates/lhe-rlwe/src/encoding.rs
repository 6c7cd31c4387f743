//! The encoding type for the RLWE provider.

use std::fmt::Display;

use lhe_traits::{FhePlaintextEncoding, SchemeFamily};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum EncodingEnum {
    Integer,
    Real,
}

impl Display for EncodingEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// An encoding for the plaintext.
///
/// Values are encoded as the coefficients of a polynomial; homomorphic
/// operations are therefore polynomial operations. A constant is encoded as
/// the constant coefficient.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Encoding {
    pub(crate) encoding: EncodingEnum,
    pub(crate) level: usize,
}

impl Encoding {
    /// Integers modulo the plaintext modulus, for the integer family.
    pub fn integer() -> Self {
        Self {
            encoding: EncodingEnum::Integer,
            level: 0,
        }
    }

    /// Reals multiplied by the scale and rounded, for the approximate family.
    pub fn real() -> Self {
        Self {
            encoding: EncodingEnum::Real,
            level: 0,
        }
    }

    /// An integer encoding at a given level.
    pub fn integer_at_level(level: usize) -> Self {
        Self {
            encoding: EncodingEnum::Integer,
            level,
        }
    }

    /// A real encoding at a given level.
    pub fn real_at_level(level: usize) -> Self {
        Self {
            encoding: EncodingEnum::Real,
            level,
        }
    }

    /// The encoding used by a scheme family.
    pub(crate) fn expected_for(family: SchemeFamily) -> EncodingEnum {
        match family {
            SchemeFamily::IntegerPacked => EncodingEnum::Integer,
            SchemeFamily::ApproximateFixedPoint => EncodingEnum::Real,
        }
    }
}

impl From<Encoding> for String {
    fn from(e: Encoding) -> Self {
        String::from(&e)
    }
}

impl From<&Encoding> for String {
    fn from(e: &Encoding) -> Self {
        format!("{e:?}")
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encoding)
    }
}

impl FhePlaintextEncoding for Encoding {}
