//! Plaintext type of the RLWE provider.

use crate::{
    encoding::{Encoding, EncodingEnum},
    Error, RlweParameters, Result,
};
use itertools::Itertools;
use lhe_math::rq::Poly;
use lhe_traits::{FheDecoder, FheEncoder, FhePlaintext, SchemeFamily};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use std::sync::Arc;
use zeroize_derive::{Zeroize, ZeroizeOnDrop};

/// A plaintext object, that encodes a vector according to a specific encoding.
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct Plaintext {
    /// The parameters of the underlying encryption scheme.
    #[zeroize(skip)]
    pub(crate) par: Arc<RlweParameters>,
    /// The encoded value as a polynomial at the plaintext level.
    pub(crate) poly: Poly,
    /// The scale of the encoded value; 1 for the integer family.
    #[zeroize(skip)]
    pub(crate) scale: f64,
    /// The encoding of the plaintext, if known
    #[zeroize(skip)]
    pub(crate) encoding: Option<Encoding>,
    /// The level of the plaintext
    #[zeroize(skip)]
    pub(crate) level: usize,
}

impl FhePlaintext for Plaintext {
    type Parameters = RlweParameters;
    type Encoding = Encoding;
}

impl Plaintext {
    pub(crate) fn to_poly(&self) -> &Poly {
        &self.poly
    }

    /// Generate a zero plaintext.
    pub fn zero(encoding: Encoding, par: &Arc<RlweParameters>) -> Result<Self> {
        let level = encoding.level;
        let ctx = par.ctx_at_level(level)?;
        Ok(Self {
            par: par.clone(),
            poly: Poly::zero(ctx),
            scale: par.scale().unwrap_or(1.0),
            encoding: Some(encoding),
            level,
        })
    }

    /// Returns the level of this plaintext.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the scale of this plaintext.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn check_encoding(par: &RlweParameters, encoding: &Encoding) -> Result<()> {
        let expected = Encoding::expected_for(par.family());
        if encoding.encoding != expected {
            Err(Error::EncodingMismatch(
                encoding.encoding.to_string(),
                expected.to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn from_coefficients(
        coefficients: &[BigInt],
        encoding: Encoding,
        par: &Arc<RlweParameters>,
    ) -> Result<Self> {
        if coefficients.len() > par.degree() {
            return Err(Error::TooManyValues(coefficients.len(), par.degree()));
        }
        let level = encoding.level;
        let ctx = par.ctx_at_level(level)?;
        Ok(Self {
            par: par.clone(),
            poly: Poly::try_from_bigint(coefficients, ctx)?,
            scale: par.scale().unwrap_or(1.0),
            encoding: Some(encoding),
            level,
        })
    }
}

impl FheEncoder<&[u64]> for Plaintext {
    type Error = Error;

    fn try_encode(value: &[u64], encoding: Encoding, par: &Arc<RlweParameters>) -> Result<Self> {
        Self::check_encoding(par, &encoding)?;
        if encoding.encoding == EncodingEnum::Real {
            let reals = value.iter().map(|v| *v as f64).collect_vec();
            return <Self as FheEncoder<&[f64]>>::try_encode(&reals, encoding, par);
        }
        let t = par.plaintext().unwrap_or(u64::MAX);
        let coefficients = value.iter().map(|v| BigInt::from(v % t)).collect_vec();
        Self::from_coefficients(&coefficients, encoding, par)
    }
}

impl FheEncoder<&[i64]> for Plaintext {
    type Error = Error;

    fn try_encode(value: &[i64], encoding: Encoding, par: &Arc<RlweParameters>) -> Result<Self> {
        Self::check_encoding(par, &encoding)?;
        if encoding.encoding == EncodingEnum::Real {
            let reals = value.iter().map(|v| *v as f64).collect_vec();
            return <Self as FheEncoder<&[f64]>>::try_encode(&reals, encoding, par);
        }
        let t = par.plaintext().unwrap_or(u64::MAX) as i128;
        let coefficients = value
            .iter()
            .map(|v| BigInt::from((*v as i128).rem_euclid(t)))
            .collect_vec();
        Self::from_coefficients(&coefficients, encoding, par)
    }
}

impl FheEncoder<&[f64]> for Plaintext {
    type Error = Error;

    fn try_encode(value: &[f64], encoding: Encoding, par: &Arc<RlweParameters>) -> Result<Self> {
        Self::check_encoding(par, &encoding)?;
        let scale = par.scale().unwrap_or(1.0);
        let coefficients = value
            .iter()
            .map(|v| {
                BigInt::from_f64((v * scale).round())
                    .ok_or_else(|| Error::DefaultError(format!("Cannot encode {v}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_coefficients(&coefficients, encoding, par)
    }
}

impl FheDecoder<Plaintext> for Vec<u64> {
    type Error = Error;

    fn try_decode<O>(pt: &Plaintext, encoding: O) -> Result<Self>
    where
        O: Into<Option<Encoding>>,
    {
        if let Some(encoding) = encoding.into() {
            Plaintext::check_encoding(&pt.par, &encoding)?;
        }
        let t = pt.par.plaintext().ok_or_else(|| {
            Error::EncodingMismatch(EncodingEnum::Integer.to_string(), EncodingEnum::Real.to_string())
        })?;
        Ok(pt.poly.centered_mod(t))
    }
}

impl FheDecoder<Plaintext> for Vec<f64> {
    type Error = Error;

    fn try_decode<O>(pt: &Plaintext, encoding: O) -> Result<Self>
    where
        O: Into<Option<Encoding>>,
    {
        if let Some(encoding) = encoding.into() {
            Plaintext::check_encoding(&pt.par, &encoding)?;
        }
        if pt.par.family() != SchemeFamily::ApproximateFixedPoint {
            return Err(Error::EncodingMismatch(
                EncodingEnum::Real.to_string(),
                EncodingEnum::Integer.to_string(),
            ));
        }
        Ok(pt
            .poly
            .to_centered()
            .iter()
            .map(|c| c.to_f64().unwrap_or(f64::NAN) / pt.scale)
            .collect_vec())
    }
}
