//! Implementation of operations over polynomials.

use super::Poly;
use itertools::izip;
use num_bigint::BigUint;
use num_traits::Zero;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

impl AddAssign<&Poly> for Poly {
    fn add_assign(&mut self, p: &Poly) {
        assert_eq!(self.ctx, p.ctx, "Incompatible contexts");
        let q = &self.ctx.modulus;
        izip!(self.coefficients.iter_mut(), p.coefficients.iter()).for_each(|(a, b)| {
            *a += b;
            if &*a >= q {
                *a -= q;
            }
        });
    }
}

impl Add<&Poly> for &Poly {
    type Output = Poly;
    fn add(self, p: &Poly) -> Poly {
        let mut q = self.clone();
        q += p;
        q
    }
}

impl Add for Poly {
    type Output = Poly;
    fn add(self, mut p: Poly) -> Poly {
        p += &self;
        p
    }
}

impl SubAssign<&Poly> for Poly {
    fn sub_assign(&mut self, p: &Poly) {
        assert_eq!(self.ctx, p.ctx, "Incompatible contexts");
        let q = &self.ctx.modulus;
        izip!(self.coefficients.iter_mut(), p.coefficients.iter()).for_each(|(a, b)| {
            if &*a < b {
                *a += q;
            }
            *a -= b;
        });
    }
}

impl Sub<&Poly> for &Poly {
    type Output = Poly;
    fn sub(self, p: &Poly) -> Poly {
        let mut q = self.clone();
        q -= p;
        q
    }
}

impl MulAssign<&Poly> for Poly {
    fn mul_assign(&mut self, p: &Poly) {
        *self = &*self * p;
    }
}

impl MulAssign<&BigUint> for Poly {
    fn mul_assign(&mut self, p: &BigUint) {
        let q = &self.ctx.modulus;
        let p = p % q;
        self.coefficients.iter_mut().for_each(|a| {
            *a *= &p;
            *a %= q;
        });
    }
}

impl Mul<&Poly> for &Poly {
    type Output = Poly;

    /// Negacyclic product, using x^N = -1.
    fn mul(self, p: &Poly) -> Poly {
        assert_eq!(self.ctx, p.ctx, "Incompatible contexts");
        let q = &self.ctx.modulus;
        let n = self.ctx.degree;
        let mut positive = vec![BigUint::zero(); n];
        let mut negative = vec![BigUint::zero(); n];
        for (i, a) in self.coefficients.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in p.coefficients.iter().enumerate() {
                if b.is_zero() {
                    continue;
                }
                let k = i + j;
                if k < n {
                    positive[k] += a * b;
                } else {
                    negative[k - n] += a * b;
                }
            }
        }

        let mut out = Poly::zero(&self.ctx);
        izip!(out.coefficients.iter_mut(), positive, negative).for_each(|(c, pos, neg)| {
            let pos = pos % q;
            let neg = neg % q;
            *c = if pos >= neg { pos - neg } else { pos + q - neg };
        });
        out
    }
}

impl Mul<&BigUint> for &Poly {
    type Output = Poly;
    fn mul(self, p: &BigUint) -> Poly {
        let mut q = self.clone();
        q *= p;
        q
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        let mut out = self.clone();
        let q = &self.ctx.modulus;
        out.coefficients.iter_mut().for_each(|a| {
            if !a.is_zero() {
                *a = q - &*a;
            }
        });
        out
    }
}

impl Neg for Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        -&self
    }
}
