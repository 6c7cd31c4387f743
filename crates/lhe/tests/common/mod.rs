#![allow(dead_code)]

use lhe::{EvaluatorSession, RelinPolicy, SchemeProfile, TrackedCiphertext};
use lhe_rlwe::{
    Ciphertext, Encoding, Error, Plaintext, PublicKey, RelinearizationKey, RlweParameters,
    RlweProvider, SecretKey,
};
use lhe_traits::{FheDecoder, FheEncoder, GeneratedKeys, HePrimitives, SchemeFamily};
use rand::{thread_rng, CryptoRng, RngCore};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// A provider counting the operators it runs.
#[derive(Debug)]
pub struct CountingProvider {
    inner: RlweProvider,
    multiplications: AtomicUsize,
    relinearizations: AtomicUsize,
    rescales: AtomicUsize,
    additions: AtomicUsize,
}

impl CountingProvider {
    pub fn new(par: &Arc<RlweParameters>) -> Self {
        Self {
            inner: RlweProvider::new(par),
            multiplications: AtomicUsize::new(0),
            relinearizations: AtomicUsize::new(0),
            rescales: AtomicUsize::new(0),
            additions: AtomicUsize::new(0),
        }
    }

    pub fn multiplications(&self) -> usize {
        self.multiplications.load(Ordering::SeqCst)
    }

    pub fn relinearizations(&self) -> usize {
        self.relinearizations.load(Ordering::SeqCst)
    }

    pub fn rescales(&self) -> usize {
        self.rescales.load(Ordering::SeqCst)
    }

    pub fn additions(&self) -> usize {
        self.additions.load(Ordering::SeqCst)
    }
}

impl HePrimitives for CountingProvider {
    type Plaintext = Plaintext;
    type Ciphertext = Ciphertext;
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type RelinearizationKey = RelinearizationKey;
    type Error = Error;

    fn family(&self) -> SchemeFamily {
        self.inner.family()
    }

    fn moduli(&self) -> &[u64] {
        self.inner.moduli()
    }

    fn scale(&self) -> Option<f64> {
        self.inner.scale()
    }

    fn generate_keys<R: RngCore + CryptoRng>(
        &self,
        relin_degrees: &[usize],
        rng: &mut R,
    ) -> Result<GeneratedKeys<Self>, Error> {
        let keys = self.inner.generate_keys(relin_degrees, rng)?;
        Ok(GeneratedKeys {
            public_key: keys.public_key,
            secret_key: keys.secret_key,
            relinearization_keys: keys.relinearization_keys,
        })
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        pt: &Plaintext,
        pk: &PublicKey,
        rng: &mut R,
    ) -> Result<Ciphertext, Error> {
        self.inner.encrypt(pt, pk, rng)
    }

    fn decrypt(&self, ct: &Ciphertext, sk: &SecretKey) -> Result<Plaintext, Error> {
        self.inner.decrypt(ct, sk)
    }

    fn multiply(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, Error> {
        self.multiplications.fetch_add(1, Ordering::SeqCst);
        self.inner.multiply(a, b)
    }

    fn relinearize(&self, ct: &mut Ciphertext, rk: &RelinearizationKey) -> Result<(), Error> {
        self.relinearizations.fetch_add(1, Ordering::SeqCst);
        self.inner.relinearize(ct, rk)
    }

    fn rescale(&self, ct: &mut Ciphertext) -> Result<(), Error> {
        self.rescales.fetch_add(1, Ordering::SeqCst);
        self.inner.rescale(ct)
    }

    fn mod_drop(&self, ct: &mut Ciphertext) -> Result<(), Error> {
        self.inner.mod_drop(ct)
    }

    fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, Error> {
        self.additions.fetch_add(1, Ordering::SeqCst);
        self.inner.add(a, b)
    }
}

/// Integer parameters with `num_moduli` 60-bit moduli and polynomials of
/// degree 16.
pub fn bgv_parameters(num_moduli: usize) -> Arc<RlweParameters> {
    RlweParameters::bgv_arc(num_moduli, 16).unwrap()
}

/// Approximate parameters with moduli of 60, 60, 40 and 40 bits and a scale
/// of 2^40.
pub fn ckks_parameters() -> Arc<RlweParameters> {
    RlweParameters::ckks_arc(16).unwrap()
}

pub fn bgv_session(
    par: &Arc<RlweParameters>,
    max_relin_degree: usize,
    policies: &[RelinPolicy],
) -> EvaluatorSession<CountingProvider> {
    let profile = SchemeProfile::integer(par.moduli().len(), max_relin_degree).unwrap();
    EvaluatorSession::with_policies(
        profile,
        CountingProvider::new(par),
        policies,
        &mut thread_rng(),
    )
    .unwrap()
}

pub fn ckks_session(
    par: &Arc<RlweParameters>,
    max_relin_degree: usize,
) -> EvaluatorSession<CountingProvider> {
    let provider = CountingProvider::new(par);
    let profile = SchemeProfile::for_provider(&provider, max_relin_degree).unwrap();
    EvaluatorSession::new(profile, provider, &mut thread_rng()).unwrap()
}

pub fn encrypt_integers(
    session: &EvaluatorSession<CountingProvider>,
    par: &Arc<RlweParameters>,
    values: &[u64],
) -> Vec<TrackedCiphertext<Ciphertext>> {
    let mut rng = thread_rng();
    values
        .iter()
        .map(|v| {
            let pt = Plaintext::try_encode(&[*v] as &[u64], Encoding::integer(), par).unwrap();
            session.encrypt(&pt, &mut rng).unwrap()
        })
        .collect()
}

pub fn encrypt_reals(
    session: &EvaluatorSession<CountingProvider>,
    par: &Arc<RlweParameters>,
    values: &[f64],
) -> Vec<TrackedCiphertext<Ciphertext>> {
    let mut rng = thread_rng();
    values
        .iter()
        .map(|v| {
            let pt = Plaintext::try_encode(&[*v] as &[f64], Encoding::real(), par).unwrap();
            session.encrypt(&pt, &mut rng).unwrap()
        })
        .collect()
}

pub fn decrypt_integer(
    session: &EvaluatorSession<CountingProvider>,
    ct: TrackedCiphertext<Ciphertext>,
) -> u64 {
    let pt = session.decrypt(ct).unwrap();
    Vec::<u64>::try_decode(&pt, Encoding::integer()).unwrap()[0]
}

pub fn decrypt_real(
    session: &EvaluatorSession<CountingProvider>,
    ct: TrackedCiphertext<Ciphertext>,
) -> f64 {
    let pt = session.decrypt(ct).unwrap();
    Vec::<f64>::try_decode(&pt, Encoding::real()).unwrap()[0]
}
