//! Evaluation sessions.

use crate::{
    CiphertextMeta, Error, Evaluator, KeyBundle, RelinPolicy, Result, SchemeProfile,
    TrackedCiphertext,
};
use lhe_traits::HePrimitives;
use log::info;
use rand::{CryptoRng, RngCore};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// The results of [`EvaluatorSession::evaluate_circuit`].
#[derive(Debug, Clone)]
pub struct CircuitOutput<C> {
    /// Product of the inputs.
    pub product: TrackedCiphertext<C>,
    /// Sum of the inputs.
    pub sum: TrackedCiphertext<C>,
}

/// A provider, a profile and the keys generated for them.
///
/// Ciphertexts are stamped with the identifier of the session that
/// encrypted them, and can only be evaluated and decrypted by that session.
#[derive(Debug)]
pub struct EvaluatorSession<P: HePrimitives> {
    id: u64,
    provider: P,
    profile: SchemeProfile,
    keys: KeyBundle<P>,
}

impl<P: HePrimitives> EvaluatorSession<P> {
    /// Creates a session with relinearization keys for every degree up to
    /// the maximum relinearization degree of the profile.
    pub fn new<R: RngCore + CryptoRng>(
        profile: SchemeProfile,
        provider: P,
        rng: &mut R,
    ) -> Result<Self> {
        let degrees = (2..=profile.max_relin_degree()).collect::<Vec<_>>();
        Self::with_degrees(profile, provider, &degrees, rng)
    }

    /// Creates a session with the relinearization keys needed by the given
    /// policies only.
    pub fn with_policies<R: RngCore + CryptoRng>(
        profile: SchemeProfile,
        provider: P,
        policies: &[RelinPolicy],
        rng: &mut R,
    ) -> Result<Self> {
        let degrees = policies
            .iter()
            .flat_map(|policy| policy.required_degrees(&profile))
            .collect::<Vec<_>>();
        Self::with_degrees(profile, provider, &degrees, rng)
    }

    fn with_degrees<R: RngCore + CryptoRng>(
        profile: SchemeProfile,
        provider: P,
        degrees: &[usize],
        rng: &mut R,
    ) -> Result<Self> {
        profile.check_provider(&provider)?;
        let keys = KeyBundle::generate(&profile, &provider, degrees, rng)?;
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        info!(
            "session {id}: {} family, {} moduli, maximum relinearization degree {}",
            profile.family(),
            profile.chain_length(),
            profile.max_relin_degree()
        );
        Ok(Self {
            id,
            provider,
            profile,
            keys,
        })
    }

    /// Returns the identifier of this session.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the profile.
    pub fn profile(&self) -> &SchemeProfile {
        &self.profile
    }

    /// Returns the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the key bundle.
    pub fn keys(&self) -> &KeyBundle<P> {
        &self.keys
    }

    /// An evaluator borrowing this session's provider and keys.
    pub fn evaluator(&self) -> Evaluator<'_, P> {
        Evaluator::new(&self.provider, &self.profile, &self.keys, self.id)
    }

    /// Encrypt a plaintext at the top of the modulus chain.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        pt: &P::Plaintext,
        rng: &mut R,
    ) -> Result<TrackedCiphertext<P::Ciphertext>> {
        let ct = self
            .provider
            .encrypt(pt, self.keys.public_key(), rng)
            .map_err(Error::provider)?;
        Ok(TrackedCiphertext {
            ct,
            meta: CiphertextMeta::fresh(&self.profile),
            session: self.id,
        })
    }

    /// Evaluate the product of the ciphertexts.
    pub fn evaluate_multiply_chain(
        &self,
        cts: &[TrackedCiphertext<P::Ciphertext>],
        policy: RelinPolicy,
    ) -> Result<TrackedCiphertext<P::Ciphertext>> {
        self.evaluator().evaluate_multiply_chain(cts, policy)
    }

    /// Evaluate the sum of the ciphertexts.
    pub fn evaluate_add_chain(
        &self,
        cts: &[TrackedCiphertext<P::Ciphertext>],
    ) -> Result<TrackedCiphertext<P::Ciphertext>> {
        self.evaluator().evaluate_add_chain(cts)
    }

    /// Evaluate both the product and the sum of the ciphertexts, in parallel
    /// and on separate copies of the inputs.
    pub fn evaluate_circuit(
        &self,
        cts: &[TrackedCiphertext<P::Ciphertext>],
        policy: RelinPolicy,
    ) -> Result<CircuitOutput<P::Ciphertext>> {
        let product_inputs = cts.to_vec();
        let sum_inputs = cts.to_vec();
        let (product, sum) = rayon::join(
            || self.evaluate_multiply_chain(&product_inputs, policy),
            || self.evaluate_add_chain(&sum_inputs),
        );
        Ok(CircuitOutput {
            product: product?,
            sum: sum?,
        })
    }

    /// Decrypt a ciphertext of this session.
    pub fn decrypt(&self, ct: TrackedCiphertext<P::Ciphertext>) -> Result<P::Plaintext> {
        if ct.session != self.id {
            return Err(Error::KeyMismatch);
        }
        self.provider
            .decrypt(&ct.ct, self.keys.secret_key())
            .map_err(Error::provider)
    }
}
