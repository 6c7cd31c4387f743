//! The leveled circuit evaluator.

use crate::{
    CiphertextMeta, CircuitPlan, Error, KeyBundle, LevelTracker, RelinPolicy, Result,
    SchemeProfile, Step, TrackedCiphertext,
};
use lhe_traits::HePrimitives;
use log::{debug, warn};

/// Plans and runs multiplication and addition chains.
///
/// Planning only reads the metadata of the operands, so every structural
/// error is reported before the first provider operator runs. Execution then
/// issues the planned operators strictly in order.
#[derive(Debug)]
pub struct Evaluator<'a, P: HePrimitives> {
    provider: &'a P,
    profile: &'a SchemeProfile,
    keys: &'a KeyBundle<P>,
    session: u64,
}

impl<'a, P: HePrimitives> Evaluator<'a, P> {
    pub(crate) fn new(
        provider: &'a P,
        profile: &'a SchemeProfile,
        keys: &'a KeyBundle<P>,
        session: u64,
    ) -> Self {
        Self {
            provider,
            profile,
            keys,
            session,
        }
    }

    /// A tracker over the profile, the provider's moduli and the available
    /// relinearization keys.
    pub fn tracker(&self) -> Result<LevelTracker<'a>> {
        LevelTracker::new(self.profile, self.provider.moduli(), self.keys.degrees())
    }

    /// Plan the product of the inputs, left to right, followed by a single
    /// rescale.
    ///
    /// Operands at different levels are aligned by dropping moduli from the
    /// shallower one. With [`RelinPolicy::Deferred`], the accumulator is only
    /// relinearized when the next product would exceed the maximum
    /// relinearization degree, and once at the end.
    pub fn plan_multiply_chain(
        &self,
        inputs: &[CiphertextMeta],
        policy: RelinPolicy,
    ) -> Result<CircuitPlan> {
        if inputs.len() < 2 {
            return Err(Error::TooFewOperands(inputs.len()));
        }
        let tracker = self.tracker()?;
        let max_degree = self.profile.max_relin_degree();

        let mut steps = vec![];
        let mut acc = inputs[0];
        for (i, input) in inputs.iter().enumerate().skip(1) {
            let mut operand = *input;
            while acc.level < operand.level {
                acc = tracker.after_mod_drop(&acc)?;
                steps.push(Step::DropAccumulator);
            }
            while operand.level < acc.level {
                operand = tracker.after_mod_drop(&operand)?;
                steps.push(Step::DropOperand(i));
            }

            if policy == RelinPolicy::Deferred
                && acc.degree > 1
                && acc.degree + operand.degree > max_degree
            {
                steps.push(Step::Relinearize { degree: acc.degree });
                acc = tracker.after_relinearize(&acc)?;
            }

            acc = tracker.after_multiply(&acc, &operand)?;
            steps.push(Step::Multiply(i));

            if policy == RelinPolicy::Eager {
                steps.push(Step::Relinearize { degree: acc.degree });
                acc = tracker.after_relinearize(&acc)?;
            }
        }

        if acc.degree > 1 {
            steps.push(Step::Relinearize { degree: acc.degree });
            acc = tracker.after_relinearize(&acc)?;
        }
        acc = tracker.after_rescale(&acc)?;
        steps.push(Step::Rescale);

        Ok(CircuitPlan {
            session: self.session,
            inputs: inputs.to_vec(),
            steps,
            output: acc,
        })
    }

    /// Plan the sum of the inputs, left to right.
    ///
    /// The inputs must already share their level and scale.
    pub fn plan_add_chain(&self, inputs: &[CiphertextMeta]) -> Result<CircuitPlan> {
        if inputs.len() < 2 {
            return Err(Error::TooFewOperands(inputs.len()));
        }
        let tracker = self.tracker()?;

        let mut steps = Vec::with_capacity(inputs.len() - 1);
        let mut acc = inputs[0];
        for (i, input) in inputs.iter().enumerate().skip(1) {
            acc = tracker.after_add(&acc, input)?;
            steps.push(Step::Add(i));
        }

        Ok(CircuitPlan {
            session: self.session,
            inputs: inputs.to_vec(),
            steps,
            output: acc,
        })
    }

    /// Evaluate the product of the inputs under a relinearization policy.
    pub fn evaluate_multiply_chain(
        &self,
        inputs: &[TrackedCiphertext<P::Ciphertext>],
        policy: RelinPolicy,
    ) -> Result<TrackedCiphertext<P::Ciphertext>> {
        self.check_session(inputs)?;
        let metas = inputs.iter().map(|ct| ct.meta).collect::<Vec<_>>();
        let plan = self
            .plan_multiply_chain(&metas, policy)
            .inspect_err(|e| warn!("multiply chain rejected: {e}"))?;
        debug!("{policy} multiply chain: {plan}");
        self.execute(&plan, inputs)
    }

    /// Evaluate the sum of the inputs.
    pub fn evaluate_add_chain(
        &self,
        inputs: &[TrackedCiphertext<P::Ciphertext>],
    ) -> Result<TrackedCiphertext<P::Ciphertext>> {
        self.check_session(inputs)?;
        let metas = inputs.iter().map(|ct| ct.meta).collect::<Vec<_>>();
        let plan = self
            .plan_add_chain(&metas)
            .inspect_err(|e| warn!("add chain rejected: {e}"))?;
        debug!("add chain: {plan}");
        self.execute(&plan, inputs)
    }

    /// Run a plan on copies of the inputs it was computed for.
    ///
    /// Fails with [`Error::KeyMismatch`] if the plan or the inputs belong to
    /// another session. No provider operator runs unless every relinearization
    /// key the plan needs is available.
    pub fn execute(
        &self,
        plan: &CircuitPlan,
        inputs: &[TrackedCiphertext<P::Ciphertext>],
    ) -> Result<TrackedCiphertext<P::Ciphertext>> {
        if plan.session != self.session {
            return Err(Error::KeyMismatch);
        }
        self.check_session(inputs)?;
        if inputs.len() != plan.inputs.len()
            || inputs.iter().zip(&plan.inputs).any(|(ct, meta)| ct.meta != *meta)
        {
            return Err(Error::InvalidParameter(
                "The plan was computed for other inputs".to_string(),
            ));
        }
        let rks = plan
            .steps
            .iter()
            .filter_map(|step| match *step {
                Step::Relinearize { degree } => Some(
                    self.keys
                        .relin_key(degree)
                        .ok_or(Error::MissingRelinKey(degree)),
                ),
                _ => None,
            })
            .collect::<Result<Vec<_>>>()?;

        let mut rks = rks.into_iter();
        let mut operands = inputs.iter().map(|ct| ct.ct.clone()).collect::<Vec<_>>();
        let mut acc = operands[0].clone();
        for step in &plan.steps {
            debug!("{step}");
            match *step {
                Step::DropAccumulator => self.provider.mod_drop(&mut acc),
                Step::DropOperand(i) => self.provider.mod_drop(&mut operands[i]),
                Step::Multiply(i) => self
                    .provider
                    .multiply(&acc, &operands[i])
                    .map(|product| acc = product),
                Step::Relinearize { degree } => {
                    let rk = rks.next().ok_or(Error::MissingRelinKey(degree))?;
                    self.provider.relinearize(&mut acc, rk)
                }
                Step::Rescale => self.provider.rescale(&mut acc),
                Step::Add(i) => self
                    .provider
                    .add(&acc, &operands[i])
                    .map(|sum| acc = sum),
            }
            .map_err(Error::provider)?;
        }

        Ok(TrackedCiphertext {
            ct: acc,
            meta: plan.output,
            session: self.session,
        })
    }

    fn check_session(&self, inputs: &[TrackedCiphertext<P::Ciphertext>]) -> Result<()> {
        if inputs.iter().any(|ct| ct.session != self.session) {
            Err(Error::KeyMismatch)
        } else {
            Ok(())
        }
    }
}
