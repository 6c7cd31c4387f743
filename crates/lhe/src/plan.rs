//! Relinearization policies and circuit plans.

use crate::{CiphertextMeta, SchemeProfile};
use std::fmt;

/// When to relinearize within a multiplication chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelinPolicy {
    /// Relinearize after every multiplication; needs a degree-2 key only.
    Eager,
    /// Let the degree grow up to the maximum relinearization degree and
    /// relinearize as late as possible.
    Deferred,
}

impl RelinPolicy {
    /// The relinearization key degrees this policy may request.
    #[must_use]
    pub fn required_degrees(&self, profile: &SchemeProfile) -> Vec<usize> {
        match self {
            RelinPolicy::Eager => vec![2],
            RelinPolicy::Deferred => (2..=profile.max_relin_degree()).collect(),
        }
    }
}

impl fmt::Display for RelinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelinPolicy::Eager => write!(f, "eager"),
            RelinPolicy::Deferred => write!(f, "deferred"),
        }
    }
}

/// One provider operation of a plan.
///
/// Operand indices refer to the inputs of the plan; the accumulator starts
/// as a copy of the first input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Drop one modulus from the accumulator.
    DropAccumulator,
    /// Drop one modulus from an operand.
    DropOperand(usize),
    /// Multiply the accumulator by an operand.
    Multiply(usize),
    /// Relinearize the accumulator with the key of the given degree.
    Relinearize {
        /// Degree of the accumulator, and of the key used.
        degree: usize,
    },
    /// Rescale the accumulator.
    Rescale,
    /// Add an operand to the accumulator.
    Add(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::DropAccumulator => write!(f, "mod_drop(acc)"),
            Step::DropOperand(i) => write!(f, "mod_drop(x{i})"),
            Step::Multiply(i) => write!(f, "acc *= x{i}"),
            Step::Relinearize { degree } => write!(f, "relinearize(acc, degree {degree})"),
            Step::Rescale => write!(f, "rescale(acc)"),
            Step::Add(i) => write!(f, "acc += x{i}"),
        }
    }
}

/// An ordered list of provider operations, checked against the tracker
/// before any of them runs.
///
/// A plan is bound to the session whose evaluator computed it and can only be
/// executed by that session.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitPlan {
    pub(crate) session: u64,
    pub(crate) inputs: Vec<CiphertextMeta>,
    pub(crate) steps: Vec<Step>,
    pub(crate) output: CiphertextMeta,
}

impl CircuitPlan {
    /// Identifier of the session that computed the plan.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.session
    }

    /// Metadata of the inputs the plan was computed for.
    #[must_use]
    pub fn inputs(&self) -> &[CiphertextMeta] {
        &self.inputs
    }

    /// The steps, in execution order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Metadata of the result.
    #[must_use]
    pub fn output(&self) -> &CiphertextMeta {
        &self.output
    }

    /// Number of relinearizations.
    #[must_use]
    pub fn relinearizations(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Relinearize { .. }))
            .count()
    }

    /// Number of rescales.
    #[must_use]
    pub fn rescales(&self) -> usize {
        self.steps.iter().filter(|s| **s == Step::Rescale).count()
    }
}

impl fmt::Display for CircuitPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acc = x0")?;
        for step in &self.steps {
            write!(f, "; {step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CircuitPlan, RelinPolicy, Step};
    use crate::{CiphertextMeta, SchemeProfile};
    use std::error::Error;

    #[test]
    fn required_degrees() -> Result<(), Box<dyn Error>> {
        let profile = SchemeProfile::integer(3, 4)?;
        assert_eq!(RelinPolicy::Eager.required_degrees(&profile), vec![2]);
        assert_eq!(
            RelinPolicy::Deferred.required_degrees(&profile),
            vec![2, 3, 4]
        );
        assert_eq!(RelinPolicy::Deferred.to_string(), "deferred");
        Ok(())
    }

    #[test]
    fn counts() {
        let meta = CiphertextMeta {
            degree: 1,
            level: 0,
            scale: None,
        };
        let plan = CircuitPlan {
            session: 0,
            inputs: vec![meta; 3],
            steps: vec![
                Step::Multiply(1),
                Step::Relinearize { degree: 2 },
                Step::Multiply(2),
                Step::Relinearize { degree: 2 },
                Step::Rescale,
            ],
            output: CiphertextMeta { level: 1, ..meta },
        };
        assert_eq!(plan.relinearizations(), 2);
        assert_eq!(plan.rescales(), 1);
        assert_eq!(
            plan.to_string(),
            "acc = x0; acc *= x1; relinearize(acc, degree 2); acc *= x2; \
             relinearize(acc, degree 2); rescale(acc)"
        );
    }
}
