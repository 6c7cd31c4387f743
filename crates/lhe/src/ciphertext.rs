use crate::CiphertextMeta;

/// A provider ciphertext annotated with the evaluator's metadata.
///
/// The metadata is only updated by the evaluator, through the tracker.
#[derive(Debug, Clone)]
pub struct TrackedCiphertext<C> {
    pub(crate) ct: C,
    pub(crate) meta: CiphertextMeta,
    pub(crate) session: u64,
}

impl<C> TrackedCiphertext<C> {
    /// Returns the provider ciphertext.
    pub fn ciphertext(&self) -> &C {
        &self.ct
    }

    /// Returns the metadata.
    pub fn meta(&self) -> &CiphertextMeta {
        &self.meta
    }

    /// Returns the degree.
    pub fn degree(&self) -> usize {
        self.meta.degree
    }

    /// Returns the level.
    pub fn level(&self) -> usize {
        self.meta.level
    }

    /// Returns the scale, for the approximate family.
    pub fn scale(&self) -> Option<f64> {
        self.meta.scale
    }

    /// Identifier of the session whose keys encrypt this ciphertext.
    pub fn session_id(&self) -> u64 {
        self.session
    }
}
