//! Decomposition configuration.

/// Configuration for [`Decomposer`](super::Decomposer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecomposeConfig {
    /// Split a root-level `OR` into one filter set per disjunct.
    ///
    /// When disabled a root `OR` is kept whole in the `remaining` list of a
    /// single filter set.
    pub split_root_disjunction: bool,
    /// Maximum tree depth accepted by
    /// [`Decomposer::try_decompose`](super::Decomposer::try_decompose).
    pub max_depth: Option<usize>,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            split_root_disjunction: true,
            max_depth: None,
        }
    }
}

impl DecomposeConfig {
    /// Sets whether a root `OR` is split into disjuncts.
    #[must_use]
    pub fn with_split_root_disjunction(mut self, split: bool) -> Self {
        self.split_root_disjunction = split;
        self
    }

    /// Sets the depth limit enforced by validation.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
