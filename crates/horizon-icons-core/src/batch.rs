//! Splitting large name lists into loader-sized batches.

/// Limits for one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchLimits {
    /// Maximum number of names per batch.
    pub max_count: Option<usize>,
    /// Maximum combined length per batch, counting each name plus one
    /// separator character.
    pub max_length: Option<usize>,
}

impl BatchLimits {
    /// No limits: everything goes into one batch.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Limit by count.
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Limit by combined length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Use the limits set in `self`, falling back to `other` for unset ones.
    pub fn or(self, other: BatchLimits) -> Self {
        Self {
            max_count: self.max_count.or(other.max_count),
            max_length: self.max_length.or(other.max_length),
        }
    }
}

/// Split names into batches that respect `limits`.
///
/// Names are sorted first, so the same set of names always produces the same
/// batches regardless of input order. A name that alone exceeds `max_length`
/// still gets a batch of its own.
///
/// ```
/// use horizon_icons_core::{BatchLimits, split_for_batch_loading};
///
/// let batches = split_for_batch_loading(
///     vec!["b".to_string(), "a".to_string(), "c".to_string()],
///     BatchLimits::unlimited().with_max_count(2),
/// );
/// assert_eq!(batches, vec![vec!["a", "b"], vec!["c"]]);
/// ```
pub fn split_for_batch_loading(mut names: Vec<String>, limits: BatchLimits) -> Vec<Vec<String>> {
    names.sort();

    let mut batches = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut length = 0;

    for name in names {
        let cost = name.len() + 1;
        let over_length = limits.max_length.is_some_and(|max| length + cost > max);
        let over_count = limits.max_count.is_some_and(|max| current.len() >= max);

        if !current.is_empty() && (over_length || over_count) {
            batches.push(std::mem::take(&mut current));
            length = 0;
        }

        current.push(name);
        length += cost;
    }

    if !current.is_empty() {
        batches.push(current);
    }
    batches
}
