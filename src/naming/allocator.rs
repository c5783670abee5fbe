use std::collections::HashSet;

use crate::contracts::AllocationError;
use crate::naming::scheme::{NamingScheme, PrefixScheme};

/// Produces fresh table names that avoid every name already in use.
///
/// # Invariants
/// - Output has exactly `count` names, pairwise distinct, none in `existing`
/// - Candidate indices are probed in increasing order starting at 1
/// - Same `existing` and `count` always give the same result
#[derive(Debug, Clone, Default)]
pub struct NameAllocator<S = PrefixScheme> {
    scheme: S,
}

impl<S: NamingScheme> NameAllocator<S> {
    pub fn new(scheme: S) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// Allocates `count` names not present in `existing`.
    ///
    /// At most `count + existing.len()` indices are probed, which always
    /// suffices for an injective scheme. Reaching the bound early means the
    /// scheme produced duplicates and yields [`AllocationError::SchemeExhausted`].
    pub fn allocate(
        &self,
        count: usize,
        existing: &HashSet<String>,
    ) -> Result<Vec<String>, AllocationError> {
        let mut names = Vec::with_capacity(count);
        if count == 0 {
            return Ok(names);
        }

        let max_index = (count as u64).saturating_add(existing.len() as u64);
        let mut chosen: HashSet<String> = HashSet::with_capacity(count);
        let mut index = 1u64;

        while names.len() < count {
            if index > max_index {
                return Err(AllocationError::SchemeExhausted {
                    requested: count,
                    found: names.len(),
                    probed: max_index,
                });
            }

            let candidate = self.scheme.candidate(index);
            if !existing.contains(&candidate) && chosen.insert(candidate.clone()) {
                names.push(candidate);
            }
            index += 1;
        }

        tracing::debug!(
            requested = count,
            probed = index - 1,
            skipped = index - 1 - count as u64,
            "Allocated table names"
        );

        Ok(names)
    }
}
