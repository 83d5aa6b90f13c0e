use std::{
    fmt::{self, Display},
    mem::replace,
};

use derive_more::Deref;

// linear search per entry, run once per record type in const context
pub const fn inverse<const N: usize>(permutation: [usize; N]) -> [usize; N] {
    let mut inverse = [0; N];
    let mut logical = 0;
    while logical < N {
        let mut physical = 0;
        while physical < N && permutation[physical] != logical {
            physical += 1
        }
        assert!(physical < N, "sequence is not a permutation");
        inverse[logical] = physical;
        logical += 1
    }
    inverse
}

// out of range panics, which in const context is a compile error
pub const fn resolve(logical: usize, inverse: &[usize]) -> usize {
    inverse[logical]
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(fmt = "IndexError: index {index} out of range for arity {arity}")]
pub struct IndexError {
    pub index: usize,
    pub arity: usize,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(fmt = "PermutationError: {reason} in {sequence:?}")]
pub struct PermutationError {
    pub sequence: Vec<usize>,
    pub reason: &'static str,
}

// physical slot -> logical index, inverse kept alongside
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref)]
pub struct Permutation {
    #[deref]
    forward: Box<[usize]>,
    inverse: Box<[usize]>,
}

impl Permutation {
    pub fn new(sequence: Vec<usize>) -> anyhow::Result<Self> {
        let mut seen = vec![false; sequence.len()];
        for &logical in &sequence {
            let Some(slot) = seen.get_mut(logical) else {
                anyhow::bail!(PermutationError {
                    sequence: sequence.clone(),
                    reason: "index out of range"
                })
            };
            if replace(slot, true) {
                anyhow::bail!(PermutationError {
                    sequence: sequence.clone(),
                    reason: "duplicated index"
                })
            }
        }
        Ok(Self::new_unchecked(sequence))
    }

    // caller guarantees `sequence` is a permutation of 0..len
    pub(crate) fn new_unchecked(sequence: Vec<usize>) -> Self {
        let mut inverse = vec![0; sequence.len()];
        for (physical, &logical) in sequence.iter().enumerate() {
            inverse[logical] = physical
        }
        Self {
            forward: sequence.into(),
            inverse: inverse.into(),
        }
    }

    pub fn identity(arity: usize) -> Self {
        Self::new_unchecked((0..arity).collect())
    }

    pub fn arity(&self) -> usize {
        self.forward.len()
    }

    pub fn is_identity(&self) -> bool {
        self.forward
            .iter()
            .enumerate()
            .all(|(physical, &logical)| physical == logical)
    }

    pub fn inverse(&self) -> Self {
        Self {
            forward: self.inverse.clone(),
            inverse: self.forward.clone(),
        }
    }

    /// Physical slot of a logical index.
    pub fn resolve(&self, logical: usize) -> anyhow::Result<usize> {
        self.inverse.get(logical).copied().ok_or(
            IndexError {
                index: logical,
                arity: self.arity(),
            }
            .into(),
        )
    }

    /// Logical index stored at a physical slot.
    pub fn logical(&self, physical: usize) -> anyhow::Result<usize> {
        self.forward.get(physical).copied().ok_or(
            IndexError {
                index: physical,
                arity: self.arity(),
            }
            .into(),
        )
    }

    pub fn apply<T: Clone>(&self, logical: &[T]) -> anyhow::Result<Vec<T>> {
        anyhow::ensure!(
            logical.len() == self.arity(),
            "expected {} items, found {}",
            self.arity(),
            logical.len()
        );
        Ok(self.forward.iter().map(|&i| logical[i].clone()).collect())
    }
}

impl Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.forward)
    }
}
