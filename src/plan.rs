use crate::{
    footprint::{Footprint, OverflowError},
    meta::{ElementDescriptor, TypeMeta, MAX_SIZE},
    permutation::Permutation,
};

// `result[slot]` is the logical index stored at `slot`: descending
// alignment, ties in declaration order
pub const fn permutation<const N: usize>(aligns: [usize; N]) -> [usize; N] {
    let mut order = [0; N];
    let mut i = 0;
    while i < N {
        order[i] = i;
        i += 1
    }
    // insertion sort; strict comparison keeps equal alignments in place
    let mut i = 1;
    while i < N {
        let current = order[i];
        let mut j = i;
        while j > 0 && aligns[order[j - 1]] < aligns[current] {
            order[j] = order[j - 1];
            j -= 1
        }
        order[j] = current;
        i += 1
    }
    order
}

pub const fn descriptors<const N: usize>(
    sizes: [usize; N],
    aligns: [usize; N],
) -> [ElementDescriptor; N] {
    let mut descriptors = [ElementDescriptor {
        position: 0,
        size: 0,
        align: 1,
    }; N];
    let mut i = 0;
    while i < N {
        descriptors[i] = ElementDescriptor {
            position: i,
            size: sizes[i],
            align: aligns[i],
        };
        i += 1
    }
    descriptors
}

/// Descriptors in physical order.
pub const fn reorder<const N: usize>(
    descriptors: [ElementDescriptor; N],
    permutation: [usize; N],
) -> [ElementDescriptor; N] {
    let mut reordered = descriptors;
    let mut slot = 0;
    while slot < N {
        reordered[slot] = descriptors[permutation[slot]];
        slot += 1
    }
    reordered
}

#[derive(Debug, Clone)]
pub struct Plan {
    types: Vec<TypeMeta>,
    permutation: Permutation,
}

impl Plan {
    pub fn new(types: Vec<TypeMeta>) -> Self {
        let mut tagged = types
            .iter()
            .enumerate()
            .map(|(position, ty)| ty.descriptor(position))
            .collect::<Vec<_>>();
        // `sort_by` is stable
        tagged.sort_by(|a, b| b.align.cmp(&a.align));
        let permutation =
            Permutation::new_unchecked(tagged.iter().map(|element| element.position).collect());
        tracing::debug!(arity = types.len(), %permutation, "planned");
        Self { types, permutation }
    }

    pub fn arity(&self) -> usize {
        self.types.len()
    }

    pub fn types(&self) -> &[TypeMeta] {
        &self.types
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn inverse(&self) -> Permutation {
        self.permutation.inverse()
    }

    /// Types in physical order.
    pub fn reordered(&self) -> anyhow::Result<Vec<TypeMeta>> {
        self.permutation.apply(&self.types)
    }

    pub fn is_identity(&self) -> bool {
        self.permutation.is_identity()
    }

    pub fn optimized(&self) -> anyhow::Result<Footprint> {
        Footprint::of(&self.reordered()?)
    }

    /// Footprint of the declaration order under `repr(C)` rules.
    pub fn naive(&self) -> anyhow::Result<Footprint> {
        Footprint::of(&self.types)
    }

    pub fn data_size(&self) -> anyhow::Result<usize> {
        let mut total = 0usize;
        for ty in &self.types {
            total = total
                .checked_add(ty.size)
                .filter(|&total| total <= MAX_SIZE)
                .ok_or_else(|| OverflowError {
                    name: ty.name.clone(),
                })?;
        }
        Ok(total)
    }

    pub fn savings(&self) -> anyhow::Result<usize> {
        let savings = self.naive()?.size.saturating_sub(self.optimized()?.size);
        tracing::debug!(savings, "compared against declaration order");
        Ok(savings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn meta(name: &str, size: usize, align: usize) -> TypeMeta {
        TypeMeta::new(name, size, align).unwrap()
    }

    fn mixed() -> Vec<TypeMeta> {
        let char = meta("char", 1, 1);
        let int = meta("int", 4, 4);
        let double = meta("double", 8, 8);
        vec![
            char.clone(),
            int.clone(),
            char.clone(),
            int,
            char.clone(),
            double,
            char,
        ]
    }

    #[test]
    fn const_mixed() {
        const PERMUTATION: [usize; 7] = permutation([1, 4, 1, 4, 1, 8, 1]);
        assert_eq!(PERMUTATION, [5, 1, 3, 0, 2, 4, 6])
    }

    #[test]
    fn const_boundaries() {
        assert_eq!(permutation::<0>([]), []);
        assert_eq!(permutation([16]), [0]);
        assert_eq!(permutation([2, 2, 2]), [0, 1, 2]);
        assert_eq!(permutation([1, 2, 4, 8]), [3, 2, 1, 0])
    }

    #[test]
    fn const_idempotent() {
        let aligns = [1, 8, 2, 8, 4, 1];
        let first = permutation(aligns);
        let mut sorted = aligns;
        for (slot, &logical) in first.iter().enumerate() {
            sorted[slot] = aligns[logical]
        }
        assert_eq!(permutation(sorted), [0, 1, 2, 3, 4, 5])
    }

    #[test]
    fn const_descriptors() {
        const REORDERED: [ElementDescriptor; 3] =
            reorder(descriptors([1, 8, 2], [1, 8, 2]), permutation([1, 8, 2]));
        assert_eq!(
            REORDERED.map(|element| element.position),
            [1, 2, 0]
        );
        assert_eq!(REORDERED.map(|element| element.size), [8, 2, 1])
    }

    #[test]
    fn runtime_mixed() {
        let plan = Plan::new(mixed());
        assert_eq!(plan.permutation()[..], [5, 1, 3, 0, 2, 4, 6]);
        assert_eq!(
            plan.reordered()
                .unwrap()
                .iter()
                .map(|ty| ty.name.as_str())
                .collect::<Vec<_>>(),
            ["double", "int", "int", "char", "char", "char", "char"]
        );
        assert_eq!(plan.optimized().unwrap().size, 24);
        assert_eq!(plan.naive().unwrap().size, 40);
        assert_eq!(plan.data_size().unwrap(), 20);
        assert_eq!(plan.savings().unwrap(), 16);
        assert!(!plan.is_identity())
    }

    #[test]
    fn runtime_matches_const() {
        let aligns = [2, 1, 16, 4, 4, 8, 1, 2];
        let types = aligns
            .iter()
            .map(|&align| meta("t", align, align))
            .collect();
        assert_eq!(Plan::new(types).permutation()[..], permutation(aligns))
    }

    #[test]
    fn inverse_round_trip() {
        let plan = Plan::new(mixed());
        let permutation = plan.permutation();
        let inverse = plan.inverse();
        for i in 0..plan.arity() {
            assert_eq!(inverse[permutation[i]], i);
            assert_eq!(permutation[inverse[i]], i)
        }
    }

    #[test]
    fn stable_ties() {
        let plan = Plan::new(vec![
            meta("a", 4, 4),
            meta("b", 8, 8),
            meta("c", 4, 4),
            meta("d", 8, 8),
        ]);
        assert_eq!(plan.permutation()[..], [1, 3, 0, 2])
    }

    #[test]
    fn footprint_never_grows() {
        let lists = [
            vec![meta("a", 2, 2), meta("b", 1, 1), meta("c", 8, 8)],
            vec![meta("a", 8, 8), meta("b", 1, 1)],
            vec![meta("a", 12, 4), meta("b", 16, 16), meta("c", 3, 1)],
            vec![meta("a", 1, 1), meta("b", 1, 1)],
        ];
        for types in lists {
            let plan = Plan::new(types);
            let (optimized, naive) = (plan.optimized().unwrap(), plan.naive().unwrap());
            assert!(optimized.size <= naive.size);
            if plan.is_identity() {
                assert_eq!(optimized, naive)
            }
        }
    }

    #[test]
    fn already_sorted_is_identity() {
        let plan = Plan::new(vec![meta("a", 8, 8), meta("b", 4, 4), meta("c", 4, 4)]);
        assert!(plan.is_identity());
        let replanned = Plan::new(Plan::new(mixed()).reordered().unwrap());
        assert!(replanned.is_identity());
        assert_eq!(replanned.savings().unwrap(), 0)
    }

    #[test]
    fn boundaries() {
        let empty = Plan::new(Vec::new());
        assert_eq!(empty.arity(), 0);
        assert!(empty.is_identity());
        assert_eq!(empty.optimized().unwrap().size, 0);
        assert_eq!(empty.data_size().unwrap(), 0);
        let single = Plan::new(vec![meta("a", 4, 4)]);
        assert_eq!(single.permutation()[..], [0]);
        assert_eq!(single.inverse()[..], [0])
    }

    #[test]
    fn oversized_lists_are_errors() {
        let huge = meta("huge", MAX_SIZE - 1, 1);
        let plan = Plan::new(vec![meta("byte", 1, 1), huge.clone()]);
        assert_eq!(plan.data_size().unwrap(), MAX_SIZE);
        assert!(plan.optimized().is_ok());
        let plan = Plan::new(vec![meta("byte", 1, 1), huge.clone(), meta("byte", 1, 1)]);
        assert!(plan.optimized().is_err());
        assert!(plan.naive().is_err());
        assert!(plan.savings().is_err());
        let plan = Plan::new(vec![huge.clone(), huge.clone(), huge]);
        let err = plan.data_size().unwrap_err();
        assert_eq!(err.downcast_ref::<OverflowError>().unwrap().name, "huge")
    }

    #[test]
    fn parsed_arrays_beyond_the_address_space() {
        assert!(parse::types("u8, [u8; 18446744073709551615]").is_err());
        let types = parse::types("[u16; 4611686018427387903], [u16; 4611686018427387903]").unwrap();
        let plan = Plan::new(types);
        assert!(plan.data_size().is_err());
        assert!(plan.naive().is_err());
        assert!(plan.optimized().is_err())
    }
}
