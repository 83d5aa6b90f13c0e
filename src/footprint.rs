use crate::meta::{TypeMeta, MAX_SIZE};

pub const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

// `repr(C)` size with `order[slot]` placed at `slot`
pub const fn size<const N: usize>(sizes: [usize; N], aligns: [usize; N], order: [usize; N]) -> usize {
    let mut offset = 0;
    let mut max_align = 1;
    let mut slot = 0;
    while slot < N {
        let element = order[slot];
        offset = align_up(offset, aligns[element]) + sizes[element];
        if aligns[element] > max_align {
            max_align = aligns[element]
        }
        slot += 1
    }
    align_up(offset, max_align)
}

pub const fn identity<const N: usize>() -> [usize; N] {
    let mut order = [0; N];
    let mut i = 0;
    while i < N {
        order[i] = i;
        i += 1
    }
    order
}

pub const fn data_size<const N: usize>(sizes: [usize; N]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < N {
        total += sizes[i];
        i += 1
    }
    total
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(fmt = "OverflowError: placing {name} exceeds isize::MAX bytes")]
pub struct OverflowError {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    pub offset: usize,
    pub size: usize,
    // padding inserted right before this slot
    pub padding: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    pub size: usize,
    pub align: usize,
    pub slots: Vec<SlotLayout>,
}

impl Footprint {
    /// Place `types` in the given order.
    pub fn of(types: &[TypeMeta]) -> anyhow::Result<Self> {
        let mut offset: usize = 0;
        let mut align: usize = 1;
        let mut slots = Vec::with_capacity(types.len());
        for ty in types {
            let overflow = || OverflowError {
                name: ty.name.clone(),
            };
            let start = offset.checked_next_multiple_of(ty.align).ok_or_else(overflow)?;
            let end = start
                .checked_add(ty.size)
                .filter(|&end| end <= MAX_SIZE)
                .ok_or_else(overflow)?;
            slots.push(SlotLayout {
                offset: start,
                size: ty.size,
                padding: start - offset,
            });
            offset = end;
            align = align.max(ty.align)
        }
        let size = offset.checked_next_multiple_of(align);
        anyhow::ensure!(
            size.is_some_and(|size| size <= MAX_SIZE),
            "footprint of {} elements exceeds {MAX_SIZE} bytes",
            types.len()
        );
        Ok(Self {
            size: size.unwrap_or_default(),
            align,
            slots,
        })
    }

    pub fn data_size(&self) -> usize {
        self.slots
            .iter()
            .fold(0, |total, slot| total.saturating_add(slot.size))
    }

    pub fn padding(&self) -> usize {
        self.size.saturating_sub(self.data_size())
    }

    pub fn tail_padding(&self) -> usize {
        let end = self
            .slots
            .last()
            .map(|slot| slot.offset + slot.size)
            .unwrap_or_default();
        self.size.saturating_sub(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(size: usize, align: usize) -> TypeMeta {
        TypeMeta::new(format!("t{size}x{align}"), size, align).unwrap()
    }

    #[test]
    fn align_up_powers_of_two() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(9, 4), 12);
        assert_eq!(align_up(5, 1), 5)
    }

    #[test]
    fn const_size_matches_repr_c() {
        #[repr(C)]
        #[allow(dead_code)]
        struct Declared(u8, i32, u8, i32, u8, f64, u8);
        #[repr(C)]
        #[allow(dead_code)]
        struct Sorted(f64, i32, i32, u8, u8, u8, u8);

        let sizes = [1, 4, 1, 4, 1, 8, 1];
        let aligns = [
            1,
            4,
            1,
            4,
            1,
            std::mem::align_of::<f64>(),
            1,
        ];
        assert_eq!(
            size(sizes, aligns, identity()),
            std::mem::size_of::<Declared>()
        );
        assert_eq!(
            size(sizes, aligns, [5, 1, 3, 0, 2, 4, 6]),
            std::mem::size_of::<Sorted>()
        );
        assert_eq!(data_size(sizes), 20)
    }

    #[test]
    fn const_empty() {
        assert_eq!(size::<0>([], [], []), 0);
        assert_eq!(identity::<0>(), []);
        assert_eq!(identity::<3>(), [0, 1, 2])
    }

    #[test]
    fn slots_and_padding() {
        let footprint = Footprint::of(&[meta(1, 1), meta(4, 4), meta(1, 1)]).unwrap();
        assert_eq!(footprint.size, 12);
        assert_eq!(footprint.align, 4);
        assert_eq!(
            footprint.slots,
            [
                SlotLayout {
                    offset: 0,
                    size: 1,
                    padding: 0
                },
                SlotLayout {
                    offset: 4,
                    size: 4,
                    padding: 3
                },
                SlotLayout {
                    offset: 8,
                    size: 1,
                    padding: 0
                },
            ]
        );
        assert_eq!(footprint.data_size(), 6);
        assert_eq!(footprint.padding(), 6);
        assert_eq!(footprint.tail_padding(), 3)
    }

    #[test]
    fn empty() {
        let footprint = Footprint::of(&[]).unwrap();
        assert_eq!((footprint.size, footprint.align), (0, 1));
        assert_eq!(footprint.tail_padding(), 0)
    }

    #[test]
    fn overflow_is_an_error() {
        let huge = TypeMeta {
            name: "huge".into(),
            size: MAX_SIZE - 1,
            align: 1,
        };
        let err = Footprint::of(&[meta(1, 1), huge.clone(), meta(1, 1)]).unwrap_err();
        assert_eq!(err.downcast_ref::<OverflowError>().unwrap().name, "t1x1");
        let wide = TypeMeta {
            align: 2,
            ..huge
        };
        assert!(Footprint::of(&[meta(1, 1), wide]).is_err());
        assert!(Footprint::of(&[meta(MAX_SIZE - 7, 1), meta(8, 8)]).is_err())
    }

    #[test]
    fn hand_built_layouts_do_not_underflow() {
        let footprint = Footprint {
            size: 2,
            align: 1,
            slots: vec![SlotLayout {
                offset: 0,
                size: 4,
                padding: 0,
            }],
        };
        assert_eq!(footprint.padding(), 0);
        assert_eq!(footprint.tail_padding(), 0)
    }
}
