use crate::record::{Arity, Get};

pub fn equals<A, B>(a: &A, b: &B) -> bool
where
    A: Arity + PartialEq<B>,
    B: Arity<Length = A::Length>,
{
    a == b
}

macro_rules! tuples {
    (@one $index:tt) => {
        1
    };

    (@get $all:tt $(($index:tt $name:ident))*) => {
        $(tuples!(@get_one $all $index $name);)*
    };
    (@get_one ($($all:ident)*) $index:tt $name:ident) => {
        impl<$($all),*> Get<$index> for ($($all,)*) {
            type Output = $name;

            #[inline(always)]
            fn get(&self) -> &$name {
                &self.$index
            }

            #[inline(always)]
            fn get_mut(&mut self) -> &mut $name {
                &mut self.$index
            }
        }
    };

    (@arity $(($index:tt $name:ident))*) => {
        impl<$($name),*> Arity for ($($name,)*) {
            type Length = [(); 0 $(+ tuples!(@one $index))*];

            const ARITY: usize = 0 $(+ tuples!(@one $index))*;
        }

        tuples!(@get ($($name)*) $(($index $name))*);
    };

    (@munch [$($done:tt)*]) => {
        tuples!(@arity $($done)*);
    };
    (@munch [$($done:tt)*] $next:tt $($rest:tt)*) => {
        tuples!(@arity $($done)*);
        tuples!(@munch [$($done)* $next] $($rest)*);
    };
}

tuples!(@munch []
    (0 T0) (1 T1) (2 T2) (3 T3) (4 T4) (5 T5) (6 T6) (7 T7)
    (8 T8) (9 T9) (10 T10) (11 T11) (12 T12) (13 T13) (14 T14) (15 T15)
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[derive(Debug, PartialEq)]
    struct Loose(u8);

    impl PartialEq<u64> for Loose {
        fn eq(&self, other: &u64) -> bool {
            u64::from(self.0) == *other
        }
    }

    impl PartialEq<Loose> for u64 {
        fn eq(&self, other: &Loose) -> bool {
            *self == u64::from(other.0)
        }
    }

    crate::record! {
        #[derive(Debug, PartialEq)]
        struct Tight(u8, Loose);

        #[derive(Debug, PartialEq)]
        struct Wide(u8, u64);

        #[derive(PartialEq)]
        struct Seven(u8, i32, u8, i32, u8, f64, u8);
    }

    #[test]
    fn tuple_access() {
        let mut tuple = (1u8, "two", 3.0f32);
        assert_eq!(*Get::<1>::get(&tuple), "two");
        *Get::<2>::get_mut(&mut tuple) = 4.0;
        assert_eq!(tuple.2, 4.0);
        assert_eq!(<(u8, u8, u8) as Arity>::ARITY, 3);
        assert_eq!(<() as Arity>::ARITY, 0)
    }

    #[test]
    fn largest_tuple() {
        type Sixteen = (u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u16);
        let tuple: Sixteen = (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);
        assert_eq!(<Sixteen as Arity>::ARITY, 16);
        assert_eq!(*Get::<15>::get(&tuple), 15)
    }

    #[test]
    fn different_permutations() {
        assert_eq!(<Tight as Record>::PERMUTATION, [0, 1]);
        assert_eq!(<Wide as Record>::PERMUTATION, [1, 0]);
        assert!(equals(&Tight::new(1, Loose(2)), &Wide::new(1, 2)));
        assert!(!equals(&Tight::new(1, Loose(2)), &Wide::new(1, 3)));
        assert!(!equals(&Tight::new(0, Loose(2)), &Wide::new(1, 2)))
    }

    #[test]
    fn symmetric_across_permutations() {
        let pairs = [
            (Tight::new(1, Loose(2)), Wide::new(1, 2), true),
            (Tight::new(1, Loose(2)), Wide::new(1, 3), false),
            (Tight::new(4, Loose(2)), Wide::new(1, 2), false),
        ];
        for (tight, wide, expected) in pairs {
            assert_eq!(equals(&tight, &wide), expected);
            assert_eq!(equals(&wide, &tight), expected);
            assert_eq!(tight == wide, wide == tight)
        }
    }

    #[test]
    fn record_and_tuple() {
        let tuple: (u8, i32, u8, i32, u8, f64, u8) = (b'a', 1, b'c', 3, b'd', 5.0, b'e');
        let record = Seven::from(tuple);
        assert!(equals(&record, &tuple));
        assert!(equals(&tuple, &record));
        let mut other = tuple;
        other.5 = 5.5;
        assert!(!equals(&record, &other))
    }
}
