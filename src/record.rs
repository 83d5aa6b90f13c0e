use crate::{
    meta::{ElementDescriptor, TypeMeta},
    plan::Plan,
};

pub trait Arity {
    // `[(); N]`, so equal arity is an associated type bound
    type Length;

    const ARITY: usize;
}

pub trait Get<const L: usize> {
    type Output;

    fn get(&self) -> &Self::Output;

    fn get_mut(&mut self) -> &mut Self::Output;
}

pub trait Record: Arity + Sized {
    type Logical;
    // values in storage order
    type Storage;

    const SIZES: &'static [usize];
    const ALIGNS: &'static [usize];
    // `PERMUTATION[slot]` is the logical index stored at `slot`
    const PERMUTATION: &'static [usize];
    const INVERSE: &'static [usize];
    const DESCRIPTORS: &'static [ElementDescriptor];
    // descriptors in storage order
    const STORAGE_ORDER: &'static [ElementDescriptor];
    const SIZE: usize;
    // size under `repr(C)` in declaration order
    const NAIVE_SIZE: usize;
    const DATA_SIZE: usize;

    fn type_names() -> Vec<&'static str>;

    fn descriptors() -> Vec<ElementDescriptor> {
        Self::DESCRIPTORS.to_vec()
    }

    fn plan() -> Plan {
        let types = Self::type_names()
            .into_iter()
            .zip(Self::DESCRIPTORS)
            .map(|(name, element)| TypeMeta {
                name: name.into(),
                size: element.size,
                align: element.align,
            })
            .collect();
        Plan::new(types)
    }
}

/// Define record types.
///
/// ```
/// padless::record! {
///     /// Seven mixed-alignment elements.
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Mixed(u8, i32, u8, i32, u8, f64, u8);
/// }
///
/// let record = Mixed::new(b'a', 1, b'c', 3, b'd', 5.0, b'e');
/// assert_eq!(*record.get::<2>(), b'c');
/// assert!(record == (b'a', 1, b'c', 3, b'd', 5.0, b'e'));
/// assert_eq!(std::mem::size_of::<Mixed>(), 24);
/// ```
///
/// Supported derives are `Clone`, `Copy`, `Debug`, `Default`, `Eq`, `Hash`
/// and `PartialEq`. `Debug`, `Hash` and `PartialEq` follow declaration
/// order, so a record hashes and compares like the matching tuple. Element
/// types must be concrete; at most 16 elements.
#[macro_export]
macro_rules! record {
    (@one $slot:tt) => {
        1
    };

    (@logical) => {
        $crate::hlist::Nil
    };
    (@logical $ty:ty $(, $rest:ty)*) => {
        $crate::hlist::Cons<$ty, $crate::record!(@logical $($rest),*)>
    };

    (@values) => {
        $crate::hlist::Nil
    };
    (@values $var:ident $(, $rest:ident)*) => {
        $crate::hlist::Cons {
            head: $var,
            tail: $crate::record!(@values $($rest),*),
        }
    };

    (@physical $logical:ty, $permutation:expr;) => {
        $crate::hlist::Nil
    };
    (@physical $logical:ty, $permutation:expr; $slot:tt $($rest:tt)*) => {
        $crate::hlist::Cons<
            <$logical as $crate::hlist::At<{ $permutation[$slot] }>>::Type,
            $crate::record!(@physical $logical, $permutation; $($rest)*),
        >
    };

    (@build $logical:ty, $permutation:expr, $source:ident;) => {
        $crate::hlist::Nil
    };
    (@build $logical:ty, $permutation:expr, $source:ident; $slot:tt $($rest:tt)*) => {
        $crate::hlist::Cons {
            head: ::core::ptr::read(
                <$logical as $crate::hlist::At<{ $permutation[$slot] }>>::at(&*$source),
            ),
            tail: $crate::record!(@build $logical, $permutation, $source; $($rest)*),
        }
    };

    (@derives $name:ident $elements:tt) => {};
    (@derives $name:ident $elements:tt $derive:ident $($rest:ident)*) => {
        $crate::record!(@derive $derive $name $elements);
        $crate::record!(@derives $name $elements $($rest)*);
    };

    (@derive Clone $name:ident $elements:tt) => {
        impl ::core::clone::Clone for $name {
            fn clone(&self) -> Self {
                Self {
                    slots: ::core::clone::Clone::clone(&self.slots),
                }
            }
        }
    };
    (@derive Copy $name:ident $elements:tt) => {
        impl ::core::marker::Copy for $name {}
    };
    (@derive Default $name:ident $elements:tt) => {
        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    slots: ::core::default::Default::default(),
                }
            }
        }
    };
    (@derive Debug $name:ident [$(($slot:tt $var:ident $ty:ty))*]) => {
        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_tuple(::core::stringify!($name))
                    $(.field(<Self as $crate::record::Get<$slot>>::get(self)))*
                    .finish()
            }
        }
    };
    (@derive Hash $name:ident [$(($slot:tt $var:ident $ty:ty))*]) => {
        impl ::core::hash::Hash for $name {
            #[allow(unused_variables)]
            fn hash<__H: ::core::hash::Hasher>(&self, state: &mut __H) {
                $(::core::hash::Hash::hash(<Self as $crate::record::Get<$slot>>::get(self), state);)*
            }
        }
    };
    (@derive PartialEq $name:ident [$(($slot:tt $var:ident $ty:ty))*]) => {
        impl<__Other> ::core::cmp::PartialEq<__Other> for $name
        where
            __Other: $crate::record::Arity<Length = [(); 0 $(+ $crate::record!(@one $slot))*]>
                $(+ $crate::record::Get<$slot>)*,
            $($ty: ::core::cmp::PartialEq<<__Other as $crate::record::Get<$slot>>::Output>,)*
        {
            #[allow(unused_variables)]
            fn eq(&self, other: &__Other) -> bool {
                true $(&& ::core::cmp::PartialEq::eq(
                    <Self as $crate::record::Get<$slot>>::get(self),
                    <__Other as $crate::record::Get<$slot>>::get(other),
                ))*
            }
        }

        impl ::core::cmp::PartialEq<$name> for ($($ty,)*) {
            fn eq(&self, other: &$name) -> bool {
                <$name as ::core::cmp::PartialEq<Self>>::eq(other, self)
            }
        }
    };
    (@derive Eq $name:ident [$(($slot:tt $var:ident $ty:ty))*]) => {
        const _: fn() = || {
            #[allow(dead_code)]
            fn element_is_eq<T: ::core::cmp::Eq>() {}
            $(element_is_eq::<$ty>();)*
        };

        impl ::core::cmp::Eq for $name {}
    };
    (@derive $other:ident $name:ident $elements:tt) => {
        ::core::compile_error!(::core::concat!(
            "record! cannot derive `",
            ::core::stringify!($other),
            "`"
        ));
    };

    (@emit
        [[$(#[doc = $doc:expr])*] [$($derive:ident)*] [$vis:vis] $name:ident]
        [$(($slot:tt $var:ident $ty:ty))*]
    ) => {
        $(#[doc = $doc])*
        #[repr(transparent)]
        $vis struct $name {
            slots: $crate::record!(
                @physical $crate::record!(@logical $($ty),*),
                $crate::plan::permutation([$(::core::mem::align_of::<$ty>()),*]);
                $($slot)*
            ),
        }

        impl $crate::record::Arity for $name {
            type Length = [(); 0 $(+ $crate::record!(@one $slot))*];

            const ARITY: usize =
                <$crate::record!(@logical $($ty),*) as $crate::hlist::Len>::LEN;
        }

        impl $crate::record::Record for $name {
            type Logical = $crate::record!(@logical $($ty),*);
            type Storage = $crate::record!(
                @physical $crate::record!(@logical $($ty),*),
                $crate::plan::permutation([$(::core::mem::align_of::<$ty>()),*]);
                $($slot)*
            );

            const SIZES: &'static [usize] = &[$(::core::mem::size_of::<$ty>()),*];
            const ALIGNS: &'static [usize] = &[$(::core::mem::align_of::<$ty>()),*];
            const PERMUTATION: &'static [usize] =
                &$crate::plan::permutation([$(::core::mem::align_of::<$ty>()),*]);
            const INVERSE: &'static [usize] = &$crate::permutation::inverse(
                $crate::plan::permutation([$(::core::mem::align_of::<$ty>()),*]),
            );
            const DESCRIPTORS: &'static [$crate::meta::ElementDescriptor] = &$crate::plan::descriptors(
                [$(::core::mem::size_of::<$ty>()),*],
                [$(::core::mem::align_of::<$ty>()),*],
            );
            const STORAGE_ORDER: &'static [$crate::meta::ElementDescriptor] = &$crate::plan::reorder(
                $crate::plan::descriptors(
                    [$(::core::mem::size_of::<$ty>()),*],
                    [$(::core::mem::align_of::<$ty>()),*],
                ),
                $crate::plan::permutation([$(::core::mem::align_of::<$ty>()),*]),
            );
            const SIZE: usize = $crate::footprint::size(
                [$(::core::mem::size_of::<$ty>()),*],
                [$(::core::mem::align_of::<$ty>()),*],
                $crate::plan::permutation([$(::core::mem::align_of::<$ty>()),*]),
            );
            const NAIVE_SIZE: usize = $crate::footprint::size(
                [$(::core::mem::size_of::<$ty>()),*],
                [$(::core::mem::align_of::<$ty>()),*],
                $crate::footprint::identity(),
            );
            const DATA_SIZE: usize = $crate::footprint::data_size([$(::core::mem::size_of::<$ty>()),*]);

            fn type_names() -> ::std::vec::Vec<&'static str> {
                ::std::vec![$(::core::any::type_name::<$ty>()),*]
            }
        }

        const _: () = ::core::assert!(
            ::core::mem::size_of::<$name>() == <$name as $crate::record::Record>::SIZE,
            "storage is larger than its planned footprint",
        );

        $(
            impl $crate::record::Get<$slot> for $name {
                type Output = $ty;

                #[inline(always)]
                fn get(&self) -> &$ty {
                    <<$name as $crate::record::Record>::Storage as $crate::hlist::At<
                        { $crate::permutation::resolve($slot, <$name as $crate::record::Record>::INVERSE) },
                    >>::at(&self.slots)
                }

                #[inline(always)]
                fn get_mut(&mut self) -> &mut $ty {
                    <<$name as $crate::record::Record>::Storage as $crate::hlist::At<
                        { $crate::permutation::resolve($slot, <$name as $crate::record::Record>::INVERSE) },
                    >>::at_mut(&mut self.slots)
                }
            }
        )*

        impl ::core::convert::From<($($ty,)*)> for $name {
            #[allow(unused_unsafe, unused_variables)]
            fn from(($($var,)*): ($($ty,)*)) -> Self {
                let logical = ::core::mem::ManuallyDrop::new($crate::record!(@values $($var),*));
                // SAFETY: the permutation is a bijection, so every element of
                // `logical` is read exactly once, and `logical` is never dropped.
                let slots = unsafe {
                    $crate::record!(
                        @build <$name as $crate::record::Record>::Logical,
                        $crate::plan::permutation([$(::core::mem::align_of::<$ty>()),*]),
                        logical;
                        $($slot)*
                    )
                };
                Self { slots }
            }
        }

        impl ::core::convert::From<$name> for ($($ty,)*) {
            fn from(record: $name) -> Self {
                record.into_tuple()
            }
        }

        #[allow(dead_code)]
        impl $name {
            #[allow(clippy::too_many_arguments)]
            pub fn new($($var: $ty),*) -> Self {
                <Self as ::core::convert::From<($($ty,)*)>>::from(($($var,)*))
            }

            #[inline(always)]
            pub fn get<const L: usize>(&self) -> &<Self as $crate::record::Get<L>>::Output
            where
                Self: $crate::record::Get<L>,
            {
                <Self as $crate::record::Get<L>>::get(self)
            }

            #[inline(always)]
            pub fn get_mut<const L: usize>(
                &mut self,
            ) -> &mut <Self as $crate::record::Get<L>>::Output
            where
                Self: $crate::record::Get<L>,
            {
                <Self as $crate::record::Get<L>>::get_mut(self)
            }

            #[allow(unused_unsafe)]
            pub fn into_tuple(self) -> ($($ty,)*) {
                let this = ::core::mem::ManuallyDrop::new(self);
                // SAFETY: each element is read once from its own slot and
                // `this` is never dropped.
                unsafe { ($(::core::ptr::read(<Self as $crate::record::Get<$slot>>::get(&*this)),)*) }
            }
        }

        $crate::record!(@derives $name [$(($slot $var $ty))*] $($derive)*);
    };

    (@zip $head:tt [$($done:tt)*] [] [$($supply:tt)*]) => {
        $crate::record!(@emit $head [$($done)*]);
    };
    (@zip $head:tt [$($done:tt)*] [$ty:ty $(, $rest:ty)*] [($slot:tt $var:ident) $($supply:tt)*]) => {
        $crate::record!(@zip $head [$($done)* ($slot $var $ty)] [$($rest),*] [$($supply)*]);
    };
    (@zip $head:tt $done:tt [$($rest:ty),+] []) => {
        ::core::compile_error!("record! supports at most 16 elements");
    };

    ($(
        $(#[doc = $doc:expr])*
        $(#[derive($($derive:ident),* $(,)?)])?
        $vis:vis struct $name:ident($($ty:ty),* $(,)?);
    )+) => {
        $(
            $crate::record!(
                @zip [[$(#[doc = $doc])*] [$($($derive)*)?] [$vis] $name]
                []
                [$($ty),*]
                [
                    (0 e0) (1 e1) (2 e2) (3 e3) (4 e4) (5 e5) (6 e6) (7 e7)
                    (8 e8) (9 e9) (10 e10) (11 e11) (12 e12) (13 e13) (14 e14) (15 e15)
                ]
            );
        )+
    };
}
