// Sorted by descending alignment, a nested `Cons` is as large as the flat
// `repr(C)` struct of the same fields.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cons<H, T> {
    pub head: H,
    pub tail: T,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Nil;

pub trait At<const I: usize> {
    type Type;

    fn at(&self) -> &Self::Type;

    fn at_mut(&mut self) -> &mut Self::Type;
}

impl<H, T> At<0> for Cons<H, T> {
    type Type = H;

    #[inline(always)]
    fn at(&self) -> &H {
        &self.head
    }

    #[inline(always)]
    fn at_mut(&mut self) -> &mut H {
        &mut self.head
    }
}

macro_rules! at_tail {
    ($($index:literal => $previous:literal),* $(,)?) => {
        $(
            impl<H, T: At<$previous>> At<$index> for Cons<H, T> {
                type Type = <T as At<$previous>>::Type;

                #[inline(always)]
                fn at(&self) -> &Self::Type {
                    <T as At<$previous>>::at(&self.tail)
                }

                #[inline(always)]
                fn at_mut(&mut self) -> &mut Self::Type {
                    <T as At<$previous>>::at_mut(&mut self.tail)
                }
            }
        )*
    };
}

at_tail! {
    1 => 0, 2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5, 7 => 6, 8 => 7,
    9 => 8, 10 => 9, 11 => 10, 12 => 11, 13 => 12, 14 => 13, 15 => 14,
}

pub trait Len {
    const LEN: usize;
}

impl Len for Nil {
    const LEN: usize = 0;
}

impl<H, T: Len> Len for Cons<H, T> {
    const LEN: usize = T::LEN + 1;
}

impl<H, T> Cons<H, T> {
    pub const fn new(head: H, tail: T) -> Self {
        Self { head, tail }
    }
}
