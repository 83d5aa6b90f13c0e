use std::{
    any::type_name,
    fmt::{self, Display},
    mem::{align_of, size_of},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementDescriptor {
    pub position: usize,
    pub size: usize,
    pub align: usize,
}

// largest size the compiler accepts for a type
pub const MAX_SIZE: usize = isize::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeMeta {
    pub name: String,
    pub size: usize,
    pub align: usize,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(fmt = "LayoutError: {name} has size {size} and alignment {align}")]
pub struct LayoutError {
    pub name: String,
    pub size: usize,
    pub align: usize,
}

impl TypeMeta {
    pub fn of<T>() -> Self {
        Self {
            name: type_name::<T>().into(),
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }

    // size must be a multiple of a power-of-two alignment, as for every Rust type
    pub fn new(name: impl Into<String>, size: usize, align: usize) -> anyhow::Result<Self> {
        let name = name.into();
        if !align.is_power_of_two() || size % align != 0 || size > MAX_SIZE {
            anyhow::bail!(LayoutError { name, size, align })
        }
        Ok(Self { name, size, align })
    }

    pub fn named(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Layout of `[self; len]`.
    pub fn array(&self, len: usize) -> anyhow::Result<Self> {
        let size = self
            .size
            .checked_mul(len)
            .filter(|&size| size <= MAX_SIZE)
            .ok_or(anyhow::format_err!(
                "array [{}; {len}] exceeds isize::MAX bytes",
                self.name
            ))?;
        Ok(Self {
            name: format!("[{}; {len}]", self.name),
            size,
            align: self.align,
        })
    }

    pub fn descriptor(&self, position: usize) -> ElementDescriptor {
        ElementDescriptor {
            position,
            size: self.size,
            align: self.align,
        }
    }
}

impl Display for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
