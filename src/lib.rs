pub mod compare;
pub mod footprint;
pub mod hlist;
pub mod meta;
pub mod parse;
pub mod permutation;
pub mod plan;
pub mod record;

pub use compare::equals;
pub use footprint::Footprint;
pub use meta::{ElementDescriptor, TypeMeta};
pub use permutation::Permutation;
pub use plan::Plan;
pub use record::{Arity, Get, Record};
