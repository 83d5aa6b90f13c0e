use std::{ffi, str::FromStr};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0},
    combinator::{all_consuming, map_res, opt, recognize, value},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    Finish, IResult, Parser,
};

use crate::meta::TypeMeta;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Named(String),
    Unit,
    Array(Box<Node>, usize),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(fmt = "UnknownType: {name}")]
pub struct UnknownType {
    pub name: String,
}

/// Comma-separated element types, e.g. `(u8, i32, [u16; 3], c_double)`.
#[derive(Debug)]
pub struct TypeList(Vec<Node>);

impl FromStr for TypeList {
    type Err = nom::error::Error<String>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match preceded(token_break, type_list)(s).finish() {
            Ok((_, items)) => Ok(Self(items)),
            Err(err) => Err(nom::error::Error {
                input: err.input.into(),
                code: err.code,
            }),
        }
    }
}

impl TypeList {
    pub fn new(s: &str) -> anyhow::Result<Self> {
        Ok(s.parse()?)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resolve(&self) -> anyhow::Result<Vec<TypeMeta>> {
        self.0.iter().map(Node::resolve).collect()
    }
}

pub fn types(s: &str) -> anyhow::Result<Vec<TypeMeta>> {
    TypeList::new(s)?.resolve()
}

impl Node {
    fn resolve(&self) -> anyhow::Result<TypeMeta> {
        match self {
            Self::Unit => Ok(TypeMeta::of::<()>()),
            Self::Array(element, len) => element.resolve()?.array(*len),
            Self::Named(path) => {
                // `std::ffi::c_int` and `c_int` name the same type
                let name = path.rsplit("::").next().unwrap_or(path.as_str());
                primitive(name).ok_or_else(|| UnknownType { name: path.clone() }.into())
            }
        }
    }
}

fn primitive(name: &str) -> Option<TypeMeta> {
    macro_rules! lookup {
        ($($ty:ident)*; $($alias:ident)*) => {
            match name {
                $(stringify!($ty) => Some(TypeMeta::of::<$ty>()),)*
                $(stringify!($alias) => Some(TypeMeta::of::<ffi::$alias>().named(name)),)*
                _ => None,
            }
        };
    }
    lookup!(
        bool char f32 f64
        u8 u16 u32 u64 u128 usize
        i8 i16 i32 i64 i128 isize;
        c_char c_schar c_uchar c_short c_ushort c_int c_uint
        c_long c_ulong c_longlong c_ulonglong c_float c_double
    )
}

fn type_list(input: &str) -> IResult<&str, Vec<Node>> {
    alt((
        all_consuming(terminated(parenthesized, token_break)),
        all_consuming(terminated(elements, token_break)),
    ))(input)
}

fn parenthesized(input: &str) -> IResult<&str, Vec<Node>> {
    delimited(
        pair(char('('), token_break),
        elements,
        pair(token_break, char(')')),
    )(input)
}

fn elements(input: &str) -> IResult<&str, Vec<Node>> {
    terminated(
        separated_list0(tuple((token_break, char(','), token_break)), element),
        opt(pair(token_break, char(','))),
    )(input)
}

fn element(input: &str) -> IResult<&str, Node> {
    alt((array, unit, path.map(|path| Node::Named(path.into()))))(input)
}

fn unit(input: &str) -> IResult<&str, Node> {
    value(Node::Unit, tuple((char('('), token_break, char(')'))))(input)
}

fn array(input: &str) -> IResult<&str, Node> {
    let len = map_res(digit1, |digits: &str| digits.parse::<usize>());
    let (remaining, (element, len)) = delimited(
        pair(char('['), token_break),
        separated_pair(element, tuple((token_break, char(';'), token_break)), len),
        pair(token_break, char(']')),
    )(input)?;
    Ok((remaining, Node::Array(element.into(), len)))
}

fn path(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(tag("::"), id))(input)
}

fn id(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn token_break(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}
