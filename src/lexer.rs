use std::fmt::Display;

use nom::{
    branch::alt,
    character::complete::{char, satisfy},
    combinator::{map, value},
    IResult,
};

use crate::{parser::ParserError, utils::CompileFlags};

pub const LEFT_PAREN: char = '(';
pub const RIGHT_PAREN: char = ')';
pub const UNION: char = '|';
pub const STAR: char = '*';
pub const CONCAT: char = '.';

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Symbol(char),
    LeftParen,
    RightParen,
    Union,
    Star,
    Concat,
}

impl Kind {
    pub fn as_char(&self) -> char {
        match *self {
            Self::Symbol(symbol) => symbol,
            Self::LeftParen => LEFT_PAREN,
            Self::RightParen => RIGHT_PAREN,
            Self::Union => UNION,
            Self::Star => STAR,
            Self::Concat => CONCAT,
        }
    }
}

/// A pattern token and the byte offset it was read from.
///
/// Concatenation tokens inserted by the expander borrow the offset of the
/// token that follows them.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: Kind,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: Kind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.as_char())
    }
}

fn symbol(input: &str) -> IResult<&str, Kind> {
    map(satisfy(|c| c.is_alphanumeric()), Kind::Symbol)(input)
}

fn operator(input: &str) -> IResult<&str, Kind> {
    alt((
        value(Kind::LeftParen, char(LEFT_PAREN)),
        value(Kind::RightParen, char(RIGHT_PAREN)),
        value(Kind::Union, char(UNION)),
        value(Kind::Star, char(STAR)),
        value(Kind::Concat, char(CONCAT)),
    ))(input)
}

/// Splits `pattern` into tokens. `.` is only accepted when the pattern is
/// flagged as already carrying explicit concatenations.
pub fn tokenize(pattern: &str, flags: CompileFlags) -> Result<Vec<Token>, ParserError> {
    let explicit_concat = flags.intersects(CompileFlags::EXPLICIT_CONCAT);
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut remainder = pattern;

    while let Some(character) = remainder.chars().next() {
        let offset = pattern.len() - remainder.len();
        match alt((symbol, operator))(remainder) {
            Ok((rest, kind)) if kind != Kind::Concat || explicit_concat => {
                tokens.push(Token::new(kind, offset));
                remainder = rest;
            }
            _ => return Err(ParserError::InvalidCharacter { character, offset }),
        }
    }
    Ok(tokens)
}
