use colored::Colorize;
use itertools::Itertools;
use log::{log, trace};
use thiserror::Error;

use crate::{
    lexer::{tokenize, Kind, Token, CONCAT, LEFT_PAREN, RIGHT_PAREN, STAR, UNION},
    utils::CompileFlags,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    #[error("invalid character {character:?} at offset {offset}")]
    InvalidCharacter { character: char, offset: usize },
    #[error("unmatched parenthesis at offset {offset}")]
    UnmatchedParenthesis { offset: usize },
}

impl ParserError {
    pub fn offset(&self) -> usize {
        match *self {
            Self::InvalidCharacter { offset, .. } | Self::UnmatchedParenthesis { offset } => offset,
        }
    }

    fn code(&self) -> u8 {
        match self {
            Self::InvalidCharacter { .. } => 1,
            Self::UnmatchedParenthesis { .. } => 2,
        }
    }

    /// Renders the error with the pattern echoed and the offending position
    /// marked.
    pub fn diagnostic(&self, pattern: &str) -> String {
        render_diagnostic(self.code(), &self.to_string(), pattern, self.offset())
    }
}

pub(crate) fn render_diagnostic(code: u8, message: &str, pattern: &str, offset: usize) -> String {
    let column = pattern
        .get(..offset)
        .map_or(pattern.chars().count(), |prefix| prefix.chars().count());
    format!(
        "{} {}:\n | {}\n | {}{}",
        format!("[{:0>3}]", code).red().bold(),
        message,
        pattern,
        " ".repeat(column),
        "^".green()
    )
}

fn opens_context(c: char) -> bool {
    c == LEFT_PAREN || c == UNION
}

fn closes_context(c: char) -> bool {
    c == RIGHT_PAREN || c == STAR || c == UNION
}

fn needs_concat(current: char, next: char) -> bool {
    !opens_context(current) && !closes_context(next)
}

/// Makes every implicit concatenation in `regex` explicit with `.`.
///
/// Nothing is validated here; `"a(b"` becomes `"a.(b"`.
pub fn add_concat(regex: &str) -> String {
    let mut result = String::with_capacity(regex.len() * 2);
    let mut chars = regex.chars().peekable();
    while let Some(current) = chars.next() {
        result.push(current);
        if let Some(&next) = chars.peek() {
            if needs_concat(current, next) {
                result.push(CONCAT);
            }
        }
    }
    result
}

/// Token form of [`add_concat`].
pub fn expand(tokens: &[Token]) -> Vec<Token> {
    let mut expanded = Vec::with_capacity(tokens.len() * 2);
    for (index, token) in tokens.iter().enumerate() {
        expanded.push(*token);
        if let Some(next) = tokens.get(index + 1) {
            if needs_concat(token.kind.as_char(), next.kind.as_char()) {
                expanded.push(Token::new(Kind::Concat, next.offset));
            }
        }
    }
    expanded
}

pub fn precedence(operator: char) -> u8 {
    match operator {
        STAR => 3,
        CONCAT => 2,
        UNION => 1,
        _ => 0,
    }
}

/// Shunting-yard conversion of an expanded token stream. Operators of equal
/// precedence are popped before the incoming one is pushed, so everything
/// associates to the left.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, ParserError> {
    let mut stack: Vec<Token> = Vec::new();
    let mut postfix: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.kind {
            Kind::Symbol(_) => postfix.push(*token),
            Kind::LeftParen => stack.push(*token),
            Kind::RightParen => loop {
                match stack.pop() {
                    Some(Token {
                        kind: Kind::LeftParen,
                        ..
                    }) => break,
                    Some(operator) => postfix.push(operator),
                    None => {
                        return Err(ParserError::UnmatchedParenthesis {
                            offset: token.offset,
                        })
                    }
                }
            },
            Kind::Union | Kind::Star | Kind::Concat => {
                let incoming = precedence(token.kind.as_char());
                while let Some(&top) = stack.last() {
                    if precedence(top.kind.as_char()) < incoming {
                        break;
                    }
                    stack.pop();
                    postfix.push(top);
                }
                stack.push(*token);
            }
        }
    }

    while let Some(operator) = stack.pop() {
        if operator.kind == Kind::LeftParen {
            return Err(ParserError::UnmatchedParenthesis {
                offset: operator.offset,
            });
        }
        postfix.push(operator);
    }
    Ok(postfix)
}

/// String form of [`to_postfix`]. The input is expected to be expanded
/// already, so `.` is read as concatenation.
pub fn infix_to_postfix(regex: &str) -> Result<String, ParserError> {
    let tokens = tokenize(regex, CompileFlags::EXPLICIT_CONCAT)?;
    Ok(to_postfix(&tokens)?.iter().join(""))
}

/// Runs the front half of the pipeline: tokenize, expand (unless the
/// pattern is flagged as explicit) and convert to postfix.
pub fn run_parse(pattern: &str, flags: CompileFlags) -> Result<Vec<Token>, ParserError> {
    let tokens = tokenize(pattern, flags)?;
    trace!("tokenized {:?} into {} tokens", pattern, tokens.len());

    let expanded = if flags.intersects(CompileFlags::EXPLICIT_CONCAT) {
        tokens
    } else {
        expand(&tokens)
    };
    log!(
        flags.stage_level(),
        "expanded {:?} into {:?}",
        pattern,
        expanded.iter().join("")
    );

    let postfix = to_postfix(&expanded)?;
    log!(
        flags.stage_level(),
        "postfix form of {:?} is {:?}",
        pattern,
        postfix.iter().join("")
    );
    Ok(postfix)
}
