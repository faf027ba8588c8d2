use std::fmt;

use crate::span::Span;

/// Token types for the logic block language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    /// Identifier or keyword
    Name(&'src str),
    Number(&'src str),
    /// String literal, including prefix and quotes
    String(&'src str),
    /// Operator or delimiter such as `=`, `:`, `,`, `->`, `**=`
    Op(&'src str),
    /// `(`, `[` or `{`
    Open(char),
    /// `)`, `]` or `}`
    Close(char),

    // Comments
    Comment(&'src str), // # comment

    // Whitespace
    /// Backslash line continuation
    Continuation,
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns `true` for tokens that carry meaning for statement structure.
    pub fn is_significant(&self) -> bool {
        !matches!(
            self,
            Token::Comment(_) | Token::Continuation | Token::Whitespace | Token::Newline
        )
    }

    pub fn is_name(&self, name: &str) -> bool {
        matches!(self, Token::Name(n) if *n == name)
    }

    pub fn is_op(&self, op: &str) -> bool {
        matches!(self, Token::Op(o) if *o == op)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(text)
            | Token::Number(text)
            | Token::String(text)
            | Token::Op(text)
            | Token::Comment(text) => write!(f, "{text}"),
            Token::Open(c) | Token::Close(c) => write!(f, "{c}"),
            Token::Continuation => write!(f, "\\"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => writeln!(f),
        }
    }
}

/// A token with its position in the sanitized logic block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}
