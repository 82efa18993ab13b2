use std::fmt;

use crate::expression::Expression;

/// One run of a template: literal text or a `{...}` expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Item {
    Literal(String),
    Expression(Expression),
}

/// A single `name`, `name:N` or `name*` token of an expression.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Varspec {
    pub(crate) varname: String,
    pub(crate) modifier: Option<Modifier>,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Modifier {
    /// `:N`, with `N` in `1..=9999`.
    Prefix(u16),
    /// `*`
    Explode,
}

/// Largest accepted prefix length.
pub const MAX_PREFIX: u16 = 9999;

impl Varspec {
    pub fn name(&self) -> &str {
        &self.varname
    }

    pub fn modifier(&self) -> Option<Modifier> {
        self.modifier
    }

    pub fn is_explode(&self) -> bool {
        matches!(self.modifier, Some(Modifier::Explode))
    }

    pub fn prefix(&self) -> Option<usize> {
        match self.modifier {
            Some(Modifier::Prefix(size)) => Some(usize::from(size)),
            _ => None,
        }
    }
}

impl fmt::Display for Varspec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.varname)?;
        match self.modifier {
            None => Ok(()),
            Some(Modifier::Prefix(size)) => write!(f, ":{}", size),
            Some(Modifier::Explode) => f.write_str("*"),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Literal(literal) => f.write_str(literal),
            Item::Expression(expression) => fmt::Display::fmt(expression, f),
        }
    }
}
