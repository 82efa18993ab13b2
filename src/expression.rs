use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::error::{ExpandError, SyntaxError};
use crate::expand::expand_expression;
use crate::item::Varspec;
use crate::operator::Operator;
use crate::parse::parse_expression;
use crate::value::Variables;

/// A single parsed `{...}` expression.
///
/// Expressions are immutable: the variable names and the canonical text are
/// computed once, when the expression is built.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Expression {
    operator: Operator,
    varspecs: Vec<Varspec>,
    variable_names: IndexSet<String>,
    text: String,
}

impl Expression {
    /// Parses one expression, braces included.
    ///
    /// ```
    /// use uri_template_core::Expression;
    ///
    /// let expression = Expression::parse("{?x,y*}").unwrap();
    /// assert_eq!(expression.to_text(), "{?x,y*}");
    /// ```
    pub fn parse<S>(text: S) -> Result<Self, SyntaxError>
    where
        S: AsRef<str>,
    {
        parse_expression(text.as_ref()).map_err(|err| {
            debug!(error = %err, "rejected uri template expression");
            err
        })
    }

    pub(crate) fn new(operator: Operator, varspecs: Vec<Varspec>) -> Self {
        let variable_names = varspecs.iter().map(|v| v.varname.clone()).collect();
        let mut text = String::from("{");
        text.push_str(&operator.to_string());
        for (i, varspec) in varspecs.iter().enumerate() {
            if i > 0 {
                text.push(',');
            }
            text.push_str(&varspec.to_string());
        }
        text.push('}');
        Expression {
            operator,
            varspecs,
            variable_names,
            text,
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn varspecs(&self) -> &[Varspec] {
        &self.varspecs
    }

    /// Referenced variable names in first-occurrence order, without duplicates.
    pub fn variable_names(&self) -> &IndexSet<String> {
        &self.variable_names
    }

    pub fn to_text(&self) -> &str {
        &self.text
    }

    pub fn expand<V>(&self, variables: &V) -> Result<String, ExpandError>
    where
        V: Variables + ?Sized,
    {
        let expanded = expand_expression(self, variables)?;
        trace!(expression = %self.text, expanded = %expanded, "expanded expression");
        Ok(expanded)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Expression {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}
