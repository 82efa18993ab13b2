use thiserror::Error;

/// Raised while parsing a template or a single expression.
///
/// Every variant carries the offending text.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SyntaxError {
    #[error("malformed expression `{0}`")]
    MalformedExpression(String),
    #[error("reserved operator in expression `{0}`")]
    ReservedOperator(String),
    #[error("malformed variable specifier `{0}`")]
    MalformedVarspec(String),
}

/// Raised while expanding an expression against a set of variables.
///
/// Every variant carries the name of the variable that could not be expanded.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ExpandError {
    #[error("prefix modifier applied to composite variable `{0}`")]
    PrefixOnComposite(String),
    #[error("variable `{0}` holds a nested composite value")]
    NestedComposite(String),
}
