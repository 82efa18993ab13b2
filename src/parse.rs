use std::str::Chars;

use crate::encoding::{is_alpha, is_digit, is_hexdig};
use crate::error::SyntaxError;
use crate::expression::Expression;
use crate::item::{Item, Modifier, Varspec, MAX_PREFIX};
use crate::operator::{Operator, RESERVED_OPERATORS};

pub fn parse_template(mut template: &str) -> Result<Vec<Item>, SyntaxError> {
    let mut items = Vec::new();
    loop {
        match template.find('{') {
            None => {
                push_literal(&mut items, template)?;
                break;
            }
            Some(start) => {
                push_literal(&mut items, &template[..start])?;
                let remainder = &template[start..];
                let end = remainder
                    .find('}')
                    .ok_or_else(|| SyntaxError::MalformedExpression(remainder.to_string()))?;
                let expression = parse_expression(&remainder[..=end])?;
                items.push(Item::Expression(expression));
                template = &remainder[end + 1..];
            }
        }
    }
    Ok(items)
}

fn push_literal(items: &mut Vec<Item>, literal: &str) -> Result<(), SyntaxError> {
    if literal.contains('}') {
        return Err(SyntaxError::MalformedExpression(literal.to_string()));
    }
    if !literal.is_empty() {
        items.push(Item::Literal(literal.to_string()));
    }
    Ok(())
}

/// Parses `{` operator? variable-list `}`.
///
/// The operator position accepts the reserved operator characters so that
/// they can be reported as such, after the structure has been matched.
pub fn parse_expression(text: &str) -> Result<Expression, SyntaxError> {
    let malformed = || SyntaxError::MalformedExpression(text.to_string());
    let inner = text
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(malformed)?;
    if inner.contains(|c: char| matches!(c, '{' | '}')) {
        return Err(malformed());
    }
    let mut chars = inner.chars();
    let (operator, variable_list) = match chars.next() {
        None => return Err(malformed()),
        Some(c) if RESERVED_OPERATORS.contains(&c) => (None, chars.as_str()),
        Some(c) => match Operator::from_char(c) {
            Some(operator) => (Some(operator), chars.as_str()),
            None => (Some(Operator::Simple), inner),
        },
    };
    if variable_list.is_empty() {
        return Err(malformed());
    }
    let operator = operator.ok_or_else(|| SyntaxError::ReservedOperator(text.to_string()))?;
    let varspecs = parse_variable_list(variable_list)?;
    Ok(Expression::new(operator, varspecs))
}

fn parse_variable_list(s: &str) -> Result<Vec<Varspec>, SyntaxError> {
    s.split(',').map(parse_varspec).collect()
}

pub fn parse_varspec(s: &str) -> Result<Varspec, SyntaxError> {
    let malformed = || SyntaxError::MalformedVarspec(s.to_string());
    let (varname, modifier) = if let Some(varname) = s.strip_suffix('*') {
        (varname, Some(Modifier::Explode))
    } else if let Some((varname, size)) = s.split_once(':') {
        let size = parse_prefix(size).ok_or_else(malformed)?;
        (varname, Some(Modifier::Prefix(size)))
    } else {
        (s, None)
    };
    if !is_varname(varname) {
        return Err(malformed());
    }
    Ok(Varspec {
        varname: varname.to_string(),
        modifier,
    })
}

/// `%x31-39 0*3DIGIT`
fn parse_prefix(s: &str) -> Option<u16> {
    match s.chars().next() {
        None | Some('0') => None,
        _ if s.len() > 4 || !s.chars().all(is_digit) => None,
        _ => s.parse().ok().filter(|size| *size <= MAX_PREFIX),
    }
}

/// `varchar *( ["."] varchar )`
fn is_varname(s: &str) -> bool {
    s.split('.').all(is_varchars)
}

fn is_varchars(s: &str) -> bool {
    let mut chars = s.chars();
    let mut empty = true;
    while let Some(c) = chars.next() {
        empty = false;
        match c {
            '%' => {
                if !is_pct_encoded(&mut chars) {
                    return false;
                }
            }
            c if is_varchar(c) => {}
            _ => {
                return false;
            }
        }
    }
    !empty
}

fn is_pct_encoded(chars: &mut Chars) -> bool {
    let x = chars.next();
    let y = chars.next();
    matches!((x, y), (Some(x), Some(y)) if is_hexdig(x) && is_hexdig(y))
}

fn is_varchar(c: char) -> bool {
    is_alpha(c) || is_digit(c) || '_' == c
}
