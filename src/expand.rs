use indexmap::IndexMap;
use tracing::debug;

use crate::error::ExpandError;
use crate::expression::Expression;
use crate::item::{Item, Varspec};
use crate::operator::OperatorTable;
use crate::value::{Value, Variables};

pub fn expand_items<V>(items: &[Item], variables: &V) -> Result<String, ExpandError>
where
    V: Variables + ?Sized,
{
    let mut dst = String::new();
    for item in items {
        match item {
            Item::Literal(literal) => dst.push_str(literal),
            Item::Expression(expression) => dst.push_str(&expression.expand(variables)?),
        }
    }
    Ok(dst)
}

/// Expands every varspec, drops the undefined ones and joins the rest.
pub fn expand_expression<V>(expression: &Expression, variables: &V) -> Result<String, ExpandError>
where
    V: Variables + ?Sized,
{
    let operator_table = expression.operator().table();
    let mut members = Vec::with_capacity(expression.varspecs().len());
    for varspec in expression.varspecs() {
        if let Some(value) = variables.fetch(varspec.name())? {
            if let Some(member) = expand_varspec(&operator_table, varspec, &value)? {
                members.push(member);
            }
        }
    }
    if members.is_empty() {
        return Ok(String::new());
    }
    let mut dst = String::from(operator_table.prefix);
    push_joined(&mut dst, operator_table.joiner, members);
    Ok(dst)
}

/// `None` means the value counts as undefined: an empty list or an empty
/// associative array.
fn expand_varspec(
    operator_table: &OperatorTable,
    varspec: &Varspec,
    value: &Value,
) -> Result<Option<String>, ExpandError> {
    match value {
        Value::String(value) => Ok(Some(expand_string(operator_table, varspec, value))),
        Value::List(value) if value.is_empty() => Ok(None),
        Value::AssociativeArray(value) if value.is_empty() => Ok(None),
        _ if varspec.prefix().is_some() => {
            debug!(
                variable = varspec.name(),
                "prefix modifier applied to composite value"
            );
            Err(ExpandError::PrefixOnComposite(varspec.name().to_string()))
        }
        Value::List(value) if varspec.is_explode() => {
            Ok(Some(explode_list(operator_table, varspec, value)))
        }
        Value::List(value) => Ok(Some(expand_list(operator_table, varspec, value))),
        Value::AssociativeArray(value) if varspec.is_explode() => {
            Ok(Some(explode_assoc(operator_table, value)))
        }
        Value::AssociativeArray(value) => Ok(Some(expand_assoc(operator_table, varspec, value))),
    }
}

fn expand_string(operator_table: &OperatorTable, varspec: &Varspec, mut value: &str) -> String {
    if let Some(size) = varspec.prefix() {
        if let Some((i, _)) = value.char_indices().nth(size) {
            value = &value[..i];
        }
    }
    let encoded = operator_table.encoding.encode(value);
    named(operator_table, varspec.name(), encoded)
}

/// `a,b,c`, named once in query form.
fn expand_list(operator_table: &OperatorTable, varspec: &Varspec, value: &[String]) -> String {
    let mut dst = String::new();
    push_joined(
        &mut dst,
        ',',
        value.iter().map(|v| operator_table.encoding.encode(v)),
    );
    named(operator_table, varspec.name(), dst)
}

/// `a<joiner>b<joiner>c`, every member named in query form.
fn explode_list(operator_table: &OperatorTable, varspec: &Varspec, value: &[String]) -> String {
    let mut dst = String::new();
    push_joined(
        &mut dst,
        operator_table.joiner,
        value.iter().map(|v| {
            let encoded = operator_table.encoding.encode(v);
            named(operator_table, varspec.name(), encoded)
        }),
    );
    dst
}

/// `k1,v1,k2,v2`, named once in query form.
fn expand_assoc(
    operator_table: &OperatorTable,
    varspec: &Varspec,
    value: &IndexMap<String, String>,
) -> String {
    let mut dst = String::new();
    push_joined(
        &mut dst,
        ',',
        value.iter().map(|(k, v)| {
            let mut pair = operator_table.encoding.encode(k);
            pair.push(',');
            operator_table.encoding.push(&mut pair, v);
            pair
        }),
    );
    named(operator_table, varspec.name(), dst)
}

/// `k1=v1<joiner>k2=v2`. The keys stand in for the variable name.
fn explode_assoc(operator_table: &OperatorTable, value: &IndexMap<String, String>) -> String {
    let mut dst = String::new();
    push_joined(
        &mut dst,
        operator_table.joiner,
        value.iter().map(|(k, v)| {
            let k = operator_table.encoding.encode(k);
            let v = operator_table.encoding.encode(v);
            if operator_table.named {
                named(operator_table, &k, v)
            } else {
                k + "=" + &v
            }
        }),
    );
    dst
}

/// Wraps an encoded member as `name=value` in query form. An empty member
/// becomes `name` followed by the operator's if-empty suffix.
fn named(operator_table: &OperatorTable, name: &str, encoded: String) -> String {
    if !operator_table.named {
        return encoded;
    }
    let mut dst = String::with_capacity(name.len() + 1 + encoded.len());
    dst.push_str(name);
    if encoded.is_empty() {
        dst.push_str(operator_table.ifemp);
    } else {
        dst.push('=');
        dst.push_str(&encoded);
    }
    dst
}

fn push_joined<I>(dst: &mut String, joiner: char, members: I)
where
    I: IntoIterator<Item = String>,
{
    for (i, member) in members.into_iter().enumerate() {
        if i > 0 {
            dst.push(joiner);
        }
        dst.push_str(&member);
    }
}
