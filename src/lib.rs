//! URI Template expansion, RFC 6570 levels 1 through 4.
//!
//! ```
//! use uri_template_core::UriTemplate;
//!
//! let uri_template = UriTemplate::parse("/search{?q,lang}").unwrap();
//! let uri = uri_template
//!     .expander()
//!     .set_string("q", "hello world")
//!     .set_string("lang", "en")
//!     .expand()
//!     .unwrap();
//! assert_eq!(uri, "/search?q=hello%20world&lang=en");
//! ```

mod encoding;
mod error;
mod expand;
mod expression;
mod item;
mod operator;
mod parse;
mod value;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use tracing::debug;

use crate::expand::expand_items;
use crate::parse::parse_template;

pub use crate::encoding::Encoding;
pub use crate::error::{ExpandError, SyntaxError};
pub use crate::expression::Expression;
pub use crate::item::{Item, Modifier, Varspec, MAX_PREFIX};
pub use crate::operator::{Operator, OperatorTable, RESERVED_OPERATORS};
pub use crate::value::{Value, VariableBag, Variables};

/// A parsed template: literal runs and expressions, in order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UriTemplate(Vec<Item>);

/// Collects variables for a single expansion of a [`UriTemplate`].
#[derive(Debug)]
pub struct Expander<'a> {
    uri_template: &'a UriTemplate,
    variables: VariableBag,
}

impl UriTemplate {
    pub fn parse<S>(template: S) -> Result<Self, SyntaxError>
    where
        S: AsRef<str>,
    {
        let template = template.as_ref();
        let items = parse_template(template).map_err(|err| {
            debug!(template, error = %err, "rejected uri template");
            err
        })?;
        Ok(UriTemplate(items))
    }

    pub fn expand<V>(&self, variables: &V) -> Result<String, ExpandError>
    where
        V: Variables + ?Sized,
    {
        expand_items(&self.0, variables)
    }

    pub fn expander(&self) -> Expander {
        Expander {
            uri_template: self,
            variables: VariableBag::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.0.iter().filter_map(|item| match item {
            Item::Expression(expression) => Some(expression),
            Item::Literal(_) => None,
        })
    }

    /// Every variable the template references, in first-occurrence order.
    pub fn variable_names(&self) -> IndexSet<&str> {
        self.expressions()
            .flat_map(|expression| expression.variable_names().iter())
            .map(String::as_str)
            .collect()
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|item| fmt::Display::fmt(item, f))
    }
}

impl FromStr for UriTemplate {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UriTemplate::parse(s)
    }
}

impl Expander<'_> {
    pub fn expand(&self) -> Result<String, ExpandError> {
        self.uri_template.expand(&self.variables)
    }

    pub fn set<K, V>(&mut self, k: K, v: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.variables.set(k, v);
        self
    }

    pub fn set_assoc<K1, V1, K2, V2>(&mut self, k1: K1, iter: V1) -> &mut Self
    where
        K1: Into<String>,
        V1: IntoIterator<Item = (K2, V2)>,
        K2: Into<String>,
        V2: Into<String>,
    {
        self.variables.set_assoc(k1, iter);
        self
    }

    pub fn set_list<K1, V1, V2>(&mut self, k: K1, iter: V1) -> &mut Self
    where
        K1: Into<String>,
        V1: IntoIterator<Item = V2>,
        V2: Into<String>,
    {
        self.variables.set_list(k, iter);
        self
    }

    pub fn set_string<K, V>(&mut self, k: K, v: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.variables.set_string(k, v);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(template: &str) -> UriTemplate {
        UriTemplate::parse(template).unwrap()
    }

    #[test]
    fn test_empty() {
        let left = parse("").expander().expand().unwrap();
        assert_eq!(left, "");
    }

    #[test]
    fn test_literal_expression_literal() {
        let left = parse("x{y}z")
            .expander()
            .set_string("y", "Y")
            .expand()
            .unwrap();
        assert_eq!(left, "xYz");
    }

    #[test]
    fn test_expression_literal_expression() {
        let left = parse("{x}y{z}")
            .expander()
            .set_string("x", "X")
            .set_string("z", "Z")
            .expand()
            .unwrap();
        assert_eq!(left, "XyZ");
    }

    #[test]
    fn test_literal_is_verbatim() {
        let left = parse("http://example.com/a b?c=%41").expander().expand().unwrap();
        assert_eq!(left, "http://example.com/a b?c=%41");
    }

    #[test]
    fn test_multiple_expressions_multiple_variables() {
        let left = parse("{x}{y,z}")
            .expander()
            .set_string("x", "X")
            .set_string("y", "Y")
            .set_string("z", "Z")
            .expand()
            .unwrap();
        assert_eq!(left, "XY,Z")
    }

    #[test]
    fn test_varname_dots() {
        let left = parse("{x.y.z}")
            .expander()
            .set_string("x.y.z", "X.Y.Z")
            .expand()
            .unwrap();
        assert_eq!(left, "X.Y.Z");
    }

    #[test]
    fn test_varname_pct_encoded() {
        let left = parse("{%20%21}")
            .expander()
            .set_string("%20%21", "SPACE!")
            .expand()
            .unwrap();
        assert_eq!(left, "SPACE%21");

        let left = parse("{?%20%21}")
            .expander()
            .set_string("%20%21", "SPACE!")
            .expand()
            .unwrap();
        assert_eq!(left, "?%20%21=SPACE%21");
    }

    #[test]
    fn test_invalid_templates() {
        for template in &[
            "{}", "{x", "x}", "{!x}", "{=x}", "{x,,y}", "{?~}", "{?.}", "{?x~}", "{x:1y}",
            "{x:-1}", "{x:10000}", "{x*y}", "{x:1*}", "{%0}",
        ] {
            assert!(UriTemplate::parse(template).is_err(), "{}", template);
        }
    }

    #[test]
    fn test_invalid_template_errors() {
        assert_eq!(
            UriTemplate::parse("a{|x}b"),
            Err(SyntaxError::ReservedOperator("{|x}".to_string()))
        );
        assert_eq!(
            UriTemplate::parse("a{x:0}b"),
            Err(SyntaxError::MalformedVarspec("x:0".to_string()))
        );
        assert_eq!(
            UriTemplate::parse("a{x"),
            Err(SyntaxError::MalformedExpression("{x".to_string()))
        );
    }

    #[test]
    fn test_display_round_trip() {
        for template in &[
            "",
            "x",
            "http://example.com/{user}/repos{?page,per_page}",
            "{+base}{/path*}{;params*}{?q:10}{&rest}{#frag}",
            "X{.a,b,a}",
        ] {
            let uri_template: UriTemplate = template.parse().unwrap();
            assert_eq!(uri_template.to_string(), *template);
        }
    }

    #[test]
    fn test_variable_names() {
        let uri_template = parse("{a,b}/{+c}{?b,a,d*}");
        let names: Vec<&str> = uri_template.variable_names().into_iter().collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
        assert_eq!(uri_template.expressions().count(), 3);
        assert_eq!(uri_template.items().len(), 4);
    }

    #[test]
    fn test_expand_unnamed_operator() {
        let uri_template = parse("x{+y}z");

        let left = uri_template.expander().set_string("y", "Y").expand();
        assert_eq!(left.unwrap(), "xYz");

        let left = uri_template.expander().set_string("y", "").expand();
        assert_eq!(left.unwrap(), "xz");

        let left = uri_template.expander().expand();
        assert_eq!(left.unwrap(), "xz");

        let left = uri_template
            .expander()
            .set_list("y", ["A", "", "B"])
            .expand();
        assert_eq!(left.unwrap(), "xA,,Bz");

        let left = uri_template
            .expander()
            .set_list("y", [] as [&str; 0])
            .expand();
        assert_eq!(left.unwrap(), "xz");

        let left = uri_template
            .expander()
            .set_assoc("y", [("a", "A"), ("b", ""), ("c", "C")])
            .expand();
        assert_eq!(left.unwrap(), "xa,A,b,,c,Cz");

        let left = uri_template
            .expander()
            .set_assoc("y", [] as [(&str, &str); 0])
            .expand();
        assert_eq!(left.unwrap(), "xz");
    }

    #[test]
    fn test_expand_named_operator() {
        let uri_template = parse("x{?y}");

        let left = uri_template.expander().set_string("y", "Y").expand();
        assert_eq!(left.unwrap(), "x?y=Y");

        let left = uri_template.expander().set_string("y", "").expand();
        assert_eq!(left.unwrap(), "x?y=");

        let left = uri_template.expander().expand();
        assert_eq!(left.unwrap(), "x");

        let left = uri_template
            .expander()
            .set_list("y", ["A", "", "B"])
            .expand();
        assert_eq!(left.unwrap(), "x?y=A,,B");

        let left = uri_template
            .expander()
            .set("y", Value::from_entries([("0", "A"), ("1", "B")]))
            .expand();
        assert_eq!(left.unwrap(), "x?y=A,B");

        let left = uri_template
            .expander()
            .set_assoc("y", [("a", "A"), ("b", ""), ("c", "C")])
            .expand();
        assert_eq!(left.unwrap(), "x?y=a,A,b,,c,C");
    }

    #[test]
    fn test_explode_named_operator() {
        let uri_template = parse("x{;y*}");

        let left = uri_template.expander().set_string("y", "ABC").expand();
        assert_eq!(left.unwrap(), "x;y=ABC");

        let left = uri_template
            .expander()
            .set_list("y", ["A", "", "B"])
            .expand();
        assert_eq!(left.unwrap(), "x;y=A;y;y=B");

        let left = uri_template
            .expander()
            .set_assoc("y", [("a", "A"), ("b", ""), ("c", "C")])
            .expand();
        assert_eq!(left.unwrap(), "x;a=A;b;c=C");
    }

    #[test]
    fn test_prefix_on_composite() {
        let left = parse("x{y:2}")
            .expander()
            .set_list("y", ["A", "B"])
            .expand();
        assert_eq!(left, Err(ExpandError::PrefixOnComposite("y".to_string())));
    }
}
