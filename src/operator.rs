use std::fmt;

use crate::encoding::Encoding;

/// The expansion style selected by the character after `{`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// No operator: `{var}`.
    Simple,
    /// `{+var}`
    Reserved,
    /// `{#var}`
    Fragment,
    /// `{.var}`
    Label,
    /// `{/var}`
    PathSegment,
    /// `{;var}`
    PathParameter,
    /// `{?var}`
    FormQuery,
    /// `{&var}`
    FormContinuation,
}

/// What an operator contributes to an expansion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OperatorTable {
    /// Emitted once in front of a non-empty expansion.
    pub prefix: &'static str,
    /// Placed between expanded members.
    pub joiner: char,
    /// Query form: members are emitted as `name=value`.
    pub named: bool,
    /// Appended to the name of an empty member in query form.
    pub ifemp: &'static str,
    pub encoding: Encoding,
}

/// Operator characters recognized by the grammar but reserved for future
/// extensions.
pub const RESERVED_OPERATORS: [char; 5] = ['=', ',', '!', '@', '|'];

impl Operator {
    pub fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::PathSegment),
            ';' => Some(Operator::PathParameter),
            '?' => Some(Operator::FormQuery),
            '&' => Some(Operator::FormContinuation),
            _ => None,
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            Operator::Simple => None,
            Operator::Reserved => Some('+'),
            Operator::Fragment => Some('#'),
            Operator::Label => Some('.'),
            Operator::PathSegment => Some('/'),
            Operator::PathParameter => Some(';'),
            Operator::FormQuery => Some('?'),
            Operator::FormContinuation => Some('&'),
        }
    }

    pub fn table(self) -> OperatorTable {
        match self {
            Operator::Simple => OperatorTable {
                prefix: "",
                joiner: ',',
                named: false,
                ifemp: "",
                encoding: Encoding::Unreserved,
            },
            Operator::Reserved => OperatorTable {
                prefix: "",
                joiner: ',',
                named: false,
                ifemp: "",
                encoding: Encoding::UnreservedReserved,
            },
            Operator::Fragment => OperatorTable {
                prefix: "#",
                joiner: ',',
                named: false,
                ifemp: "",
                encoding: Encoding::UnreservedReserved,
            },
            Operator::Label => OperatorTable {
                prefix: ".",
                joiner: '.',
                named: false,
                ifemp: "",
                encoding: Encoding::Unreserved,
            },
            Operator::PathSegment => OperatorTable {
                prefix: "/",
                joiner: '/',
                named: false,
                ifemp: "",
                encoding: Encoding::Unreserved,
            },
            Operator::PathParameter => OperatorTable {
                prefix: ";",
                joiner: ';',
                named: true,
                ifemp: "",
                encoding: Encoding::Unreserved,
            },
            Operator::FormQuery => OperatorTable {
                prefix: "?",
                joiner: '&',
                named: true,
                ifemp: "=",
                encoding: Encoding::Unreserved,
            },
            Operator::FormContinuation => OperatorTable {
                prefix: "&",
                joiner: '&',
                named: true,
                ifemp: "=",
                encoding: Encoding::Unreserved,
            },
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_char() {
            Some(c) => write!(f, "{}", c),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Operator; 8] = [
        Operator::Simple,
        Operator::Reserved,
        Operator::Fragment,
        Operator::Label,
        Operator::PathSegment,
        Operator::PathParameter,
        Operator::FormQuery,
        Operator::FormContinuation,
    ];

    #[test]
    fn test_char_round_trip() {
        for operator in ALL.iter().copied() {
            match operator.as_char() {
                None => assert_eq!(operator, Operator::Simple),
                Some(c) => assert_eq!(Operator::from_char(c), Some(operator)),
            }
        }
    }

    #[test]
    fn test_reserved_operators_are_not_operators() {
        for c in RESERVED_OPERATORS.iter().copied() {
            assert_eq!(Operator::from_char(c), None);
        }
    }

    #[test]
    fn test_table() {
        let rows: Vec<(String, &str, char, bool)> = ALL
            .iter()
            .map(|operator| {
                let table = operator.table();
                (operator.to_string(), table.prefix, table.joiner, table.named)
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("".to_string(), "", ',', false),
                ("+".to_string(), "", ',', false),
                ("#".to_string(), "#", ',', false),
                (".".to_string(), ".", '.', false),
                ("/".to_string(), "/", '/', false),
                (";".to_string(), ";", ';', true),
                ("?".to_string(), "?", '&', true),
                ("&".to_string(), "&", '&', true),
            ]
        );
    }

    #[test]
    fn test_reserved_expansion_operators() {
        for operator in ALL.iter().copied() {
            let reserved = matches!(operator, Operator::Reserved | Operator::Fragment);
            let encoding = operator.table().encoding;
            assert_eq!(encoding == Encoding::UnreservedReserved, reserved);
        }
    }
}
