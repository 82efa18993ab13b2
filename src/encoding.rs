/// Which characters an expansion may emit without percent-encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encoding {
    /// Only `unreserved` passes through.
    Unreserved,
    /// `unreserved` and `reserved` pass through (`+` and `#` expansion).
    UnreservedReserved,
}

impl Encoding {
    pub fn push(self, dst: &mut String, src: &str) {
        let is_allowed: IsAllowed = match self {
            Encoding::Unreserved => is_unreserved,
            Encoding::UnreservedReserved => is_unreserved_reserved,
        };
        src.chars().for_each(|c| push_char(is_allowed, dst, c));
    }

    pub fn encode(self, src: &str) -> String {
        let mut dst = String::with_capacity(src.len());
        self.push(&mut dst, src);
        dst
    }
}

pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_hexdig(c: char) -> bool {
    c.is_ascii_hexdigit()
}

pub fn is_unreserved(c: char) -> bool {
    is_alpha(c) || is_digit(c) || matches!(c, '-' | '.' | '_' | '~')
}

pub fn is_gen_delims(c: char) -> bool {
    matches!(c, ':' | '/' | '?' | '#' | '[' | ']' | '@')
}

pub fn is_sub_delims(c: char) -> bool {
    matches!(
        c,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

fn is_unreserved_reserved(c: char) -> bool {
    is_unreserved(c) || is_gen_delims(c) || is_sub_delims(c)
}

type IsAllowed = fn(char) -> bool;

fn push_char(is_allowed: IsAllowed, dst: &mut String, c: char) {
    if is_allowed(c) {
        dst.push(c);
    } else {
        let mut buf = [0; 4];
        c.encode_utf8(&mut buf)
            .bytes()
            .for_each(|b| push_hex_u8(dst, b));
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

fn push_hex_u8(dst: &mut String, b: u8) {
    dst.push('%');
    dst.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
    dst.push(char::from(HEX_DIGITS[usize::from(b & 0xF)]));
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($encoding:expr, $s:expr, $right:expr) => {
            assert_eq!($encoding.encode($s), $right);
        };
    }

    #[test]
    fn test_unreserved() {
        test!(Encoding::Unreserved, "", "");
        test!(Encoding::Unreserved, "AZaz09-._~", "AZaz09-._~");
        test!(Encoding::Unreserved, "a b", "a%20b");
        test!(Encoding::Unreserved, "50%", "50%25");
        test!(Encoding::Unreserved, "%20", "%2520");
        test!(Encoding::Unreserved, "a/b?c#d", "a%2Fb%3Fc%23d");
        test!(Encoding::Unreserved, "Hello World!", "Hello%20World%21");
    }

    #[test]
    fn test_unreserved_reserved() {
        test!(Encoding::UnreservedReserved, "a/b", "a/b");
        test!(
            Encoding::UnreservedReserved,
            ":/?#[]@!$&'()*+,;=",
            ":/?#[]@!$&'()*+,;="
        );
        test!(Encoding::UnreservedReserved, "Hello World!", "Hello%20World!");
        test!(Encoding::UnreservedReserved, "50%", "50%25");
        test!(Encoding::UnreservedReserved, "<>\"{}|\\^`", "%3C%3E%22%7B%7D%7C%5C%5E%60");
    }

    #[test]
    fn test_multibyte() {
        test!(Encoding::Unreserved, "\u{e9}", "%C3%A9");
        test!(Encoding::UnreservedReserved, "\u{2603}", "%E2%98%83");
        test!(Encoding::Unreserved, "\u{1f600}", "%F0%9F%98%80");
    }
}
