//! Byte-at-a-time matching of `true`, `false` and `null`.

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    True,
    False,
    Null,
}

impl Keyword {
    fn token(self) -> Token {
        match self {
            Keyword::True => Token::True,
            Keyword::False => Token::False,
            Keyword::Null => Token::Null,
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Progress {
    Partial,
    Complete(Token),
    Mismatch,
}

/// The unread tail of a keyword whose first byte has been consumed.
///
/// Lives across feeds, so `tr` at the end of one chunk and `ue` at the start
/// of the next still produce [`Token::True`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeywordMatcher {
    keyword: Keyword,
    rest: &'static [u8],
}

impl KeywordMatcher {
    /// Starts a match after `first`, or `None` if no keyword begins with it.
    pub(crate) fn after(first: u8) -> Option<Self> {
        let (keyword, rest): (_, &'static [u8]) = match first {
            b't' => (Keyword::True, b"rue"),
            b'f' => (Keyword::False, b"alse"),
            b'n' => (Keyword::Null, b"ull"),
            _ => return None,
        };
        Some(Self { keyword, rest })
    }

    /// Matches one more byte. A mismatch leaves the matcher unchanged.
    pub(crate) fn feed(&mut self, byte: u8) -> Progress {
        match self.rest.split_first() {
            Some((&expected, rest)) if expected == byte => {
                self.rest = rest;
                if rest.is_empty() {
                    Progress::Complete(self.keyword.token())
                } else {
                    Progress::Partial
                }
            }
            _ => Progress::Mismatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(b"true", Token::True)]
    #[case(b"false", Token::False)]
    #[case(b"null", Token::Null)]
    fn completes_on_last_byte(#[case] word: &[u8], #[case] token: Token) {
        let (&first, tail) = word.split_first().unwrap();
        let (&last, middle) = tail.split_last().unwrap();

        let mut matcher = KeywordMatcher::after(first).unwrap();
        for &byte in middle {
            assert_eq!(matcher.feed(byte), Progress::Partial);
        }
        assert_eq!(matcher.feed(last), Progress::Complete(token));
    }

    #[test]
    fn mismatch_keeps_position() {
        let mut matcher = KeywordMatcher::after(b'f').unwrap();
        assert_eq!(matcher.feed(b'a'), Progress::Partial);
        assert_eq!(matcher.feed(b'L'), Progress::Mismatch);
        assert_eq!(matcher.feed(b'l'), Progress::Partial);
    }

    #[test]
    fn complete_matcher_accepts_nothing_more() {
        let mut matcher = KeywordMatcher::after(b'n').unwrap();
        for byte in *b"ull" {
            matcher.feed(byte);
        }
        assert_eq!(matcher.feed(b'l'), Progress::Mismatch);
    }

    #[test]
    fn only_three_first_bytes() {
        assert!(KeywordMatcher::after(b'T').is_none());
        assert!(KeywordMatcher::after(b'u').is_none());
    }
}
