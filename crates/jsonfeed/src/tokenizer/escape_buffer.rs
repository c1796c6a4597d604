//! Accumulates the four hex digits of a `\uXXXX` escape.
//!
//! The buffer only decodes UTF-16 code units; pairing surrogates into a
//! scalar value is left to the tokenizer, which has to look past the next
//! backslash for the low half anyway.

use crate::error::SyntaxError;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    code: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Clears any accumulated digits.
    pub(crate) fn reset(&mut self) {
        self.code = 0;
        self.len = 0;
    }

    /// Feeds one input byte.
    ///
    /// - `Ok(None)` while fewer than four digits have been seen.
    /// - `Ok(Some(unit))` on the fourth digit; the buffer is reset.
    /// - `Err` if `byte` is not an ASCII hex digit. The buffer is left as is.
    pub(crate) fn feed(&mut self, byte: u8) -> Result<Option<u16>, SyntaxError> {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return Err(SyntaxError::InvalidUnicodeEscape(char::from(byte))),
        };

        self.code = (self.code << 4) | u16::from(digit);
        self.len += 1;

        if self.len == 4 {
            let unit = self.code;
            self.reset();
            Ok(Some(unit))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UnicodeEscapeBuffer;
    use crate::error::SyntaxError;

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'4').unwrap(), None);
        assert_eq!(buf.feed(b'1').unwrap(), Some(0x41));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        for byte in *b"AbC" {
            assert!(buf.feed(byte).unwrap().is_none());
        }
        assert_eq!(buf.feed(b'd').unwrap(), Some(0xABCD));
    }

    #[test]
    fn surrogates_are_returned_as_code_units() {
        let mut buf = UnicodeEscapeBuffer::new();
        let mut last = None;
        for byte in *b"D800" {
            last = buf.feed(byte).unwrap();
        }
        assert_eq!(last, Some(0xD800));
    }

    #[test]
    fn reset_clears_buffer() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert!(buf.feed(b'F').unwrap().is_none());
        buf.reset();
        for byte in *b"004" {
            assert!(buf.feed(byte).unwrap().is_none());
        }
        assert_eq!(buf.feed(b'2').unwrap(), Some(0x42));
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(
            buf.feed(b'G').unwrap_err(),
            SyntaxError::InvalidUnicodeEscape('G')
        );
    }
}
