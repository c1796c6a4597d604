#![expect(clippy::inline_always)]

use std::collections::VecDeque;

/// Unread input, in arrival order.
///
/// Holds raw bytes exactly as they were fed. No UTF-8 guarantee is made; the
/// tokenizer validates string contents as it copies them out.
#[derive(Debug, Default)]
pub(crate) struct ByteBuffer {
    data: VecDeque<u8>,
}

impl ByteBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.data.extend(bytes);
    }

    #[inline(always)]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.data.front().copied()
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Moves the longest prefix whose bytes satisfy `predicate` into `dst`,
    /// returning how many bytes were moved.
    #[inline]
    pub(crate) fn copy_while<F>(&mut self, dst: &mut Vec<u8>, mut predicate: F) -> usize
    where
        F: FnMut(u8) -> bool,
    {
        let mut copied = 0;
        loop {
            let (front_len, prefix) = {
                let (front, _) = self.data.as_slices();
                if front.is_empty() {
                    break;
                }

                let prefix = front.iter().take_while(|&&b| predicate(b)).count();
                if prefix == 0 {
                    break;
                }

                (front.len(), prefix)
            };

            dst.extend(self.data.drain(..prefix));
            copied += prefix;

            // The ring may wrap; keep going into what was the back slice.
            if prefix < front_len {
                break;
            }
        }
        copied
    }
}

impl Iterator for ByteBuffer {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.data.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::ByteBuffer;

    #[test]
    fn copy_while_stops_at_predicate() {
        let mut buf = ByteBuffer::new();
        buf.push(b"1234,5");
        let mut dst = Vec::new();
        assert_eq!(buf.copy_while(&mut dst, |b| b.is_ascii_digit()), 4);
        assert_eq!(dst, b"1234");
        assert_eq!(buf.peek(), Some(b','));
    }

    #[test]
    fn copy_while_crosses_wrapped_ring() {
        let mut buf = ByteBuffer::new();
        buf.push(b"xxxxxxx");
        // Drain the front so later pushes wrap around the ring's end.
        for _ in 0..7 {
            buf.next();
        }
        buf.push(b"abcdefghijklmnop");
        let mut dst = Vec::new();
        assert_eq!(buf.copy_while(&mut dst, |b| b.is_ascii_lowercase()), 16);
        assert_eq!(dst, b"abcdefghijklmnop");
        assert!(buf.is_empty());
    }

    #[test]
    fn copy_while_on_empty_ring() {
        let mut buf = ByteBuffer::new();
        let mut dst = Vec::new();
        assert_eq!(buf.copy_while(&mut dst, |_| true), 0);
        assert!(dst.is_empty());
    }
}
