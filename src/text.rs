//! Fixed capacity text storage for labels

use core::fmt;

/// Errors while formatting into a [`TextBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Formatted text does not fit into the buffer
    Overflow,
}

/// UTF-8 text stored inline in `N` bytes.
///
/// Labels keep their text in one of these so no allocator is needed.
/// Plain writes (`set`, `fmt::Write`) truncate on a character boundary,
/// [`TextBuffer::format`] refuses text that does not fit.
#[derive(Clone, Copy)]
pub struct TextBuffer<const N: usize> {
    str_buf: [u8; N],
    len: usize,
}

impl<const N: usize> TextBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            str_buf: [0; N],
            len: 0,
        }
    }

    /// Create a buffer holding `text`, truncated to fit
    pub fn from_str_truncated(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set(text);
        buffer
    }

    pub fn as_str(&self) -> &str {
        // Only ever filled from `&str` and cut on char boundaries
        core::str::from_utf8(&self.str_buf[..self.len]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Replace the content, truncating to the capacity
    pub fn set(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }

    /// Append as much of `text` as fits. Returns whether all of it fit.
    pub fn push_str(&mut self, text: &str) -> bool {
        let free = N - self.len;
        let take = floor_char_boundary(text, free);
        self.str_buf[self.len..self.len + take].copy_from_slice(&text.as_bytes()[..take]);
        self.len += take;
        take == text.len()
    }

    /// Replace the content with formatted text.
    ///
    /// On overflow the previous content is kept.
    pub fn format(&mut self, args: fmt::Arguments) -> Result<(), Error> {
        let mut scratch = [0u8; N];
        let len = format_no_std::show(&mut scratch, args)
            .map_err(|_| Error::Overflow)?
            .len();
        self.str_buf[..len].copy_from_slice(&scratch[..len]);
        self.len = len;
        Ok(())
    }
}

/// Largest index `<= max` that falls on a char boundary of `text`
fn floor_char_boundary(text: &str, max: usize) -> usize {
    if max >= text.len() {
        return text.len();
    }
    let mut index = max;
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

impl<const N: usize> Default for TextBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for TextBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for TextBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for TextBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> PartialEq for TextBuffer<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<const N: usize> Eq for TextBuffer<N> {}

impl<const N: usize> PartialEq<str> for TextBuffer<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for TextBuffer<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for TextBuffer<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use core::fmt::Write;

    use super::*;

    #[test]
    fn set_truncates_to_capacity() {
        let mut text: TextBuffer<4> = TextBuffer::new();
        text.set("Cloudy");
        assert_eq!(text, "Clou");
        assert_eq!(text.len(), 4);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // "°" is two bytes, only one byte is left after "ab"
        let text: TextBuffer<3> = TextBuffer::from_str_truncated("ab°C");
        assert_eq!(text, "ab");
    }

    #[test]
    fn format_keeps_previous_content_on_overflow() {
        let mut text: TextBuffer<5> = TextBuffer::from_str_truncated("12:00");
        assert_eq!(
            text.format(format_args!("{}:{:02}", 123_456, 7)),
            Err(Error::Overflow)
        );
        assert_eq!(text, "12:00");

        text.format(format_args!("{:02}:{:02}", 9, 5)).unwrap();
        assert_eq!(text, "09:05");
    }

    #[test]
    fn write_macro_appends_and_truncates() {
        let mut text: TextBuffer<8> = TextBuffer::new();
        write!(text, "{}F, {}", 72, "Cloudy").unwrap();
        assert_eq!(text, "72F, Clo");
    }
}
