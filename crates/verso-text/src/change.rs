use std::ops::Range;

use text_size::{TextLen, TextRange, TextSize};

use crate::TextError;

/// A single splice: remove `removed_len` bytes at `start`, insert `inserted`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextChange {
    start: TextSize,
    removed_len: TextSize,
    inserted: String,
}

impl TextChange {
    pub fn new(start: TextSize, removed_len: TextSize, inserted: impl Into<String>) -> Self {
        Self { start, removed_len, inserted: inserted.into() }
    }

    pub fn insert(at: TextSize, text: impl Into<String>) -> Self {
        Self::new(at, TextSize::new(0), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range.start(), range.len(), String::new())
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self::new(range.start(), range.len(), text)
    }

    pub fn start(&self) -> TextSize {
        self.start
    }

    pub fn removed_len(&self) -> TextSize {
        self.removed_len
    }

    pub fn inserted(&self) -> &str {
        &self.inserted
    }

    /// Range of the pre-edit text that this change removes.
    pub fn removed_range(&self) -> TextRange {
        TextRange::at(self.start, self.removed_len)
    }

    /// Range of the post-edit text that holds the inserted text.
    pub fn inserted_range(&self) -> TextRange {
        TextRange::at(self.start, self.inserted.text_len())
    }

    /// Net length change in bytes.
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.inserted.text_len())) - i64::from(u32::from(self.removed_len))
    }

    pub fn is_empty(&self) -> bool {
        self.removed_len == TextSize::new(0) && self.inserted.is_empty()
    }

    pub fn validate(&self, text: &str) -> Result<(), TextError> {
        let range = self.removed_range();
        if range.end() > text.text_len() {
            return Err(TextError::OutOfBounds { range, len: text.text_len() });
        }

        for offset in [range.start(), range.end()] {
            if !text.is_char_boundary(offset.into()) {
                return Err(TextError::NotCharBoundary { offset });
            }
        }

        Ok(())
    }

    pub fn apply(&self, text: &mut String) -> Result<(), TextError> {
        self.validate(text)?;
        let range: Range<usize> = self.removed_range().into();
        text.replace_range(range, &self.inserted);
        Ok(())
    }

    /// The change that undoes `self`, computed against the pre-edit `text`.
    pub fn inverse(&self, text: &str) -> Result<Self, TextError> {
        self.validate(text)?;
        let removed = &text[self.removed_range()];
        Ok(Self::new(self.start, self.inserted.text_len(), removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str, change: &TextChange) -> String {
        let mut text = text.to_owned();
        change.apply(&mut text).unwrap();
        text
    }

    #[test]
    fn inverse_restores_original_text() {
        let cases = [
            ("hello world", TextChange::insert(5.into(), ",")),
            ("hello world", TextChange::delete(TextRange::new(5.into(), 11.into()))),
            ("<a b=\"1\"/>", TextChange::replace(TextRange::new(6.into(), 7.into()), "12")),
            ("", TextChange::insert(0.into(), "line\r\nbreak")),
            ("päivää", TextChange::replace(TextRange::new(1.into(), 3.into()), "ä")),
        ];

        for (text, change) in cases {
            let inverse = change.inverse(text).unwrap();
            let edited = apply(text, &change);
            assert_eq!(apply(&edited, &inverse), text, "change: {change:?}");
        }
    }

    #[test]
    fn rejects_out_of_bounds_edit() {
        let change = TextChange::delete(TextRange::new(2.into(), 10.into()));
        let error = change.validate("abc").unwrap_err();
        assert_eq!(
            error,
            TextError::OutOfBounds { range: TextRange::new(2.into(), 10.into()), len: 3.into() }
        );
    }

    #[test]
    fn rejects_split_characters() {
        let change = TextChange::insert(2.into(), "x");
        let error = change.validate("päivää").unwrap_err();
        assert_eq!(error, TextError::NotCharBoundary { offset: 2.into() });
    }

    #[test]
    fn ranges_and_delta() {
        let change = TextChange::replace(TextRange::new(3.into(), 5.into()), "abcd");
        assert_eq!(change.removed_range(), TextRange::new(3.into(), 5.into()));
        assert_eq!(change.inserted_range(), TextRange::new(3.into(), 7.into()));
        assert_eq!(change.delta(), 2);
        assert!(!change.is_empty());
        assert!(TextChange::insert(0.into(), "").is_empty());
    }
}
