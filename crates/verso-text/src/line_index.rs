//! Offset ↔ (line, column) conversion with incremental maintenance.

use text_size::{TextLen, TextSize};

use crate::TextChange;

/// The character sequence that terminates a line.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LineBreak {
    Lf,
    Cr,
    CrLf,
    NextLine,
    LineSeparator,
    ParagraphSeparator,
}

impl LineBreak {
    const ALL: [Self; 6] = [
        Self::Lf,
        Self::Cr,
        Self::CrLf,
        Self::NextLine,
        Self::LineSeparator,
        Self::ParagraphSeparator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Cr => "\r",
            Self::CrLf => "\r\n",
            Self::NextLine => "\u{85}",
            Self::LineSeparator => "\u{2028}",
            Self::ParagraphSeparator => "\u{2029}",
        }
    }

    pub fn text_len(self) -> TextSize {
        self.as_str().text_len()
    }

    /// Recognizes a line break at the start of `text`.
    pub fn at_start_of(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let kind = match chars.next()? {
            '\n' => Self::Lf,
            '\r' if chars.next() == Some('\n') => Self::CrLf,
            '\r' => Self::Cr,
            '\u{85}' => Self::NextLine,
            '\u{2028}' => Self::LineSeparator,
            '\u{2029}' => Self::ParagraphSeparator,
            _ => return None,
        };
        Some(kind)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One line of the buffer. `len` includes the terminating line break.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Line {
    pub start: TextSize,
    pub len: TextSize,
    pub line_break: Option<LineBreak>,
}

impl Line {
    pub fn end(&self) -> TextSize {
        self.start + self.len
    }

    pub fn line_break_len(&self) -> TextSize {
        self.line_break.map_or(TextSize::new(0), LineBreak::text_len)
    }

    /// Length without the line break.
    pub fn content_len(&self) -> TextSize {
        self.len - self.line_break_len()
    }
}

/// Zero-based line and byte column.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    lines: Vec<Line>,
    len: TextSize,
    break_counts: [usize; LineBreak::ALL.len()],
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut index = Self {
            lines: Vec::new(),
            len: text.text_len(),
            break_counts: [0; LineBreak::ALL.len()],
        };
        let lines = scan(text, TextSize::new(0), true);
        index.count(&lines, 1);
        index.lines = lines;
        index
    }

    /// Brings the index in line with `text`, the result of applying `change`.
    ///
    /// Only the lines touched by the change are rescanned; the ones after it
    /// are shifted by the net length delta.
    pub fn update(&mut self, change: &TextChange, text: &str) {
        let removed = change.removed_range();

        let mut first = self.line_of(removed.start());
        // A `\n` inserted right after a lone `\r` joins the two into one break.
        if first > 0
            && self.lines[first].start == removed.start()
            && self.lines[first - 1].line_break == Some(LineBreak::Cr)
        {
            first -= 1;
        }
        let last = self.line_of(removed.end()).max(first);

        let old_start = self.lines[first].start;
        let old_end = self.lines[last].end();
        let new_end = shift(old_end, change.delta());

        let reaches_end = last + 1 == self.lines.len();
        let segment = &text[usize::from(old_start)..usize::from(new_end)];
        let lines = scan(segment, old_start, reaches_end);

        let replaced = self.lines.splice(first..=last, lines.iter().copied()).collect::<Vec<_>>();
        self.count(&replaced, -1);
        self.count(&lines, 1);

        for line in &mut self.lines[first + lines.len()..] {
            line.start = shift(line.start, change.delta());
        }
        self.len = text.text_len();

        tracing::trace!(
            first,
            removed = replaced.len(),
            inserted = lines.len(),
            total = self.lines.len(),
            "line index updated"
        );
    }

    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }

    /// Number of lines; an empty buffer has one empty line.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: u32) -> Option<Line> {
        self.lines.get(line as usize).copied()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Index of the line containing `offset`; offsets past the end clamp to
    /// the last line.
    pub fn line_of(&self, offset: TextSize) -> usize {
        self.lines.partition_point(|line| line.start <= offset).saturating_sub(1)
    }

    pub fn location(&self, offset: TextSize) -> Option<Location> {
        if offset > self.len {
            return None;
        }
        let line = self.line_of(offset);
        let column = offset - self.lines[line].start;
        Some(Location::new(line as u32, column.into()))
    }

    pub fn offset(&self, location: Location) -> Option<TextSize> {
        let line = self.line(location.line)?;
        let column = TextSize::new(location.column);
        (column <= line.len).then_some(line.start + column)
    }

    /// The most frequent line break, if the buffer has any.
    pub fn line_break_style(&self) -> Option<LineBreak> {
        LineBreak::ALL
            .into_iter()
            .filter(|kind| self.break_counts[kind.slot()] > 0)
            .max_by_key(|kind| self.break_counts[kind.slot()])
    }

    pub fn has_mixed_line_breaks(&self) -> bool {
        self.break_counts.iter().filter(|&&count| count > 0).count() > 1
    }

    fn count(&mut self, lines: &[Line], sign: isize) {
        for kind in lines.iter().filter_map(|line| line.line_break) {
            let slot = &mut self.break_counts[kind.slot()];
            *slot = slot.wrapping_add_signed(sign);
        }
    }
}

fn shift(offset: TextSize, delta: i64) -> TextSize {
    TextSize::new((i64::from(u32::from(offset)) + delta) as u32)
}

/// Splits `segment` into lines whose offsets start at `base`.
///
/// A segment that ends with a line break gets a trailing empty line only when
/// it reaches the end of the buffer.
fn scan(segment: &str, base: TextSize, reaches_end: bool) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut chars = segment.char_indices();

    while let Some((offset, _)) = chars.next() {
        let Some(line_break) = LineBreak::at_start_of(&segment[offset..]) else {
            continue;
        };
        if line_break == LineBreak::CrLf {
            chars.next();
        }

        let end = offset + line_break.as_str().len();
        lines.push(Line {
            start: base + TextSize::new(line_start as u32),
            len: TextSize::new((end - line_start) as u32),
            line_break: Some(line_break),
        });
        line_start = end;
    }

    if line_start < segment.len() || reaches_end || lines.is_empty() {
        lines.push(Line {
            start: base + TextSize::new(line_start as u32),
            len: TextSize::new((segment.len() - line_start) as u32),
            line_break: None,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_size::TextRange;

    fn check_consistent(index: &LineIndex, text: &str) {
        assert_eq!(index, &LineIndex::new(text), "incremental index diverged for {text:?}");
        let lines = index.lines();
        assert_eq!(lines[0].start, TextSize::new(0));
        for pair in lines.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
        }
        assert_eq!(lines.last().unwrap().end(), text.text_len());
    }

    fn edit(text: &str, change: TextChange) -> String {
        let mut index = LineIndex::new(text);
        let mut text = text.to_owned();
        change.apply(&mut text).unwrap();
        index.update(&change, &text);
        check_consistent(&index, &text);
        text
    }

    #[test]
    fn splits_all_line_break_kinds() {
        let text = "a\nb\r\nc\rd\u{2028}e\u{85}f\u{2029}";
        let index = LineIndex::new(text);
        let breaks = index.lines().iter().map(|line| line.line_break).collect::<Vec<_>>();
        assert_eq!(
            breaks,
            vec![
                Some(LineBreak::Lf),
                Some(LineBreak::CrLf),
                Some(LineBreak::Cr),
                Some(LineBreak::LineSeparator),
                Some(LineBreak::NextLine),
                Some(LineBreak::ParagraphSeparator),
                None,
            ]
        );
        check_consistent(&index, text);
    }

    #[test]
    fn empty_text_has_one_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.location(0.into()), Some(Location::new(0, 0)));
        assert_eq!(index.line_break_style(), None);
    }

    #[test]
    fn location_round_trip() {
        let text = "first\r\nsecond\nthird\r\rfifth";
        let index = LineIndex::new(text);
        for offset in 0..=text.len() as u32 {
            let offset = TextSize::new(offset);
            let location = index.location(offset).unwrap();
            assert_eq!(index.offset(location), Some(offset), "at {location:?}");
        }
        assert_eq!(index.location(TextSize::new(text.len() as u32 + 1)), None);
        assert_eq!(index.offset(Location::new(9, 0)), None);
    }

    #[test]
    fn locations() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.location(1.into()), Some(Location::new(0, 1)));
        assert_eq!(index.location(3.into()), Some(Location::new(1, 0)));
        assert_eq!(index.location(6.into()), Some(Location::new(2, 0)));
        assert_eq!(index.offset(Location::new(1, 2)), Some(5.into()));
    }

    #[test]
    fn mixed_line_breaks_are_reported() {
        let index = LineIndex::new("one\ntwo\r\nthree\n");
        assert!(index.has_mixed_line_breaks());
        assert_eq!(index.line_break_style(), Some(LineBreak::Lf));
        assert_eq!(index.line_count(), 4);

        assert!(!LineIndex::new("one\ntwo\n").has_mixed_line_breaks());
    }

    #[test]
    fn incremental_updates_match_full_rebuild() {
        edit("abc", TextChange::insert(1.into(), "\n"));
        edit("a\nb\nc", TextChange::insert(5.into(), "\nd"));
        edit("a\nb\nc", TextChange::delete(TextRange::new(1.into(), 4.into())));
        edit("a\r\nb", TextChange::delete(TextRange::new(2.into(), 3.into())));
        edit("a\rb", TextChange::insert(2.into(), "\n"));
        edit("a\rXb", TextChange::delete(TextRange::new(2.into(), 3.into())));
        edit("a\n\nb", TextChange::insert(2.into(), "\r"));
        edit("x\ny\n", TextChange::replace(TextRange::new(0.into(), 4.into()), ""));
        edit("x\ny\n", TextChange::insert(4.into(), "tail"));
        edit("", TextChange::insert(0.into(), "\u{2028}\r\n"));
    }

    #[test]
    fn incremental_update_tracks_mixed_state() {
        let mut text = String::from("a\nb\n");
        let mut index = LineIndex::new(&text);
        assert!(!index.has_mixed_line_breaks());

        let change = TextChange::insert(1.into(), "\r");
        change.apply(&mut text).unwrap();
        index.update(&change, &text);
        assert!(index.has_mixed_line_breaks());

        let undo = TextChange::delete(TextRange::new(1.into(), 2.into()));
        undo.apply(&mut text).unwrap();
        index.update(&undo, &text);
        assert!(!index.has_mixed_line_breaks());
        check_consistent(&index, &text);
    }
}
