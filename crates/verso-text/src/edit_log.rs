use crate::TextChange;

/// Undo and redo stacks of inverse changes.
#[derive(Debug, Clone, Default)]
pub struct EditLog {
    undo: Vec<TextChange>,
    redo: Vec<TextChange>,
    limit: Option<usize>,
}

impl EditLog {
    pub fn new(limit: Option<usize>) -> Self {
        Self { undo: Vec::new(), redo: Vec::new(), limit }
    }

    /// Records the inverse of a fresh user edit. Clears the redo stack.
    pub fn record(&mut self, inverse: TextChange) {
        self.redo.clear();
        self.push_undo(inverse);
    }

    pub fn push_undo(&mut self, change: TextChange) {
        self.undo.push(change);
        if let Some(limit) = self.limit
            && self.undo.len() > limit
        {
            let excess = self.undo.len() - limit;
            self.undo.drain(..excess);
        }
    }

    pub fn push_redo(&mut self, change: TextChange) {
        self.redo.push(change);
    }

    pub fn pop_undo(&mut self) -> Option<TextChange> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<TextChange> {
        self.redo.pop()
    }

    pub fn peek_undo(&self) -> Option<&TextChange> {
        self.undo.last()
    }

    pub fn peek_redo(&self) -> Option<&TextChange> {
        self.redo.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_clears_redo() {
        let mut log = EditLog::default();
        log.record(TextChange::insert(0.into(), "a"));
        let change = log.pop_undo().unwrap();
        log.push_redo(change);
        assert!(log.can_redo());

        log.record(TextChange::insert(1.into(), "b"));
        assert!(!log.can_redo());
        assert!(log.can_undo());
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut log = EditLog::new(Some(2));
        for offset in 0..4u32 {
            log.record(TextChange::insert(offset.into(), "x"));
        }
        assert_eq!(log.pop_undo().map(|change| change.start()), Some(3.into()));
        assert_eq!(log.pop_undo().map(|change| change.start()), Some(2.into()));
        assert_eq!(log.pop_undo(), None);
    }
}
