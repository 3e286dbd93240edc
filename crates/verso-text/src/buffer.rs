use crossbeam_channel::Receiver;
use text_size::TextSize;

use crate::clients::Clients;
use crate::{ClientId, EditLog, Encoding, LineIndex, TextChange, TextError};

/// The current text snapshot together with its line index, edit history and
/// registered clients.
#[derive(Debug)]
pub struct TextBuffer {
    text: String,
    saved: String,
    encoding: Encoding,
    line_index: LineIndex,
    log: EditLog,
    clients: Clients,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>, encoding: Encoding, undo_limit: Option<usize>) -> Self {
        let text = text.into();
        Self {
            line_index: LineIndex::new(&text),
            saved: text.clone(),
            text,
            encoding,
            log: EditLog::new(undo_limit),
            clients: Clients::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> TextSize {
        self.line_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn log(&self) -> &EditLog {
        &self.log
    }

    /// Splices `change` into the text and updates the line index. No history,
    /// no notifications.
    pub fn apply(&mut self, change: &TextChange) -> Result<(), TextError> {
        change.apply(&mut self.text)?;
        self.line_index.update(change, &self.text);
        Ok(())
    }

    /// Applies a user edit: records its inverse, clears redo, notifies clients.
    pub fn apply_edit(&mut self, change: TextChange) -> Result<(), TextError> {
        let inverse = change.inverse(&self.text)?;
        self.apply(&change)?;
        self.log.record(inverse);
        self.clients.broadcast(&change);
        Ok(())
    }

    pub fn peek_undo(&self) -> Option<&TextChange> {
        self.log.peek_undo()
    }

    pub fn peek_redo(&self) -> Option<&TextChange> {
        self.log.peek_redo()
    }

    /// Reverts the most recent edit and returns the change that was applied.
    pub fn undo(&mut self) -> Result<Option<TextChange>, TextError> {
        let Some(change) = self.log.pop_undo() else {
            return Ok(None);
        };
        match self.replay(&change) {
            Ok(inverse) => {
                self.log.push_redo(inverse);
                Ok(Some(change))
            }
            Err(error) => {
                self.log.push_undo(change);
                Err(error)
            }
        }
    }

    /// Re-applies the most recently undone edit and returns the applied change.
    pub fn redo(&mut self) -> Result<Option<TextChange>, TextError> {
        let Some(change) = self.log.pop_redo() else {
            return Ok(None);
        };
        match self.replay(&change) {
            Ok(inverse) => {
                self.log.push_undo(inverse);
                Ok(Some(change))
            }
            Err(error) => {
                self.log.push_redo(change);
                Err(error)
            }
        }
    }

    fn replay(&mut self, change: &TextChange) -> Result<TextChange, TextError> {
        let inverse = change.inverse(&self.text)?;
        self.apply(change)?;
        self.clients.broadcast(change);
        Ok(inverse)
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved.clone_from(&self.text);
    }

    pub fn register_client(&mut self) -> ClientId {
        let id = self.clients.register();
        tracing::debug!(client = id.index(), registered = self.clients.len(), "client registered");
        id
    }

    pub fn unregister_client(&mut self, id: ClientId) -> bool {
        self.clients.unregister(id)
    }

    /// Drains the changes queued for `id` since its last call.
    pub fn try_get_state(&self, id: ClientId) -> Option<Vec<TextChange>> {
        self.clients.drain(id)
    }

    /// The receiving end of `id`'s queue, for consumers that drain on their
    /// own thread.
    pub fn client_receiver(&self, id: ClientId) -> Option<Receiver<TextChange>> {
        self.clients.receiver(id)
    }
}
