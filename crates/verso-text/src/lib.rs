//! Text snapshot, line bookkeeping and edit history for a single document.
//!
//! Offsets are UTF-8 byte offsets expressed as [`TextSize`]; spans are
//! half-open [`TextRange`]s.

mod buffer;
mod change;
mod clients;
mod edit_log;
mod encoding;
mod line_index;

pub use buffer::TextBuffer;
pub use change::TextChange;
pub use clients::ClientId;
pub use crossbeam_channel::Receiver;
pub use edit_log::EditLog;
pub use encoding::{Encoding, EncodingError};
pub use line_index::{Line, LineBreak, LineIndex, Location};
pub use text_size::{TextLen, TextRange, TextSize};

/// Errors raised when an edit does not fit the current text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("edit range {range:?} is out of bounds for text of length {len:?}")]
    OutOfBounds { range: TextRange, len: TextSize },
    #[error("offset {offset:?} is not on a character boundary")]
    NotCharBoundary { offset: TextSize },
}
