use crossbeam_channel::{Receiver, Sender};
use rustc_hash::FxHashMap;

use crate::TextChange;

/// Handle of a consumer registered for a document's edit stream.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClientId(u32);

impl ClientId {
    pub fn index(self) -> u32 {
        self.0
    }
}

struct Queue {
    sender: Sender<TextChange>,
    receiver: Receiver<TextChange>,
}

/// Per-client queues of applied changes.
///
/// Writers never block on a consumer: every client owns an unbounded channel
/// and drains it whenever it likes.
#[derive(Default)]
pub(crate) struct Clients {
    next_id: u32,
    queues: FxHashMap<ClientId, Queue>,
}

impl Clients {
    pub(crate) fn register(&mut self) -> ClientId {
        let id = ClientId(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = crossbeam_channel::unbounded();
        self.queues.insert(id, Queue { sender, receiver });
        id
    }

    pub(crate) fn unregister(&mut self, id: ClientId) -> bool {
        self.queues.remove(&id).is_some()
    }

    pub(crate) fn receiver(&self, id: ClientId) -> Option<Receiver<TextChange>> {
        self.queues.get(&id).map(|queue| queue.receiver.clone())
    }

    pub(crate) fn broadcast(&self, change: &TextChange) {
        for queue in self.queues.values() {
            // We hold a receiver for every queue, so the channel never disconnects.
            let _ = queue.sender.send(change.clone());
        }
    }

    /// Drains the pending changes of `id`; `None` when the client is unknown
    /// or has nothing pending.
    pub(crate) fn drain(&self, id: ClientId) -> Option<Vec<TextChange>> {
        let queue = self.queues.get(&id)?;
        let changes = queue.receiver.try_iter().collect::<Vec<_>>();
        (!changes.is_empty()).then_some(changes)
    }

    pub(crate) fn len(&self) -> usize {
        self.queues.len()
    }
}

impl std::fmt::Debug for Clients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clients").field("registered", &self.queues.len()).finish()
    }
}
