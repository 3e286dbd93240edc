use std::ops::{Index, IndexMut};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
enum Entry<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<u32> },
}

/// Slot arena whose ids carry a generation, so an id whose node was removed
/// never resolves to a later occupant of the same slot.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    entries: Vec<Entry<T>>,
    free: Option<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), free: None, len: 0 }
    }
}

impl<T> Arena<T> {
    pub(crate) fn alloc(&mut self, value: T) -> NodeId {
        self.len += 1;

        if let Some(index) = self.free {
            let entry = &mut self.entries[index as usize];
            let Entry::Vacant { generation, next_free } = *entry else {
                unreachable!("free list points at an occupied slot");
            };
            let generation = generation + 1;
            self.free = next_free;
            *entry = Entry::Occupied { generation, value };
            return NodeId { index, generation };
        }

        let index = self.entries.len() as u32;
        self.entries.push(Entry::Occupied { generation: 0, value });
        NodeId { index, generation: 0 }
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        let entry = self.entries.get_mut(id.index as usize)?;
        match entry {
            Entry::Occupied { generation, .. } if *generation == id.generation => {
                let vacant = Entry::Vacant { generation: id.generation, next_free: self.free };
                let Entry::Occupied { value, .. } = std::mem::replace(entry, vacant) else {
                    unreachable!();
                };
                self.free = Some(id.index);
                self.len -= 1;
                Some(value)
            }
            _ => None,
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        match self.entries.get(id.index as usize)? {
            Entry::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.entries.get_mut(id.index as usize)? {
            Entry::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(value) => value,
            None => panic!("stale node id {id:?}"),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("stale node id {id:?}"),
        }
    }
}
