//! Recency List Module
//!
//! Ordering structure for LRU tracking: an arena of slots linked by index.

// == Slot ==
/// One arena cell. `item` is `None` while the slot sits on the free list.
#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    /// Neighbour towards the front (more recently used)
    prev: Option<usize>,
    /// Neighbour towards the back (less recently used)
    next: Option<usize>,
}

// == Recency List ==
/// Doubly-linked list of items ordered by access time.
///
/// Items live in a `Vec` arena and are addressed by stable slot indices:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Push, touch and remove are O(1). Freed slots are recycled by later pushes,
/// so an index is only meaningful while its item is still in the list.
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` items before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as most recently used and returns its slot index.
    pub fn push_front(&mut self, item: T) -> usize {
        let slot = Slot {
            item: Some(item),
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Touch ==
    /// Marks a slot as recently used (moves it to the front).
    ///
    /// Indices of freed slots are ignored.
    pub fn touch(&mut self, idx: usize) {
        if !self.is_live(idx) || self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks a slot and returns its item, freeing the slot for reuse.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        if !self.is_live(idx) {
            return None;
        }
        self.unlink(idx);
        self.len -= 1;
        self.free.push(idx);
        self.slots[idx].item.take()
    }

    // == Accessors ==
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(|slot| slot.item.as_ref())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx).and_then(|slot| slot.item.as_mut())
    }

    /// Slot index of the most recently used item.
    pub fn newest(&self) -> Option<usize> {
        self.head
    }

    /// Slot index of the least recently used item.
    pub fn oldest(&self) -> Option<usize> {
        self.tail
    }

    /// The neighbour one step towards the front.
    pub fn newer(&self, idx: usize) -> Option<usize> {
        self.slots.get(idx).and_then(|slot| slot.prev)
    }

    /// The neighbour one step towards the back.
    pub fn older(&self, idx: usize) -> Option<usize> {
        self.slots.get(idx).and_then(|slot| slot.next)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates items from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Linking ==
    fn is_live(&self, idx: usize) -> bool {
        self.slots.get(idx).is_some_and(|slot| slot.item.is_some())
    }

    fn link_front(&mut self, idx: usize) {
        self.slots[idx].prev = None;
        self.slots[idx].next = self.head;
        match self.head {
            Some(old_head) => self.slots[old_head].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev.take();
        let next = self.slots[idx].next.take();

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        self.cursor = self.list.older(idx);
        self.list.get(idx)
    }
}
