//! Chunked slab allocator that hands out copyable handles instead of references.
//!
//! The red black tree stores its nodes here so that a child can point back at its parent without
//! the two links fighting over ownership.

use std::mem;
use std::ops::{Index, IndexMut};

/// A handle to a value stored in a `TypedArena<T>`.
///
/// Handles are plain coordinates: they stay valid until the value is freed, after which the slot
/// may be reused by a later allocation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// A slab of values of a single type, grown one fixed-size chunk at a time.
///
/// Freed slots are threaded onto a free list and reused before any new slot is appended, so a
/// tree that inserts and removes at a steady rate does not keep growing. Chunks are never
/// reallocated once created.
///
/// # Examples
///
/// ```
/// use balanced_trees::arena::TypedArena;
///
/// let mut arena = TypedArena::new(16);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    free_head: Option<Handle>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>` holding `chunk_size` values per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert!(arena.is_empty());
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a positive chunk size.");
        TypedArena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    fn slot(&self, handle: &Handle) -> Option<&Slot<T>> {
        self.chunks
            .get(handle.chunk_index)
            .and_then(|chunk| chunk.get(handle.block_index))
    }

    fn slot_mut(&mut self, handle: &Handle) -> Option<&mut Slot<T>> {
        self.chunks
            .get_mut(handle.chunk_index)
            .and_then(|chunk| chunk.get_mut(handle.block_index))
    }

    /// Stores `value` in the arena and returns its handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate("a");
    /// assert_eq!(arena.get(&x), Some(&"a"));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;

        if let Some(handle) = self.free_head.take() {
            let slot = &mut self.chunks[handle.chunk_index][handle.block_index];
            match mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => panic!("Expected the free list to point at a vacant slot."),
            }
            return handle;
        }

        if self.len > self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        chunk.push(Slot::Occupied(value));
        Handle {
            chunk_index,
            block_index: chunk.len() - 1,
        }
    }

    /// Removes the value behind `handle` from the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(7);
    /// assert_eq!(arena.free(&x), 7);
    /// assert_eq!(arena.get(&x), None);
    /// ```
    pub fn free(&mut self, handle: &Handle) -> T {
        let next = self.free_head;
        let slot = match self.slot_mut(handle) {
            Some(slot) => slot,
            None => panic!("Error: attempting to free an invalid slot."),
        };
        if let Slot::Vacant(_) = slot {
            panic!("Error: attempting to free a vacant slot.");
        }

        match mem::replace(slot, Slot::Vacant(next)) {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.free_head = Some(*handle);
                value
            },
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns a reference to the value behind `handle`, or `None` if the slot is invalid or
    /// vacant.
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        match self.slot(handle) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value behind `handle`, or `None` if the slot is invalid
    /// or vacant.
    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        match self.slot_mut(handle) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of values currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every stored value and releases all chunks. Every outstanding handle is invalidated.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.free_head = None;
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle does not refer to a live value.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle does not refer to a live value.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, TypedArena};

    fn handle(chunk_index: usize, block_index: usize) -> Handle {
        Handle { chunk_index, block_index }
    }

    #[test]
    #[should_panic]
    fn test_zero_chunk_size() {
        let _: TypedArena<u32> = TypedArena::new(0);
    }

    #[test]
    #[should_panic]
    fn test_free_invalid_slot() {
        let mut arena: TypedArena<u32> = TypedArena::new(4);
        arena.free(&handle(0, 0));
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new(4);
        let x = arena.allocate(0);
        arena.free(&x);
        arena.free(&x);
    }

    #[test]
    fn test_allocate_fills_chunks_in_order() {
        let mut arena = TypedArena::new(2);
        assert_eq!(arena.allocate(0), handle(0, 0));
        assert_eq!(arena.allocate(1), handle(0, 1));
        assert_eq!(arena.allocate(2), handle(1, 0));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_slot_is_reused_first() {
        let mut arena = TypedArena::new(2);
        let a = arena.allocate(0);
        let b = arena.allocate(1);
        arena.allocate(2);

        arena.free(&a);
        arena.free(&b);

        // last freed, first reused
        assert_eq!(arena.allocate(3), b);
        assert_eq!(arena.allocate(4), a);
        assert_eq!(arena.allocate(5), handle(1, 1));
        assert_eq!(arena[b], 3);
        assert_eq!(arena[a], 4);
    }

    #[test]
    fn test_get_vacant_and_invalid() {
        let mut arena = TypedArena::new(4);
        let x = arena.allocate(0);
        assert_eq!(arena.get(&handle(0, 1)), None);
        assert_eq!(arena.get(&handle(3, 0)), None);
        arena.free(&x);
        assert_eq!(arena.get(&x), None);
        assert_eq!(arena.get_mut(&x), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new(4);
        let x = arena.allocate(0);
        if let Some(value) = arena.get_mut(&x) {
            *value = 9;
        }
        assert_eq!(arena.get(&x), Some(&9));
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new(2);
        let x = arena.allocate(0);
        arena.allocate(1);
        arena.allocate(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(&x), None);
        assert_eq!(arena.allocate(7), handle(0, 0));
    }
}
