//! Index-addressable sequence that grows on demand
//!
//! Step scripts name symbols, productions and states in whatever order the
//! analysis tool discovers them. [`GrowingContainer`] lets a command address
//! index `i` before `0..i` exist: reading or writing past the end first pads
//! the sequence with freshly constructed default elements.

use std::fmt;

/// A `Vec` that extends itself with factory-built elements when an index
/// past its end is read or written.
#[derive(Clone)]
pub struct GrowingContainer<T> {
    items: Vec<T>,
    factory: fn() -> T,
}

impl<T> GrowingContainer<T> {
    /// Create an empty container whose padding elements come from `factory`.
    pub fn new(factory: fn() -> T) -> Self {
        GrowingContainer {
            items: Vec::new(),
            factory,
        }
    }

    /// Create an empty container with room for `capacity` elements.
    pub fn with_capacity(factory: fn() -> T, capacity: usize) -> Self {
        GrowingContainer {
            items: Vec::with_capacity(capacity),
            factory,
        }
    }

    /// Pad the container so that `index` is addressable.
    fn grow_to(&mut self, index: usize) {
        if index >= self.items.len() {
            let missing = index + 1 - self.items.len();
            self.items.reserve(missing);
            for _ in 0..missing {
                self.items.push((self.factory)());
            }
        }
    }

    /// Read the element at `index`, growing the container first if needed.
    pub fn get(&mut self, index: usize) -> &T {
        self.grow_to(index);
        &self.items[index]
    }

    /// Mutable access to the element at `index`, growing the container first if needed.
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        self.grow_to(index);
        &mut self.items[index]
    }

    /// Overwrite the element at `index`, growing the container first if needed.
    pub fn set(&mut self, index: usize, value: T) {
        self.grow_to(index);
        self.items[index] = value;
    }

    /// Append an element and return its index.
    pub fn push(&mut self, value: T) -> usize {
        self.items.push(value);
        self.items.len() - 1
    }

    /// Read without growing. Renderers use this so that drawing never
    /// changes the model.
    pub fn peek(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Default> Default for GrowingContainer<T> {
    fn default() -> Self {
        Self::new(T::default)
    }
}

// Only the elements take part in equality; two containers with different
// factories but the same contents are the same model state.
impl<T: PartialEq> PartialEq for GrowingContainer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowingContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<'a, T> IntoIterator for &'a GrowingContainer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_past_end_pads_with_defaults() {
        let mut c: GrowingContainer<i32> = GrowingContainer::default();
        assert_eq!(*c.get(3), 0);
        assert_eq!(c.len(), 4);
        assert!(c.iter().all(|v| *v == 0));
    }

    #[test]
    fn test_set_out_of_order() {
        let mut c = GrowingContainer::new(|| String::from("new"));
        c.set(5, "five".to_string());
        c.set(1, "one".to_string());

        assert_eq!(c.len(), 6);
        assert_eq!(c.peek(5).map(String::as_str), Some("five"));
        assert_eq!(c.peek(1).map(String::as_str), Some("one"));
        assert_eq!(c.peek(0).map(String::as_str), Some("new"));
        assert_eq!(c.peek(4).map(String::as_str), Some("new"));
    }

    #[test]
    fn test_length_is_max_index_plus_one() {
        // Mixed gets and sets in an arbitrary order
        let ops: [(bool, usize); 9] = [
            (false, 2),
            (true, 7),
            (false, 0),
            (true, 3),
            (false, 11),
            (true, 4),
            (false, 6),
            (true, 11),
            (false, 1),
        ];
        let mut c: GrowingContainer<u32> = GrowingContainer::default();
        let mut max = 0;
        let mut written = Vec::new();
        for (is_set, index) in ops {
            if is_set {
                c.set(index, index as u32 + 100);
                written.push(index);
            } else {
                c.get(index);
            }
            max = max.max(index);
            assert_eq!(c.len(), max + 1);
        }

        for (i, value) in c.iter().enumerate() {
            if written.contains(&i) {
                assert_eq!(*value, i as u32 + 100);
            } else {
                assert_eq!(*value, 0, "index {} was never set", i);
            }
        }
    }

    #[test]
    fn test_peek_does_not_grow() {
        let c: GrowingContainer<u8> = GrowingContainer::default();
        assert!(c.peek(10).is_none());
        assert!(c.is_empty());
    }

    #[test]
    fn test_equality_ignores_factory() {
        let mut a = GrowingContainer::new(|| 1);
        let mut b = GrowingContainer::new(|| 2);
        a.set(0, 5);
        b.set(0, 5);
        assert_eq!(a, b);
    }
}
