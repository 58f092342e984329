//! Fixed-capacity ordered collections.
//!
//! The beam and the result set keep the best elements seen so far. "Best"
//! is the element's `Ord`: greater is better.

use std::collections::BTreeSet;

use parking_lot::Mutex;

/// Ordered collection holding at most `capacity` elements.
///
/// Adding to a full collection evicts the current worst element, or rejects
/// the new one when it is not better than that worst element.
#[derive(Debug, Clone)]
pub struct BoundedPriorityCollection<T: Ord> {
    items: BTreeSet<T>,
    capacity: usize,
}

impl<T: Ord> BoundedPriorityCollection<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: BTreeSet::new(),
            capacity,
        }
    }

    /// Adds an element; returns whether it was retained.
    pub fn add(&mut self, item: T) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.items.len() >= self.capacity {
            if let Some(worst) = self.items.first() {
                if item <= *worst {
                    return false;
                }
            }
        }
        if !self.items.insert(item) {
            return false;
        }
        if self.items.len() > self.capacity {
            self.items.pop_first();
        }
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// The element that would be evicted next.
    pub fn worst(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn best(&self) -> Option<&T> {
        self.items.last()
    }

    /// Elements, best first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().rev()
    }

    /// Consumes the collection into a best-first vector.
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.items.into_iter().rev().collect()
    }
}

/// A [`BoundedPriorityCollection`] shared between worker threads.
///
/// Each `add` holds the lock for that single insert-and-evict step.
#[derive(Debug)]
pub struct SharedCollection<T: Ord> {
    inner: Mutex<BoundedPriorityCollection<T>>,
}

impl<T: Ord> SharedCollection<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(BoundedPriorityCollection::new(capacity)),
        }
    }

    pub fn add(&self, item: T) -> bool {
        self.inner.lock().add(item)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn into_inner(self) -> BoundedPriorityCollection<T> {
        self.inner.into_inner()
    }

    pub fn into_sorted_vec(self) -> Vec<T> {
        self.into_inner().into_sorted_vec()
    }
}

impl<T: Ord + Clone> SharedCollection<T> {
    /// Best-first copy of the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().iter().cloned().collect()
    }
}
