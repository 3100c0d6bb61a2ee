//! Size-capped lists that remember their true length.

/// First `max` items of an ordered sequence plus the sequence's full length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounded<T> {
    items: Vec<T>,
    total: usize,
}

impl<T> Bounded<T> {
    /// Caps an already ordered list at `max` items.
    pub fn new(mut items: Vec<T>, max: usize) -> Self {
        let total = items.len();
        items.truncate(max);
        Self { items, total }
    }

    /// Sorts `items` with `compare`, then caps the result.
    ///
    /// The cap is applied after sorting, so the kept items are the true
    /// first `max` of the full ordering.
    pub fn sorted_by<F>(mut items: Vec<T>, max: usize, compare: F) -> Self
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        items.sort_by(compare);
        Self::new(items, max)
    }

    /// Kept items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Length of the sequence before capping.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether items were dropped by the cap.
    pub fn is_truncated(&self) -> bool {
        self.total > self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transforms kept items, preserving the total.
    pub fn map<U, F>(self, f: F) -> Bounded<U>
    where
        F: FnMut(T) -> U,
    {
        Bounded {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Fallible [`Bounded::map`]; stops at the first error.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Bounded<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(Bounded {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
        })
    }
}
