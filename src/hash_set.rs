use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::Index;

use crate::DefaultHashBuilder;
use crate::hash_table::Cursor;
use crate::hash_table::Entry;
use crate::hash_table::FixedHashTable;
use crate::hash_table::Slot;
use crate::key_equal::DefaultKeyEqual;
use crate::key_equal::KeyEqual;

/// A hash set with a fixed, compile-time capacity, implemented on top of
/// [`FixedHashTable`].
///
/// `FixedHashSet<T, N, S, E>` stores up to `N` values of type `T` inline,
/// hashes them with the hasher builder `S` and compares them with the equality
/// strategy `E`. It never allocates and never grows: inserting into a full set
/// panics.
///
/// `N` must be a non-zero power of two. This is checked at compile time.
///
/// Positions are exposed as [`Slot`]s so callers can walk the set and erase
/// while walking:
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use probe_set::FixedHashSet;
///
/// let mut set: FixedHashSet<u32, 16> = (0..10).collect();
///
/// let mut slot = set.begin();
/// while !set.is_end(slot) {
///     if set[slot] % 2 == 0 {
///         slot = set.erase(slot);
///     } else {
///         slot = set.next_slot(slot);
///     }
/// }
/// assert_eq!(set.len(), 5);
/// # }
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: 1 byte per slot overhead, plus `N` times the size of `T`.
pub struct FixedHashSet<T, const N: usize, S = DefaultHashBuilder, E = DefaultKeyEqual> {
    table: FixedHashTable<T, N>,
    hash_builder: S,
    key_equal: E,
}

impl<T, const N: usize, S, E> Clone for FixedHashSet<T, N, S, E>
where
    T: Clone,
    S: Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hash_builder: self.hash_builder.clone(),
            key_equal: self.key_equal.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.hash_builder = source.hash_builder.clone();
        self.key_equal = source.key_equal.clone();
        self.table.clone_from(&source.table);
    }
}

impl<T, const N: usize, S, E> PartialEq for FixedHashSet<T, N, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEqual<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, const N: usize, S, E> Eq for FixedHashSet<T, N, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEqual<T>,
{
}

impl<T, const N: usize, S, E> Debug for FixedHashSet<T, N, S, E>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, const N: usize, S, E> FixedHashSet<T, N, S, E> {
    /// Creates an empty set with the given hasher builder and equality
    /// strategy.
    pub const fn with_hasher_and_key_equal(hash_builder: S, key_equal: E) -> Self {
        Self {
            table: FixedHashTable::new(),
            hash_builder,
            key_equal,
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let mut set: FixedHashSet<i32, 8> = FixedHashSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns `true` if the set holds `N` elements.
    pub const fn is_full(&self) -> bool {
        self.table.is_full()
    }

    /// Returns the fixed capacity of the set, `N`.
    pub const fn max_size(&self) -> usize {
        N
    }

    /// Returns the number of elements the set can hold. Same as
    /// [`max_size`](Self::max_size).
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns how many more elements fit in the set.
    pub const fn available(&self) -> usize {
        self.table.available()
    }

    /// Returns a reference to the set's hasher builder.
    pub const fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns a reference to the set's equality strategy.
    pub const fn key_equal(&self) -> &E {
        &self.key_equal
    }

    /// Returns the slot of the first element, or the end slot when empty.
    pub const fn begin(&self) -> Slot {
        self.table.begin()
    }

    /// Returns the one-past-the-end slot.
    pub const fn end(&self) -> Slot {
        self.table.end()
    }

    /// Returns `true` if `slot` is the end position.
    pub const fn is_end(&self, slot: Slot) -> bool {
        self.table.is_end(slot)
    }

    /// Returns the slot of the next element after `slot`, or the end slot.
    pub fn next_slot(&self, slot: Slot) -> Slot {
        self.table.next_slot(slot)
    }

    /// Returns the slot of the element before `slot`.
    ///
    /// # Panics
    ///
    /// Panics if no element precedes `slot`.
    pub fn prev_slot(&self, slot: Slot) -> Slot {
        self.table.prev_slot(slot)
    }

    /// Returns the element stored at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` does not hold an element.
    pub fn get(&self, slot: Slot) -> &T {
        self.table.get(slot)
    }

    /// Returns a borrowing cursor positioned at `slot`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let mut set: FixedHashSet<u8, 4> = FixedHashSet::new();
    /// set.insert(3);
    ///
    /// let mut cursor = set.cursor(set.begin());
    /// assert_eq!(cursor.get(), &3);
    /// cursor.move_next();
    /// assert!(cursor.is_end());
    /// # }
    /// ```
    pub fn cursor(&self, slot: Slot) -> Cursor<'_, T, N> {
        self.table.cursor(slot)
    }

    /// Returns an iterator over the elements, in slot order.
    pub fn iter(&self) -> Iter<'_, T, N> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes all elements from the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let mut set: FixedHashSet<i32, 8> = FixedHashSet::new();
    /// set.insert(1);
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.available(), set.max_size());
    /// # }
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator that removes and yields all elements.
    ///
    /// The set is empty as soon as `drain()` returns. Calling `mem::forget` on
    /// the returned iterator leaks the values it has not yielded yet, but the
    /// set stays empty and usable.
    pub fn drain(&mut self) -> Drain<'_, T, N> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T, const N: usize, S, E> FixedHashSet<T, N, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEqual<T>,
{
    /// Creates an empty set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_set::FixedHashSet;
    ///
    /// let set: FixedHashSet<i32, 32, _> = FixedHashSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self
    where
        E: Default,
    {
        Self::with_hasher_and_key_equal(hash_builder, E::default())
    }

    /// Returns `true` if the set contains a value equal to `key`.
    pub fn contains(&self, key: &T) -> bool {
        if self.is_empty() {
            return false;
        }

        self.contains_hash(self.hash_builder.hash_one(key), key)
    }

    /// Like [`contains`](Self::contains), with a precomputed hash.
    pub fn contains_hash(&self, hash: u64, key: &T) -> bool {
        !self.is_end(self.find_hash(hash, key))
    }

    /// Returns `1` if the set contains `key`, `0` otherwise.
    pub fn count(&self, key: &T) -> usize {
        usize::from(self.contains(key))
    }

    /// Like [`count`](Self::count), with a precomputed hash.
    pub fn count_hash(&self, hash: u64, key: &T) -> usize {
        usize::from(self.contains_hash(hash, key))
    }

    /// Returns the slot holding a value equal to `key`, or the end slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let mut set: FixedHashSet<&str, 8> = FixedHashSet::new();
    /// set.insert("sprite");
    ///
    /// let slot = set.find(&"sprite");
    /// assert_eq!(set[slot], "sprite");
    /// assert!(set.is_end(set.find(&"bg")));
    /// # }
    /// ```
    pub fn find(&self, key: &T) -> Slot {
        if self.is_empty() {
            return self.end();
        }

        self.find_hash(self.hash_builder.hash_one(key), key)
    }

    /// Like [`find`](Self::find), with a precomputed hash.
    ///
    /// `hash` must be what the set's hasher builder produces for `key`.
    pub fn find_hash(&self, hash: u64, key: &T) -> Slot {
        let key_equal = &self.key_equal;
        self.table.find(hash, |v| key_equal.equal(key, v))
    }

    /// Adds a value to the set.
    ///
    /// Returns the slot the value was stored in. If the set already contained
    /// an equal value, nothing changes, `value` is dropped and the end slot is
    /// returned.
    ///
    /// # Panics
    ///
    /// Panics if the set is full.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let mut set: FixedHashSet<i32, 8> = FixedHashSet::new();
    /// let slot = set.insert(37);
    /// assert_eq!(set[slot], 37);
    /// let duplicate = set.insert(37);
    /// assert!(set.is_end(duplicate));
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> Slot {
        let hash = self.hash_builder.hash_one(&value);
        self.insert_hash(hash, value)
    }

    /// Like [`insert`](Self::insert), with a precomputed hash.
    ///
    /// `hash` must be what the set's hasher builder produces for `value`.
    pub fn insert_hash(&mut self, hash: u64, value: T) -> Slot {
        assert!(!self.is_full(), "hash set is full");

        let end = self.end();
        let key_equal = &self.key_equal;
        match self.table.entry(hash, |v| key_equal.equal(&value, v)) {
            Entry::Occupied(_) => end,
            Entry::Vacant(entry) => entry.insert(value),
        }
    }

    /// Adds a value to the set, replacing the stored value, if any, that is
    /// equal to it. A replaced value keeps its slot.
    ///
    /// Returns the slot holding `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not present and the set is full.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let mut set: FixedHashSet<i32, 8> = FixedHashSet::new();
    /// let first = set.insert_or_assign(1);
    /// let again = set.insert_or_assign(1);
    /// assert_eq!(first, again);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert_or_assign(&mut self, value: T) -> Slot {
        let hash = self.hash_builder.hash_one(&value);
        self.insert_or_assign_hash(hash, value)
    }

    /// Like [`insert_or_assign`](Self::insert_or_assign), with a precomputed
    /// hash.
    pub fn insert_or_assign_hash(&mut self, hash: u64, value: T) -> Slot {
        let key_equal = &self.key_equal;
        match self.table.entry(hash, |v| key_equal.equal(&value, v)) {
            Entry::Occupied(mut entry) => {
                drop(entry.replace(value));
                entry.slot()
            }
            Entry::Vacant(entry) => entry.insert(value),
        }
    }

    /// Removes the element at `slot`.
    ///
    /// Returns the slot of the next element at or after the erased position,
    /// so erasing while walking forward visits every remaining element. Other
    /// slots obtained before the call may no longer be valid.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty or `slot` does not hold an element.
    pub fn erase(&mut self, slot: Slot) -> Slot {
        self.table.erase(slot, |v| self.hash_builder.hash_one(v))
    }

    /// Removes a value from the set. Returns whether the value was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let mut set: FixedHashSet<i32, 8> = FixedHashSet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// # }
    /// ```
    pub fn remove(&mut self, key: &T) -> bool {
        if self.is_empty() {
            return false;
        }

        self.remove_hash(self.hash_builder.hash_one(key), key)
    }

    /// Like [`remove`](Self::remove), with a precomputed hash.
    pub fn remove_hash(&mut self, hash: u64, key: &T) -> bool {
        let slot = self.find_hash(hash, key);
        if self.is_end(slot) {
            return false;
        }

        self.erase(slot);
        true
    }

    /// Removes and returns the value in the set, if any, that is equal to
    /// `key`.
    pub fn take(&mut self, key: &T) -> Option<T> {
        let slot = self.find(key);
        if self.is_end(slot) {
            return None;
        }

        Some(
            self.table
                .take(slot, |v| self.hash_builder.hash_one(v))
                .0,
        )
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// Elements are visited in slot order. When erasing pulls a value from
    /// the start of the arena across the wraparound boundary, that value is
    /// visited again, so `f` should be a pure function of the element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let mut set: FixedHashSet<i32, 8> = (1..=4).collect();
    /// set.retain(|&x| x % 2 == 0);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains(&2));
    /// assert!(set.contains(&4));
    /// # }
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        let mut slot = self.begin();
        while !self.is_end(slot) {
            if f(self.table.get(slot)) {
                slot = self.next_slot(slot);
            } else {
                slot = self.erase(slot);
            }
        }
    }

    /// Returns `true` if the set contains no elements in common with `other`.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if every element of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        if self.len() > other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }

    /// Compares two sets slot by slot: same size, same valid range, same
    /// occupancy pattern, and equal elements at every occupied index.
    ///
    /// `==` compares contents regardless of placement; this is the narrower
    /// positional comparison.
    pub fn layout_eq(&self, other: &Self) -> bool {
        let key_equal = &self.key_equal;
        self.table
            .layout_eq(&other.table, |a, b| key_equal.equal(a, b))
    }

    /// Returns how many elements sit at each probe distance from their home
    /// slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> [usize; N] {
        self.table
            .probe_histogram(|v| self.hash_builder.hash_one(v))
    }

    /// Returns utilization and probe-length statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats(|v| self.hash_builder.hash_one(v))
    }

    /// Pretty-prints the probe-length histogram horizontally using stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_probe_histogram(&self) {
        self.table
            .print_probe_histogram(|v| self.hash_builder.hash_one(v));
    }
}

impl<T, const N: usize, S, E> FixedHashSet<T, N, S, E>
where
    T: Hash,
    S: BuildHasher + Default,
    E: KeyEqual<T> + Default,
{
    /// Creates a new set using the default hasher builder and equality
    /// strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_set::FixedHashSet;
    ///
    /// let set: FixedHashSet<i32, 64> = FixedHashSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.max_size(), 64);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher_and_key_equal(S::default(), E::default())
    }
}

impl<T, const N: usize, S, E> Default for FixedHashSet<T, N, S, E>
where
    T: Hash,
    S: BuildHasher + Default,
    E: KeyEqual<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, S, E> Index<Slot> for FixedHashSet<T, N, S, E> {
    type Output = T;

    fn index(&self, slot: Slot) -> &T {
        self.table.get(slot)
    }
}

/// An iterator over the values of a `FixedHashSet`, in slot order.
pub struct Iter<'a, T, const N: usize> {
    inner: crate::hash_table::Iter<'a, T, N>,
}

impl<T, const N: usize> Clone for Iter<'_, T, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T, const N: usize> Iterator for Iter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, const N: usize> DoubleEndedIterator for Iter<'_, T, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T, const N: usize> ExactSizeIterator for Iter<'_, T, N> {}

impl<T, const N: usize> core::iter::FusedIterator for Iter<'_, T, N> {}

/// A draining iterator over the values of a `FixedHashSet`.
pub struct Drain<'a, T, const N: usize> {
    inner: crate::hash_table::Drain<'a, T, N>,
}

impl<T, const N: usize> Iterator for Drain<'_, T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A consuming iterator over the values of a `FixedHashSet`.
pub struct IntoIter<T, const N: usize> {
    inner: crate::hash_table::IntoIter<T, N>,
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, const N: usize, S, E> IntoIterator for FixedHashSet<T, N, S, E> {
    type IntoIter = IntoIter<T, N>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, const N: usize, S, E> IntoIterator for &'a FixedHashSet<T, N, S, E> {
    type IntoIter = Iter<'a, T, N>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, const N: usize, S, E> FromIterator<T> for FixedHashSet<T, N, S, E>
where
    T: Hash,
    S: BuildHasher + Default,
    E: KeyEqual<T> + Default,
{
    /// # Panics
    ///
    /// Panics if the iterator yields more than `N` distinct values.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, const N: usize, S, E> Extend<T> for FixedHashSet<T, N, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEqual<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let hash = self.hash_builder.hash_one(&value);
            if !self.contains_hash(hash, &value) {
                self.insert_hash(hash, value);
            }
        }
    }
}
