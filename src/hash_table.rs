use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem::MaybeUninit;

/// Debug statistics for fixed table analysis.
///
/// Only compiled with the `stats` feature (or under `cfg(test)`).
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of slots in the arena
    pub capacity: usize,
    /// Lowest index that may hold a value (`capacity` when empty)
    pub first_valid_index: usize,
    /// Highest index that may hold a value (`0` when empty)
    pub last_valid_index: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance between a value's home slot and its actual slot
    pub max_probe_length: usize,
    /// Average distance between a value's home slot and its actual slot
    pub mean_probe_length: f64,
    /// Total inline bytes used by the table
    pub total_bytes: usize,
    /// Bytes of value storage held by empty slots
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Fixed Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Valid range: [{}, {}]",
            self.first_valid_index, self.last_valid_index
        );
        println!(
            "Probe length: max {} / mean {:.2}",
            self.max_probe_length, self.mean_probe_length
        );
        println!("Total inline: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes idle ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// A position inside a [`FixedHashTable`].
///
/// Slots are plain indices and do not borrow the table, so they survive
/// mutation. Any slot obtained before an erase may be stale afterwards (the
/// backward shift relocates values between slots), except the one returned by
/// the erase itself. The end position has `index() == max_size()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    index: usize,
}

impl Slot {
    #[inline(always)]
    const fn new(index: usize) -> Self {
        Self { index }
    }

    /// Returns the arena index this slot refers to.
    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }
}

enum Probe {
    Found(usize),
    Vacant(usize),
    Exhausted,
}

/// A fixed-capacity, open-addressing hash table with inline storage.
///
/// `FixedHashTable<V, N>` stores up to `N` values of type `V` in an inline
/// arena of `N` slots plus a parallel occupancy map. It never allocates.
/// Collisions are resolved with linear probing from the home index
/// `hash & (N - 1)`, and removal uses backward-shift deletion so probe chains
/// never contain tombstones.
///
/// Like the raw tables of general purpose hash maps, every operation takes the
/// precomputed hash and an equality predicate. Removal additionally needs a
/// way to rehash stored values, because shifted values are placed according to
/// their home index.
///
/// `N` must be a non-zero power of two; this is checked at compile time when a
/// table is constructed.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use probe_set::hash_table::Entry;
/// # use probe_set::hash_table::FixedHashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
/// #
/// let mut table: FixedHashTable<(u64, &str), 8> = FixedHashTable::new();
///
/// match table.entry(hash_id(123), |p| p.0 == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert((123, "Alice"));
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// let slot = table.find(hash_id(123), |p| p.0 == 123);
/// assert_eq!(table.get(slot).1, "Alice");
/// ```
pub struct FixedHashTable<V, const N: usize> {
    slots: [MaybeUninit<V>; N],
    occupied: [bool; N],

    first_valid: usize,
    last_valid: usize,
    populated: usize,
}

struct OccupancyMap<'a>(&'a [bool]);

impl Debug for OccupancyMap<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for chunk in self.0.chunks(16) {
            for &occupied in chunk {
                f.write_str(if occupied { "#" } else { "." })?;
            }
            f.write_str(" ")?;
        }
        Ok(())
    }
}

impl<V, const N: usize> Debug for FixedHashTable<V, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FixedHashTable")
            .field("occupancy", &OccupancyMap(&self.occupied))
            .field("populated", &self.populated)
            .field("capacity", &N)
            .field("first_valid_index", &self.first_valid)
            .field("last_valid_index", &self.last_valid)
            .finish()
    }
}

impl<V, const N: usize> Default for FixedHashTable<V, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, const N: usize> Clone for FixedHashTable<V, N>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut new_table = Self::new();
        new_table.clone_slots_from(self);
        new_table
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.clone_slots_from(source);
    }
}

impl<V, const N: usize> Drop for FixedHashTable<V, N> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<V, const N: usize> FixedHashTable<V, N> {
    /// Creates a new, empty table.
    ///
    /// Fails to compile when `N` is not a non-zero power of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_set::hash_table::FixedHashTable;
    /// #
    /// let table: FixedHashTable<String, 16> = FixedHashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.max_size(), 16);
    /// ```
    ///
    /// Capacities that are not a power of two are rejected:
    ///
    /// ```compile_fail
    /// # use probe_set::hash_table::FixedHashTable;
    /// let table: FixedHashTable<u8, 6> = FixedHashTable::new();
    /// # drop(table);
    /// ```
    ///
    /// So is a capacity of zero:
    ///
    /// ```compile_fail
    /// # use probe_set::hash_table::FixedHashTable;
    /// let table: FixedHashTable<u8, 0> = FixedHashTable::new();
    /// # drop(table);
    /// ```
    pub const fn new() -> Self {
        const { assert!(N.is_power_of_two(), "max size is not a power of two") };

        Self {
            slots: [const { MaybeUninit::uninit() }; N],
            occupied: [false; N],
            first_valid: N,
            last_valid: 0,
            populated: 0,
        }
    }

    #[inline(always)]
    const fn wrap(index: usize) -> usize {
        index & (N - 1)
    }

    #[inline(always)]
    const fn home_index(hash: u64) -> usize {
        Self::wrap(hash as usize)
    }

    #[inline(always)]
    fn reset_bounds(&mut self) {
        self.first_valid = N;
        self.last_valid = 0;
    }

    /// Returns the number of elements in the table.
    pub const fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns `true` if every slot is occupied.
    pub const fn is_full(&self) -> bool {
        self.populated == N
    }

    /// Returns the fixed number of slots, `N`.
    pub const fn max_size(&self) -> usize {
        N
    }

    /// Returns how many more values fit before the table is full.
    pub const fn available(&self) -> usize {
        N - self.populated
    }

    /// Returns the first occupied slot, or [`end`](Self::end) when empty.
    pub const fn begin(&self) -> Slot {
        Slot::new(self.first_valid)
    }

    /// Returns the one-past-the-end slot (index `N`).
    pub const fn end(&self) -> Slot {
        Slot::new(N)
    }

    /// Returns `true` if `slot` is the end position.
    pub const fn is_end(&self, slot: Slot) -> bool {
        slot.index >= N
    }

    /// Returns `true` if `slot` currently holds a value.
    #[inline]
    pub fn is_occupied(&self, slot: Slot) -> bool {
        slot.index < N && self.occupied[slot.index]
    }

    /// Returns the next occupied slot after `slot`, or the end slot.
    ///
    /// Advancing the end slot yields the end slot again.
    pub fn next_slot(&self, slot: Slot) -> Slot {
        self.next_occupied_from(slot.index + 1)
    }

    /// Returns the previous occupied slot before `slot`.
    ///
    /// Stepping back from the end slot yields the last occupied slot.
    ///
    /// # Panics
    ///
    /// Panics if there is no occupied slot before `slot`.
    pub fn prev_slot(&self, slot: Slot) -> Slot {
        let first_valid = self.first_valid;
        let mut index = slot.index.min(N);

        loop {
            assert!(index > first_valid, "cursor moved before begin");
            index -= 1;

            if self.occupied[index] {
                return Slot::new(index);
            }
        }
    }

    /// Returns a reference to the value stored at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` does not hold a value.
    pub fn get(&self, slot: Slot) -> &V {
        assert!(
            self.is_occupied(slot),
            "slot is not occupied: {}",
            slot.index
        );

        // SAFETY: We have checked that the slot is occupied, so its value is
        // initialized.
        unsafe { self.slots[slot.index].assume_init_ref() }
    }

    /// Returns a mutable reference to the value stored at `slot`.
    ///
    /// The caller must not change the value in a way that changes its hash or
    /// its equality with other values.
    ///
    /// # Panics
    ///
    /// Panics if `slot` does not hold a value.
    pub fn get_mut(&mut self, slot: Slot) -> &mut V {
        assert!(
            self.is_occupied(slot),
            "slot is not occupied: {}",
            slot.index
        );

        // SAFETY: We have checked that the slot is occupied, so its value is
        // initialized.
        unsafe { self.slots[slot.index].assume_init_mut() }
    }

    /// Returns the value stored at `slot`, or `None` if it is empty or the
    /// end slot.
    pub fn try_get(&self, slot: Slot) -> Option<&V> {
        if !self.is_occupied(slot) {
            return None;
        }

        // SAFETY: We have checked that the slot is occupied.
        Some(unsafe { self.slots[slot.index].assume_init_ref() })
    }

    /// Returns a borrowing cursor positioned at `slot`.
    pub fn cursor(&self, slot: Slot) -> Cursor<'_, V, N> {
        Cursor {
            table: self,
            index: slot.index.min(N),
        }
    }

    /// Returns an iterator over all values, in slot order.
    pub fn iter(&self) -> Iter<'_, V, N> {
        Iter {
            table: self,
            front: self.first_valid,
            back: if self.populated == 0 {
                0
            } else {
                self.last_valid + 1
            },
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields every value.
    ///
    /// The table is emptied up front. Values not yet yielded are dropped when
    /// the iterator is dropped; calling `mem::forget` on the iterator leaks
    /// them but leaves the table empty and usable.
    pub fn drain(&mut self) -> Drain<'_, V, N> {
        let live = self.occupied;
        let (next, end) = if self.populated == 0 {
            (0, 0)
        } else {
            (self.first_valid, self.last_valid + 1)
        };
        let remaining = self.populated;

        // The table is empty from here on; the drain owns the values.
        self.occupied = [false; N];
        self.reset_bounds();
        self.populated = 0;

        Drain {
            table: self,
            live,
            next,
            end,
            remaining,
        }
    }

    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        let mut index = Self::home_index(hash);

        for _ in 0..N {
            if !self.occupied[index] {
                return Probe::Vacant(index);
            }

            // SAFETY: We have checked that the slot is occupied.
            if eq(unsafe { self.slots[index].assume_init_ref() }) {
                return Probe::Found(index);
            }

            index = Self::wrap(index + 1);
        }

        Probe::Exhausted
    }

    /// Looks up a value by hash and equality predicate.
    ///
    /// The search starts at the home index and stops at the first empty slot,
    /// which cannot be followed by a matching value because backward-shift
    /// deletion keeps probe chains gap free.
    ///
    /// Returns the matching slot, or the end slot if there is none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_set::hash_table::FixedHashTable;
    /// #
    /// let mut table: FixedHashTable<u32, 4> = FixedHashTable::new();
    /// table.insert(7, 42, |&v| v == 42);
    ///
    /// let slot = table.find(7, |&v| v == 42);
    /// assert_eq!(table.get(slot), &42);
    /// assert!(table.is_end(table.find(7, |&v| v == 0)));
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Slot {
        if self.populated == 0 {
            return self.end();
        }

        match self.probe(hash, eq) {
            Probe::Found(index) => Slot::new(index),
            Probe::Vacant(_) | Probe::Exhausted => self.end(),
        }
    }

    /// Gets the entry for the given hash and equality predicate.
    ///
    /// # Panics
    ///
    /// Panics if no value matches and the table is full.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_set::hash_table::Entry;
    /// # use probe_set::hash_table::FixedHashTable;
    /// #
    /// let mut table: FixedHashTable<(u8, &str), 4> = FixedHashTable::new();
    ///
    /// match table.entry(1, |v| v.0 == 1) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert((1, "first"));
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         entry.replace((1, "updated"));
    ///     }
    /// }
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V, N> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant(index) => Entry::Vacant(VacantEntry { table: self, index }),
            Probe::Exhausted => panic!("hash set is full"),
        }
    }

    /// Inserts `value` unless a value matching `eq` is already present.
    ///
    /// Returns the slot of the new value, or the end slot (dropping `value`)
    /// if a match was found.
    ///
    /// # Panics
    ///
    /// Panics if the table is full, even when a matching value is present.
    pub fn insert(&mut self, hash: u64, value: V, eq: impl Fn(&V) -> bool) -> Slot {
        assert!(!self.is_full(), "hash set is full");

        match self.entry(hash, eq) {
            Entry::Occupied(_) => Slot::new(N),
            Entry::Vacant(entry) => entry.insert(value),
        }
    }

    /// Inserts `value`, replacing and returning the stored value if one
    /// matches `eq`. The replacement keeps the original slot.
    pub fn insert_or_replace(
        &mut self,
        hash: u64,
        value: V,
        eq: impl Fn(&V) -> bool,
    ) -> (Slot, Option<V>) {
        match self.entry(hash, eq) {
            Entry::Occupied(mut entry) => {
                let old = entry.replace(value);
                (entry.slot(), Some(old))
            }
            Entry::Vacant(entry) => (entry.insert(value), None),
        }
    }

    /// Removes and returns the value matching `eq`, if any.
    ///
    /// `hasher` must produce the same hashes that were used on insertion.
    pub fn remove(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Option<V> {
        let slot = self.find(hash, eq);
        if self.is_end(slot) {
            return None;
        }

        Some(self.take(slot, hasher).0)
    }

    /// Drops the value at `slot` and repairs the probe chain behind it.
    ///
    /// Returns the first occupied slot at or after the erased position, so a
    /// forward walk can keep erasing. When a single value remains, its slot is
    /// returned instead. When the table becomes empty, the end slot is
    /// returned.
    ///
    /// # Panics
    ///
    /// Panics if the table is empty or `slot` does not hold a value.
    pub fn erase(&mut self, slot: Slot, hasher: impl Fn(&V) -> u64) -> Slot {
        let (value, next) = self.take(slot, hasher);
        drop(value);
        next
    }

    /// Like [`erase`](Self::erase), but hands back the removed value.
    pub fn take(&mut self, slot: Slot, hasher: impl Fn(&V) -> u64) -> (V, Slot) {
        assert!(self.populated != 0, "hash set is empty");
        let index = slot.index;
        assert!(
            self.is_occupied(slot),
            "slot is not occupied: {}",
            index
        );

        // SAFETY: We have checked that the slot is occupied. The occupancy flag
        // is cleared right after, so the value is never read twice.
        let value = unsafe { self.slots[index].assume_init_read() };
        self.occupied[index] = false;
        self.populated -= 1;

        if self.populated == 0 {
            self.reset_bounds();
            return (value, self.end());
        }

        self.backward_shift(index, hasher);
        self.shrink_bounds();

        if self.populated == 1 {
            debug_assert_eq!(self.first_valid, self.last_valid);
            return (value, Slot::new(self.first_valid));
        }

        (value, self.next_occupied_from(index))
    }

    /// Pulls successors of the vacated slot backward until the run of
    /// occupied slots ends.
    ///
    /// A value at `index` with home `h` may fill the hole only if the hole
    /// lies within `[h, index)` cyclically; values sitting in their home slot
    /// never move.
    fn backward_shift(&mut self, vacated: usize, hasher: impl Fn(&V) -> u64) {
        let mut hole = vacated;
        let mut index = Self::wrap(vacated + 1);

        // At least one slot (the hole) is empty, so the walk terminates.
        while self.occupied[index] {
            // SAFETY: We have checked that the slot is occupied.
            let home = Self::home_index(hasher(unsafe { self.slots[index].assume_init_ref() }));
            let displacement = Self::wrap(index.wrapping_sub(home));
            let gap = Self::wrap(index.wrapping_sub(hole));

            if gap <= displacement {
                // SAFETY: `index` is occupied and `hole` is empty. After the
                // move the flags are swapped, so exactly one copy stays live.
                unsafe {
                    let moved = self.slots[index].assume_init_read();
                    self.slots[hole].write(moved);
                }
                self.occupied[hole] = true;
                self.occupied[index] = false;
                hole = index;
            }

            index = Self::wrap(index + 1);
        }
    }

    /// Tightens the valid range after an erase. Values only ever move into
    /// slots that were occupied before, so the range can only shrink.
    fn shrink_bounds(&mut self) {
        debug_assert!(self.populated > 0);

        let mut first_valid = self.first_valid;
        while !self.occupied[first_valid] {
            first_valid += 1;
        }
        self.first_valid = first_valid;

        let mut last_valid = self.last_valid;
        while !self.occupied[last_valid] {
            last_valid -= 1;
        }
        self.last_valid = last_valid;
    }

    fn next_occupied_from(&self, index: usize) -> Slot {
        let last_valid = self.last_valid;
        let mut index = index;

        while index <= last_valid && !self.occupied[index] {
            index += 1;
        }

        if index > last_valid {
            return self.end();
        }

        Slot::new(index)
    }

    /// Removes all values, dropping them.
    ///
    /// The table is empty before the first destructor runs, so a panicking
    /// destructor leaks the values not yet dropped instead of leaving stale
    /// state behind.
    pub fn clear(&mut self) {
        if self.populated == 0 {
            return;
        }

        drop(self.drain());
    }

    /// Compares two tables slot by slot: same size, same valid range, same
    /// occupancy pattern and pairwise equal values.
    ///
    /// This is narrower than content equality; tables holding the same values
    /// placed at different indices compare unequal.
    pub fn layout_eq(&self, other: &Self, eq: impl Fn(&V, &V) -> bool) -> bool {
        if self.populated != other.populated
            || self.first_valid != other.first_valid
            || self.last_valid != other.last_valid
        {
            return false;
        }

        if self.populated == 0 {
            return true;
        }

        for index in self.first_valid..=self.last_valid {
            if self.occupied[index] != other.occupied[index] {
                return false;
            }

            if self.occupied[index] {
                // SAFETY: Both slots are occupied.
                let (a, b) = unsafe {
                    (
                        self.slots[index].assume_init_ref(),
                        other.slots[index].assume_init_ref(),
                    )
                };
                if !eq(a, b) {
                    return false;
                }
            }
        }

        true
    }

    /// Removes the lowest occupied value without repairing probe chains.
    ///
    /// Only used by [`IntoIter`], which owns the table.
    fn pop_front(&mut self) -> Option<V> {
        if self.populated == 0 {
            return None;
        }

        let index = self.first_valid;
        debug_assert!(self.occupied[index]);

        // SAFETY: `first_valid` is tight, so it is occupied while the table is
        // non-empty.
        let value = unsafe { self.slots[index].assume_init_read() };
        self.occupied[index] = false;
        self.populated -= 1;

        if self.populated == 0 {
            self.reset_bounds();
        } else {
            let mut first_valid = index + 1;
            while !self.occupied[first_valid] {
                first_valid += 1;
            }
            self.first_valid = first_valid;
        }

        Some(value)
    }

    fn clone_slots_from(&mut self, source: &Self)
    where
        V: Clone,
    {
        debug_assert!(self.is_empty());
        if source.populated == 0 {
            return;
        }

        // Bounds go first so that a panicking `clone` still leaves every
        // cloned value inside the range `clear` walks.
        self.first_valid = source.first_valid;
        self.last_valid = source.last_valid;

        for index in source.first_valid..=source.last_valid {
            if source.occupied[index] {
                // SAFETY: The source slot is occupied.
                let value = unsafe { source.slots[index].assume_init_ref() }.clone();
                self.slots[index].write(value);
                self.occupied[index] = true;
                self.populated += 1;
            }
        }

        debug_assert_eq!(self.populated, source.populated);
    }

    /// Returns how many values sit at each probe distance from their home
    /// slot. Index `d` of the result counts values found `d` steps after
    /// their home index.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self, hasher: impl Fn(&V) -> u64) -> [usize; N] {
        let mut hist = [0usize; N];

        if self.populated == 0 {
            return hist;
        }

        for index in self.first_valid..=self.last_valid {
            if self.occupied[index] {
                // SAFETY: We have checked that the slot is occupied.
                let home = Self::home_index(hasher(unsafe { self.slots[index].assume_init_ref() }));
                hist[Self::wrap(index.wrapping_sub(home))] += 1;
            }
        }

        hist
    }

    /// Returns utilization and probe-length statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self, hasher: impl Fn(&V) -> u64) -> DebugStats {
        let hist = self.probe_histogram(hasher);
        let max_probe_length = hist.iter().rposition(|&count| count != 0).unwrap_or(0);
        let total_probe: usize = hist
            .iter()
            .enumerate()
            .map(|(distance, &count)| distance * count)
            .sum();

        DebugStats {
            populated: self.populated,
            capacity: N,
            first_valid_index: self.first_valid,
            last_valid_index: self.last_valid,
            load_factor: self.populated as f64 / N as f64,
            max_probe_length,
            mean_probe_length: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
            total_bytes: core::mem::size_of::<Self>(),
            wasted_bytes: (N - self.populated) * core::mem::size_of::<V>(),
        }
    }

    /// Pretty-prints the probe-length histogram horizontally using stdout.
    ///
    /// Rows stop at the longest probe length present.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_probe_histogram(&self, hasher: impl Fn(&V) -> u64) {
        let hist = self.probe_histogram(hasher);
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let rows = hist.iter().rposition(|&count| count != 0).unwrap_or(0) + 1;
        let max_bar = 60usize;
        println!("probe histogram ({} entries):", self.populated);

        for (distance, &count) in hist.iter().take(rows).enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", distance, "█".repeat(width), count);
        }
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`FixedHashTable`].
///
/// [`entry`]: FixedHashTable::entry
pub enum Entry<'a, V, const N: usize> {
    /// A matching value is already stored.
    Occupied(OccupiedEntry<'a, V, N>),
    /// No matching value; holds the first empty slot of the probe sequence.
    Vacant(VacantEntry<'a, V, N>),
}

impl<'a, V, const N: usize> Entry<'a, V, N> {
    /// Returns the slot this entry refers to.
    pub fn slot(&self) -> Slot {
        match self {
            Entry::Occupied(entry) => entry.slot(),
            Entry::Vacant(entry) => entry.slot(),
        }
    }
}

/// A view into a vacant entry in a [`FixedHashTable`].
pub struct VacantEntry<'a, V, const N: usize> {
    table: &'a mut FixedHashTable<V, N>,
    index: usize,
}

impl<'a, V, const N: usize> VacantEntry<'a, V, N> {
    /// Returns the slot the value would be stored in.
    pub fn slot(&self) -> Slot {
        Slot::new(self.index)
    }

    /// Stores `value` in the vacant slot and returns that slot.
    pub fn insert(self, value: V) -> Slot {
        let table = self.table;
        let index = self.index;
        debug_assert!(!table.occupied[index]);

        table.slots[index].write(value);
        table.occupied[index] = true;
        table.populated += 1;
        table.first_valid = table.first_valid.min(index);
        table.last_valid = table.last_valid.max(index);

        Slot::new(index)
    }
}

/// A view into an occupied entry in a [`FixedHashTable`].
pub struct OccupiedEntry<'a, V, const N: usize> {
    table: &'a mut FixedHashTable<V, N>,
    index: usize,
}

impl<'a, V, const N: usize> OccupiedEntry<'a, V, N> {
    /// Returns the slot holding the value.
    pub fn slot(&self) -> Slot {
        Slot::new(self.index)
    }

    /// Gets a reference to the stored value.
    pub fn get(&self) -> &V {
        // SAFETY: Occupied entries always point at an occupied slot.
        unsafe { self.table.slots[self.index].assume_init_ref() }
    }

    /// Replaces the stored value in place and returns the old one.
    pub fn replace(&mut self, value: V) -> V {
        // SAFETY: Occupied entries always point at an occupied slot.
        let stored = unsafe { self.table.slots[self.index].assume_init_mut() };
        core::mem::replace(stored, value)
    }

    /// Removes the value, repairing the probe chain with `hasher`.
    pub fn remove(self, hasher: impl Fn(&V) -> u64) -> V {
        self.table.take(Slot::new(self.index), hasher).0
    }
}

/// A borrowing cursor over the occupied slots of a [`FixedHashTable`].
///
/// Cursors compare equal when they sit at the same index.
pub struct Cursor<'a, V, const N: usize> {
    table: &'a FixedHashTable<V, N>,
    index: usize,
}

impl<V, const N: usize> Clone for Cursor<'_, V, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, const N: usize> Copy for Cursor<'_, V, N> {}

impl<V, const N: usize> PartialEq for Cursor<'_, V, N> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<V, const N: usize> Eq for Cursor<'_, V, N> {}

impl<V, const N: usize> Debug for Cursor<'_, V, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor").field("index", &self.index).finish()
    }
}

impl<'a, V, const N: usize> Cursor<'a, V, N> {
    /// Returns the slot the cursor points at.
    pub fn slot(&self) -> Slot {
        Slot::new(self.index)
    }

    /// Returns the arena index the cursor points at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` at the end position.
    pub fn is_end(&self) -> bool {
        self.index >= N
    }

    /// Advances to the next occupied slot, or to the end position.
    pub fn move_next(&mut self) {
        self.index = self.table.next_slot(self.slot()).index;
    }

    /// Steps back to the previous occupied slot.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the first occupied slot.
    pub fn move_prev(&mut self) {
        self.index = self.table.prev_slot(self.slot()).index;
    }

    /// Returns the value under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor does not point at an occupied slot.
    pub fn get(&self) -> &'a V {
        self.table.get(self.slot())
    }
}

/// An iterator over the values in a [`FixedHashTable`], in slot order.
///
/// This struct is created by the [`iter`] method on [`FixedHashTable`].
///
/// [`iter`]: FixedHashTable::iter
pub struct Iter<'a, V, const N: usize> {
    table: &'a FixedHashTable<V, N>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<V, const N: usize> Clone for Iter<'_, V, N> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, V, const N: usize> Iterator for Iter<'a, V, N> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        while !self.table.occupied[self.front] {
            self.front += 1;
        }

        let index = self.front;
        self.front += 1;
        self.remaining -= 1;

        // SAFETY: We have checked that the slot is occupied.
        Some(unsafe { self.table.slots[index].assume_init_ref() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V, const N: usize> DoubleEndedIterator for Iter<'_, V, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.back -= 1;
        while !self.table.occupied[self.back] {
            self.back -= 1;
        }
        self.remaining -= 1;

        // SAFETY: We have checked that the slot is occupied.
        Some(unsafe { self.table.slots[self.back].assume_init_ref() })
    }
}

impl<V, const N: usize> ExactSizeIterator for Iter<'_, V, N> {}

impl<V, const N: usize> FusedIterator for Iter<'_, V, N> {}

/// A draining iterator over the values in a [`FixedHashTable`].
///
/// This struct is created by the [`drain`] method on [`FixedHashTable`].
///
/// [`drain`]: FixedHashTable::drain
pub struct Drain<'a, V, const N: usize> {
    table: &'a mut FixedHashTable<V, N>,
    live: [bool; N],
    next: usize,
    end: usize,
    remaining: usize,
}

impl<V, const N: usize> Iterator for Drain<'_, V, N> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let index = self.next;
            self.next += 1;

            if self.live[index] {
                self.live[index] = false;
                self.remaining -= 1;
                // SAFETY: `live` is the occupancy snapshot taken when the drain
                // started, and each flag is cleared before its value is read.
                return Some(unsafe { self.table.slots[index].assume_init_read() });
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V, const N: usize> ExactSizeIterator for Drain<'_, V, N> {}

impl<V, const N: usize> FusedIterator for Drain<'_, V, N> {}

impl<V, const N: usize> Drop for Drain<'_, V, N> {
    fn drop(&mut self) {
        while self.next < self.end {
            let index = self.next;
            self.next += 1;

            if self.live[index] {
                self.live[index] = false;
                self.remaining -= 1;
                // SAFETY: The snapshot marks this slot as holding a value that
                // has not been yielded or dropped yet.
                unsafe { self.table.slots[index].assume_init_drop() };
            }
        }
    }
}

/// An owning iterator over the values of a [`FixedHashTable`].
pub struct IntoIter<V, const N: usize> {
    table: FixedHashTable<V, N>,
}

impl<V, const N: usize> Iterator for IntoIter<V, N> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.table.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V, const N: usize> IntoIterator for FixedHashTable<V, N> {
    type IntoIter = IntoIter<V, N>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { table: self }
    }
}

impl<'a, V, const N: usize> IntoIterator for &'a FixedHashTable<V, N> {
    type IntoIter = Iter<'a, V, N>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(state: &HashState, key: u64) -> u64 {
        let mut h = state.build_hasher();
        h.write_u64(key);
        h.finish()
    }

    // Hashes are the keys themselves, so home indices are easy to pick.
    fn identity(item: &Item) -> u64 {
        item.key
    }

    fn insert_identity<const N: usize>(table: &mut FixedHashTable<Item, N>, key: u64) -> Slot {
        table.insert(
            key,
            Item {
                key,
                value: key as i32,
            },
            |v| v.key == key,
        )
    }

    fn find_identity<const N: usize>(table: &FixedHashTable<Item, N>, key: u64) -> Slot {
        table.find(key, |v| v.key == key)
    }

    fn assert_reachable<const N: usize>(table: &FixedHashTable<Item, N>) {
        for item in table.iter() {
            let slot = find_identity(table, item.key);
            assert!(!table.is_end(slot), "{} unreachable in {:#?}", item.key, table);
        }
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::default();
        let mut table: FixedHashTable<Item, 64> = FixedHashTable::new();
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            match table.entry(hash, |v: &Item| v.key == k) {
                Entry::Vacant(v) => {
                    v.insert(Item {
                        key: k,
                        value: (k as i32) * 2,
                    });
                    let slot = table.find(hash, |v| v.key == k);
                    assert_eq!(
                        table.try_get(slot),
                        Some(&Item {
                            key: k,
                            value: (k as i32) * 2
                        }),
                        "{:#?}",
                        table
                    );
                }
                Entry::Occupied(_) => panic!("unexpected occupied on first insert: {:#?}", table),
            }
        }

        assert_eq!(table.len(), 32);
        assert_eq!(table.available(), 32);
    }

    #[test]
    fn duplicate_entry_is_occupied() {
        let state = HashState::default();
        let mut table: FixedHashTable<u64, 8> = FixedHashTable::new();
        let hash = hash_key(&state, 9);

        let slot = table.insert(hash, 9, |&v| v == 9);
        assert_eq!(table.get(slot), &9);

        let again = table.insert(hash, 9, |&v| v == 9);
        assert!(table.is_end(again));
        assert_eq!(table.len(), 1);

        match table.entry(hash, |&v| v == 9) {
            Entry::Occupied(entry) => assert_eq!(entry.slot(), slot),
            Entry::Vacant(_) => panic!("should be occupied: {:#?}", table),
        }
    }

    #[test]
    fn colliding_chain_shifts_back() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        let a = insert_identity(&mut table, 0);
        let b = insert_identity(&mut table, 4);
        let c = insert_identity(&mut table, 8);
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));

        let next = table.erase(b, identity);
        assert_eq!(next.index(), 1);
        assert_eq!(table.get(next).key, 8);
        assert_eq!(find_identity(&table, 0).index(), 0);
        assert_eq!(find_identity(&table, 8).index(), 1);
        assert!(table.is_end(find_identity(&table, 4)));
        assert_eq!(table.begin().index(), 0);
        assert_eq!(table.last_valid, 1);
    }

    #[test]
    fn shift_skips_values_in_their_home_slot() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        insert_identity(&mut table, 0);
        insert_identity(&mut table, 1);
        insert_identity(&mut table, 4);

        let erased = find_identity(&table, 0);
        table.erase(erased, identity);

        assert_eq!(find_identity(&table, 4).index(), 0);
        assert_eq!(find_identity(&table, 1).index(), 1);
        assert_reachable(&table);
    }

    #[test]
    fn shift_wraps_around() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        insert_identity(&mut table, 3);
        insert_identity(&mut table, 7);
        insert_identity(&mut table, 11);
        assert_eq!(find_identity(&table, 7).index(), 0);
        assert_eq!(find_identity(&table, 11).index(), 1);
        assert_eq!((table.first_valid, table.last_valid), (0, 3));

        let next = table.erase(find_identity(&table, 3), identity);
        assert_eq!(next.index(), 3);
        assert_eq!(table.get(next).key, 7);
        assert_eq!(find_identity(&table, 11).index(), 0);
        assert_eq!((table.first_valid, table.last_valid), (0, 3));
        assert_reachable(&table);
    }

    #[test]
    fn last_survivor_moves_home() {
        let mut table: FixedHashTable<Item, 8> = FixedHashTable::new();
        insert_identity(&mut table, 2);
        insert_identity(&mut table, 10);

        let survivor = table.erase(find_identity(&table, 2), identity);
        assert_eq!(survivor.index(), 2);
        assert_eq!(table.get(survivor).key, 10);
        assert_eq!((table.first_valid, table.last_valid), (2, 2));
    }

    #[test]
    fn erase_last_resets_bounds() {
        let mut table: FixedHashTable<Item, 8> = FixedHashTable::new();
        let slot = insert_identity(&mut table, 5);

        let next = table.erase(slot, identity);
        assert!(table.is_end(next));
        assert!(table.is_empty());
        assert_eq!((table.first_valid, table.last_valid), (8, 0));
        assert_eq!(table.begin(), table.end());
    }

    #[test]
    #[should_panic(expected = "hash set is empty")]
    fn erase_from_empty_panics() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        table.erase(Slot::new(0), identity);
    }

    #[test]
    #[should_panic(expected = "slot is not occupied: 2")]
    fn erase_empty_slot_panics() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        insert_identity(&mut table, 0);
        table.erase(Slot::new(2), identity);
    }

    #[test]
    #[should_panic(expected = "hash set is full")]
    fn insert_when_full_panics() {
        let mut table: FixedHashTable<Item, 2> = FixedHashTable::new();
        insert_identity(&mut table, 0);
        insert_identity(&mut table, 1);
        assert!(table.is_full());
        insert_identity(&mut table, 2);
    }

    #[test]
    fn replace_keeps_slot() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        insert_identity(&mut table, 1);
        insert_identity(&mut table, 5);

        let (slot, old) = table.insert_or_replace(5, Item { key: 5, value: 50 }, |v| v.key == 5);
        assert_eq!(slot.index(), 2);
        assert_eq!(old, Some(Item { key: 5, value: 5 }));
        assert_eq!(table.get(slot).value, 50);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn remove_items() {
        let state = HashState::default();
        let mut table: FixedHashTable<Item, 32> = FixedHashTable::new();
        let hasher = |v: &Item| hash_key(&state, v.key);

        for k in 0..20u64 {
            table.insert(
                hash_key(&state, k),
                Item {
                    key: k,
                    value: k as i32,
                },
                |v| v.key == k,
            );
        }

        for k in (0..20u64).step_by(2) {
            let removed = table.remove(hash_key(&state, k), |v| v.key == k, hasher);
            assert_eq!(removed.map(|v| v.key), Some(k));
        }

        assert_eq!(table.len(), 10);
        for k in 0..20u64 {
            let slot = table.find(hash_key(&state, k), |v| v.key == k);
            assert_eq!(table.is_end(slot), k % 2 == 0, "{:#?}", table);
        }

        assert_eq!(table.remove(hash_key(&state, 0), |v| v.key == 0, hasher), None);
    }

    #[test]
    fn iteration_skips_empty_slots() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        insert_identity(&mut table, 1);
        insert_identity(&mut table, 3);

        let begin = table.begin();
        assert_eq!(begin.index(), 1);
        let second = table.next_slot(begin);
        assert_eq!(second.index(), 3);
        let end = table.next_slot(second);
        assert_eq!(end.index(), 4);
        assert!(table.is_end(end));
        assert_eq!(table.next_slot(end), end);

        assert_eq!(table.prev_slot(end).index(), 3);
        assert_eq!(table.prev_slot(second).index(), 1);

        let keys: Vec<u64> = table.iter().map(|v| v.key).collect();
        assert_eq!(keys, [1, 3]);
        let keys: Vec<u64> = table.iter().rev().map(|v| v.key).collect();
        assert_eq!(keys, [3, 1]);
        assert_eq!(table.iter().len(), 2);
    }

    #[test]
    #[should_panic(expected = "cursor moved before begin")]
    fn prev_of_begin_panics() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        insert_identity(&mut table, 1);
        table.prev_slot(table.begin());
    }

    #[test]
    fn cursor_walks_both_ways() {
        let mut table: FixedHashTable<Item, 8> = FixedHashTable::new();
        for k in [2u64, 5, 6] {
            insert_identity(&mut table, k);
        }

        let mut cursor = table.cursor(table.begin());
        assert_eq!(cursor.get().key, 2);
        cursor.move_next();
        assert_eq!(cursor.get().key, 5);
        cursor.move_next();
        cursor.move_next();
        assert!(cursor.is_end());
        assert_eq!(cursor, table.cursor(table.end()));
        cursor.move_prev();
        assert_eq!(cursor.index(), 6);
    }

    #[test]
    #[should_panic(expected = "slot is not occupied: 8")]
    fn dereferencing_end_panics() {
        let table: FixedHashTable<Item, 8> = FixedHashTable::new();
        let _ = table.cursor(table.end()).get();
    }

    #[test]
    fn erase_while_walking_forward() {
        let mut table: FixedHashTable<Item, 16> = FixedHashTable::new();
        for k in 0..12u64 {
            insert_identity(&mut table, k * 3);
        }

        let mut slot = table.begin();
        while !table.is_end(slot) {
            if table.get(slot).key % 2 == 0 {
                slot = table.erase(slot, identity);
            } else {
                slot = table.next_slot(slot);
            }
        }

        let mut keys: Vec<u64> = table.iter().map(|v| v.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, [3, 9, 15, 21, 27, 33]);
        assert_reachable(&table);
    }

    #[test]
    fn iter_and_drain() {
        let state = HashState::default();
        let mut table: FixedHashTable<Item, 16> = FixedHashTable::new();
        for k in 10..20u64 {
            table.insert(
                hash_key(&state, k),
                Item {
                    key: k,
                    value: (k as i32) + 1,
                },
                |v| v.key == k,
            );
        }
        let collected: Vec<u64> = table.iter().map(|v| v.key).collect();
        assert_eq!(collected.len(), 10, "{:#?}", table);
        for k in 10..20u64 {
            assert!(collected.contains(&k));
        }

        let drained: Vec<Item> = table.drain().collect();
        assert_eq!(drained.len(), 10);
        assert_eq!(table.len(), 0);
        assert_eq!(table.begin(), table.end());

        for k in 10..20u64 {
            let hash = hash_key(&state, k);
            assert!(table.is_end(table.find(hash, |v| v.key == k)));
        }
    }

    #[test]
    fn partial_drain_clears_rest() {
        let mut table: FixedHashTable<Item, 8> = FixedHashTable::new();
        for k in 0..6u64 {
            insert_identity(&mut table, k);
        }

        let first: Vec<Item> = table.drain().take(2).collect();
        assert_eq!(first.len(), 2);
        assert!(table.is_empty());
        assert_eq!((table.first_valid, table.last_valid), (8, 0));
    }

    #[test]
    fn forgotten_drain_empties_table() {
        let mut table: FixedHashTable<Item, 4> = FixedHashTable::new();
        insert_identity(&mut table, 0);
        insert_identity(&mut table, 4);

        let mut drain = table.drain();
        assert_eq!(drain.next().map(|item| item.key), Some(0));
        core::mem::forget(drain);

        assert_eq!(table.len(), 0);
        assert_eq!(table.iter().count(), 0);
        assert_eq!((table.first_valid, table.last_valid), (4, 0));
        assert!(table.is_end(find_identity(&table, 4)));

        let slot = insert_identity(&mut table, 4);
        assert_eq!(slot.index(), 0);
        assert_reachable(&table);
    }

    #[test]
    fn drain_reports_exact_size() {
        let mut table: FixedHashTable<Item, 8> = FixedHashTable::new();
        for k in [1u64, 3, 6] {
            insert_identity(&mut table, k);
        }

        let mut drain = table.drain();
        assert_eq!(drain.len(), 3);
        drain.next();
        assert_eq!(drain.len(), 2);
    }

    #[test]
    fn clear_resets_state() {
        let mut table: FixedHashTable<String, 8> = FixedHashTable::new();
        for word in ["alpha", "beta", "gamma"] {
            table.insert(word.len() as u64, word.to_string(), |v| v == word);
        }

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.available(), table.max_size());
        assert_eq!(table.iter().count(), 0);
        assert!(table.is_end(table.find(5, |v| v == "alpha")));
    }

    #[derive(Debug)]
    struct Counted {
        key: u64,
        drops: Rc<Cell<usize>>,
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn values_drop_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        let counted = |key| Counted {
            key,
            drops: drops.clone(),
        };

        {
            let mut table: FixedHashTable<Counted, 8> = FixedHashTable::new();
            for key in [0u64, 8, 16, 1, 9] {
                table.insert(key, counted(key), |v| v.key == key);
            }

            // Duplicate insert drops the offered value.
            table.insert(0, counted(0), |v| v.key == 0);
            assert_eq!(drops.get(), 1);

            let slot = table.find(8, |v| v.key == 8);
            table.erase(slot, |v| v.key);
            assert_eq!(drops.get(), 2);

            let (_, old) = table.insert_or_replace(16, counted(16), |v| v.key == 16);
            drop(old);
            assert_eq!(drops.get(), 3);

            let mut iter = table.into_iter();
            drop(iter.next());
            assert_eq!(drops.get(), 4);
        }

        // 7 values were created in total.
        assert_eq!(drops.get(), 7);
    }

    #[test]
    fn test_clone() {
        let mut table: FixedHashTable<Item, 8> = FixedHashTable::new();
        for k in [1u64, 9, 17, 4] {
            insert_identity(&mut table, k);
        }

        let cloned = table.clone();
        assert!(table.layout_eq(&cloned, |a, b| a == b));
        assert_eq!(cloned.len(), 4);
        for k in [1u64, 9, 17, 4] {
            assert_eq!(find_identity(&cloned, k), find_identity(&table, k));
        }

        let mut target: FixedHashTable<Item, 8> = FixedHashTable::new();
        insert_identity(&mut target, 6);
        target.clone_from(&table);
        assert!(target.layout_eq(&table, |a, b| a == b));
        assert!(target.is_end(find_identity(&target, 6)));
    }

    #[test]
    fn test_clone_empty_table() {
        let table: FixedHashTable<Item, 4> = FixedHashTable::new();
        let cloned = table.clone();
        assert!(cloned.is_empty());
        assert!(cloned.layout_eq(&table, |a, b| a == b));
    }

    #[test]
    fn layout_eq_is_positional() {
        let mut a: FixedHashTable<Item, 4> = FixedHashTable::new();
        let mut b: FixedHashTable<Item, 4> = FixedHashTable::new();
        insert_identity(&mut a, 0);
        insert_identity(&mut a, 4);
        insert_identity(&mut b, 4);
        insert_identity(&mut b, 0);

        assert!(!a.layout_eq(&b, |x, y| x == y));

        let slot = find_identity(&b, 4);
        b.erase(slot, identity);
        insert_identity(&mut b, 4);
        assert!(a.layout_eq(&b, |x, y| x == y));
    }

    #[test]
    fn probe_histogram_counts_distances() {
        let mut table: FixedHashTable<Item, 8> = FixedHashTable::new();
        for k in [0u64, 8, 16, 3] {
            insert_identity(&mut table, k);
        }

        let hist = table.probe_histogram(identity);
        assert_eq!(&hist[..3], &[2, 1, 1]);

        let stats = table.debug_stats(identity);
        assert_eq!(stats.populated, 4);
        assert_eq!(stats.max_probe_length, 2);
        assert_eq!((stats.first_valid_index, stats.last_valid_index), (0, 3));
    }
}
