//! Linear probing.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::mem;

use super::{hash_key, shuffled_indices, slot_of, Entry, HashOpts, HashTable};

const DEFAULT_CAPACITY: usize = 32;
const DEFAULT_MIN_LOAD: f64 = 0.125;
const DEFAULT_MAX_LOAD: f64 = 0.5;

/// An unordered map over a flat slot array probed linearly.
///
/// The `i`-th probe for a key inspects slot `(h + i) mod m`, so colliding
/// keys form one contiguous cluster. Deletion exploits that: instead of a
/// tombstone, the remainder of the cluster is lifted out and re-inserted,
/// which keeps every live key reachable from its primary slot by unbroken
/// probing.
///
/// # Example
///
/// ```
/// use tablekit::{HashTable, LinearProbeMap};
///
/// let mut map = LinearProbeMap::new();
/// map.insert("Apple", 182);
/// map.insert("Avocado", 200);
///
/// assert_eq!(map.get("Avocado"), Some(&200));
/// assert_eq!(map.len(), 2);
/// ```
pub struct LinearProbeMap<K, V> {
	slots: Vec<Option<Entry<K, V>>>,
	len: usize,
	min_capacity: usize,
	min_load_factor: f64,
	max_load_factor: f64,
}

impl<K: Eq + Hash, V> LinearProbeMap<K, V> {
	/// Creates an empty map with the default sizing policy.
	pub fn new() -> LinearProbeMap<K, V> {
		LinearProbeMap::with_opts(HashOpts::default())
	}

	/// Creates an empty map with an explicit sizing policy.
	///
	/// # Panics
	///
	/// Panics when the options violate the [`HashOpts`] contract.
	pub fn with_opts(opts: HashOpts) -> LinearProbeMap<K, V> {
		let (capacity, min_load_factor, max_load_factor) =
			opts.resolve(DEFAULT_CAPACITY, DEFAULT_MIN_LOAD, DEFAULT_MAX_LOAD);
		assert!(
			max_load_factor < 1.0,
			"open addressing requires a max load factor below 1"
		);
		LinearProbeMap {
			slots: new_slots(capacity),
			len: 0,
			min_capacity: capacity,
			min_load_factor,
			max_load_factor,
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	#[inline]
	pub fn capacity(&self) -> usize {
		self.slots.len()
	}

	pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let entry = &self.slots[self.find_slot(key)?];
		entry.as_ref().map(|e| &e.value)
	}

	#[inline]
	pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		self.get(key).is_some()
	}

	pub fn insert(&mut self, key: K, value: V) -> Option<V> {
		if self.len as f64 / self.slots.len() as f64 >= self.max_load_factor {
			self.resize(self.slots.len() * 2);
		}
		let mask = self.slots.len() - 1;
		let mut slot = slot_of(hash_key(&key), self.slots.len());
		loop {
			match &mut self.slots[slot] {
				Some(entry) if entry.key == key => {
					return Some(mem::replace(&mut entry.value, value));
				}
				Some(_) => slot = (slot + 1) & mask,
				empty => {
					*empty = Some(Entry { key, value });
					self.len += 1;
					return None;
				}
			}
		}
	}

	pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let slot = self.find_slot(key)?;
		let entry = self.slots[slot].take().unwrap();
		self.len -= 1;

		// re-insert the rest of the cluster so no live key sits behind
		// the hole we just made
		let mask = self.slots.len() - 1;
		let mut next = (slot + 1) & mask;
		while let Some(moved) = self.slots[next].take() {
			self.place(moved);
			next = (next + 1) & mask;
		}

		let capacity = self.slots.len();
		if capacity > self.min_capacity
			&& self.len as f64 / capacity as f64 <= self.min_load_factor
		{
			self.resize(capacity / 2);
		}
		Some(entry.value)
	}

	pub fn pairs(&self) -> Vec<(&K, &V)> {
		let mut out = Vec::with_capacity(self.len);
		for slot in shuffled_indices(self.slots.len()) {
			if let Some(entry) = &self.slots[slot] {
				out.push((&entry.key, &entry.value));
			}
		}
		out
	}

	/// The slot holding `key`, or `None` after an unbroken probe run ends
	/// at an empty slot.
	fn find_slot<Q: ?Sized>(&self, key: &Q) -> Option<usize>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let mask = self.slots.len() - 1;
		let mut slot = slot_of(hash_key(key), self.slots.len());
		loop {
			match &self.slots[slot] {
				None => return None,
				Some(entry) if entry.key.borrow() == key => return Some(slot),
				Some(_) => slot = (slot + 1) & mask,
			}
		}
	}

	/// Probes the key's run for the first empty slot. Used only where the
	/// key is known to be absent.
	fn place(&mut self, entry: Entry<K, V>) {
		let mask = self.slots.len() - 1;
		let mut slot = slot_of(hash_key(&entry.key), self.slots.len());
		while self.slots[slot].is_some() {
			slot = (slot + 1) & mask;
		}
		self.slots[slot] = Some(entry);
	}

	fn resize(&mut self, capacity: usize) {
		let old = mem::replace(&mut self.slots, new_slots(capacity));
		for entry in old.into_iter().flatten() {
			self.place(entry);
		}
	}

	/// Checks that every live key is reachable from its primary slot by
	/// unbroken probing and that the length matches the slot contents.
	#[cfg(debug_assertions)]
	pub fn validate(&self) {
		let mut counted = 0;
		for slot in self.slots.iter().flatten() {
			assert!(
				self.find_slot(&slot.key).is_some(),
				"live key unreachable from its primary slot"
			);
			counted += 1;
		}
		assert_eq!(counted, self.len, "stale length");
	}
}

fn new_slots<K, V>(capacity: usize) -> Vec<Option<Entry<K, V>>> {
	let mut slots = Vec::with_capacity(capacity);
	slots.resize_with(capacity, || None);
	slots
}

impl<K: Eq + Hash, V> HashTable<K, V> for LinearProbeMap<K, V> {
	#[inline]
	fn len(&self) -> usize {
		LinearProbeMap::len(self)
	}

	#[inline]
	fn capacity(&self) -> usize {
		LinearProbeMap::capacity(self)
	}

	#[inline]
	fn insert(&mut self, key: K, value: V) -> Option<V> {
		LinearProbeMap::insert(self, key, value)
	}

	#[inline]
	fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		LinearProbeMap::get(self, key)
	}

	#[inline]
	fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		LinearProbeMap::remove(self, key)
	}

	#[inline]
	fn pairs(&self) -> Vec<(&K, &V)> {
		LinearProbeMap::pairs(self)
	}
}

impl<K: Eq + Hash, V> Default for LinearProbeMap<K, V> {
	fn default() -> LinearProbeMap<K, V> {
		LinearProbeMap::new()
	}
}

impl<K: Eq + Hash + fmt::Debug, V: fmt::Debug> fmt::Debug for LinearProbeMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_map().entries(self.pairs()).finish()
	}
}

impl<K: Eq + Hash, V> Extend<(K, V)> for LinearProbeMap<K, V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for LinearProbeMap<K, V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> LinearProbeMap<K, V> {
		let mut map = LinearProbeMap::new();
		map.extend(iter);
		map
	}
}
