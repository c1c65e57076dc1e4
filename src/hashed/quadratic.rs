//! Quadratic probing.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::mem;

use super::{hash_key, shuffled_indices, slot_of, Entry, HashOpts, HashTable, Slot};

const DEFAULT_CAPACITY: usize = 32;
const DEFAULT_MIN_LOAD: f64 = 0.125;
const DEFAULT_MAX_LOAD: f64 = 0.5;

/// An unordered map over a flat slot array probed quadratically.
///
/// The probe distance grows by `i` on the `i`-th step, i.e. the probe
/// offsets are the triangular numbers `i * (i + 1) / 2` — the quadratic
/// sequence that visits every slot of a power-of-two table exactly once
/// per cycle. Deleted slots become tombstones: probe sequences step over
/// them, lookups never resurrect them, and a rehash is the only thing
/// that clears them.
///
/// # Example
///
/// ```
/// use tablekit::{HashTable, QuadraticProbeMap};
///
/// let mut map = QuadraticProbeMap::new();
/// map.insert("Apple", 182);
/// map.insert("Banana", 120);
///
/// assert_eq!(map.remove("Apple"), Some(182));
/// assert_eq!(map.get("Apple"), None);
/// assert_eq!(map.len(), 1);
/// ```
pub struct QuadraticProbeMap<K, V> {
	slots: Vec<Slot<K, V>>,
	len: usize,
	dead: usize,
	min_capacity: usize,
	min_load_factor: f64,
	max_load_factor: f64,
}

impl<K: Eq + Hash, V> QuadraticProbeMap<K, V> {
	/// Creates an empty map with the default sizing policy.
	pub fn new() -> QuadraticProbeMap<K, V> {
		QuadraticProbeMap::with_opts(HashOpts::default())
	}

	/// Creates an empty map with an explicit sizing policy.
	///
	/// # Panics
	///
	/// Panics when the options violate the [`HashOpts`] contract.
	pub fn with_opts(opts: HashOpts) -> QuadraticProbeMap<K, V> {
		let (capacity, min_load_factor, max_load_factor) =
			opts.resolve(DEFAULT_CAPACITY, DEFAULT_MIN_LOAD, DEFAULT_MAX_LOAD);
		assert!(
			max_load_factor < 1.0,
			"open addressing requires a max load factor below 1"
		);
		QuadraticProbeMap {
			slots: new_slots(capacity),
			len: 0,
			dead: 0,
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
		let slot = self.find_slot(key)?;
		self.slots[slot].as_live().map(|e| &e.value)
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
		self.maybe_grow();
		let mask = self.slots.len() - 1;
		let mut slot = slot_of(hash_key(&key), self.slots.len());
		let mut first_dead = None;
		let mut step = 0;
		loop {
			match &mut self.slots[slot] {
				Slot::Live(entry) if entry.key == key => {
					return Some(mem::replace(&mut entry.value, value));
				}
				Slot::Live(_) => {}
				Slot::Dead => {
					if first_dead.is_none() {
						first_dead = Some(slot);
					}
				}
				Slot::Free => break,
			}
			step += 1;
			slot = (slot + step) & mask;
		}
		let target = match first_dead {
			Some(dead) => {
				self.dead -= 1;
				dead
			}
			None => slot,
		};
		self.slots[target] = Slot::Live(Entry { key, value });
		self.len += 1;
		None
	}

	pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let slot = self.find_slot(key)?;
		let entry = match mem::replace(&mut self.slots[slot], Slot::Dead) {
			Slot::Live(entry) => entry,
			_ => unreachable!("find_slot returned a non-live slot"),
		};
		self.len -= 1;
		self.dead += 1;
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
			if let Some(entry) = self.slots[slot].as_live() {
				out.push((&entry.key, &entry.value));
			}
		}
		out
	}

	fn find_slot<Q: ?Sized>(&self, key: &Q) -> Option<usize>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let capacity = self.slots.len();
		let mask = capacity - 1;
		let mut slot = slot_of(hash_key(key), capacity);
		for step in 1..=capacity {
			match &self.slots[slot] {
				Slot::Free => return None,
				Slot::Live(entry) if entry.key.borrow() == key => return Some(slot),
				_ => {}
			}
			slot = (slot + step) & mask;
		}
		None
	}

	/// Doubles when the live load reaches the maximum; rebuilds at the same
	/// size when only tombstones push the occupancy that high.
	fn maybe_grow(&mut self) {
		let capacity = self.slots.len();
		if self.len as f64 / capacity as f64 >= self.max_load_factor {
			self.resize(capacity * 2);
		} else if (self.len + self.dead) as f64 / capacity as f64 >= self.max_load_factor {
			self.resize(capacity);
		}
	}

	fn resize(&mut self, capacity: usize) {
		let old = mem::replace(&mut self.slots, new_slots(capacity));
		self.dead = 0;
		for slot in old {
			if let Slot::Live(entry) = slot {
				self.place(entry);
			}
		}
	}

	fn place(&mut self, entry: Entry<K, V>) {
		let mask = self.slots.len() - 1;
		let mut slot = slot_of(hash_key(&entry.key), self.slots.len());
		let mut step = 0;
		while self.slots[slot].is_live() {
			step += 1;
			slot = (slot + step) & mask;
		}
		self.slots[slot] = Slot::Live(Entry {
			key: entry.key,
			value: entry.value,
		});
	}

	/// Checks that every live key is reachable by its probe sequence and
	/// that the live and dead counts match the slot contents.
	#[cfg(debug_assertions)]
	pub fn validate(&self) {
		let mut live = 0;
		let mut dead = 0;
		for slot in &self.slots {
			match slot {
				Slot::Live(entry) => {
					assert!(
						self.find_slot(&entry.key).is_some(),
						"live key unreachable from its primary slot"
					);
					live += 1;
				}
				Slot::Dead => dead += 1,
				Slot::Free => {}
			}
		}
		assert_eq!(live, self.len, "stale length");
		assert_eq!(dead, self.dead, "stale tombstone count");
	}
}

fn new_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
	let mut slots = Vec::with_capacity(capacity);
	slots.resize_with(capacity, || Slot::Free);
	slots
}

impl<K: Eq + Hash, V> HashTable<K, V> for QuadraticProbeMap<K, V> {
	#[inline]
	fn len(&self) -> usize {
		QuadraticProbeMap::len(self)
	}

	#[inline]
	fn capacity(&self) -> usize {
		QuadraticProbeMap::capacity(self)
	}

	#[inline]
	fn insert(&mut self, key: K, value: V) -> Option<V> {
		QuadraticProbeMap::insert(self, key, value)
	}

	#[inline]
	fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		QuadraticProbeMap::get(self, key)
	}

	#[inline]
	fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		QuadraticProbeMap::remove(self, key)
	}

	#[inline]
	fn pairs(&self) -> Vec<(&K, &V)> {
		QuadraticProbeMap::pairs(self)
	}
}

impl<K: Eq + Hash, V> Default for QuadraticProbeMap<K, V> {
	fn default() -> QuadraticProbeMap<K, V> {
		QuadraticProbeMap::new()
	}
}

impl<K: Eq + Hash + fmt::Debug, V: fmt::Debug> fmt::Debug for QuadraticProbeMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_map().entries(self.pairs()).finish()
	}
}

impl<K: Eq + Hash, V> Extend<(K, V)> for QuadraticProbeMap<K, V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for QuadraticProbeMap<K, V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> QuadraticProbeMap<K, V> {
		let mut map = QuadraticProbeMap::new();
		map.extend(iter);
		map
	}
}
