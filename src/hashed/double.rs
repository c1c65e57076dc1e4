//! Double hashing.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::mem;

use super::{hash_key, shuffled_indices, slot_of, Entry, HashOpts, HashTable, Slot};
use crate::utils::{gcd, largest_prime_below};

const DEFAULT_CAPACITY: usize = 32;
const DEFAULT_MIN_LOAD: f64 = 0.125;
const DEFAULT_MAX_LOAD: f64 = 0.5;

/// An unordered map over a flat slot array with a key-dependent probe step.
///
/// The `i`-th probe for a key with hash `h` inspects slot `(h + i * h2)
/// mod m` where the step `h2 = p - (h mod p)` is derived from the largest
/// prime `p` below the capacity and nudged upwards until it is coprime to
/// `m`. Coprimality makes every probe sequence a full cycle: all `m` slots
/// are visited within `m` probes. Deletion leaves tombstones, as in
/// [`QuadraticProbeMap`](super::QuadraticProbeMap).
///
/// # Example
///
/// ```
/// use tablekit::{DoubleHashMap, HashTable};
///
/// let mut map = DoubleHashMap::new();
/// map.insert("Coconut", 1500);
///
/// assert_eq!(map.get("Coconut"), Some(&1500));
/// ```
pub struct DoubleHashMap<K, V> {
	slots: Vec<Slot<K, V>>,
	len: usize,
	dead: usize,
	prime: u64,
	min_capacity: usize,
	min_load_factor: f64,
	max_load_factor: f64,
}

impl<K: Eq + Hash, V> DoubleHashMap<K, V> {
	/// Creates an empty map with the default sizing policy.
	pub fn new() -> DoubleHashMap<K, V> {
		DoubleHashMap::with_opts(HashOpts::default())
	}

	/// Creates an empty map with an explicit sizing policy.
	///
	/// # Panics
	///
	/// Panics when the options violate the [`HashOpts`] contract.
	pub fn with_opts(opts: HashOpts) -> DoubleHashMap<K, V> {
		let (capacity, min_load_factor, max_load_factor) =
			opts.resolve(DEFAULT_CAPACITY, DEFAULT_MIN_LOAD, DEFAULT_MAX_LOAD);
		assert!(
			max_load_factor < 1.0,
			"open addressing requires a max load factor below 1"
		);
		DoubleHashMap {
			slots: new_slots(capacity),
			len: 0,
			dead: 0,
			prime: largest_prime_below(capacity as u64),
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

	/// The probe step for a raw 64-bit hash: always coprime to the
	/// capacity, so the probe sequence cycles through every slot.
	fn step_of(&self, h: u64) -> usize {
		let mut step = self.prime - (h % self.prime);
		while gcd(self.slots.len() as u64, step) != 1 {
			step += 1;
		}
		step as usize
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
		let h = hash_key(&key);
		let step = self.step_of(h);
		let mut slot = slot_of(h, self.slots.len());
		let mut first_dead = None;
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
		let h = hash_key(key);
		let step = self.step_of(h);
		let mut slot = slot_of(h, capacity);
		for _ in 0..capacity {
			match &self.slots[slot] {
				Slot::Free => return None,
				Slot::Live(entry) if entry.key.borrow() == key => return Some(slot),
				_ => {}
			}
			slot = (slot + step) & mask;
		}
		None
	}

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
		self.prime = largest_prime_below(capacity as u64);
		self.dead = 0;
		for slot in old {
			if let Slot::Live(entry) = slot {
				self.place(entry);
			}
		}
	}

	fn place(&mut self, entry: Entry<K, V>) {
		let mask = self.slots.len() - 1;
		let h = hash_key(&entry.key);
		let step = self.step_of(h);
		let mut slot = slot_of(h, self.slots.len());
		while self.slots[slot].is_live() {
			slot = (slot + step) & mask;
		}
		self.slots[slot] = Slot::Live(entry);
	}

	/// Checks reachability of every live key, the coprimality of its probe
	/// step, and the live and dead counts.
	#[cfg(debug_assertions)]
	pub fn validate(&self) {
		let mut live = 0;
		let mut dead = 0;
		for slot in &self.slots {
			match slot {
				Slot::Live(entry) => {
					let step = self.step_of(hash_key(&entry.key));
					assert_eq!(
						gcd(self.slots.len() as u64, step as u64),
						1,
						"probe step shares a factor with the capacity"
					);
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

impl<K: Eq + Hash, V> HashTable<K, V> for DoubleHashMap<K, V> {
	#[inline]
	fn len(&self) -> usize {
		DoubleHashMap::len(self)
	}

	#[inline]
	fn capacity(&self) -> usize {
		DoubleHashMap::capacity(self)
	}

	#[inline]
	fn insert(&mut self, key: K, value: V) -> Option<V> {
		DoubleHashMap::insert(self, key, value)
	}

	#[inline]
	fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		DoubleHashMap::get(self, key)
	}

	#[inline]
	fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		DoubleHashMap::remove(self, key)
	}

	#[inline]
	fn pairs(&self) -> Vec<(&K, &V)> {
		DoubleHashMap::pairs(self)
	}
}

impl<K: Eq + Hash, V> Default for DoubleHashMap<K, V> {
	fn default() -> DoubleHashMap<K, V> {
		DoubleHashMap::new()
	}
}

impl<K: Eq + Hash + fmt::Debug, V: fmt::Debug> fmt::Debug for DoubleHashMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_map().entries(self.pairs()).finish()
	}
}

impl<K: Eq + Hash, V> Extend<(K, V)> for DoubleHashMap<K, V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for DoubleHashMap<K, V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> DoubleHashMap<K, V> {
		let mut map = DoubleHashMap::new();
		map.extend(iter);
		map
	}
}
