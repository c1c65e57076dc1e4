//! Unordered symbol tables.
//!
//! Four interchangeable implementations of the [`HashTable`] contract, one
//! per collision strategy:
//!
//! - [`ChainedMap`]: separate chaining over LIFO bucket lists.
//! - [`LinearProbeMap`]: open addressing with linear probing; deletion
//!   re-hashes the rest of the cluster.
//! - [`QuadraticProbeMap`]: open addressing with quadratic probing;
//!   deletion leaves tombstones.
//! - [`DoubleHashMap`]: open addressing with a key-dependent probe step;
//!   deletion leaves tombstones.
//!
//! All four hash keys with the crate's [`Fnv64`](crate::digest::Fnv64)
//! hasher, fold the digest with `h ^ (h >> 20) ^ (h >> 12) ^ (h >> 7) ^
//! (h >> 4)` and reduce it with a power-of-two mask. Capacities double when
//! the load factor reaches the configured maximum and halve (never below
//! the initial capacity) when it falls to the configured minimum.
//!
//! Enumeration order is non-deterministic on purpose: every call to
//! [`HashTable::pairs`] shuffles its index order, so two enumerations of
//! the same table may disagree. Callers that depend on the order are
//! incorrect.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;

use crate::digest::Fnv64;

mod chained;
mod double;
mod linear;
mod quadratic;

pub use chained::ChainedMap;
pub use double::DoubleHashMap;
pub use linear::LinearProbeMap;
pub use quadratic::QuadraticProbeMap;

/// Sizing knobs shared by every hash table.
///
/// A zero field means "use the strategy's default". The initial capacity
/// must be a power of two no smaller than the strategy's default floor, and
/// it is also the capacity the table never shrinks below.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashOpts {
	pub initial_capacity: usize,
	pub min_load_factor: f64,
	pub max_load_factor: f64,
}

impl Default for HashOpts {
	fn default() -> HashOpts {
		HashOpts {
			initial_capacity: 0,
			min_load_factor: 0.0,
			max_load_factor: 0.0,
		}
	}
}

impl HashOpts {
	/// Fills in the strategy defaults and checks the contract.
	///
	/// # Panics
	///
	/// Panics when the capacity is not a power of two at least as large as
	/// the strategy floor, or when the load factors are not ordered.
	pub(crate) fn resolve(self, floor: usize, min: f64, max: f64) -> (usize, f64, f64) {
		let capacity = if self.initial_capacity == 0 {
			floor
		} else {
			self.initial_capacity
		};
		assert!(
			capacity.is_power_of_two() && capacity >= floor,
			"capacity must be a power of two of at least {}",
			floor
		);
		let min_load_factor = if self.min_load_factor == 0.0 {
			min
		} else {
			self.min_load_factor
		};
		let max_load_factor = if self.max_load_factor == 0.0 {
			max
		} else {
			self.max_load_factor
		};
		assert!(
			min_load_factor < max_load_factor,
			"min load factor must be below max load factor"
		);
		(capacity, min_load_factor, max_load_factor)
	}
}

/// Common contract of the unordered symbol tables.
///
/// # Example
///
/// ```
/// use tablekit::{ChainedMap, DoubleHashMap, HashTable};
///
/// let mut chained = ChainedMap::new();
/// let mut double = DoubleHashMap::new();
/// for (k, v) in [("Apple", 182), ("Banana", 120), ("Coconut", 1500)] {
///     chained.insert(k, v);
///     double.insert(k, v);
/// }
///
/// assert_eq!(chained.get("Coconut"), Some(&1500));
/// assert!(chained.eq_table(&double));
/// assert!(chained.any_match(|_, calories| *calories > 1000));
/// ```
pub trait HashTable<K: Eq + Hash, V> {
	fn len(&self) -> usize;

	/// Current number of slots (or buckets) in the backing array.
	fn capacity(&self) -> usize;

	/// Inserts a pair, returning the previous value bound to the key if any.
	fn insert(&mut self, key: K, value: V) -> Option<V>;

	fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash;

	/// Removes the pair bound to the key, returning its value.
	fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash;

	/// Every pair, in an order that is freshly shuffled on each call.
	fn pairs(&self) -> Vec<(&K, &V)>;

	#[inline]
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	#[inline]
	fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		self.get(key).is_some()
	}

	/// Does any pair satisfy the predicate?
	fn any_match<F: FnMut(&K, &V) -> bool>(&self, mut pred: F) -> bool
	where
		Self: Sized,
	{
		self.pairs().into_iter().any(|(k, v)| pred(k, v))
	}

	/// Do all pairs satisfy the predicate?
	fn all_match<F: FnMut(&K, &V) -> bool>(&self, mut pred: F) -> bool
	where
		Self: Sized,
	{
		self.pairs().into_iter().all(|(k, v)| pred(k, v))
	}

	/// Some pair satisfying the predicate; which one is unspecified.
	fn select_match<F: FnMut(&K, &V) -> bool>(&self, mut pred: F) -> Option<(&K, &V)>
	where
		Self: Sized,
	{
		self.pairs().into_iter().find(|(k, v)| pred(k, v))
	}

	/// Two tables are equal when they hold the same multiset of pairs,
	/// whatever their strategy, capacity or enumeration order.
	fn eq_table<M: HashTable<K, V>>(&self, other: &M) -> bool
	where
		V: PartialEq,
		Self: Sized,
	{
		if self.len() != other.len() {
			return false;
		}
		let mut unmatched = other.pairs();
		for (key, value) in self.pairs() {
			match unmatched.iter().position(|(k, v)| *k == key && *v == value) {
				Some(i) => {
					unmatched.swap_remove(i);
				}
				None => return false,
			}
		}
		true
	}
}

/// 64-bit digest of a key through the crate hasher.
#[inline]
pub(crate) fn hash_key<Q: Hash + ?Sized>(key: &Q) -> u64 {
	let mut hasher = Fnv64::new();
	key.hash(&mut hasher);
	hasher.finish()
}

/// Folds the high bits down so the power-of-two mask sees all of them.
#[inline]
pub(crate) fn spread(h: u64) -> u64 {
	h ^ (h >> 20) ^ (h >> 12) ^ (h >> 7) ^ (h >> 4)
}

/// Primary slot of a hash in a table of power-of-two `capacity`.
#[inline]
pub(crate) fn slot_of(h: u64, capacity: usize) -> usize {
	(spread(h) & (capacity as u64 - 1)) as usize
}

/// A freshly shuffled enumeration order for `n` slots.
pub(crate) fn shuffled_indices(n: usize) -> Vec<usize> {
	let mut indices: Vec<usize> = (0..n).collect();
	indices.shuffle(&mut rand::thread_rng());
	indices
}

/// A live key-value pair of an open-addressing table.
pub(crate) struct Entry<K, V> {
	pub key: K,
	pub value: V,
}

/// Slot lifecycle of the tombstone tables: `Free` has never held a pair
/// since the last rehash, `Dead` once did. Probe sequences stop at `Free`
/// and step over `Dead`.
pub(crate) enum Slot<K, V> {
	Free,
	Live(Entry<K, V>),
	Dead,
}

impl<K, V> Slot<K, V> {
	#[inline]
	pub fn is_live(&self) -> bool {
		matches!(self, Slot::Live(_))
	}

	#[inline]
	pub fn as_live(&self) -> Option<&Entry<K, V>> {
		match self {
			Slot::Live(entry) => Some(entry),
			_ => None,
		}
	}
}
