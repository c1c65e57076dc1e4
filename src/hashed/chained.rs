//! Separate chaining.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::mem;

use super::{hash_key, shuffled_indices, slot_of, HashOpts, HashTable};

const DEFAULT_CAPACITY: usize = 4;
const DEFAULT_MIN_LOAD: f64 = 2.0;
const DEFAULT_MAX_LOAD: f64 = 10.0;

struct ChainNode<K, V> {
	key: K,
	value: V,
	next: Option<Box<ChainNode<K, V>>>,
}

/// An unordered map with one LIFO collision chain per bucket.
///
/// New keys are prepended to their bucket's chain, so a chain enumerates
/// its colliders newest first. The bucket count doubles once chains hold
/// ten entries each on average and halves when they thin out to two.
///
/// # Example
///
/// ```
/// use tablekit::{ChainedMap, HashTable};
///
/// let mut map = ChainedMap::new();
/// map.insert("Banana", 120);
/// map.insert("Coconut", 1500);
///
/// assert_eq!(map.remove("Banana"), Some(120));
/// assert_eq!(map.get("Banana"), None);
/// ```
pub struct ChainedMap<K, V> {
	buckets: Vec<Option<Box<ChainNode<K, V>>>>,
	len: usize,
	min_capacity: usize,
	min_load_factor: f64,
	max_load_factor: f64,
}

impl<K: Eq + Hash, V> ChainedMap<K, V> {
	/// Creates an empty map with the default sizing policy.
	pub fn new() -> ChainedMap<K, V> {
		ChainedMap::with_opts(HashOpts::default())
	}

	/// Creates an empty map with an explicit sizing policy.
	///
	/// # Panics
	///
	/// Panics when the options violate the [`HashOpts`] contract.
	pub fn with_opts(opts: HashOpts) -> ChainedMap<K, V> {
		let (capacity, min_load_factor, max_load_factor) =
			opts.resolve(DEFAULT_CAPACITY, DEFAULT_MIN_LOAD, DEFAULT_MAX_LOAD);
		ChainedMap {
			buckets: new_buckets(capacity),
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
		self.buckets.len()
	}

	pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let bucket = slot_of(hash_key(key), self.buckets.len());
		let mut cursor = self.buckets[bucket].as_deref();
		while let Some(node) = cursor {
			if node.key.borrow() == key {
				return Some(&node.value);
			}
			cursor = node.next.as_deref();
		}
		None
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
		if self.len as f64 / self.buckets.len() as f64 >= self.max_load_factor {
			self.resize(self.buckets.len() * 2);
		}
		let bucket = slot_of(hash_key(&key), self.buckets.len());
		if let Some(slot) = find_value_mut(&mut self.buckets[bucket], &key) {
			return Some(mem::replace(slot, value));
		}
		let head = self.buckets[bucket].take();
		self.buckets[bucket] = Some(Box::new(ChainNode {
			key,
			value,
			next: head,
		}));
		self.len += 1;
		None
	}

	pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let bucket = slot_of(hash_key(key), self.buckets.len());
		let removed = unlink(&mut self.buckets[bucket], key);
		if removed.is_some() {
			self.len -= 1;
			let capacity = self.buckets.len();
			if capacity > self.min_capacity
				&& self.len as f64 / capacity as f64 <= self.min_load_factor
			{
				self.resize(capacity / 2);
			}
		}
		removed
	}

	pub fn pairs(&self) -> Vec<(&K, &V)> {
		let mut out = Vec::with_capacity(self.len);
		for bucket in shuffled_indices(self.buckets.len()) {
			let mut cursor = self.buckets[bucket].as_deref();
			while let Some(node) = cursor {
				out.push((&node.key, &node.value));
				cursor = node.next.as_deref();
			}
		}
		out
	}

	fn resize(&mut self, capacity: usize) {
		let old = mem::replace(&mut self.buckets, new_buckets(capacity));
		for head in old {
			let mut cursor = head;
			while let Some(node) = cursor {
				let node = *node;
				cursor = node.next;
				let bucket = slot_of(hash_key(&node.key), capacity);
				let head = self.buckets[bucket].take();
				self.buckets[bucket] = Some(Box::new(ChainNode {
					key: node.key,
					value: node.value,
					next: head,
				}));
			}
		}
	}

	/// Checks that every node sits in the bucket its key hashes to and that
	/// the length matches the chain contents.
	#[cfg(debug_assertions)]
	pub fn validate(&self) {
		let mut counted = 0;
		for (bucket, head) in self.buckets.iter().enumerate() {
			let mut cursor = head.as_deref();
			while let Some(node) = cursor {
				assert_eq!(
					slot_of(hash_key(&node.key), self.buckets.len()),
					bucket,
					"node in the wrong bucket"
				);
				counted += 1;
				cursor = node.next.as_deref();
			}
		}
		assert_eq!(counted, self.len, "stale length");
	}
}

fn new_buckets<K, V>(capacity: usize) -> Vec<Option<Box<ChainNode<K, V>>>> {
	let mut buckets = Vec::with_capacity(capacity);
	buckets.resize_with(capacity, || None);
	buckets
}

/// The value slot of the chain node matching `key`, if any.
fn find_value_mut<'a, K, V, Q: ?Sized>(
	link: &'a mut Option<Box<ChainNode<K, V>>>,
	key: &Q,
) -> Option<&'a mut V>
where
	K: Borrow<Q>,
	Q: Eq,
{
	let found = match link.as_deref() {
		None => return None,
		Some(node) => node.key.borrow() == key,
	};
	if found {
		Some(&mut link.as_deref_mut().unwrap().value)
	} else {
		find_value_mut(&mut link.as_deref_mut().unwrap().next, key)
	}
}

/// Unlinks the chain node matching `key` and returns its value.
fn unlink<K, V, Q: ?Sized>(link: &mut Option<Box<ChainNode<K, V>>>, key: &Q) -> Option<V>
where
	K: Borrow<Q>,
	Q: Eq,
{
	let found = match link.as_deref() {
		None => return None,
		Some(node) => node.key.borrow() == key,
	};
	if found {
		let node = *link.take().unwrap();
		*link = node.next;
		Some(node.value)
	} else {
		unlink(&mut link.as_deref_mut().unwrap().next, key)
	}
}

impl<K: Eq + Hash, V> HashTable<K, V> for ChainedMap<K, V> {
	#[inline]
	fn len(&self) -> usize {
		ChainedMap::len(self)
	}

	#[inline]
	fn capacity(&self) -> usize {
		ChainedMap::capacity(self)
	}

	#[inline]
	fn insert(&mut self, key: K, value: V) -> Option<V> {
		ChainedMap::insert(self, key, value)
	}

	#[inline]
	fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		ChainedMap::get(self, key)
	}

	#[inline]
	fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		ChainedMap::remove(self, key)
	}

	#[inline]
	fn pairs(&self) -> Vec<(&K, &V)> {
		ChainedMap::pairs(self)
	}
}

impl<K: Eq + Hash, V> Default for ChainedMap<K, V> {
	fn default() -> ChainedMap<K, V> {
		ChainedMap::new()
	}
}

impl<K: Eq + Hash + fmt::Debug, V: fmt::Debug> fmt::Debug for ChainedMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_map().entries(self.pairs()).finish()
	}
}

impl<K: Eq + Hash, V> Extend<(K, V)> for ChainedMap<K, V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for ChainedMap<K, V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> ChainedMap<K, V> {
		let mut map = ChainedMap::new();
		map.extend(iter);
		map
	}
}
