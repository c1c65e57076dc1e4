use std::borrow::Borrow;

use smallvec::SmallVec;

/// One slot of a B-tree node.
///
/// Leaf entries carry a value and no child; internal entries carry a child
/// and no value. The key of the first entry of an internal node is a
/// sentinel: it only anchors the leftmost subtree and is never compared.
pub(crate) struct Entry<K, V> {
	pub key: K,
	pub value: Option<V>,
	pub child: Option<Box<Node<K, V>>>,
}

impl<K, V> Entry<K, V> {
	pub fn leaf(key: K, value: V) -> Entry<K, V> {
		Entry {
			key,
			value: Some(value),
			child: None,
		}
	}

	pub fn internal(key: K, child: Box<Node<K, V>>) -> Entry<K, V> {
		Entry {
			key,
			value: None,
			child: Some(child),
		}
	}

	#[inline]
	pub fn child(&self) -> &Node<K, V> {
		self.child.as_deref().expect("entry without child")
	}

	#[inline]
	pub fn child_mut(&mut self) -> &mut Node<K, V> {
		self.child.as_deref_mut().expect("entry without child")
	}
}

/// A B-tree node holding up to `order` entries.
///
/// `size` counts the leaf pairs of the whole subtree, not the entries of
/// this node.
pub(crate) struct Node<K, V> {
	pub entries: SmallVec<[Entry<K, V>; 8]>,
	pub size: usize,
}

impl<K, V> Node<K, V> {
	pub fn empty_leaf() -> Node<K, V> {
		Node {
			entries: SmallVec::new(),
			size: 0,
		}
	}

	#[inline]
	pub fn is_leaf(&self) -> bool {
		self.entries.first().map_or(true, |e| e.child.is_none())
	}

	/// Index of the child whose key interval contains `key`, by linear scan.
	/// The sentinel key at index 0 is skipped; a key equal to a separator
	/// routes into the separator's own child.
	pub fn child_index<Q: ?Sized>(&self, key: &Q) -> usize
	where
		K: Borrow<Q>,
		Q: Ord,
	{
		let mut index = 0;
		for (i, entry) in self.entries.iter().enumerate().skip(1) {
			if key >= entry.key.borrow() {
				index = i;
			} else {
				break;
			}
		}
		index
	}
}

impl<K: Clone, V> Node<K, V> {
	/// Splits a full node into two halves of `order / 2` entries and returns
	/// the entry to insert into the parent: a copy of the right half's first
	/// key over the new right node.
	pub fn split(&mut self, order: usize) -> Entry<K, V> {
		debug_assert_eq!(self.entries.len(), order);
		let right_entries: SmallVec<[Entry<K, V>; 8]> =
			self.entries.drain(order / 2..).collect();
		let right_size = if right_entries[0].child.is_some() {
			right_entries.iter().map(|e| e.child().size).sum()
		} else {
			right_entries.len()
		};
		self.size -= right_size;
		let right = Node {
			entries: right_entries,
			size: right_size,
		};
		Entry::internal(right.entries[0].key.clone(), Box::new(right))
	}

	/// Restores the occupancy of the underflowing child `j` by borrowing an
	/// entry from a richer sibling or, failing that, merging two siblings.
	/// Separator keys are rewritten so every child interval stays exact.
	pub fn rebalance_child(&mut self, j: usize, order: usize) {
		let min = order / 2;
		if j > 0 && self.entries[j - 1].child().entries.len() > min {
			self.borrow_from_left(j);
		} else if j + 1 < self.entries.len() && self.entries[j + 1].child().entries.len() > min {
			self.borrow_from_right(j);
		} else if j > 0 {
			self.merge_children(j - 1);
		} else {
			self.merge_children(j);
		}
	}

	fn borrow_from_left(&mut self, j: usize) {
		let moved = {
			let left = self.entries[j - 1].child_mut();
			let moved = left.entries.pop().expect("borrow from empty sibling");
			let moved_size = moved.child.as_deref().map_or(1, |c| c.size);
			left.size -= moved_size;
			moved
		};
		let moved_size = moved.child.as_deref().map_or(1, |c| c.size);
		let separator = moved.key.clone();
		let old_separator = self.entries[j].key.clone();
		let child = self.entries[j].child_mut();
		if !child.is_leaf() {
			// the old sentinel key becomes a real routing key
			child.entries[0].key = old_separator;
		}
		child.entries.insert(0, moved);
		child.size += moved_size;
		self.entries[j].key = separator;
	}

	fn borrow_from_right(&mut self, j: usize) {
		let (moved, new_separator) = {
			let old_separator = self.entries[j + 1].key.clone();
			let right = self.entries[j + 1].child_mut();
			let mut moved = right.entries.remove(0);
			if moved.child.is_some() {
				// the moved sentinel gets its real lower bound back
				moved.key = old_separator;
			}
			let moved_size = moved.child.as_deref().map_or(1, |c| c.size);
			right.size -= moved_size;
			(moved, right.entries[0].key.clone())
		};
		let moved_size = moved.child.as_deref().map_or(1, |c| c.size);
		{
			let child = self.entries[j].child_mut();
			child.entries.push(moved);
			child.size += moved_size;
		}
		self.entries[j + 1].key = new_separator;
	}

	/// Merges child `j + 1` into child `j` and drops the separator entry.
	fn merge_children(&mut self, j: usize) {
		let mut removed = self.entries.remove(j + 1);
		let right = removed.child.take().expect("merge without child");
		let mut right = *right;
		if !right.is_leaf() {
			right.entries[0].key = removed.key;
		}
		let child = self.entries[j].child_mut();
		child.size += right.size;
		child.entries.extend(right.entries.drain(..));
	}
}
