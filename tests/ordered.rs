use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use tablekit::{AvlMap, BTreeMap, BstMap, LlrbMap, OrderedMap, Traversal};

fn items() -> Vec<(u32, u32)> {
	let mut rng = SmallRng::seed_from_u64(0x07d3_73d1);
	let mut keys: Vec<u32> = (0..200).map(|i| i * 3 + 1).collect();
	keys.shuffle(&mut rng);
	keys.into_iter().map(|k| (k, k.wrapping_mul(7))).collect()
}

macro_rules! ordered_map_suite {
	($name:ident, $map:ty) => {
		mod $name {
			use super::*;

			#[test]
			fn insert_get_remove() {
				let items = items();
				let mut map = <$map>::new();
				for (i, (key, value)) in items.iter().enumerate() {
					assert_eq!(map.insert(*key, *value), None);
					map.validate();
					assert_eq!(map.len(), i + 1);
				}
				for (key, value) in &items {
					assert_eq!(map.get(key), Some(value));
				}
				assert_eq!(map.get(&0), None);

				// overwriting returns the old value and keeps the size
				assert_eq!(map.insert(items[0].0, 1), Some(items[0].1));
				assert_eq!(map.len(), items.len());
				assert_eq!(map.insert(items[0].0, items[0].1), Some(1));

				let mut doomed = items.clone();
				doomed.shuffle(&mut SmallRng::seed_from_u64(17));
				for (i, (key, value)) in doomed.iter().enumerate() {
					assert_eq!(map.remove(key), Some(*value));
					assert_eq!(map.remove(key), None);
					map.validate();
					assert_eq!(map.len(), items.len() - i - 1);
				}
				assert!(map.is_empty());
				assert_eq!(map.height(), 0);
			}

			#[test]
			fn rank_select_roundtrip() {
				let items = items();
				let map: $map = items.iter().copied().collect();
				let mut sorted: Vec<u32> = items.iter().map(|(k, _)| *k).collect();
				sorted.sort();

				for (i, key) in sorted.iter().enumerate() {
					let (selected, _) = map.select(i).unwrap();
					assert_eq!(selected, key);
					assert_eq!(map.rank(key), i);
				}
				assert_eq!(map.select(map.len()), None);
				// rank of an absent key counts the keys below it
				assert_eq!(map.rank(&0), 0);
				assert_eq!(map.rank(&u32::MAX), map.len());
			}

			#[test]
			fn floor_and_ceiling() {
				let mut map = <$map>::new();
				for key in [10u32, 20, 30, 40] {
					map.insert(key, key);
				}
				assert_eq!(map.floor(&25).map(|(k, _)| *k), Some(20));
				assert_eq!(map.ceiling(&25).map(|(k, _)| *k), Some(30));
				assert_eq!(map.floor(&20).map(|(k, _)| *k), Some(20));
				assert_eq!(map.ceiling(&20).map(|(k, _)| *k), Some(20));
				assert_eq!(map.floor(&5), None);
				assert_eq!(map.ceiling(&45), None);
				assert_eq!(map.first_key_value().map(|(k, _)| *k), Some(10));
				assert_eq!(map.last_key_value().map(|(k, _)| *k), Some(40));
			}

			#[test]
			fn range_queries() {
				let items = items();
				let map: $map = items.iter().copied().collect();
				let mut sorted: Vec<u32> = items.iter().map(|(k, _)| *k).collect();
				sorted.sort();

				let (lo, hi) = (sorted[20], sorted[80]);
				let keys: Vec<u32> = map.range(&lo, &hi).iter().map(|(k, _)| **k).collect();
				let expected: Vec<u32> = sorted
					.iter()
					.copied()
					.filter(|k| (lo..=hi).contains(k))
					.collect();
				assert_eq!(keys, expected);
				assert_eq!(map.range_len(&lo, &hi), expected.len());
				// bounds need not be stored keys
				assert_eq!(map.range_len(&(lo + 1), &(hi - 1)), expected.len() - 2);
				assert!(map.range(&hi, &lo).is_empty());
				assert_eq!(map.range_len(&hi, &lo), 0);
			}

			#[test]
			fn traversal_orders() {
				let items = items();
				let map: $map = items.iter().copied().collect();
				let mut sorted: Vec<u32> = items.iter().map(|(k, _)| *k).collect();
				sorted.sort();

				let collect = |order: Traversal| {
					let mut keys = Vec::new();
					map.traverse(order, &mut |k, _| {
						keys.push(*k);
						true
					});
					keys
				};
				assert_eq!(collect(Traversal::Inorder), sorted);
				let mut reversed = sorted.clone();
				reversed.reverse();
				assert_eq!(collect(Traversal::ReverseInorder), reversed);

				// the structural orders are deterministic per insertion order
				let again: $map = items.iter().copied().collect();
				let mut preorder = Vec::new();
				again.traverse(Traversal::Preorder, &mut |k, _| {
					preorder.push(*k);
					true
				});
				assert_eq!(collect(Traversal::Preorder), preorder);

				// an unwilling visitor stops the walk cold
				let mut seen = Vec::new();
				map.traverse(Traversal::Inorder, &mut |k, _| {
					seen.push(*k);
					seen.len() < 3
				});
				assert_eq!(&seen[..], &sorted[..3]);
			}

			#[test]
			fn pop_drains_in_order() {
				let items = items();
				let mut map: $map = items.iter().copied().collect();
				let mut sorted: Vec<u32> = items.iter().map(|(k, _)| *k).collect();
				sorted.sort();

				let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
				assert_eq!(map.pop_first().map(|(k, _)| k), Some(min));
				assert_eq!(map.pop_last().map(|(k, _)| k), Some(max));
				map.validate();
				assert_eq!(map.len(), items.len() - 2);

				let mut drained = Vec::new();
				while let Some((key, _)) = map.pop_first() {
					drained.push(key);
					map.validate();
				}
				assert_eq!(&drained[..], &sorted[1..sorted.len() - 1]);
				assert_eq!(map.pop_first(), None);
				assert_eq!(map.pop_last(), None);
			}

			#[test]
			fn equality_ignores_shape() {
				let items = items();
				let ascending: $map = {
					let mut sorted = items.clone();
					sorted.sort();
					sorted.into_iter().collect()
				};
				let shuffled: $map = items.iter().copied().collect();
				assert!(ascending.eq_map(&shuffled));
				assert!(ascending == shuffled);

				let mut smaller: $map = items.iter().copied().collect();
				smaller.remove(&items[0].0);
				assert!(!smaller.eq_map(&shuffled));

				let mut other_value: $map = items.iter().copied().collect();
				other_value.insert(items[0].0, 0);
				assert!(!other_value.eq_map(&shuffled));
			}
		}
	};
}

ordered_map_suite!(bst, BstMap<u32, u32>);
ordered_map_suite!(avl, AvlMap<u32, u32>);
ordered_map_suite!(llrb, LlrbMap<u32, u32>);
ordered_map_suite!(btree, BTreeMap<u32, u32>);

#[test]
fn implementations_agree_pairwise() {
	let items = items();
	let bst: BstMap<u32, u32> = items.iter().copied().collect();
	let avl: AvlMap<u32, u32> = items.iter().copied().collect();
	let llrb: LlrbMap<u32, u32> = items.iter().copied().collect();
	let btree: BTreeMap<u32, u32> = items.iter().copied().collect();

	assert!(bst.eq_map(&avl));
	assert!(avl.eq_map(&llrb));
	assert!(llrb.eq_map(&btree));
	assert!(btree.eq_map(&bst));
}

#[test]
fn mixed_workload_matches_oracle() {
	let mut rng = SmallRng::seed_from_u64(0xa5a5);
	let mut oracle = std::collections::BTreeMap::new();
	let mut avl = AvlMap::new();
	let mut llrb = LlrbMap::new();
	let mut btree = BTreeMap::with_order(4);

	for _ in 0..2000 {
		let key: u16 = rng.gen_range(0..300);
		if rng.gen_bool(0.6) {
			let value: u16 = rng.gen();
			assert_eq!(avl.insert(key, value), llrb.insert(key, value));
			assert_eq!(oracle.insert(key, value), btree.insert(key, value));
		} else {
			assert_eq!(avl.remove(&key), llrb.remove(&key));
			assert_eq!(oracle.remove(&key), btree.remove(&key));
		}
		assert_eq!(avl.len(), oracle.len());
	}
	avl.validate();
	llrb.validate();
	btree.validate();

	let expected: Vec<(u16, u16)> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
	let mut traversed = Vec::new();
	llrb.traverse(Traversal::Inorder, &mut |k, v| {
		traversed.push((*k, *v));
		true
	});
	assert_eq!(traversed, expected);
}

// the "ABCDE" calibration tree
#[test]
fn llrb_abcde() {
	let mut map = LlrbMap::new();
	for key in ["B", "A", "C", "E", "D"] {
		map.insert(key, ());
		map.validate();
	}

	assert_eq!(map.len(), 5);
	assert_eq!(map.height(), 3);

	let mut ascending = Vec::new();
	map.traverse(Traversal::Inorder, &mut |k, _| {
		ascending.push(*k);
		true
	});
	assert_eq!(ascending, ["A", "B", "C", "D", "E"]);

	let mut preorder = Vec::new();
	map.traverse(Traversal::Preorder, &mut |k, _| {
		preorder.push(*k);
		true
	});
	assert_eq!(preorder, ["D", "B", "A", "C", "E"]);

	assert_eq!(map.rank(&"D"), 3);
	assert_eq!(map.floor(&"D").map(|(k, _)| *k), Some("D"));
	assert_eq!(map.ceiling(&"E").map(|(k, _)| *k), Some("E"));
	assert_eq!(map.select(2).map(|(k, _)| *k), Some("C"));
}

// the seven-words calibration tree
#[test]
fn avl_seven_words() {
	let words = [
		("box", 2),
		("dad", 3),
		("baby", 5),
		("dome", 7),
		("band", 11),
		("dance", 13),
		("balloon", 17),
	];
	let mut map = AvlMap::new();
	for (word, value) in words {
		map.insert(word, value);
		map.validate();
	}

	assert_eq!(map.len(), 7);
	assert_eq!(map.height(), 3);

	let mut ascending = Vec::new();
	map.traverse(Traversal::Inorder, &mut |k, _| {
		ascending.push(*k);
		true
	});
	assert_eq!(
		ascending,
		["baby", "balloon", "band", "box", "dad", "dance", "dome"]
	);

	let mut reordered = words;
	reordered.reverse();
	let other: AvlMap<&str, i32> = reordered.iter().copied().collect();
	assert!(map.eq_map(&other));
}

#[test]
fn borrowed_key_lookups() {
	let mut map: LlrbMap<String, usize> = LlrbMap::new();
	for word in ["alpha", "beta", "gamma"] {
		map.insert(word.to_string(), word.len());
	}
	assert_eq!(map.get("beta"), Some(&4));
	assert_eq!(map.floor("bb").map(|(k, _)| k.as_str()), Some("beta"));
	assert_eq!(map.rank("z"), 3);
	assert_eq!(map.remove("alpha"), Some(5));
	assert_eq!(map.len(), 2);
}
