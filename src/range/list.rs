//! Sorted, non-overlapping range lists.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;

use super::{cmp_hi_lo, cmp_lo_lo, join, Range, RangeBound};

/// Presentation options for a [`RangeList`].
///
/// `format` overrides the [`fmt::Display`] rendering of the whole list;
/// the default prints the ranges in braces.
pub struct RangeListOpts<T> {
	pub format: Option<fn(&[Range<T>]) -> String>,
}

impl<T> Default for RangeListOpts<T> {
	fn default() -> RangeListOpts<T> {
		RangeListOpts { format: None }
	}
}

/// A set of points kept as sorted, pairwise disjoint, non-touching ranges.
///
/// Every mutation restores the canonical form: ranges are sorted by their
/// low bound, and any two ranges that overlap or are adjacent (in the
/// sense of [`Range::adjacent`]) are joined into one. Two lists built from
/// any insertion orders of the same ranges are therefore equal.
///
/// # Example
///
/// ```
/// use tablekit::{Range, RangeList};
///
/// let mut list = RangeList::new();
/// list.add(Range::closed(10.0, 20.0));
/// list.add(Range::closed(20.0, 40.0));
/// list.add(Range::closed(2.0, 4.0));
///
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.find(15.0), Some(&Range::closed(10.0, 40.0)));
/// assert_eq!(list.find(50.0), None);
/// ```
pub struct RangeList<T> {
	ranges: Vec<Range<T>>,
	format: Option<fn(&[Range<T>]) -> String>,
}

impl<T: PartialOrd + Copy> RangeList<T> {
	/// Creates an empty list.
	pub fn new() -> RangeList<T> {
		RangeList::with_opts(RangeListOpts::default())
	}

	/// Creates an empty list with presentation options.
	pub fn with_opts(opts: RangeListOpts<T>) -> RangeList<T> {
		RangeList {
			ranges: Vec::new(),
			format: opts.format,
		}
	}

	/// Builds a list from arbitrary ranges: sorts them by low bound and
	/// joins everything that overlaps or touches.
	pub fn from_vec(mut ranges: Vec<Range<T>>) -> RangeList<T> {
		ranges.sort_by(|a, b| cmp_lo_lo(&a.lo(), &b.lo()));
		let mut list = RangeList::new();
		for range in ranges {
			match list.ranges.last_mut() {
				Some(last) if last.overlaps(&range) || last.adjacent(&range).0 => {
					*last = join(last, &range);
				}
				_ => list.ranges.push(range),
			}
		}
		list
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}

	#[inline]
	pub fn iter(&self) -> std::slice::Iter<Range<T>> {
		self.ranges.iter()
	}

	#[inline]
	pub fn as_slice(&self) -> &[Range<T>] {
		&self.ranges
	}

	/// Inserts a range and re-joins its neighborhood.
	pub fn add(&mut self, range: Range<T>) {
		let position = match self
			.ranges
			.binary_search_by(|stored| cmp_lo_lo(&stored.lo(), &range.lo()))
		{
			Ok(i) | Err(i) => i,
		};
		self.ranges.insert(position, range);
		self.coalesce_around(position);
	}

	/// The stored range containing the point, if any.
	pub fn find(&self, value: T) -> Option<&Range<T>> {
		let probe = RangeBound::closed(value);
		let candidate = match self
			.ranges
			.binary_search_by(|stored| cmp_lo_lo(&stored.lo(), &probe))
		{
			Ok(i) => i,
			Err(0) => return None,
			Err(i) => i - 1,
		};
		let stored = &self.ranges[candidate];
		if stored.contains(value) {
			Some(stored)
		} else {
			None
		}
	}

	/// Subtracts the range from every stored range it overlaps, splitting
	/// or dropping stored ranges as needed.
	pub fn remove(&mut self, range: Range<T>) {
		let mut kept = Vec::with_capacity(self.ranges.len() + 1);
		for stored in self.ranges.drain(..) {
			if cmp_hi_lo(&range.hi(), &stored.lo()) == Ordering::Less {
				// the target ends before this range: nothing further overlaps
				kept.push(stored);
			} else if stored.overlaps(&range) {
				let (left, right) = stored.subtract(&range);
				kept.extend(left);
				kept.extend(right);
			} else {
				kept.push(stored);
			}
		}
		self.ranges = kept;
	}

	/// Joins the inserted range at `position` with overlapping or adjacent
	/// neighbors, cascading rightwards while the joined range grows.
	fn coalesce_around(&mut self, position: usize) {
		let mut i = position.saturating_sub(1);
		while i + 1 < self.ranges.len() {
			let current = self.ranges[i];
			let next = self.ranges[i + 1];
			if current.overlaps(&next) || current.adjacent(&next).0 {
				self.ranges[i] = join(&current, &next);
				self.ranges.remove(i + 1);
			} else if i < position {
				i += 1;
			} else {
				break;
			}
		}
	}
}

impl<T: PartialOrd + Copy> Default for RangeList<T> {
	fn default() -> RangeList<T> {
		RangeList::new()
	}
}

impl<T: PartialOrd + Copy> PartialEq for RangeList<T> {
	fn eq(&self, other: &RangeList<T>) -> bool {
		self.ranges == other.ranges
	}
}

impl<T: PartialOrd + Copy + fmt::Debug> fmt::Debug for RangeList<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_set().entries(self.ranges.iter()).finish()
	}
}

impl<T: PartialOrd + Copy + fmt::Display> fmt::Display for RangeList<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if let Some(format) = self.format {
			return f.write_str(&format(&self.ranges));
		}
		write!(f, "{{")?;
		for (i, range) in self.ranges.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{}", range)?;
		}
		write!(f, "}}")
	}
}

impl<T: PartialOrd + Copy> Extend<Range<T>> for RangeList<T> {
	fn extend<I: IntoIterator<Item = Range<T>>>(&mut self, iter: I) {
		for range in iter {
			self.add(range);
		}
	}
}

impl<T: PartialOrd + Copy> FromIterator<Range<T>> for RangeList<T> {
	fn from_iter<I: IntoIterator<Item = Range<T>>>(iter: I) -> RangeList<T> {
		RangeList::from_vec(iter.into_iter().collect())
	}
}

impl<'a, T: PartialOrd + Copy> IntoIterator for &'a RangeList<T> {
	type Item = &'a Range<T>;
	type IntoIter = std::slice::Iter<'a, Range<T>>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
