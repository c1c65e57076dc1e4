//! In-memory generic data structures and the primitives supporting them.
//!
//! The crate is organized around three cores and their collaborators:
//!
//! - [`ordered`]: four ordered symbol tables — [`BstMap`], [`AvlMap`],
//!   [`LlrbMap`] and [`BTreeMap`] — behind the uniform [`OrderedMap`]
//!   contract, order statistics and six traversal orders included.
//! - [`hashed`]: four unordered symbol tables — [`ChainedMap`],
//!   [`LinearProbeMap`], [`QuadraticProbeMap`] and [`DoubleHashMap`] —
//!   behind the uniform [`HashTable`] contract, with load-factor driven
//!   resizing and deliberately non-deterministic enumeration.
//! - [`range`]: the half-open interval algebra of [`Range`], and the
//!   [`RangeList`] / [`RangeMap`] collections built on it.
//!
//! Around them: [`digest`] (deterministic 64-bit hashing of typed scalars
//! and slices, also the hash layer of the tables), [`graph`] (adjacency
//! containers and traversals) and [`linked`] (linked-block stack and
//! queue, the workhorses of the iterative traversals).
//!
//! The `dot` feature adds Graphviz emission to the graphs and trees; the
//! `serde` feature derives `Serialize`/`Deserialize` for the plain-data
//! types.

pub mod digest;
pub mod graph;
pub mod hashed;
pub mod linked;
pub mod ordered;
pub mod range;
pub(crate) mod utils;

pub use digest::{digest_of, Digest, Fnv64, Fnv64Builder};
pub use hashed::{
	ChainedMap, DoubleHashMap, HashOpts, HashTable, LinearProbeMap, QuadraticProbeMap,
};
pub use ordered::{AvlMap, BTreeMap, BstMap, LlrbMap, OrderedMap, Traversal};
pub use range::{Range, RangeBound, RangeList, RangeListOpts, RangeMap};
