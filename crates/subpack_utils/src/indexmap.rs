use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

pub trait FxIndexMapExt {
  fn with_fx_capacity(capacity: usize) -> Self;
}

impl<K, V> FxIndexMapExt for FxIndexMap<K, V> {
  fn with_fx_capacity(capacity: usize) -> Self {
    Self::with_capacity_and_hasher(capacity, BuildHasherDefault::default())
  }
}
