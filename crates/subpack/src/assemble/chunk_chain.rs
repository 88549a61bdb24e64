use subpack_common::{ChunkGroup, ChunkIdx};

/// Load order of an initial chunk group: `[runtime, ...shared, entry]`.
#[derive(Debug, Clone, Copy)]
pub struct ChunkChain<'a> {
  pub runtime: ChunkIdx,
  pub shared: &'a [ChunkIdx],
  pub entry: ChunkIdx,
}

impl<'a> ChunkChain<'a> {
  /// `None` for groups that never split into a runtime and an entry chunk.
  pub fn from_group(group: &'a ChunkGroup) -> Option<Self> {
    match group.chunks.as_slice() {
      [runtime, shared @ .., entry] => Some(Self { runtime: *runtime, shared, entry: *entry }),
      _ => None,
    }
  }

  /// Chunks the entry chunk has to load before its own code runs, in order.
  pub fn entry_dependencies(&self) -> Vec<ChunkIdx> {
    std::iter::once(self.runtime).chain(self.shared.iter().copied()).collect()
  }
}

#[test]
fn test_chunk_chain() {
  let idx = ChunkIdx::from_usize;

  let empty = ChunkGroup::initial("empty", vec![]);
  let single = ChunkGroup::initial("single", vec![idx(0)]);
  assert!(ChunkChain::from_group(&empty).is_none());
  assert!(ChunkChain::from_group(&single).is_none());

  let pair = ChunkGroup::initial("pair", vec![idx(0), idx(1)]);
  let chain = ChunkChain::from_group(&pair).unwrap();
  assert_eq!((chain.runtime, chain.entry), (idx(0), idx(1)));
  assert!(chain.shared.is_empty());

  let split = ChunkGroup::initial("split", vec![idx(0), idx(2), idx(3), idx(1)]);
  let chain = ChunkChain::from_group(&split).unwrap();
  assert_eq!(chain.shared, &[idx(2), idx(3)]);
  assert_eq!(chain.entry, idx(1));
  assert_eq!(chain.entry_dependencies(), vec![idx(0), idx(2), idx(3)]);
}
