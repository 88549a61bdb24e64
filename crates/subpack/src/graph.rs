use oxc_index::IndexVec;
use subpack_common::{Chunk, ChunkGroup, ChunkIdx, EntryPoint};

/// The finalized chunk graph handed over by the bundler once modules are sealed.
#[derive(Debug, Default)]
pub struct ChunkGraph {
  pub chunk_table: IndexVec<ChunkIdx, Chunk>,
  pub chunk_groups: Vec<ChunkGroup>,
  /// Entries in the order they were prepared. The first one is the root entry.
  pub entry_points: Vec<EntryPoint>,
}

impl ChunkGraph {
  pub fn new(entry_points: Vec<EntryPoint>) -> Self {
    Self { entry_points, ..Self::default() }
  }

  pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkIdx {
    self.chunk_table.push(chunk)
  }

  pub fn add_chunk_group(&mut self, chunk_group: ChunkGroup) {
    self.chunk_groups.push(chunk_group);
  }

  pub fn root_entry_name(&self) -> Option<&str> {
    self.entry_points.first().map(|entry| entry.name.as_str())
  }

  pub fn initial_chunk_groups(&self) -> impl Iterator<Item = &ChunkGroup> {
    self.chunk_groups.iter().filter(|group| group.is_initial)
  }
}
