use arcstr::ArcStr;

use crate::ChunkIdx;

/// Chunks that must be loaded together for one entry point, in load order.
#[derive(Debug, Default, Clone)]
pub struct ChunkGroup {
  pub name: Option<ArcStr>,
  /// Reachable from an entry without a dynamic import.
  pub is_initial: bool,
  pub chunks: Vec<ChunkIdx>,
}

impl ChunkGroup {
  pub fn initial(name: impl Into<ArcStr>, chunks: Vec<ChunkIdx>) -> Self {
    Self { name: Some(name.into()), is_initial: true, chunks }
  }
}
