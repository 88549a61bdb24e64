mod accumulator;
mod assemble;
mod graph;
mod grouping;
mod output_writer;
mod pack_context;
mod registry;
mod types;
mod utils;

pub use crate::{
  accumulator::{AssetAccumulator, ExtractedFile},
  assemble::{RuntimeChunkAssembler, chunk_chain::ChunkChain},
  graph::ChunkGraph,
  grouping::{
    CacheGroupSet,
    cache_group::{CacheGroup, ChunkScope, ChunkUsage, PackageScope},
  },
  output_writer::OutputWriter,
  pack_context::{PACKAGE_NAME_QUERY, PackContext},
  registry::{entry_registry::EntryRegistry, placement_registry::PlacementRegistry},
  types::{SharedOptions, bundle_output::BundleOutput},
  utils::normalize_options::normalize_options,
};
pub use subpack_common::*;
pub use subpack_error::{BuildDiagnostic, BuildError, BuildResult};
