mod chunk;
mod pack_options;
mod types;

pub use pack_options::{
  PackOptions, normalized_pack_options::NormalizedPackOptions, write_mode::WriteMode,
};

pub use crate::{
  chunk::{Chunk, chunk_group::ChunkGroup},
  types::{
    chunk_idx::ChunkIdx,
    entry_point::EntryPoint,
    entry_role::EntryRole,
    host_profile::{GlobalContext, HostProfile},
    output_asset::OutputAsset,
    output_assets::OutputAssets,
    package_name::{MAIN_PACKAGE, PackageName},
    placement::{PackageInfo, PlacementRequest, PlacementResult},
    resource_kind::ResourceKind,
    source::Source,
    source_joiner::SourceJoiner,
  },
};
