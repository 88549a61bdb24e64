pub mod chunk_idx;
pub mod entry_point;
pub mod entry_role;
pub mod host_profile;
pub mod output_asset;
pub mod output_assets;
pub mod package_name;
pub mod placement;
pub mod resource_kind;
pub mod source;
pub mod source_joiner;
