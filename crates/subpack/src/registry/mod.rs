pub mod entry_registry;
pub mod placement_registry;
