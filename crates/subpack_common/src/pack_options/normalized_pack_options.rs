use std::path::PathBuf;

use crate::{HostProfile, WriteMode};

#[derive(Debug)]
pub struct NormalizedPackOptions {
  // --- Host
  pub host: HostProfile,
  pub src_host: HostProfile,

  // --- Assembly
  /// Key the runtime chunk publishes its loader handle under.
  pub loader_key: String,
  /// Chunk name of the plugin/library entry whose content becomes `module.exports`.
  pub plugin_main: Option<String>,
  pub auto_split: bool,

  // --- Output
  pub output_dir: PathBuf,
  pub write_mode: WriteMode,
}

impl NormalizedPackOptions {
  pub fn is_plugin_main(&self, chunk_name: Option<&str>) -> bool {
    matches!((self.plugin_main.as_deref(), chunk_name), (Some(main), Some(name)) if main == name)
  }

  /// The loader key as a JavaScript string literal.
  pub fn loader_key_literal(&self) -> String {
    serde_json::to_string(&self.loader_key).unwrap()
  }
}
