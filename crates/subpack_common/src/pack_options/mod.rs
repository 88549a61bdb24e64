pub mod normalized_pack_options;
pub mod write_mode;

use std::path::PathBuf;

use serde::Deserialize;

use crate::{HostProfile, WriteMode};

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PackOptions {
  // --- Host
  pub host: Option<HostProfile>,
  pub src_host: Option<HostProfile>,

  // --- Assembly
  pub loader_key: Option<String>,
  pub plugin_main: Option<String>,
  pub auto_split: Option<bool>,

  // --- Output
  pub output_dir: Option<PathBuf>,
  pub write_mode: Option<WriteMode>,
}

#[test]
fn test_deserialize_pack_options() {
  let options: PackOptions = serde_json::from_str(
    r#"{ "host": "ali", "loaderKey": "mpxJsonp", "pluginMain": "plugin", "writeMode": "full" }"#,
  )
  .unwrap();
  assert_eq!(options.host, Some(HostProfile::Ali));
  assert_eq!(options.loader_key.as_deref(), Some("mpxJsonp"));
  assert_eq!(options.plugin_main.as_deref(), Some("plugin"));
  assert_eq!(options.write_mode, Some(WriteMode::Full));
  assert!(options.auto_split.is_none());

  assert!(serde_json::from_str::<PackOptions>(r#"{ "mode": "wx" }"#).is_err());
}
