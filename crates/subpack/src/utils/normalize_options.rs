use std::path::PathBuf;

use subpack_common::{HostProfile, NormalizedPackOptions, PackOptions};
use subpack_error::BuildResult;

pub const DEFAULT_LOADER_KEY: &str = "webpackJsonp";

pub fn normalize_options(raw_options: PackOptions) -> BuildResult<NormalizedPackOptions> {
  let host = raw_options.host.unwrap_or_default();
  let src_host = raw_options.src_host.unwrap_or(host);

  if src_host != host && src_host != HostProfile::Wx {
    return Err(anyhow::anyhow!(
      "Invalid value for option \"srcHost\" - Sources written for \"{src_host}\" cannot be built for \"{host}\", only \"wx\" sources can be converted to another host."
    )
    .into());
  }

  let loader_key = raw_options.loader_key.unwrap_or_else(|| DEFAULT_LOADER_KEY.to_string());
  if loader_key.is_empty() {
    return Err(
      anyhow::anyhow!("Invalid value for option \"loaderKey\" - The key must not be empty.").into(),
    );
  }

  Ok(NormalizedPackOptions {
    host,
    src_host,
    loader_key,
    plugin_main: raw_options.plugin_main,
    auto_split: raw_options.auto_split.unwrap_or(true),
    output_dir: raw_options.output_dir.unwrap_or_else(|| PathBuf::from("dist")),
    write_mode: raw_options.write_mode.unwrap_or_default(),
  })
}
