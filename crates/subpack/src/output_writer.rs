use std::path::{Path, PathBuf};

use anyhow::Context;
use rustc_hash::FxHashMap;
use subpack_common::WriteMode;
use subpack_fs::FileSystem;
use subpack_utils::xxhash::content_digest;

use crate::{SharedOptions, types::bundle_output::BundleOutput};

/// Writes emitted assets under the output directory.
///
/// Lives across the builds of a watch session, so it can skip files whose
/// content did not change since the previous build.
pub struct OutputWriter<F: FileSystem> {
  fs: F,
  options: SharedOptions,
  digests: FxHashMap<PathBuf, u64>,
}

impl<F: FileSystem> OutputWriter<F> {
  pub fn new(fs: F, options: SharedOptions) -> Self {
    Self { fs, options, digests: FxHashMap::default() }
  }

  pub fn fs(&self) -> &F {
    &self.fs
  }

  /// Returns the paths actually written.
  pub fn write(&mut self, output: &BundleOutput) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = vec![];
    for asset in &output.assets {
      let path = self.options.output_dir.join(&asset.filename);
      let digest = content_digest(asset.content_as_bytes());

      if self.options.write_mode == WriteMode::Changed
        && self.digests.get(&path).is_some_and(|previous| *previous == digest)
      {
        tracing::trace!(path = %path.display(), "unchanged, skipped");
        continue;
      }

      if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        self
          .fs
          .create_dir_all(dir)
          .with_context(|| format!("Could not create directory for {:?}", path.display()))?;
      }
      self
        .fs
        .write(&path, asset.content_as_bytes())
        .with_context(|| format!("Could not write file to {:?}", path.display()))?;

      self.digests.insert(path.clone(), digest);
      written.push(path);
    }
    tracing::debug!(written = written.len(), total = output.assets.len(), "wrote output");
    Ok(written)
  }

  pub fn output_dir(&self) -> &Path {
    &self.options.output_dir
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use pretty_assertions::assert_eq;
  use subpack_common::{OutputAsset, PackOptions};
  use subpack_fs::MemoryFileSystem;

  use super::*;
  use crate::normalize_options;

  fn writer(write_mode: WriteMode) -> OutputWriter<MemoryFileSystem> {
    let options = normalize_options(PackOptions {
      output_dir: Some(PathBuf::from("/dist")),
      write_mode: Some(write_mode),
      ..PackOptions::default()
    })
    .unwrap();
    OutputWriter::new(MemoryFileSystem::new(), Arc::new(options))
  }

  fn output(assets: &[(&str, &str)]) -> BundleOutput {
    BundleOutput {
      assets: assets
        .iter()
        .map(|(filename, content)| OutputAsset {
          filename: (*filename).to_string(),
          content: (*content).to_string(),
        })
        .collect(),
      warnings: vec![],
    }
  }

  #[test]
  fn writes_nested_assets() {
    let mut writer = writer(WriteMode::Changed);
    let written = writer.write(&output(&[("shop/pages/cart.js", "cart"), ("app.js", "app")])).unwrap();

    assert_eq!(written, vec![PathBuf::from("/dist/shop/pages/cart.js"), PathBuf::from("/dist/app.js")]);
    assert_eq!(writer.fs().read_to_string(Path::new("/dist/shop/pages/cart.js")).unwrap(), "cart");
  }

  #[test]
  fn changed_mode_skips_unchanged_files() {
    let mut writer = writer(WriteMode::Changed);
    writer.write(&output(&[("app.js", "app"), ("bundle.js", "runtime")])).unwrap();

    let written = writer.write(&output(&[("app.js", "app v2"), ("bundle.js", "runtime")])).unwrap();

    assert_eq!(written, vec![PathBuf::from("/dist/app.js")]);
    assert_eq!(writer.fs().read_to_string(Path::new("/dist/app.js")).unwrap(), "app v2");
  }

  #[test]
  fn full_mode_rewrites_everything() {
    let mut writer = writer(WriteMode::Full);
    writer.write(&output(&[("app.js", "app")])).unwrap();
    let written = writer.write(&output(&[("app.js", "app")])).unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(writer.output_dir(), Path::new("/dist"));
  }
}
