use std::ops::{Deref, DerefMut};

use subpack_utils::indexmap::FxIndexMap;

use crate::OutputAsset;

/// The mutable output asset namespace, keyed by emitted file name.
///
/// Chunk files and extracted files share this namespace.
#[derive(Debug, Default, Clone)]
pub struct OutputAssets {
  pub assets: FxIndexMap<String, String>,
}

impl Deref for OutputAssets {
  type Target = FxIndexMap<String, String>;

  fn deref(&self) -> &Self::Target {
    &self.assets
  }
}

impl DerefMut for OutputAssets {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.assets
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OutputAssets {
  fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
    Self { assets: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
  }
}

impl OutputAssets {
  pub fn into_output_assets(self) -> Vec<OutputAsset> {
    self.assets.into_iter().map(|(filename, content)| OutputAsset { filename, content }).collect()
  }
}
