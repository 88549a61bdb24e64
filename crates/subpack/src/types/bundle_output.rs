use subpack_common::OutputAsset;

#[derive(Debug, Default)]
pub struct BundleOutput {
  pub assets: Vec<OutputAsset>,
  pub warnings: Vec<anyhow::Error>,
}

impl BundleOutput {
  pub fn asset(&self, filename: &str) -> Option<&OutputAsset> {
    self.assets.iter().find(|asset| asset.filename == filename)
  }
}
