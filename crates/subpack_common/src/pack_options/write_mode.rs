use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
  /// Skip files whose content did not change since the previous build.
  #[default]
  Changed,
  Full,
}
