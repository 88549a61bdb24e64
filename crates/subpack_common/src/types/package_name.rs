use std::{borrow::Borrow, fmt::Display};

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

pub const MAIN_PACKAGE: &str = "main";

/// Name of an output package. `main` is the distinguished package, every other
/// name is a sub-package whose name doubles as its root directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "ArcStr", into = "ArcStr")]
pub struct PackageName(ArcStr);

impl PackageName {
  pub fn main() -> Self {
    Self(arcstr::literal!("main"))
  }

  /// An empty name is the package context of code outside any sub-package, i.e. `main`.
  pub fn new(name: impl Into<ArcStr>) -> Self {
    let name = name.into();
    if name.is_empty() { Self::main() } else { Self(name) }
  }

  pub fn is_main(&self) -> bool {
    self.0 == MAIN_PACKAGE
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn as_arcstr(&self) -> &ArcStr {
    &self.0
  }

  /// Directory prefix of the package in the output tree.
  pub fn root(&self) -> &str {
    if self.is_main() { "" } else { &self.0 }
  }

  /// Whether a chunk with `chunk_name` is emitted under this package's namespace.
  pub fn owns_chunk(&self, chunk_name: &str) -> bool {
    !self.is_main()
      && chunk_name
        .strip_prefix(self.as_str())
        .is_some_and(|rest| rest.starts_with('/'))
  }
}

impl Default for PackageName {
  fn default() -> Self {
    Self::main()
  }
}

impl Display for PackageName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl Borrow<str> for PackageName {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<&str> for PackageName {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<ArcStr> for PackageName {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<PackageName> for ArcStr {
  fn from(value: PackageName) -> Self {
    value.0
  }
}

#[test]
fn test_package_name() {
  assert!(PackageName::new("").is_main());
  assert!(PackageName::from("main").is_main());
  assert_eq!(PackageName::main().root(), "");

  let shop = PackageName::from("shop");
  assert!(!shop.is_main());
  assert_eq!(shop.root(), "shop");
  assert!(shop.owns_chunk("shop/pages/cart"));
  assert!(!shop.owns_chunk("shopping/pages/cart"));
  assert!(!shop.owns_chunk("pages/shop"));
  assert!(!PackageName::main().owns_chunk("main/pages/index"));
}
