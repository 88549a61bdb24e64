use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
  /// Pages and components.
  Component,
  /// Images, fonts and standalone styles.
  Static,
}

impl ResourceKind {
  #[inline]
  pub fn is_static(self) -> bool {
    matches!(self, Self::Static)
  }
}

impl Display for ResourceKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Component => write!(f, "component"),
      Self::Static => write!(f, "static"),
    }
  }
}
