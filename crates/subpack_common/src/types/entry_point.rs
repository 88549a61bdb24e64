use arcstr::ArcStr;

/// An entry as it was prepared for the compilation, before any chunk exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
  pub name: ArcStr,
  pub request: ArcStr,
}

impl EntryPoint {
  pub fn new(name: impl Into<ArcStr>, request: impl Into<ArcStr>) -> Self {
    Self { name: name.into(), request: request.into() }
  }
}
