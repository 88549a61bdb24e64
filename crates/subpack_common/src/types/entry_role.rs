#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryRole {
  #[default]
  App,
  Page,
  Component,
}

impl EntryRole {
  pub fn is_app(self) -> bool {
    matches!(self, Self::App)
  }
}
