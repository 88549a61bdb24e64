use arcstr::ArcStr;
use rustc_hash::FxHashMap;
use subpack_common::{EntryPoint, EntryRole, PackageName};
use subpack_utils::request::ParsedRequest;

const NO_ENTRY_COMPONENT: ArcStr = arcstr::literal!("noEntryComponent");
const NO_ENTRY_PAGE: ArcStr = arcstr::literal!("noEntryPage");

/// Which entry owns a page or a component.
///
/// Pages are global, components are recorded per package.
#[derive(Debug, Default)]
pub struct EntryRegistry {
  pages: FxHashMap<ArcStr, ArcStr>,
  components: FxHashMap<PackageName, FxHashMap<ArcStr, ArcStr>>,
}

impl EntryRegistry {
  pub fn register_page(&mut self, resource_path: &str, entry_name: ArcStr) {
    self.pages.insert(resource_path.into(), entry_name);
  }

  pub fn register_component(
    &mut self,
    package: &PackageName,
    resource_path: &str,
    entry_name: ArcStr,
  ) {
    self.components.entry(package.clone()).or_default().insert(resource_path.into(), entry_name);
  }

  pub fn page_entry(&self, resource_path: &str) -> Option<&ArcStr> {
    self.pages.get(resource_path)
  }

  pub fn component_entry(&self, package: &PackageName, resource_path: &str) -> Option<&ArcStr> {
    self.components.get(package).and_then(|components| components.get(resource_path))
  }

  pub fn classify(&self, resource_path: &str, package: &PackageName) -> EntryRole {
    if self.page_entry(resource_path).is_some() {
      EntryRole::Page
    } else if self.component_entry(package, resource_path).is_some() {
      EntryRole::Component
    } else {
      EntryRole::App
    }
  }

  /// Classifies a resource that may have been required directly as a page or a
  /// component, i.e. without going through a page/component declaration.
  ///
  /// Such a resource is recorded under the prepared entry whose request matches
  /// `raw_request`, or under a placeholder entry when none does.
  pub fn recover_entry(
    &mut self,
    request: &ParsedRequest<'_>,
    raw_request: &str,
    prepared_entries: &[EntryPoint],
    package: &PackageName,
  ) -> EntryRole {
    let resource_path = request.resource_path;
    let is_component = request.has_flag("component");
    let unregistered_component =
      is_component && self.component_entry(package, resource_path).is_none();
    let unregistered_page = request.has_flag("page") && self.page_entry(resource_path).is_none();

    if unregistered_component || unregistered_page {
      let entry_name = prepared_entries
        .iter()
        .find(|entry| entry.request == raw_request)
        .map(|entry| entry.name.clone());
      tracing::debug!(%resource_path, ?entry_name, is_component, "recovered entry");

      if is_component {
        self.register_component(package, resource_path, entry_name.unwrap_or(NO_ENTRY_COMPONENT));
      } else {
        self.register_page(resource_path, entry_name.unwrap_or(NO_ENTRY_PAGE));
      }
    }

    self.classify(resource_path, package)
  }
}

#[cfg(test)]
mod tests {
  use subpack_utils::request::parse_request;

  use super::*;

  #[test]
  fn pages_win_over_components() {
    let mut registry = EntryRegistry::default();
    let shop = PackageName::from("shop");
    registry.register_component(&shop, "/src/card.mpx", "shop/components/card".into());
    assert_eq!(registry.classify("/src/card.mpx", &shop), EntryRole::Component);
    assert_eq!(registry.classify("/src/card.mpx", &PackageName::main()), EntryRole::App);

    registry.register_page("/src/card.mpx", "pages/card".into());
    assert_eq!(registry.classify("/src/card.mpx", &shop), EntryRole::Page);
  }

  #[test]
  fn recovers_entry_from_prepared_entries() {
    let mut registry = EntryRegistry::default();
    let prepared = vec![
      EntryPoint::new("app", "./app.mpx"),
      EntryPoint::new("components/standalone", "./standalone.mpx?component"),
    ];
    let request = parse_request("/src/standalone.mpx?component");

    let role = registry.recover_entry(
      &request,
      "./standalone.mpx?component",
      &prepared,
      &PackageName::main(),
    );

    assert_eq!(role, EntryRole::Component);
    assert_eq!(
      registry.component_entry(&PackageName::main(), "/src/standalone.mpx").map(ArcStr::as_str),
      Some("components/standalone")
    );
  }

  #[test]
  fn falls_back_to_placeholder_entries() {
    let mut registry = EntryRegistry::default();
    let request = parse_request("/src/lonely.mpx?page");

    let role = registry.recover_entry(&request, "./lonely.mpx?page", &[], &PackageName::main());

    assert_eq!(role, EntryRole::Page);
    assert_eq!(registry.page_entry("/src/lonely.mpx").map(ArcStr::as_str), Some("noEntryPage"));
  }

  #[test]
  fn unflagged_resources_are_apps() {
    let mut registry = EntryRegistry::default();
    let request = parse_request("/src/app.mpx");
    let role = registry.recover_entry(&request, "./app.mpx", &[], &PackageName::main());
    assert!(role.is_app());
  }
}
