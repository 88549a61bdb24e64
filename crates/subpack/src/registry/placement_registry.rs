use arcstr::ArcStr;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use subpack_common::{MAIN_PACKAGE, PackageName, PlacementRequest, PlacementResult, ResourceKind};
use subpack_error::BuildDiagnostic;
use subpack_utils::{indexmap::FxIndexMap, path_ext::join_posix};

type ResourceMap = FxHashMap<ArcStr, ArcStr>;
type PackageResourceMap = FxIndexMap<PackageName, ResourceMap>;

/// Decides which package every component and static resource is emitted into.
///
/// Entries are recorded redundantly: a resource is known under the package it
/// physically landed in and under every package that referenced it, so the
/// output path of a resource as seen from any package is a single lookup.
/// Every entry is write-once.
#[derive(Debug)]
pub struct PlacementRegistry {
  components: PackageResourceMap,
  static_resources: PackageResourceMap,
  /// First non-main package a static resource landed in.
  cross_package_hits: FxHashMap<ArcStr, PackageName>,
}

impl Default for PlacementRegistry {
  fn default() -> Self {
    let seeded = || PackageResourceMap::from_iter([(PackageName::main(), ResourceMap::default())]);
    Self {
      components: seeded(),
      static_resources: seeded(),
      cross_package_hits: FxHashMap::default(),
    }
  }
}

impl PlacementRegistry {
  fn resource_map(&self, kind: ResourceKind) -> &PackageResourceMap {
    match kind {
      ResourceKind::Component => &self.components,
      ResourceKind::Static => &self.static_resources,
    }
  }

  fn resource_map_mut(&mut self, kind: ResourceKind) -> &mut PackageResourceMap {
    match kind {
      ResourceKind::Component => &mut self.components,
      ResourceKind::Static => &mut self.static_resources,
    }
  }

  /// Places a resource, or returns where it was placed before.
  ///
  /// A declared package other than the referencing one or `main` is reported
  /// into `warnings` and still honored.
  pub fn place(
    &mut self,
    request: &PlacementRequest<'_>,
    warnings: &mut Vec<anyhow::Error>,
  ) -> PlacementResult {
    let PlacementRequest { resource_path, kind, explicit_package, current_package, output_path } =
      request;
    let resource_map = self.resource_map_mut(*kind);

    let package_name = match explicit_package {
      Some(declared) => {
        if declared != current_package && !declared.is_main() {
          let diagnostic = BuildDiagnostic::PlacementConflict {
            resource_path: (*resource_path).into(),
            current_package: current_package.as_arcstr().clone(),
            declared_package: declared.as_arcstr().clone(),
          };
          tracing::warn!(%resource_path, %current_package, %declared, "placement conflict");
          warnings.push(diagnostic.into());
        }
        declared.clone()
      }
      None if !current_package.is_main()
        && !resource_map
          .get(MAIN_PACKAGE)
          .is_some_and(|main| main.contains_key(*resource_path)) =>
      {
        current_package.clone()
      }
      None => PackageName::main(),
    };

    let resource_path = ArcStr::from(*resource_path);
    let placed = resource_map.entry(package_name.clone()).or_default();
    let (output_path, already_outputed) = match placed.get(&resource_path) {
      Some(existing) => (existing.clone(), true),
      None => {
        let output_path = ArcStr::from(join_posix(package_name.root(), output_path));
        placed.insert(resource_path.clone(), output_path.clone());
        (output_path, false)
      }
    };

    resource_map
      .entry(current_package.clone())
      .or_default()
      .entry(resource_path.clone())
      .or_insert_with(|| output_path.clone());

    if kind.is_static() && !package_name.is_main() {
      self
        .cross_package_hits
        .entry(resource_path.clone())
        .or_insert_with(|| package_name.clone());
    }

    tracing::debug!(
      %resource_path,
      %kind,
      package = %package_name,
      %output_path,
      already_outputed,
      "placed resource"
    );

    PlacementResult { package_name, output_path, already_outputed, resource_path }
  }

  /// Output path of a resource as seen from `package`, if that package ever referenced it.
  pub fn output_path_of(
    &self,
    resource_path: &str,
    kind: ResourceKind,
    package: &PackageName,
  ) -> Option<&ArcStr> {
    self.resource_map(kind).get(package).and_then(|resources| resources.get(resource_path))
  }

  pub fn cross_package_hit(&self, resource_path: &str) -> Option<&PackageName> {
    self.cross_package_hits.get(resource_path)
  }

  /// Whether a reference to `resource_path` from `current_package` must be tagged with its
  /// package so an external module cache does not hand back another package's copy.
  pub fn needs_disambiguation(&self, resource_path: &str, current_package: &PackageName) -> bool {
    !current_package.is_main()
      && self.cross_package_hit(resource_path).is_some_and(|first| first != current_package)
  }

  /// Every package either registry has seen, `main` first.
  pub fn known_packages(&self) -> impl Iterator<Item = &PackageName> {
    self.components.keys().chain(self.static_resources.keys()).unique()
  }
}
