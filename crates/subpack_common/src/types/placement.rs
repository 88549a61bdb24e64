use arcstr::ArcStr;
use subpack_utils::request::Query;

use crate::{PackageName, ResourceKind};

/// A request to decide which package a resource is emitted into.
#[derive(Debug, Clone)]
pub struct PlacementRequest<'a> {
  /// Canonical, query-stripped path of the resource.
  pub resource_path: &'a str,
  pub kind: ResourceKind,
  /// Present only when the reference carries an explicit package annotation.
  pub explicit_package: Option<PackageName>,
  /// Package context of the module performing the reference.
  pub current_package: PackageName,
  /// Output path the resource would have inside its package, before the package root is applied.
  pub output_path: &'a str,
}

impl<'a> PlacementRequest<'a> {
  pub fn new(resource_path: &'a str, kind: ResourceKind, output_path: &'a str) -> Self {
    Self {
      resource_path,
      kind,
      explicit_package: None,
      current_package: PackageName::main(),
      output_path,
    }
  }

  #[must_use]
  pub fn referenced_from(mut self, current_package: PackageName) -> Self {
    self.current_package = current_package;
    self
  }

  #[must_use]
  pub fn declared_in(mut self, explicit_package: Option<PackageName>) -> Self {
    self.explicit_package = explicit_package;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementResult {
  pub package_name: PackageName,
  pub output_path: ArcStr,
  /// The resource was placed into this package before, so it must not be emitted again.
  pub already_outputed: bool,
  pub resource_path: ArcStr,
}

impl PlacementResult {
  pub fn package_root(&self) -> &str {
    self.package_name.root()
  }
}

/// What external passes learn about a resource's location, see `PackContext::package_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
  pub package_name: PackageName,
  pub package_root: ArcStr,
  pub resource_path: ArcStr,
  pub query: Query,
  pub output_path: ArcStr,
  pub already_outputed: bool,
}

impl PackageInfo {
  pub fn new(placement: PlacementResult, query: Query) -> Self {
    let PlacementResult { package_name, output_path, already_outputed, resource_path } = placement;
    Self {
      package_root: package_name.root().into(),
      package_name,
      resource_path,
      query,
      output_path,
      already_outputed,
    }
  }
}
