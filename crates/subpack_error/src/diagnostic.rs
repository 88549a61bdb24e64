use arcstr::ArcStr;

/// Recoverable anomalies recorded while a build pass runs.
///
/// None of these abort the build. They are collected as warnings so the
/// output can still be emitted and inspected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildDiagnostic {
  #[error(
    "Resource \"{resource_path}\" declares package \"{declared_package}\" while being referenced from package \"{current_package}\". A resource may only be declared into its referencing package or the main package, otherwise it may not be reachable at runtime."
  )]
  PlacementConflict { resource_path: ArcStr, current_package: ArcStr, declared_package: ArcStr },

  #[error("CSS module name \"{name}\" is not unique in \"{resource_path}\".")]
  DuplicateCssModuleName { resource_path: ArcStr, name: ArcStr },

  #[error("Extracted asset \"{filename}\" replaces an existing output asset with the same name.")]
  AssetNameCollision { filename: ArcStr },
}

impl BuildDiagnostic {
  pub fn kind(&self) -> &'static str {
    match self {
      Self::PlacementConflict { .. } => "PLACEMENT_CONFLICT",
      Self::DuplicateCssModuleName { .. } => "DUPLICATE_CSS_MODULE_NAME",
      Self::AssetNameCollision { .. } => "ASSET_NAME_COLLISION",
    }
  }
}

#[test]
fn test_placement_conflict_message() {
  let diagnostic = BuildDiagnostic::PlacementConflict {
    resource_path: "/src/components/list.mpx".into(),
    current_package: "shop".into(),
    declared_package: "user".into(),
  };
  let message = diagnostic.to_string();
  assert!(message.contains("\"user\""));
  assert!(message.contains("\"shop\""));
  assert_eq!(diagnostic.kind(), "PLACEMENT_CONFLICT");

  let error = anyhow::Error::from(diagnostic.clone());
  assert_eq!(error.downcast_ref::<BuildDiagnostic>(), Some(&diagnostic));
}
