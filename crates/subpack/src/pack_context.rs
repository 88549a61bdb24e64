use std::{future::Future, sync::Arc};

use anyhow::Context;
use arcstr::ArcStr;
use parking_lot::Mutex;
use subpack_common::{
  EntryPoint, EntryRole, OutputAssets, PackOptions, PackageInfo, PackageName, PlacementRequest,
  PlacementResult, ResourceKind,
};
use subpack_error::{BuildDiagnostic, BuildResult};
use subpack_utils::request::{ParsedRequest, add_query, parse_request};

use crate::{
  AssetAccumulator, CacheGroup, CacheGroupSet, ChunkGraph, ChunkUsage, EntryRegistry,
  PlacementRegistry, RuntimeChunkAssembler, SharedOptions, types::bundle_output::BundleOutput,
  utils::normalize_options::normalize_options,
};

/// Query key that pins a request to a package.
pub const PACKAGE_NAME_QUERY: &str = "packageName";

#[derive(Debug, Default)]
struct PassState {
  registry: PlacementRegistry,
  entries: EntryRegistry,
  cache_groups: CacheGroupSet,
  accumulator: AssetAccumulator,
  warnings: Vec<anyhow::Error>,
}

/// State of one compilation pass, shared as `Arc<PackContext>` with every
/// collaborator of the pass.
///
/// Every registry read-modify-write happens under one lock, so first-discovery
/// wins even when collaborators run in parallel.
pub struct PackContext {
  options: SharedOptions,
  state: Mutex<PassState>,
}

impl PackContext {
  pub fn new(raw_options: PackOptions) -> BuildResult<Self> {
    Ok(Self::with_options(Arc::new(normalize_options(raw_options)?)))
  }

  pub fn with_options(options: SharedOptions) -> Self {
    Self { options, state: Mutex::new(PassState::default()) }
  }

  pub fn options(&self) -> &SharedOptions {
    &self.options
  }

  pub fn place_resource(&self, request: &PlacementRequest<'_>) -> PlacementResult {
    let mut state = self.state.lock();
    let PassState { registry, warnings, .. } = &mut *state;
    registry.place(request, warnings)
  }

  /// Where `request` is emitted when referenced from `current_package`.
  ///
  /// A `packageName` query on the request is taken as the explicit package.
  pub fn package_info(
    &self,
    request: &str,
    kind: ResourceKind,
    output_path: &str,
    current_package: &PackageName,
  ) -> PackageInfo {
    let ParsedRequest { resource_path, query, .. } = parse_request(request);
    let explicit_package = query.get(PACKAGE_NAME_QUERY).map(|name| PackageName::from(name.as_str()));
    let placement = PlacementRequest::new(resource_path, kind, output_path)
      .referenced_from(current_package.clone())
      .declared_in(explicit_package);
    PackageInfo::new(self.place_resource(&placement), query)
  }

  /// Places a resource once `fetch` has produced what the resource needs.
  ///
  /// The pass state is not locked while `fetch` runs. A failed or dropped fetch
  /// records nothing.
  pub async fn place_resource_after<T>(
    &self,
    request: PlacementRequest<'_>,
    fetch: impl Future<Output = anyhow::Result<T>>,
  ) -> anyhow::Result<(PlacementResult, T)> {
    let fetched = fetch
      .await
      .with_context(|| format!("Failed to resolve \"{}\" for placement.", request.resource_path))?;
    Ok((self.place_resource(&request), fetched))
  }

  pub fn output_path_of(
    &self,
    resource_path: &str,
    kind: ResourceKind,
    package: &PackageName,
  ) -> Option<ArcStr> {
    self.state.lock().registry.output_path_of(resource_path, kind, package).cloned()
  }

  pub fn cross_package_hit(&self, resource_path: &str) -> Option<PackageName> {
    self.state.lock().registry.cross_package_hit(resource_path).cloned()
  }

  /// Tags a resolved request with `current_package` when another sub-package
  /// claimed the resource first, so a module cache keyed by request cannot hand
  /// back that package's copy.
  pub fn disambiguate_request(&self, request: &str, current_package: &PackageName) -> String {
    let resource_path = parse_request(request).resource_path;
    if self.state.lock().registry.needs_disambiguation(resource_path, current_package) {
      tracing::debug!(%resource_path, package = %current_package, "disambiguated request");
      add_query(request, [(PACKAGE_NAME_QUERY, current_package.as_str())])
    } else {
      request.to_string()
    }
  }

  pub fn register_page(&self, resource_path: &str, entry_name: impl Into<ArcStr>) {
    self.state.lock().entries.register_page(resource_path, entry_name.into());
  }

  pub fn register_component(
    &self,
    package: &PackageName,
    resource_path: &str,
    entry_name: impl Into<ArcStr>,
  ) {
    self.state.lock().entries.register_component(package, resource_path, entry_name.into());
  }

  pub fn classify(&self, resource_path: &str, package: &PackageName) -> EntryRole {
    self.state.lock().entries.classify(resource_path, package)
  }

  /// See `EntryRegistry::recover_entry`. `resource` is the resolved resource with its query.
  pub fn recover_entry(
    &self,
    resource: &str,
    raw_request: &str,
    prepared_entries: &[EntryPoint],
    package: &PackageName,
  ) -> EntryRole {
    let request = parse_request(resource);
    self.state.lock().entries.recover_entry(&request, raw_request, prepared_entries, package)
  }

  pub fn extract(&self, file: &str, index: usize, fragment: impl Into<String>) -> bool {
    self.state.lock().accumulator.extract(file, index, fragment)
  }

  /// `side_effect` runs while the pass state is locked, it must not call back
  /// into the context.
  pub fn extract_with(
    &self,
    file: &str,
    index: usize,
    fragment: impl Into<String>,
    side_effect: impl FnOnce(&mut crate::ExtractedFile),
  ) -> bool {
    self.state.lock().accumulator.extract_with(file, index, fragment, side_effect)
  }

  pub fn prepend(&self, file: &str, fragment: impl Into<String>) {
    self.state.lock().accumulator.prepend(file, fragment);
  }

  /// Claims a CSS module name of a component. A name claimed twice is reported,
  /// the caller still emits the later style.
  pub fn claim_css_module_name(&self, resource_path: &str, name: &str) -> bool {
    let mut state = self.state.lock();
    let claimed = state.accumulator.claim_named_slot(resource_path, name);
    if !claimed {
      tracing::warn!(%resource_path, name, "duplicate css module name");
      state.warnings.push(
        BuildDiagnostic::DuplicateCssModuleName {
          resource_path: resource_path.into(),
          name: name.into(),
        }
        .into(),
      );
    }
    claimed
  }

  /// Adds a cache group for every package discovered so far. Must run once
  /// per sealed module graph, after every placement of that graph.
  ///
  /// Returns whether new groups were added.
  pub fn finish_modules(&self) -> bool {
    if !self.options.auto_split {
      return false;
    }
    let mut state = self.state.lock();
    let PassState { registry, cache_groups, .. } = &mut *state;
    cache_groups.reconcile(registry.known_packages())
  }

  pub fn select_cache_group(&self, chunks: &[ChunkUsage<'_>], size: usize) -> Option<CacheGroup> {
    if !self.options.auto_split {
      return None;
    }
    self.state.lock().cache_groups.select(chunks, size).cloned()
  }

  pub fn cache_groups(&self) -> Vec<CacheGroup> {
    self.state.lock().cache_groups.entries().map(|(_, group)| group.clone()).collect()
  }

  pub fn warnings_len(&self) -> usize {
    self.state.lock().warnings.len()
  }

  /// Ends the pass: flushes the accumulated files into `assets`, then wires the
  /// chunks of every split entry group together.
  ///
  /// Every other handle to the context must have been dropped by then, which
  /// guarantees no producer can still extract into it.
  pub fn emit(
    self: Arc<Self>,
    chunk_graph: &ChunkGraph,
    mut assets: OutputAssets,
  ) -> BuildResult<BundleOutput> {
    let Ok(context) = Arc::try_unwrap(self) else {
      return Err(
        anyhow::anyhow!(
          "The pass is still shared with running collaborators, it cannot be emitted yet."
        )
        .into(),
      );
    };
    let PackContext { options, state } = context;
    let PassState { accumulator, mut warnings, .. } = state.into_inner();

    for (filename, content) in accumulator.flush() {
      if assets.contains_key(&filename) {
        tracing::warn!(%filename, "extracted asset collides with an existing asset");
        warnings.push(BuildDiagnostic::AssetNameCollision { filename: filename.as_str().into() }.into());
      }
      assets.insert(filename, content);
    }

    let assembled = RuntimeChunkAssembler::new(chunk_graph, &options).assemble(&mut assets);
    tracing::debug!(assembled, assets = assets.len(), warnings = warnings.len(), "emitted pass");

    Ok(BundleOutput { assets: assets.into_output_assets(), warnings })
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use pretty_assertions::assert_eq;
  use subpack_common::{Chunk, ChunkGroup, HostProfile};

  use super::*;

  fn context() -> PackContext {
    PackContext::new(PackOptions::default()).unwrap()
  }

  fn icon_info(context: &PackContext, package: &str) -> PackageInfo {
    context.package_info("/src/icon.png", ResourceKind::Static, "static/icon.png", &package.into())
  }

  #[test]
  fn icon_referenced_from_main_first_stays_in_main() {
    let context = context();
    let main = icon_info(&context, "main");
    let shop = icon_info(&context, "shop");

    assert_eq!(main.output_path, "static/icon.png");
    assert_eq!(shop.output_path, main.output_path);
    assert!(shop.package_name.is_main());
    assert_eq!(shop.package_root, "");
    assert_eq!(context.cross_package_hit("/src/icon.png"), None);
    assert_eq!(context.disambiguate_request("/src/icon.png", &"shop".into()), "/src/icon.png");
  }

  #[test]
  fn icon_referenced_from_shop_only_lands_in_shop() {
    let context = context();
    let shop = icon_info(&context, "shop");

    assert_eq!(shop.output_path, "shop/static/icon.png");
    assert_eq!(shop.package_root, "shop");
    assert_eq!(context.cross_package_hit("/src/icon.png"), Some(PackageName::from("shop")));
    assert_eq!(context.disambiguate_request("/src/icon.png", &"shop".into()), "/src/icon.png");
    assert_eq!(
      context.disambiguate_request("/src/icon.png?inline", &"user".into()),
      "/src/icon.png?inline&packageName=user"
    );
    assert_eq!(
      context.output_path_of("/src/icon.png", ResourceKind::Static, &"shop".into()).as_deref(),
      Some("shop/static/icon.png")
    );
  }

  #[test]
  fn package_query_is_the_explicit_package() {
    let context = context();
    let info = context.package_info(
      "/src/list.mpx?packageName=user&component",
      ResourceKind::Component,
      "components/list",
      &"shop".into(),
    );

    assert_eq!(info.output_path, "user/components/list");
    assert_eq!(info.resource_path, "/src/list.mpx");
    assert!(info.query.contains_key("component"));
    assert_eq!(context.warnings_len(), 1);
  }

  #[test]
  fn duplicate_css_module_names_are_reported() {
    let context = context();
    assert!(context.claim_css_module_name("/src/card.mpx", "$style"));
    assert!(!context.claim_css_module_name("/src/card.mpx", "$style"));
    assert_eq!(context.warnings_len(), 1);
  }

  #[test]
  fn finish_modules_follows_discovered_packages() {
    let context = context();
    icon_info(&context, "shop");
    context.package_info("/src/list.mpx", ResourceKind::Component, "components/list", &"user".into());

    assert!(context.finish_modules());
    assert!(!context.finish_modules());
    let names = context.cache_groups().into_iter().map(|group| group.name).collect::<Vec<_>>();
    assert_eq!(names, vec!["bundle", "user/bundle", "shop/bundle"]);

    let usage = [ChunkUsage::initial("shop/pages/cart"), ChunkUsage::initial("shop/pages/list")];
    assert_eq!(context.select_cache_group(&usage, 2048).map(|group| group.name).as_deref(), Some("shop/bundle"));
    assert_eq!(context.select_cache_group(&usage, 10).map(|group| group.name).as_deref(), Some("bundle"));
  }

  #[test]
  fn auto_split_off_never_groups() {
    let context =
      PackContext::new(PackOptions { auto_split: Some(false), ..PackOptions::default() }).unwrap();
    icon_info(&context, "shop");

    assert!(!context.finish_modules());
    assert_eq!(context.cache_groups().len(), 1);
    assert!(context.select_cache_group(&[ChunkUsage::initial("a"), ChunkUsage::initial("b")], 0).is_none());
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_placements_agree() {
    let context = Arc::new(context());

    let placements = (0..16).map(|i| {
      let context = Arc::clone(&context);
      tokio::spawn(async move {
        let package = PackageName::from(if i % 2 == 0 { "shop" } else { "user" });
        let request = PlacementRequest::new("/src/icon.png", ResourceKind::Static, "static/icon.png")
          .referenced_from(package);
        let delay = Duration::from_millis(16 - i);
        context
          .place_resource_after(request, async move {
            tokio::time::sleep(delay).await;
            Ok(i)
          })
          .await
          .unwrap()
      })
    });
    let results = futures::future::join_all(placements).await;

    let mut fresh = 0;
    for result in results {
      let (placement, _) = result.unwrap();
      assert_eq!(placement.output_path, arcstr::format!("{}/static/icon.png", placement.package_name));
      if !placement.already_outputed {
        fresh += 1;
      }
    }
    assert_eq!(fresh, 2);
    assert!(context.cross_package_hit("/src/icon.png").is_some());
  }

  #[tokio::test]
  async fn failed_fetch_records_nothing() {
    let context = context();
    let request = PlacementRequest::new("/src/remote.png", ResourceKind::Static, "static/remote.png")
      .referenced_from("shop".into());

    let result = context
      .place_resource_after(request, async { Err::<(), _>(anyhow::anyhow!("connection reset")) })
      .await;

    let error = result.unwrap_err();
    assert!(error.to_string().contains("/src/remote.png"));
    assert_eq!(error.root_cause().to_string(), "connection reset");
    assert_eq!(context.output_path_of("/src/remote.png", ResourceKind::Static, &"shop".into()), None);
    assert_eq!(context.cross_package_hit("/src/remote.png"), None);
  }

  #[test]
  fn emit_flushes_then_assembles() {
    let context = Arc::new(
      PackContext::new(PackOptions { host: Some(HostProfile::Ali), ..PackOptions::default() })
        .unwrap(),
    );
    context.extract("app.acss", 1, ".b{}");
    context.extract("app.acss", 0, ".a{}");
    context.extract("bundle.js", 0, "/*extracted*/");

    let mut graph = ChunkGraph::new(vec![EntryPoint::new("app", "./app.mpx")]);
    let runtime = graph.add_chunk(Chunk::new(Some("bundle".into()), vec!["bundle.js".into()]));
    let app = graph.add_chunk(Chunk::new(Some("app".into()), vec!["app.js".into()]));
    graph.add_chunk_group(ChunkGroup::initial("app", vec![runtime, app]));
    let assets = OutputAssets::from_iter([("bundle.js", "/*runtime*/"), ("app.js", "/*app*/")]);

    let output = context.emit(&graph, assets).unwrap();

    assert_eq!(output.asset("app.acss").map(|asset| asset.content.as_str()), Some(".a{}.b{}"));
    assert!(output.asset("app.js").unwrap().content.contains("require(\"./bundle.js\")"));
    assert!(output.asset("bundle.js").unwrap().content.contains("/*extracted*/"));
    assert_eq!(output.warnings.len(), 1);
    assert!(matches!(
      output.warnings[0].downcast_ref::<BuildDiagnostic>(),
      Some(BuildDiagnostic::AssetNameCollision { filename }) if filename == "bundle.js"
    ));
  }

  #[test]
  fn emit_requires_exclusive_ownership() {
    let context = Arc::new(context());
    let collaborator = Arc::clone(&context);

    let Err(errors) = context.emit(&ChunkGraph::default(), OutputAssets::default()) else {
      panic!("emitting a shared pass should fail");
    };
    assert_eq!(errors.len(), 1);
    drop(collaborator);
  }
}
