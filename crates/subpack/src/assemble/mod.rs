mod bootstrap;
pub mod chunk_chain;

use rustc_hash::FxHashSet;
use subpack_common::{
  ChunkIdx, GlobalContext, NormalizedPackOptions, OutputAssets, SourceJoiner,
};

use self::chunk_chain::ChunkChain;
use crate::ChunkGraph;

/// Rewrites the boundary code of every chunk in a split initial chunk group so
/// the chunks can find and load each other on the target host.
pub struct RuntimeChunkAssembler<'a> {
  chunk_graph: &'a ChunkGraph,
  options: &'a NormalizedPackOptions,
  loader_key: String,
  processed: FxHashSet<ChunkIdx>,
}

impl<'a> RuntimeChunkAssembler<'a> {
  pub fn new(chunk_graph: &'a ChunkGraph, options: &'a NormalizedPackOptions) -> Self {
    Self {
      chunk_graph,
      options,
      loader_key: options.loader_key_literal(),
      processed: FxHashSet::default(),
    }
  }

  /// Returns how many chunks were rewritten.
  pub fn assemble(mut self, assets: &mut OutputAssets) -> usize {
    let chunk_graph = self.chunk_graph;
    for chain in chunk_graph.initial_chunk_groups().filter_map(ChunkChain::from_group) {
      self.process_chunk(chain.runtime, true, &[], assets);
      for shared in chain.shared {
        self.process_chunk(*shared, false, &[chain.runtime], assets);
      }
      self.process_chunk(chain.entry, false, &chain.entry_dependencies(), assets);
    }
    self.processed.len()
  }

  fn process_chunk(
    &mut self,
    chunk_idx: ChunkIdx,
    is_runtime: bool,
    dependencies: &[ChunkIdx],
    assets: &mut OutputAssets,
  ) {
    if self.processed.contains(&chunk_idx) {
      return;
    }
    let chunk_graph = self.chunk_graph;
    let chunk = &chunk_graph.chunk_table[chunk_idx];
    let Some(file) = chunk.primary_file() else {
      return;
    };
    let Some(content) = assets.get_mut(file) else {
      tracing::debug!(file, "chunk has no emitted asset, skipped");
      return;
    };

    let host = self.options.host;
    let key = self.loader_key.as_str();
    let mut joiner = SourceJoiner::default();
    joiner.append_source(bootstrap::WINDOW_FALLBACK);

    for (index, dependency) in dependencies.iter().enumerate() {
      let Some(path) = chunk.import_path_for(&chunk_graph.chunk_table[*dependency], host) else {
        continue;
      };
      let statement = match (index, host.global_context()) {
        (0, GlobalContext::Shared) => bootstrap::require_runtime(key, &path),
        (0, GlobalContext::Mirrored) if is_root_chunk(chunk.name(), chunk_graph) => {
          bootstrap::publish_runtime(key, &path)
        }
        (0, GlobalContext::Mirrored) => bootstrap::mirror_runtime(key),
        _ => bootstrap::require_dependency(&path),
      };
      joiner.append_source(statement);
    }

    let original = std::mem::take(content);
    if is_runtime {
      joiner.append_source(bootstrap::runtime_prelude());
      if let Some(shim) = host.environment_shim() {
        joiner.append_source(shim);
      }
      joiner.append_source(original);
      joiner.append_source(bootstrap::export_loader_handle(key));
    } else {
      if self.options.is_plugin_main(chunk.name()) {
        joiner.append_source(bootstrap::PLUGIN_MAIN_EXPORT);
      }
      joiner.append_source(original);
    }
    *content = joiner.join();

    tracing::debug!(file, is_runtime, dependencies = dependencies.len(), "assembled chunk");
    self.processed.insert(chunk_idx);
  }
}

/// Unnamed chunks and graphs without entries never have a root chunk.
fn is_root_chunk(chunk_name: Option<&str>, chunk_graph: &ChunkGraph) -> bool {
  matches!((chunk_name, chunk_graph.root_entry_name()), (Some(name), Some(root)) if name == root)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use subpack_common::{Chunk, ChunkGroup, EntryPoint, HostProfile, PackOptions};

  use super::*;
  use crate::normalize_options;

  struct Fixture {
    graph: ChunkGraph,
    assets: OutputAssets,
  }

  impl Fixture {
    fn new() -> Self {
      let graph = ChunkGraph::new(vec![
        EntryPoint::new("app", "./app.mpx"),
        EntryPoint::new("pages/index", "./pages/index.mpx?page"),
      ]);
      Self { graph, assets: OutputAssets::default() }
    }

    fn chunk(&mut self, name: &str, file: &str, content: &str) -> ChunkIdx {
      self.assets.insert(file.to_string(), content.to_string());
      self.graph.add_chunk(Chunk::new(Some(name.into()), vec![file.into()]))
    }

    fn assemble(&mut self, options: PackOptions) -> usize {
      let options = normalize_options(options).unwrap();
      RuntimeChunkAssembler::new(&self.graph, &options).assemble(&mut self.assets)
    }

    fn content(&self, file: &str) -> &str {
      self.assets.get(file).map_or("", String::as_str)
    }
  }

  fn host(host: HostProfile) -> PackOptions {
    PackOptions { host: Some(host), ..PackOptions::default() }
  }

  #[test]
  fn chain_is_wired_in_load_order() {
    let mut fixture = Fixture::new();
    let runtime = fixture.chunk("bundle", "bundle.js", "/*runtime*/");
    let shared = fixture.chunk("vendor", "vendor.js", "/*vendor*/");
    let entry = fixture.chunk("app", "app.js", "/*app*/");
    fixture.graph.add_chunk_group(ChunkGroup::initial("app", vec![runtime, shared, entry]));

    assert_eq!(fixture.assemble(host(HostProfile::Wx)), 3);

    assert_eq!(
      fixture.content("bundle.js"),
      "\nvar window = window || {};\n\n\
       var context = (function() { return this })() || Function(\"return this\")();\n\
       if(!context.console) context.console = console;\n\n\
       /*runtime*/\nmodule.exports = window[\"webpackJsonp\"];\n"
    );
    assert_eq!(
      fixture.content("vendor.js"),
      "\nvar window = window || {};\n\nwindow[\"webpackJsonp\"] = require(\"bundle.js\");\n/*vendor*/"
    );
    assert_eq!(
      fixture.content("app.js"),
      "\nvar window = window || {};\n\n\
       window[\"webpackJsonp\"] = require(\"bundle.js\");\nrequire(\"vendor.js\");\n/*app*/"
    );
  }

  #[test]
  fn shared_runtime_is_rewritten_once() {
    let mut fixture = Fixture::new();
    let runtime = fixture.chunk("bundle", "bundle.js", "/*runtime*/");
    let app = fixture.chunk("app", "app.js", "/*app*/");
    let page = fixture.chunk("pages/index", "pages/index.js", "/*page*/");
    fixture.graph.add_chunk_group(ChunkGroup::initial("app", vec![runtime, app]));
    fixture.graph.add_chunk_group(ChunkGroup::initial("pages/index", vec![runtime, page]));

    assert_eq!(fixture.assemble(PackOptions { loader_key: Some("jsonp".to_string()), ..PackOptions::default() }), 3);

    assert_eq!(fixture.content("bundle.js").matches("/*runtime*/").count(), 1);
    assert_eq!(fixture.content("bundle.js").matches("module.exports").count(), 1);
    assert!(fixture.content("bundle.js").ends_with("\nmodule.exports = window[\"jsonp\"];\n"));
    assert!(fixture.content("pages/index.js").contains("window[\"jsonp\"] = require(\"../bundle.js\");\n"));
  }

  #[test]
  fn sandboxed_host_publishes_from_the_root_entry() {
    let mut fixture = Fixture::new();
    let runtime = fixture.chunk("bundle", "bundle.js", "/*runtime*/");
    let app = fixture.chunk("app", "app.js", "/*app*/");
    let page = fixture.chunk("pages/index", "pages/index.js", "/*page*/");
    fixture.graph.add_chunk_group(ChunkGroup::initial("app", vec![runtime, app]));
    fixture.graph.add_chunk_group(ChunkGroup::initial("pages/index", vec![runtime, page]));

    fixture.assemble(host(HostProfile::Ali));

    let app = fixture.content("app.js");
    assert!(app.contains("context[\"webpackJsonp\"] = window[\"webpackJsonp\"] = require(\"./bundle.js\");\n"));
    assert!(app.ends_with("/*app*/"));

    let page = fixture.content("pages/index.js");
    assert!(page.contains("window[\"webpackJsonp\"] = context[\"webpackJsonp\"];\n"));
    assert!(!page.contains("require("));
  }

  #[test]
  fn unnamed_chunks_mirror_without_entries() {
    let mut fixture = Fixture { graph: ChunkGraph::default(), assets: OutputAssets::default() };
    fixture.assets.insert("bundle.js".to_string(), "/*runtime*/".to_string());
    fixture.assets.insert("main.js".to_string(), "/*main*/".to_string());
    let runtime = fixture.graph.add_chunk(Chunk::new(None, vec!["bundle.js".into()]));
    let entry = fixture.graph.add_chunk(Chunk::new(None, vec!["main.js".into()]));
    fixture.graph.add_chunk_group(ChunkGroup::initial("main", vec![runtime, entry]));

    fixture.assemble(host(HostProfile::Ali));

    let main = fixture.content("main.js");
    assert!(main.contains("window[\"webpackJsonp\"] = context[\"webpackJsonp\"];\n"));
    assert!(!main.contains("require("));
  }

  #[test]
  fn runtime_gets_the_environment_shim() {
    let mut fixture = Fixture::new();
    let runtime = fixture.chunk("bundle", "bundle.js", "/*runtime*/");
    let app = fixture.chunk("app", "app.js", "/*app*/");
    fixture.graph.add_chunk_group(ChunkGroup::initial("app", vec![runtime, app]));

    fixture.assemble(host(HostProfile::Swan));

    let bundle = fixture.content("bundle.js");
    let shim = bundle.find("context.navigator").unwrap();
    let console = bundle.find("context.console").unwrap();
    let original = bundle.find("/*runtime*/").unwrap();
    assert!(console < shim && shim < original);
    assert!(fixture.content("app.js").contains("require(\"./bundle.js\")"));
  }

  #[test]
  fn plugin_main_exports_its_content() {
    let mut fixture = Fixture::new();
    let runtime = fixture.chunk("bundle", "bundle.js", "/*runtime*/");
    let app = fixture.chunk("app", "app.js", "/*app*/");
    fixture.graph.add_chunk_group(ChunkGroup::initial("app", vec![runtime, app]));

    fixture.assemble(PackOptions { plugin_main: Some("app".to_string()), ..PackOptions::default() });

    assert!(fixture.content("app.js").ends_with("module.exports =\n/*app*/"));
  }

  #[test]
  fn unsplit_and_async_groups_are_skipped() {
    let mut fixture = Fixture::new();
    let app = fixture.chunk("app", "app.js", "/*app*/");
    let runtime = fixture.chunk("bundle", "bundle.js", "/*runtime*/");
    let lazy = fixture.chunk("lazy", "lazy.js", "/*lazy*/");
    fixture.graph.add_chunk_group(ChunkGroup::initial("app", vec![app]));
    fixture.graph.add_chunk_group(ChunkGroup {
      name: Some("lazy".into()),
      is_initial: false,
      chunks: vec![runtime, lazy],
    });

    assert_eq!(fixture.assemble(PackOptions::default()), 0);
    assert_eq!(fixture.content("app.js"), "/*app*/");
    assert_eq!(fixture.content("lazy.js"), "/*lazy*/");
  }

  #[test]
  fn chunks_without_assets_are_left_alone() {
    let mut fixture = Fixture::new();
    let runtime = fixture.chunk("bundle", "bundle.js", "/*runtime*/");
    let ghost = fixture.graph.add_chunk(Chunk::new(Some("ghost".into()), vec![]));
    let app = fixture.chunk("app", "app.js", "/*app*/");
    fixture.graph.add_chunk_group(ChunkGroup::initial("app", vec![runtime, ghost, app]));

    assert_eq!(fixture.assemble(PackOptions::default()), 2);
    assert!(fixture.content("app.js").ends_with("require(\"bundle.js\");\n/*app*/"));
  }
}
