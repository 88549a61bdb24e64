pub mod cache_group;

use subpack_common::PackageName;
use subpack_utils::indexmap::FxIndexMap;

use self::cache_group::{CacheGroup, ChunkUsage};

/// Cache groups keyed by the package they serve.
///
/// `main` is seeded up front. Sub-package groups are added as packages are
/// discovered and are never altered or removed afterwards.
#[derive(Debug)]
pub struct CacheGroupSet {
  groups: FxIndexMap<PackageName, CacheGroup>,
}

impl Default for CacheGroupSet {
  fn default() -> Self {
    Self { groups: FxIndexMap::from_iter([(PackageName::main(), CacheGroup::main())]) }
  }
}

impl CacheGroupSet {
  /// Adds a group for every package that has none yet. Returns whether the set grew,
  /// in which case the splitter consuming the groups has to be renormalized.
  pub fn reconcile<'a>(&mut self, known_packages: impl IntoIterator<Item = &'a PackageName>) -> bool {
    let mut grew = false;
    for package in known_packages {
      if !self.groups.contains_key(package) {
        let group = CacheGroup::for_package(package);
        tracing::debug!(%package, name = %group.name, "created cache group");
        self.groups.insert(package.clone(), group);
        grew = true;
      }
    }
    grew
  }

  pub fn get(&self, package: &PackageName) -> Option<&CacheGroup> {
    self.groups.get(package)
  }

  pub fn entries(&self) -> impl Iterator<Item = (&PackageName, &CacheGroup)> {
    self.groups.iter()
  }

  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  /// The group a module of `size` used in `chunks` is moved into. The highest
  /// priority wins, ties keep the group created first.
  pub fn select(&self, chunks: &[ChunkUsage<'_>], size: usize) -> Option<&CacheGroup> {
    self.groups.values().filter(|group| group.accepts(chunks, size)).fold(None, |best, group| {
      match best {
        Some(best) if best.priority >= group.priority => Some(best),
        _ => Some(group),
      }
    })
  }
}
