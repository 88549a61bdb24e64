use arcstr::ArcStr;
use subpack_common::PackageName;

pub const MIN_CHUNKS: usize = 2;
pub const PACKAGE_MIN_SIZE: usize = 1000;
pub const PACKAGE_PRIORITY: i32 = 100;
pub const DEFAULT_PRIORITY: i32 = 0;

/// Which chunks a cache group looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkScope {
  /// Chunks loaded with their entry, i.e. not through a dynamic import.
  Initial,
}

impl ChunkScope {
  pub fn includes(self, is_initial: bool) -> bool {
    match self {
      Self::Initial => is_initial,
    }
  }
}

/// Which modules a cache group may take in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageScope {
  /// Any module, used by the `main` group.
  Any,
  /// Modules used only by chunks emitted under this package.
  Package(PackageName),
}

/// A chunk a module is used in, as seen by the grouping policy.
#[derive(Debug, Clone, Copy)]
pub struct ChunkUsage<'a> {
  pub name: Option<&'a str>,
  pub is_initial: bool,
}

impl<'a> ChunkUsage<'a> {
  pub fn initial(name: &'a str) -> Self {
    Self { name: Some(name), is_initial: true }
  }
}

/// Rule co-locating modules shared by several entry chunks into one shared chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheGroup {
  /// Name of the shared chunk the group produces.
  pub name: ArcStr,
  pub min_chunks: usize,
  pub min_size: usize,
  pub priority: i32,
  pub chunks: ChunkScope,
  pub scope: PackageScope,
}

impl CacheGroup {
  pub fn main() -> Self {
    Self {
      name: arcstr::literal!("bundle"),
      min_chunks: MIN_CHUNKS,
      min_size: 0,
      priority: DEFAULT_PRIORITY,
      chunks: ChunkScope::Initial,
      scope: PackageScope::Any,
    }
  }

  pub fn for_package(package: &PackageName) -> Self {
    if package.is_main() {
      return Self::main();
    }
    Self {
      name: arcstr::format!("{package}/bundle"),
      min_chunks: MIN_CHUNKS,
      min_size: PACKAGE_MIN_SIZE,
      priority: PACKAGE_PRIORITY,
      chunks: ChunkScope::Initial,
      scope: PackageScope::Package(package.clone()),
    }
  }

  /// Membership predicate over every chunk the module is used in.
  pub fn test(&self, chunks: &[ChunkUsage<'_>]) -> bool {
    match &self.scope {
      PackageScope::Any => true,
      PackageScope::Package(package) => {
        chunks.iter().all(|chunk| chunk.name.is_some_and(|name| package.owns_chunk(name)))
      }
    }
  }

  /// Whether a module of `size` used in `chunks` is co-located by this group.
  pub fn accepts(&self, chunks: &[ChunkUsage<'_>], size: usize) -> bool {
    let selected = chunks.iter().filter(|chunk| self.chunks.includes(chunk.is_initial)).count();
    selected >= self.min_chunks && size >= self.min_size && self.test(chunks)
  }
}
