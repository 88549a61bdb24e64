use std::{
  io::{self, Read, Write},
  path::Path,
};

use vfs::{MemoryFS, VfsPath};

use crate::FileSystem;

/// In-memory file system, mostly used by tests and watch-mode dry runs.
#[derive(Debug)]
pub struct MemoryFileSystem {
  root: VfsPath,
}

impl Default for MemoryFileSystem {
  fn default() -> Self {
    Self { root: VfsPath::new(MemoryFS::new()) }
  }
}

impl MemoryFileSystem {
  pub fn new() -> Self {
    Self::default()
  }

  fn vfs_path(&self, path: &Path) -> io::Result<VfsPath> {
    let path = path.to_string_lossy().replace('\\', "/");
    let path = path.trim_start_matches('/').trim_end_matches('/');
    if path.is_empty() {
      return Ok(self.root.clone());
    }
    self.root.join(path).map_err(io::Error::other)
  }
}

impl FileSystem for MemoryFileSystem {
  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    self.vfs_path(path)?.create_dir_all().map_err(io::Error::other)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    let path = self.vfs_path(path)?;
    let mut file = path.create_file().map_err(io::Error::other)?;
    file.write_all(content)
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    let path = self.vfs_path(path)?;
    let mut file = path.open_file().map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(content)
  }

  fn exists(&self, path: &Path) -> bool {
    self.vfs_path(path).and_then(|path| path.exists().map_err(io::Error::other)).unwrap_or(false)
  }
}

#[test]
fn test_memory_file_system() {
  let fs = MemoryFileSystem::new();
  fs.create_dir_all(Path::new("/dist/shop/pages")).unwrap();
  fs.write(Path::new("/dist/shop/pages/cart.js"), b"require(\"../bundle.js\");").unwrap();

  assert!(fs.exists(Path::new("/dist/shop/pages/cart.js")));
  assert!(!fs.exists(Path::new("/dist/shop/pages/missing.js")));
  assert_eq!(
    fs.read_to_string(Path::new("/dist/shop/pages/cart.js")).unwrap(),
    "require(\"../bundle.js\");"
  );
  assert!(fs.read(Path::new("/dist/missing.js")).is_err());
}
