use std::{io, path::Path};

/// The file system the emitted output is written to.
pub trait FileSystem: Send + Sync {
  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    String::from_utf8(self.read(path)?).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
  }

  fn exists(&self, path: &Path) -> bool;
}
