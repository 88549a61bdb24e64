pub mod chunk_group;

use arcstr::ArcStr;
use subpack_utils::{path_ext::relative_to_dir_of, request::strip_query};

use crate::HostProfile;

/// A physical emitted file holding one or more compiled modules.
#[derive(Debug, Default, Clone)]
pub struct Chunk {
  pub name: Option<ArcStr>,
  /// Emitted files; the first one is the chunk's code. Entries may carry a query string.
  pub files: Vec<ArcStr>,
}

impl Chunk {
  pub fn new(name: Option<ArcStr>, files: Vec<ArcStr>) -> Self {
    Self { name, files }
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// Key of the chunk's code in the output asset map.
  pub fn primary_file(&self) -> Option<&str> {
    self.files.first().map(ArcStr::as_str)
  }

  /// Primary file without its query, i.e. the path it has on disk.
  pub fn target_file(&self) -> Option<&str> {
    self.primary_file().map(strip_query)
  }

  /// Path `host` should `require` to load `importee` from this chunk.
  pub fn import_path_for(&self, importee: &Chunk, host: HostProfile) -> Option<String> {
    let importer_file = self.target_file()?;
    let importee_file = importee.target_file()?;
    Some(host.host_relative_path(relative_to_dir_of(importer_file, importee_file)))
  }
}

#[test]
fn test_import_path_for() {
  let runtime = Chunk::new(Some("bundle".into()), vec!["bundle.js".into()]);
  let page = Chunk::new(Some("pages/index".into()), vec!["pages/index.js?v=3".into()]);
  let app = Chunk::new(Some("app".into()), vec!["app.js".into()]);
  let empty = Chunk::new(None, vec![]);

  assert_eq!(page.target_file(), Some("pages/index.js"));
  assert_eq!(page.import_path_for(&runtime, HostProfile::Wx).as_deref(), Some("../bundle.js"));
  assert_eq!(app.import_path_for(&runtime, HostProfile::Wx).as_deref(), Some("bundle.js"));
  assert_eq!(app.import_path_for(&runtime, HostProfile::Ali).as_deref(), Some("./bundle.js"));
  assert_eq!(app.import_path_for(&empty, HostProfile::Wx), None);
}
