use std::path::Path;

use sugar_path::SugarPath;

pub trait PathExt {
  fn expect_to_slash(&self) -> String;
}

impl PathExt for Path {
  fn expect_to_slash(&self) -> String {
    self
      .to_slash()
      .unwrap_or_else(|| panic!("Failed to convert {:?} to slash str", self.display()))
      .into_owned()
  }
}

/// Joins `path` under `root` in posix form. An empty `root` keeps `path` at the top level.
pub fn join_posix(root: &str, path: &str) -> String {
  let path = path.trim_start_matches(['/', '\\']);
  Path::new(root).join(path).normalize().expect_to_slash()
}

/// Path of the `target` file as seen from the directory holding `from`.
///
/// Both are output-relative file names, so they are anchored at a common root
/// before diffing to keep the result independent of the current directory.
pub fn relative_to_dir_of(from: &str, target: &str) -> String {
  let anchor = Path::new("/");
  let from = anchor.join(from.trim_start_matches('/'));
  let dir = from.parent().unwrap_or(anchor);
  anchor.join(target.trim_start_matches('/')).relative(dir).expect_to_slash()
}

#[test]
fn test_join_posix() {
  assert_eq!(join_posix("", "components/list/index"), "components/list/index");
  assert_eq!(join_posix("shop", "components/list/index"), "shop/components/list/index");
  assert_eq!(join_posix("shop", "/static/icon.png"), "shop/static/icon.png");
  assert_eq!(join_posix("shop", "./static/../icon.png"), "shop/icon.png");
}

#[test]
fn test_relative_to_dir_of() {
  assert_eq!(relative_to_dir_of("pages/index.js", "bundle.js"), "../bundle.js");
  assert_eq!(relative_to_dir_of("app.js", "bundle.js"), "bundle.js");
  assert_eq!(relative_to_dir_of("shop/pages/cart.js", "shop/bundle.js"), "../bundle.js");
  assert_eq!(relative_to_dir_of("shop/pages/cart.js", "shop/pages/common.js"), "common.js");
}
