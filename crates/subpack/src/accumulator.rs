use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use subpack_common::SourceJoiner;
use subpack_utils::indexmap::{FxIndexMap, FxIndexMapExt};

/// Fragments buffered for one output file.
#[derive(Debug, Default)]
pub struct ExtractedFile {
  /// Emitted before the indexed fragments, in push order.
  pub prefix: Vec<String>,
  fragments: BTreeMap<usize, String>,
}

impl ExtractedFile {
  pub fn get(&self, index: usize) -> Option<&str> {
    self.fragments.get(&index).map(String::as_str)
  }

  pub fn is_occupied(&self, index: usize) -> bool {
    self.fragments.contains_key(&index)
  }

  /// Indexed fragments in index order.
  pub fn fragments(&self) -> impl Iterator<Item = (usize, &str)> {
    self.fragments.iter().map(|(index, fragment)| (*index, fragment.as_str()))
  }

  fn insert(&mut self, index: usize, fragment: String) -> bool {
    if self.fragments.contains_key(&index) {
      return false;
    }
    self.fragments.insert(index, fragment);
    true
  }

  fn join(&self) -> String {
    let mut joiner = SourceJoiner::default();
    self.prefix.iter().for_each(|fragment| joiner.prepend_source(fragment.as_str()));
    self.fragments.values().for_each(|fragment| joiner.append_source(fragment.as_str()));
    joiner.join()
  }
}

/// Buffers generated content from independent producers until the module graph is sealed.
///
/// Producers own disjoint index ranges of a file. The first fragment written at
/// an index wins, so producers never need to coordinate.
#[derive(Debug, Default)]
pub struct AssetAccumulator {
  files: FxIndexMap<String, ExtractedFile>,
  named_slots: FxHashMap<String, FxHashSet<String>>,
}

impl AssetAccumulator {
  /// Returns whether `fragment` was stored, i.e. `index` was still free.
  pub fn extract(&mut self, file: &str, index: usize, fragment: impl Into<String>) -> bool {
    self.extract_with(file, index, fragment, |_| {})
  }

  /// Like `extract`, then hands the file's buffer to `side_effect` so a producer
  /// can react to what earlier producers left there.
  pub fn extract_with(
    &mut self,
    file: &str,
    index: usize,
    fragment: impl Into<String>,
    side_effect: impl FnOnce(&mut ExtractedFile),
  ) -> bool {
    let extracted = self.files.entry(file.to_string()).or_default();
    let stored = extracted.insert(index, fragment.into());
    tracing::trace!(file, index, stored, "extracted fragment");
    side_effect(extracted);
    stored
  }

  pub fn prepend(&mut self, file: &str, fragment: impl Into<String>) {
    self.files.entry(file.to_string()).or_default().prefix.push(fragment.into());
  }

  /// Claims a named slot of `file`. Returns `false` when it was claimed before.
  pub fn claim_named_slot(&mut self, file: &str, name: &str) -> bool {
    self.named_slots.entry(file.to_string()).or_default().insert(name.to_string())
  }

  pub fn file(&self, file: &str) -> Option<&ExtractedFile> {
    self.files.get(file)
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  /// Concatenates every buffered file: prefix fragments first, then indexed
  /// fragments in index order.
  pub fn flush(self) -> FxIndexMap<String, String> {
    let mut flushed = FxIndexMap::with_fx_capacity(self.files.len());
    for (file, extracted) in self.files {
      let content = extracted.join();
      flushed.insert(file, content);
    }
    flushed
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn flushes_in_index_order() {
    let mut accumulator = AssetAccumulator::default();
    assert!(accumulator.extract("app.wxss", 2, "c"));
    assert!(accumulator.extract("app.wxss", 0, "a"));
    assert!(accumulator.extract("app.wxss", 1, "b"));

    let flushed = accumulator.flush();
    assert_eq!(flushed.get("app.wxss").map(String::as_str), Some("abc"));
  }

  #[test]
  fn first_writer_wins() {
    let mut accumulator = AssetAccumulator::default();
    assert!(accumulator.extract("app.wxss", 0, "first"));
    assert!(!accumulator.extract("app.wxss", 0, "second"));
    assert_eq!(accumulator.file("app.wxss").and_then(|file| file.get(0)), Some("first"));
  }

  #[test]
  fn skips_unset_indices_and_prepends_prefix() {
    let mut accumulator = AssetAccumulator::default();
    accumulator.extract("pages/index.wxml", 5, "<view/>");
    accumulator.extract("pages/index.wxml", 1, "<import src=\"a.wxml\"/>");
    accumulator.prepend("pages/index.wxml", "<wxs module=\"m\"/>");

    let flushed = accumulator.flush();
    assert_eq!(
      flushed.get("pages/index.wxml").map(String::as_str),
      Some("<wxs module=\"m\"/><import src=\"a.wxml\"/><view/>")
    );
  }

  #[test]
  fn side_effect_sees_the_buffer_after_the_write() {
    let mut accumulator = AssetAccumulator::default();
    accumulator.extract("app.js", 0, "first;");

    let mut seen = vec![];
    let stored = accumulator.extract_with("app.js", 3, "later;", |extracted| {
      seen = extracted.fragments().map(|(index, _)| index).collect();
      if !extracted.is_occupied(1) {
        extracted.prefix.push("prefix;".to_string());
      }
    });

    assert!(stored);
    assert_eq!(seen, vec![0, 3]);
    assert_eq!(accumulator.flush().get("app.js").map(String::as_str), Some("prefix;first;later;"));
  }

  #[test]
  fn named_slots_are_claimed_once() {
    let mut accumulator = AssetAccumulator::default();
    assert!(accumulator.claim_named_slot("/src/card.mpx", "$style"));
    assert!(accumulator.claim_named_slot("/src/card.mpx", "theme"));
    assert!(!accumulator.claim_named_slot("/src/card.mpx", "$style"));
    assert!(accumulator.claim_named_slot("/src/list.mpx", "$style"));
  }
}
