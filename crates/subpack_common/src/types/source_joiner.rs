use super::source::Source;

/// Concatenates sources as-is, prepended sources first.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
  prepend_source: Vec<Box<dyn Source + Send + 'source>>,
}

impl<'source> SourceJoiner<'source> {
  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.inner.push(Box::new(source));
  }

  pub fn prepend_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.prepend_source.push(Box::new(source));
  }

  pub fn is_empty(&self) -> bool {
    self.inner.is_empty() && self.prepend_source.is_empty()
  }

  pub fn join(&self) -> String {
    let sources = self.prepend_source.iter().chain(self.inner.iter());
    let size_hint = sources.clone().map(|source| source.content().len()).sum::<usize>();
    let mut ret_source = String::with_capacity(size_hint);
    sources.for_each(|source| ret_source.push_str(source.content()));
    ret_source
  }
}

#[test]
fn test_source_joiner() {
  let mut joiner = SourceJoiner::default();
  assert!(joiner.is_empty());
  joiner.append_source("b");
  joiner.append_source(String::from("c"));
  joiner.prepend_source("a");
  assert_eq!(joiner.join(), "abc");
}
