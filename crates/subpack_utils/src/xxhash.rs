use xxhash_rust::xxh3::xxh3_64;

/// Digest used to tell whether an emitted file changed between two builds.
pub fn content_digest(content: &[u8]) -> u64 {
  xxh3_64(content)
}

#[test]
fn test_content_digest() {
  assert_eq!(content_digest(b"hello"), content_digest(b"hello"));
  assert_ne!(content_digest(b"hello"), content_digest(b"hello\n"));
}
