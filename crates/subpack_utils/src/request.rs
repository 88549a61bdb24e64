use std::borrow::Cow;

use url::form_urlencoded;

use crate::indexmap::FxIndexMap;

/// Decoded query of a request, in the order the pairs were written.
pub type Query = FxIndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest<'a> {
  /// Inline loader chain in front of the resource, including the trailing `!`.
  pub loaders: &'a str,
  /// The resource with its query string.
  pub resource: &'a str,
  /// The resource without its query string. This is the identity used by the placement registry.
  pub resource_path: &'a str,
  pub query: Query,
}

impl ParsedRequest<'_> {
  pub fn has_flag(&self, key: &str) -> bool {
    self.query.get(key).is_some_and(|value| value != "false")
  }
}

pub fn parse_request(request: &str) -> ParsedRequest<'_> {
  let resource_start = request.rfind('!').map_or(0, |idx| idx + 1);
  let (loaders, resource) = request.split_at(resource_start);
  let (resource_path, query) = match resource.split_once('?') {
    Some((path, query)) => (path, parse_query(query)),
    None => (resource, Query::default()),
  };
  ParsedRequest { loaders, resource, resource_path, query }
}

pub fn parse_query(query: &str) -> Query {
  form_urlencoded::parse(query.as_bytes())
    .map(|(key, value)| (key.into_owned(), value.into_owned()))
    .collect()
}

/// Strips the query string of an emitted file name.
pub fn strip_query(file: &str) -> &str {
  file.split_once('?').map_or(file, |(path, _)| path)
}

/// Merges `pairs` into the query of `request`. A key already present takes the
/// new value in place, other keys are appended.
///
/// The rest of the query is kept as written, so bare flags and the original
/// encoding of values survive.
pub fn add_query<'p>(request: &str, pairs: impl IntoIterator<Item = (&'p str, &'p str)>) -> String {
  let resource_start = request.rfind('!').map_or(0, |idx| idx + 1);
  let (loaders, resource) = request.split_at(resource_start);
  let (resource_path, raw_query) = resource.split_once('?').unwrap_or((resource, ""));

  let mut segments =
    raw_query.split('&').filter(|segment| !segment.is_empty()).map(Cow::Borrowed).collect::<Vec<_>>();
  for (key, value) in pairs {
    let segment = Cow::Owned(encode_segment(key, value));
    match segments.iter_mut().find(|existing| segment_key(existing) == key) {
      Some(existing) => *existing = segment,
      None => segments.push(segment),
    }
  }

  if segments.is_empty() {
    return request.to_string();
  }
  format!("{loaders}{resource_path}?{}", segments.join("&"))
}

fn segment_key(segment: &str) -> Cow<'_, str> {
  form_urlencoded::parse(segment.as_bytes()).next().map_or(Cow::Borrowed(""), |(key, _)| key)
}

/// An empty value is written as a bare flag.
fn encode_segment(key: &str, value: &str) -> String {
  let key = form_urlencoded::byte_serialize(key.as_bytes()).collect::<String>();
  if value.is_empty() {
    key
  } else {
    format!("{key}={}", form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>())
  }
}

#[test]
fn test_parse_request() {
  let parsed = parse_request("!!path-loader!/src/static/icon.png?packageName=shop&inline");
  assert_eq!(parsed.loaders, "!!path-loader!");
  assert_eq!(parsed.resource, "/src/static/icon.png?packageName=shop&inline");
  assert_eq!(parsed.resource_path, "/src/static/icon.png");
  assert_eq!(parsed.query.get("packageName").map(String::as_str), Some("shop"));
  assert!(parsed.has_flag("inline"));
  assert!(!parsed.has_flag("component"));

  let parsed = parse_request("/src/app.mpx");
  assert_eq!(parsed.loaders, "");
  assert_eq!(parsed.resource_path, "/src/app.mpx");
  assert!(parsed.query.is_empty());
}

#[test]
fn test_add_query() {
  assert_eq!(add_query("/src/icon.png", [("packageName", "shop")]), "/src/icon.png?packageName=shop");
  assert_eq!(
    add_query("loader!/src/icon.png?a=1&packageName=main", [("packageName", "shop")]),
    "loader!/src/icon.png?a=1&packageName=shop"
  );
  assert_eq!(add_query("/src/icon.png", []), "/src/icon.png");
  assert_eq!(
    add_query("/src/card.mpx?component&name=a/b c", [("packageName", "user")]),
    "/src/card.mpx?component&name=a/b c&packageName=user"
  );
  assert_eq!(
    add_query("/src/card.mpx?name=a%2Fb&packageName=main&inline", [("packageName", "user")]),
    "/src/card.mpx?name=a%2Fb&packageName=user&inline"
  );
  assert_eq!(add_query("/src/card.mpx?page", [("inline", "")]), "/src/card.mpx?page&inline");
}

#[test]
fn test_strip_query() {
  assert_eq!(strip_query("pages/index.js?v=1"), "pages/index.js");
  assert_eq!(strip_query("pages/index.js"), "pages/index.js");
}
