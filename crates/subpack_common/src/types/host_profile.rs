use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

/// How the loader handle published by the runtime chunk reaches the other chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalContext {
  /// The host shares one global object between every package, so each chunk
  /// can require the runtime chunk and read the handle from it.
  Shared,
  /// Packages are sandboxed. The root entry captures the global execution
  /// context once and publishes the handle on it, every other chunk mirrors
  /// the handle from that context onto its own fallback global.
  Mirrored,
}

/// The host JavaScript environment the output is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostProfile {
  #[default]
  Wx,
  Ali,
  Swan,
  Qq,
  Tt,
}

const SWAN_NAVIGATOR_SHIM: &str = "// swan runtime fix\n\
if (!context.navigator) {\n  context.navigator = {};\n}\n\
Object.defineProperty(context.navigator, \"standalone\",{\n  configurable: true,  enumerable: true,  get () {\n    return true;\n  }\n});\n\n";

impl HostProfile {
  pub fn global_context(self) -> GlobalContext {
    match self {
      Self::Ali => GlobalContext::Mirrored,
      Self::Wx | Self::Swan | Self::Qq | Self::Tt => GlobalContext::Shared,
    }
  }

  /// Environment patch the runtime chunk applies before any module code runs.
  pub fn environment_shim(self) -> Option<&'static str> {
    match self {
      Self::Swan => Some(SWAN_NAVIGATOR_SHIM),
      Self::Wx | Self::Ali | Self::Qq | Self::Tt => None,
    }
  }

  /// Whether `require` on this host resolves a bare `foo.js` as a package rather than a sibling file.
  pub fn requires_explicit_relative(self) -> bool {
    matches!(self, Self::Ali | Self::Swan)
  }

  /// Rewrites a posix relative path into the form this host's `require` accepts.
  pub fn host_relative_path(self, relative: String) -> String {
    if self.requires_explicit_relative() && !relative.starts_with('.') {
      format!("./{relative}")
    } else {
      relative
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Wx => "wx",
      Self::Ali => "ali",
      Self::Swan => "swan",
      Self::Qq => "qq",
      Self::Tt => "tt",
    }
  }
}

impl FromStr for HostProfile {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "wx" => Ok(Self::Wx),
      "ali" => Ok(Self::Ali),
      "swan" => Ok(Self::Swan),
      "qq" => Ok(Self::Qq),
      "tt" => Ok(Self::Tt),
      _ => Err(format!("Invalid host \"{s}\".")),
    }
  }
}

impl Display for HostProfile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[test]
fn test_host_profile() {
  assert_eq!("ali".parse::<HostProfile>(), Ok(HostProfile::Ali));
  assert!("web".parse::<HostProfile>().is_err());
  assert_eq!(HostProfile::Ali.global_context(), GlobalContext::Mirrored);
  assert_eq!(HostProfile::Wx.global_context(), GlobalContext::Shared);
  assert!(HostProfile::Swan.environment_shim().is_some_and(|shim| shim.contains("standalone")));
  assert!(HostProfile::Tt.environment_shim().is_none());
  assert_eq!(HostProfile::Swan.host_relative_path("bundle.js".to_string()), "./bundle.js");
  assert_eq!(HostProfile::Swan.host_relative_path("../bundle.js".to_string()), "../bundle.js");
  assert_eq!(HostProfile::Wx.host_relative_path("bundle.js".to_string()), "bundle.js");
}
