//! Boundary code the assembler wraps around chunk contents.
//!
//! `key` is always the loader key as a JavaScript string literal.

pub const WINDOW_FALLBACK: &str = "\nvar window = window || {};\n\n";

const CONTEXT_DECL: &str =
  "var context = (function() { return this })() || Function(\"return this\")();\n";

pub const PLUGIN_MAIN_EXPORT: &str = "module.exports =\n";

pub fn runtime_prelude() -> String {
  format!("{CONTEXT_DECL}if(!context.console) context.console = console;\n\n")
}

pub fn export_loader_handle(key: &str) -> String {
  format!("\nmodule.exports = window[{key}];\n")
}

/// Loads the runtime chunk and keeps its handle on the fallback global.
pub fn require_runtime(key: &str, path: &str) -> String {
  format!("window[{key}] = require(\"{path}\");\n")
}

/// Root chunk on sandboxed hosts: loads the runtime and publishes its handle on the execution context.
pub fn publish_runtime(key: &str, path: &str) -> String {
  format!(
    "// publish subpackage runtime on the global context\n{CONTEXT_DECL}\n\
     context[{key}] = window[{key}] = require(\"{path}\");\n"
  )
}

/// Any other chunk on sandboxed hosts: reads the handle the root chunk published.
pub fn mirror_runtime(key: &str) -> String {
  format!(
    "// mirror subpackage runtime from the global context\n{CONTEXT_DECL}\n\
     window[{key}] = context[{key}];\n"
  )
}

pub fn require_dependency(path: &str) -> String {
  format!("require(\"{path}\");\n")
}

#[test]
fn test_bootstrap_snippets() {
  assert_eq!(
    require_runtime("\"webpackJsonp\"", "../bundle.js"),
    "window[\"webpackJsonp\"] = require(\"../bundle.js\");\n"
  );
  assert!(publish_runtime("\"k\"", "./bundle.js")
    .ends_with("\n\ncontext[\"k\"] = window[\"k\"] = require(\"./bundle.js\");\n"));
  assert!(mirror_runtime("\"k\"").ends_with("\n\nwindow[\"k\"] = context[\"k\"];\n"));
  assert!(runtime_prelude().starts_with(CONTEXT_DECL));
}
