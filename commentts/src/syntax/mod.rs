//! Syntax service — dispatch by file extension.

pub mod typescript;

use anyhow::{anyhow, Result};
use commentts_syntax::DeclarationNode;
use std::path::Path;
use typescript::{Dialect, TypeScriptSyntax};

/// Declaration lookup over one parsed document.
pub trait SyntaxService {
    /// The documentable declaration at `offset`, or the nearest one enclosing it.
    fn node_at(&self, offset: usize) -> Option<DeclarationNode>;
    /// Nodes from the root down to the token at `offset`, one entry each.
    fn trace(&self, offset: usize) -> String;
}

/// File extensions recognized as TypeScript.
const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Parse `source` with the grammar matching `path`'s extension.
pub fn create_syntax(path: &Path, source: &str) -> Result<Box<dyn SyntaxService>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts") => Ok(Box::new(TypeScriptSyntax::parse(source, Dialect::TypeScript)?)),
        Some("tsx") => Ok(Box::new(TypeScriptSyntax::parse(source, Dialect::Tsx)?)),
        _ => Err(anyhow!("unsupported file type: {}", path.display())),
    }
}
