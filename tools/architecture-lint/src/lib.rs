//! Layer guardrails for the `provisioner` crate.
//!
//! Every `.rs` file under `provisioner/src/{domain,inbound,outbound}` is
//! parsed and the root of each path it names is checked against its layer's
//! deny list. Internal roots are written `crate::<module>`; anything else is
//! an external crate name.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::{self, Visit};
use thiserror::Error;

/// Top-level module of `provisioner/src` a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    /// Directory name under `provisioner/src`.
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    /// Dependency roots the layer must not name.
    pub const fn denied(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "crate::bootstrap",
                "crate::inbound",
                "crate::outbound",
                "argon2",
                "cap_std",
                "clap",
                "color_eyre",
                "mongodb",
                "ortho_config",
                "tracing_subscriber",
            ],
            Self::Inbound => &["crate::outbound", "argon2", "mongodb"],
            Self::Outbound => &["crate::bootstrap", "crate::inbound", "clap", "ortho_config"],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// A denied dependency named by a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path relative to `provisioner/src`.
    pub file: PathBuf,
    pub layer: Layer,
    pub dependency: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} must not depend on `{}`",
            self.file.display(),
            self.layer,
            self.dependency
        )
    }
}

/// Failures that stop the lint before it can judge the tree.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
}

/// Lint every layer under `src_dir`, the crate's `src/` directory.
///
/// Missing layer directories are skipped.
///
/// # Errors
///
/// Returns [`LintError`] when a file cannot be read or parsed.
pub fn lint_tree(src_dir: &Path) -> Result<Vec<Violation>, LintError> {
    let mut violations = Vec::new();
    for layer in Layer::ALL {
        let root = src_dir.join(layer.dir());
        if !root.is_dir() {
            continue;
        }
        for path in rust_files(&root)? {
            let contents = fs::read_to_string(&path).map_err(|source| LintError::Read {
                path: path.clone(),
                source,
            })?;
            let relative = path.strip_prefix(src_dir).unwrap_or(&path).to_path_buf();
            violations.extend(lint_source(layer, &relative, &contents)?);
        }
    }
    Ok(violations)
}

/// Lint one file's contents as part of `layer`.
///
/// # Errors
///
/// Returns [`LintError::Parse`] when `contents` is not valid Rust.
pub fn lint_source(
    layer: Layer,
    file: &Path,
    contents: &str,
) -> Result<Vec<Violation>, LintError> {
    let parsed = syn::parse_file(contents).map_err(|source| LintError::Parse {
        path: file.to_path_buf(),
        source,
    })?;
    let mut roots = RootCollector::default();
    roots.visit_file(&parsed);

    Ok(layer
        .denied()
        .iter()
        .copied()
        .filter(|denied| roots.0.iter().any(|root| root == denied))
        .map(|dependency| Violation {
            file: file.to_path_buf(),
            layer,
            dependency,
        })
        .collect())
}

fn rust_files(dir: &Path) -> Result<Vec<PathBuf>, LintError> {
    let read = |source| LintError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read)? {
        let path = entry.map_err(read)?.path();
        if path.is_dir() {
            files.extend(rust_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Roots of every `use` tree and path expression, e.g. `mongodb` or
/// `crate::outbound`.
#[derive(Default)]
struct RootCollector(Vec<String>);

impl RootCollector {
    fn push(&mut self, first: &syn::Ident, second: Option<&syn::Ident>) {
        let root = match second {
            Some(module) if first == "crate" => format!("crate::{module}"),
            _ => first.to_string(),
        };
        if !self.0.contains(&root) {
            self.0.push(root);
        }
    }

    fn use_tree(&mut self, tree: &syn::UseTree) {
        match tree {
            syn::UseTree::Path(path) if path.ident == "crate" => {
                self.crate_children(&path.ident, &path.tree);
            }
            syn::UseTree::Path(path) => self.push(&path.ident, None),
            syn::UseTree::Name(name) => self.push(&name.ident, None),
            syn::UseTree::Rename(rename) => self.push(&rename.ident, None),
            syn::UseTree::Group(group) => group.items.iter().for_each(|item| self.use_tree(item)),
            syn::UseTree::Glob(_) => {}
        }
    }

    fn crate_children(&mut self, krate: &syn::Ident, tree: &syn::UseTree) {
        match tree {
            syn::UseTree::Path(next) => self.push(krate, Some(&next.ident)),
            syn::UseTree::Name(next) => self.push(krate, Some(&next.ident)),
            syn::UseTree::Rename(next) => self.push(krate, Some(&next.ident)),
            syn::UseTree::Group(group) => group
                .items
                .iter()
                .for_each(|item| self.crate_children(krate, item)),
            syn::UseTree::Glob(_) => {}
        }
    }
}

impl<'ast> Visit<'ast> for RootCollector {
    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.use_tree(&node.tree);
    }

    fn visit_path(&mut self, node: &'ast syn::Path) {
        let mut segments = node.segments.iter().map(|segment| &segment.ident);
        if let Some(first) = segments.next() {
            self.push(first, segments.next());
        }
        visit::visit_path(self, node);
    }
}
