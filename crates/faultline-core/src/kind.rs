//! Error kind registry
//!
//! Kinds form a single-rooted tree. Each name maps to exactly one
//! [`ErrorKind`] for the lifetime of a registry; unknown names are
//! synthesized on first request as children of the base kind.
//!
//! Built-in kinds are declared through an `inventory` collection, so other
//! crates can pre-register their own kinds with [`declare_error_kind!`]:
//!
//! ```rust,no_run
//! faultline_core::declare_error_kind!("StorageError");
//! faultline_core::declare_error_kind!("DiskFull", parent = "StorageError");
//! ```

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[doc(hidden)]
pub use inventory;

/// Name of the universal base kind.
pub const BASE_KIND_NAME: &str = "Error";

const DEFAULT_CODE: &str = "error";

/// A named node in the kind tree.
#[derive(Debug)]
pub struct ErrorKind {
    name: String,
    code: String,
    parent: Option<Arc<ErrorKind>>,
}

impl ErrorKind {
    fn new(name: &str, parent: Option<Arc<ErrorKind>>) -> Self {
        Self {
            name: name.to_string(),
            code: underscore_name(name),
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underscored form of the name, e.g. `not_found` for `NotFound`.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn parent(&self) -> Option<&Arc<ErrorKind>> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Iterate from this kind up to the root, inclusive.
    pub fn ancestry(&self) -> impl Iterator<Item = &ErrorKind> {
        std::iter::successors(Some(self), |kind| kind.parent.as_deref())
    }

    /// Identity-based "is-a" check walking the parent chain.
    pub fn is_a(&self, other: &ErrorKind) -> bool {
        self.ancestry().any(|kind| std::ptr::eq(kind, other))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Static declaration of a pre-registered kind.
#[derive(Debug, Clone, Copy)]
pub struct KindDeclaration {
    pub name: &'static str,
    pub parent: Option<&'static str>,
}

impl KindDeclaration {
    pub const fn new(name: &'static str, parent: Option<&'static str>) -> Self {
        Self { name, parent }
    }
}

inventory::collect!(KindDeclaration);

#[macro_export]
macro_rules! declare_error_kind {
    ($name:literal) => {
        $crate::kind::inventory::submit! {
            $crate::kind::KindDeclaration::new($name, None)
        }
    };
    ($name:literal, parent = $parent:literal) => {
        $crate::kind::inventory::submit! {
            $crate::kind::KindDeclaration::new($name, Some($parent))
        }
    };
}

declare_error_kind!("EvalError", parent = "Error");
declare_error_kind!("RangeError", parent = "Error");
declare_error_kind!("ReferenceError", parent = "Error");
declare_error_kind!("SyntaxError", parent = "Error");
declare_error_kind!("TypeError", parent = "Error");
declare_error_kind!("URIError", parent = "Error");

/// Name-to-kind cache. Safe to share across threads: two callers racing on
/// the same new name converge on one instance.
#[derive(Debug)]
pub struct KindRegistry {
    base: Arc<ErrorKind>,
    kinds: RwLock<HashMap<String, Arc<ErrorKind>>>,
}

impl KindRegistry {
    /// Create a registry seeded with the base kind and every declared kind.
    pub fn new() -> Self {
        let base = Arc::new(ErrorKind::new(BASE_KIND_NAME, None));
        let mut kinds = HashMap::new();
        kinds.insert(base.name.clone(), base.clone());

        let declared: HashMap<&'static str, Option<&'static str>> =
            inventory::iter::<KindDeclaration>
                .into_iter()
                .map(|declaration| (declaration.name, declaration.parent))
                .collect();
        for name in declared.keys() {
            seed_declared(&mut kinds, &base, &declared, name, declared.len());
        }

        Self {
            base,
            kinds: RwLock::new(kinds),
        }
    }

    pub fn base(&self) -> Arc<ErrorKind> {
        self.base.clone()
    }

    /// Return the kind registered under `name`, synthesizing it if needed.
    /// An empty name resolves to the base kind.
    pub fn get(&self, name: &str) -> Arc<ErrorKind> {
        let name = if name.is_empty() { BASE_KIND_NAME } else { name };
        if let Some(kind) = self.read().get(name) {
            return kind.clone();
        }

        let mut kinds = self.write();
        kinds
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(kind = name, "Synthesized error kind");
                Arc::new(ErrorKind::new(name, Some(self.base.clone())))
            })
            .clone()
    }

    /// Look up a kind without synthesizing it.
    pub fn lookup(&self, name: &str) -> Option<Arc<ErrorKind>> {
        self.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<ErrorKind>>> {
        self.kinds.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<ErrorKind>>> {
        self.kinds.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_declared(
    kinds: &mut HashMap<String, Arc<ErrorKind>>,
    base: &Arc<ErrorKind>,
    declared: &HashMap<&'static str, Option<&'static str>>,
    name: &str,
    budget: usize,
) -> Arc<ErrorKind> {
    if let Some(kind) = kinds.get(name) {
        return kind.clone();
    }

    // The budget bounds parent walks when declarations name each other in a loop.
    let parent = match declared.get(name).copied().flatten() {
        Some(parent) if parent != name && budget > 0 => {
            seed_declared(kinds, base, declared, parent, budget - 1)
        }
        _ => base.clone(),
    };
    let kind = Arc::new(ErrorKind::new(name, Some(parent)));
    kinds.insert(name.to_string(), kind.clone());
    kind
}

static REGISTRY: OnceLock<KindRegistry> = OnceLock::new();

/// The process-wide registry.
pub fn registry() -> &'static KindRegistry {
    REGISTRY.get_or_init(KindRegistry::new)
}

/// Process-wide shorthand for [`KindRegistry::get`].
pub fn get_kind(name: &str) -> Arc<ErrorKind> {
    registry().get(name)
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Z][a-z]+").expect("word pattern is valid"))
}

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("separator pattern is valid"))
}

/// Convert an identifier into its underscored code.
///
/// Capitalized words are split out, any run of characters that are neither
/// letters nor digits collapses into one `_`, and the result is trimmed and
/// lowercased. Names with no letters or digits map to `error`.
pub fn underscore_name(identifier: &str) -> String {
    let split = word_pattern().replace_all(identifier, "_$0");
    let joined = separator_pattern().replace_all(&split, "_");
    let code = joined.trim_matches('_').to_lowercase();
    if code.is_empty() {
        DEFAULT_CODE.to_string()
    } else {
        code
    }
}
