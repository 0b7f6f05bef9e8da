//! Package lookup for stack frames
//!
//! Frames are annotated with the package that owns their file so reports can
//! print `name@version` with a package-relative path. Non-absolute filenames
//! (`node:internal/...`, `events.js`) belong to the host runtime.

use faultline_core::{FaultlineError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, OnceLock, PoisonError};

pub const DEFAULT_MANIFEST: &str = "package.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    /// Package root directory; absent for the runtime itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirname: Option<String>,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dirname: None,
        }
    }

    pub fn with_dirname(mut self, dirname: impl Into<String>) -> Self {
        self.dirname = Some(dirname.into());
        self
    }

    /// Strip the package root from an absolute filename.
    ///
    /// Only applies when the root is a strict prefix ending on a path
    /// component boundary; the leading separator is kept. Symlinks are not
    /// resolved and relative filenames are returned untouched.
    pub fn shorten<'a>(&self, filename: &'a str) -> &'a str {
        let Some(dirname) = self.dirname.as_deref() else {
            return filename;
        };
        let dirname = dirname.trim_end_matches('/');
        if dirname.is_empty() || !is_absolute(filename) {
            return filename;
        }
        match filename.strip_prefix(dirname) {
            Some(rest) if rest.len() > 1 && rest.starts_with('/') => rest,
            _ => filename,
        }
    }

    fn owns(&self, filename: &str) -> bool {
        self.shorten(filename).len() != filename.len()
    }
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// What non-absolute filenames resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: String,
    pub version: String,
}

impl RuntimeInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn package(&self) -> PackageInfo {
        PackageInfo::new(self.name.clone(), self.version.clone())
    }
}

impl Default for RuntimeInfo {
    fn default() -> Self {
        Self::new("runtime", "unknown")
    }
}

impl FromStr for RuntimeInfo {
    type Err = FaultlineError;

    /// Parse `name@version`.
    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().rsplit_once('@') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name, version))
            }
            _ => Err(FaultlineError::InvalidRuntime(raw.to_string())),
        }
    }
}

impl fmt::Display for RuntimeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Finds the package owning a file.
pub trait PackageResolver: Send + Sync {
    fn resolve(&self, filename: &str) -> Option<PackageInfo>;
}

fn is_absolute(filename: &str) -> bool {
    filename.starts_with('/') || Path::new(filename).is_absolute()
}

/// Shared policy: empty names resolve to nothing, non-absolute names to the
/// runtime, absolute names through `lookup`.
fn resolve_with(
    runtime: Option<&RuntimeInfo>,
    filename: &str,
    lookup: impl FnOnce(&str) -> Option<PackageInfo>,
) -> Option<PackageInfo> {
    if filename.is_empty() {
        None
    } else if is_absolute(filename) {
        lookup(filename)
    } else {
        runtime.map(RuntimeInfo::package)
    }
}

/// Knows only the runtime; absolute paths resolve to nothing.
#[derive(Debug, Clone, Default)]
pub struct RuntimeResolver {
    runtime: RuntimeInfo,
}

impl RuntimeResolver {
    pub fn new(runtime: RuntimeInfo) -> Self {
        Self { runtime }
    }
}

impl PackageResolver for RuntimeResolver {
    fn resolve(&self, filename: &str) -> Option<PackageInfo> {
        resolve_with(Some(&self.runtime), filename, |_| None)
    }
}

/// Fixed set of package roots; the deepest matching root wins.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    runtime: Option<RuntimeInfo>,
    packages: Vec<PackageInfo>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runtime(mut self, runtime: RuntimeInfo) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_package(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        dirname: impl Into<String>,
    ) -> Self {
        self.packages
            .push(PackageInfo::new(name, version).with_dirname(dirname));
        self
    }
}

impl PackageResolver for StaticResolver {
    fn resolve(&self, filename: &str) -> Option<PackageInfo> {
        resolve_with(self.runtime.as_ref(), filename, |filename| {
            self.packages
                .iter()
                .filter(|package| package.owns(filename))
                .max_by_key(|package| package.dirname.as_ref().map_or(0, String::len))
                .cloned()
        })
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    name: Option<String>,
    version: Option<String>,
}

/// Walks up from a file looking for a package manifest.
///
/// Lookups are cached per directory for the resolver's lifetime.
#[derive(Debug)]
pub struct ManifestResolver {
    runtime: RuntimeInfo,
    manifest_name: String,
    cache: Mutex<HashMap<PathBuf, Option<PackageInfo>>>,
}

impl ManifestResolver {
    pub fn new(runtime: RuntimeInfo) -> Self {
        Self {
            runtime,
            manifest_name: DEFAULT_MANIFEST.to_string(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_manifest_name(mut self, manifest_name: impl Into<String>) -> Self {
        self.manifest_name = manifest_name.into();
        self
    }

    fn lookup(&self, filename: &str) -> Option<PackageInfo> {
        let path = Path::new(filename);
        for dir in path.ancestors().skip(1) {
            if let Some(cached) = self.cached(dir) {
                return cached;
            }

            let manifest = dir.join(&self.manifest_name);
            if !manifest.is_file() {
                continue;
            }

            tracing::trace!(manifest = %manifest.display(), "Reading package manifest");
            let package = match read_manifest(&manifest, dir) {
                Ok(package) => package,
                Err(error) => {
                    tracing::warn!(%error, "Ignoring unreadable package manifest");
                    None
                }
            };
            self.store(dir, package.clone());
            return package;
        }
        None
    }

    fn cached(&self, dir: &Path) -> Option<Option<PackageInfo>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(dir)
            .cloned()
    }

    fn store(&self, dir: &Path, package: Option<PackageInfo>) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dir.to_path_buf(), package);
    }
}

impl Default for ManifestResolver {
    fn default() -> Self {
        Self::new(RuntimeInfo::default())
    }
}

impl PackageResolver for ManifestResolver {
    fn resolve(&self, filename: &str) -> Option<PackageInfo> {
        resolve_with(Some(&self.runtime), filename, |filename| self.lookup(filename))
    }
}

/// Read `name` and `version` from a manifest. A manifest without a name does
/// not identify a package.
fn read_manifest(manifest: &Path, dir: &Path) -> Result<Option<PackageInfo>> {
    let raw = std::fs::read_to_string(manifest)?;
    let parsed: Manifest = serde_json::from_str(&raw).map_err(|source| FaultlineError::Manifest {
        path: manifest.to_path_buf(),
        source: Box::new(source),
    })?;
    Ok(parsed.name.filter(|name| !name.is_empty()).map(|name| {
        PackageInfo::new(name, parsed.version.unwrap_or_default())
            .with_dirname(dir.to_string_lossy().into_owned())
    }))
}

static DEFAULT_RESOLVER: OnceLock<ManifestResolver> = OnceLock::new();

/// Process-wide manifest resolver with the default runtime descriptor.
pub fn default_resolver() -> &'static ManifestResolver {
    DEFAULT_RESOLVER.get_or_init(ManifestResolver::default)
}
