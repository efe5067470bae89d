//! Resolves a message type name against `.proto` sources.
//!
//! Two resolution modes are supported:
//!
//! * **File list**: every listed source is compiled on its own (together with
//!   its imports) in the order given; any source that fails to compile fails
//!   the whole resolution. The first source that defines the requested
//!   fully-qualified name wins, so two sources that both define `Foo` always
//!   resolve to the first listed.
//! * **Conventional**: no sources are given and the package part of the type
//!   name selects exactly one file on the search path (`a.b.Type` is looked up
//!   as `a/b.proto`).

use crate::error::{Error, Result};
use prost_reflect::MessageDescriptor;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding extra include directories.
pub const SEARCH_PATH_ENV: &str = "PBSTREAM_PATH";

/// Ordered include directories used to locate sources and their imports.
///
/// Built once at startup and passed to the [`Resolver`]; the resolver itself
/// never reads the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// The fallback path from the process environment: `PBSTREAM_PATH`
    /// entries (or `$HOME/proto` when unset), then the current directory.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var_os(SEARCH_PATH_ENV),
            std::env::var_os("HOME"),
        )
    }

    /// Same as [`SearchPath::from_env`] with the variables supplied by the caller.
    pub fn from_vars(search_path: Option<OsString>, home: Option<OsString>) -> Self {
        let mut dirs: Vec<PathBuf> = match search_path {
            Some(value) if !value.is_empty() => std::env::split_paths(&value).collect(),
            _ => home
                .filter(|h| !h.is_empty())
                .map(|h| vec![PathBuf::from(h).join("proto")])
                .unwrap_or_default(),
        };
        dirs.push(PathBuf::from("."));
        Self { dirs }
    }

    /// Puts `dirs` ahead of the existing entries, preserving their order.
    pub fn prepend<I, P>(&mut self, dirs: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut front: Vec<PathBuf> = dirs.into_iter().map(Into::into).collect();
        front.append(&mut self.dirs);
        self.dirs = front;
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn existing(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path).filter(|d| d.is_dir())
    }
}

/// Where the schema for the requested type comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sources {
    /// Explicit source files, searched in order.
    Files(Vec<PathBuf>),
    /// Derive the single source file from the type name's package.
    Conventional,
}

impl Sources {
    /// File-list mode when any paths are given, conventional mode otherwise.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let files: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        if files.is_empty() {
            Self::Conventional
        } else {
            Self::Files(files)
        }
    }
}

/// Maps `a.b.Type` to `a/b.proto`.
pub fn conventional_source(type_name: &str) -> Result<PathBuf> {
    let name = type_name.trim_start_matches('.');
    let (package, _message) = name
        .rsplit_once('.')
        .filter(|(package, message)| !package.is_empty() && !message.is_empty())
        .ok_or_else(|| Error::UnqualifiedTypeName(type_name.to_string()))?;

    let mut segments: Vec<&str> = package.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::UnqualifiedTypeName(type_name.to_string()));
    }
    let file = segments.pop().unwrap_or(package);
    let mut path: PathBuf = segments.iter().collect();
    path.push(format!("{file}.proto"));
    Ok(path)
}

/// Compiles `.proto` sources and looks up message descriptors.
#[derive(Debug, Clone)]
pub struct Resolver {
    search_path: SearchPath,
}

impl Resolver {
    pub fn new(search_path: SearchPath) -> Self {
        Self { search_path }
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Returns the descriptor for `type_name`, or fails if no source defines it.
    pub fn resolve(&self, sources: &Sources, type_name: &str) -> Result<MessageDescriptor> {
        let full_name = type_name.trim_start_matches('.');
        let files = match sources {
            Sources::Files(files) if files.is_empty() => return Err(Error::NoSources),
            Sources::Files(files) => files.clone(),
            Sources::Conventional => vec![conventional_source(type_name)?],
        };

        let pools = files
            .iter()
            .map(|file| self.compile(file).map(|pool| (file, pool)))
            .collect::<Result<Vec<_>>>()?;

        for (file, pool) in pools {
            if let Some(descriptor) = pool.get_message_by_name(full_name) {
                info!(
                    type_name = descriptor.full_name(),
                    source = %file.display(),
                    "resolved message type"
                );
                return Ok(descriptor);
            }
            debug!(source = %file.display(), type_name = full_name, "type not in source");
        }

        Err(Error::TypeNotFound {
            type_name: type_name.to_string(),
        })
    }

    fn compile(&self, file: &Path) -> Result<prost_reflect::DescriptorPool> {
        let mut includes: Vec<PathBuf> = self
            .search_path
            .existing()
            .filter_map(|dir| dir.canonicalize().ok())
            .collect();
        let target = self.locate(file, &includes);
        // Sources outside every include directory are still reachable through
        // their own parent directory.
        if target.is_absolute() && !includes.iter().any(|dir| target.starts_with(dir)) {
            if let Some(parent) = target.parent() {
                includes.push(parent.to_path_buf());
            }
        }
        debug!(source = %target.display(), includes = ?includes, "compiling IDL source");

        let mut compiler =
            protox::Compiler::new(&includes).map_err(|e| Error::compile(file, e))?;
        compiler.include_imports(true);
        compiler
            .open_file(&target)
            .map_err(|e| Error::compile(file, e))?;
        Ok(compiler.descriptor_pool())
    }

    /// Absolute location of `file`: as given (relative to the working
    /// directory) if it exists, else the first include that contains it.
    /// Unlocatable files are returned unchanged for the compiler to report.
    fn locate(&self, file: &Path, includes: &[PathBuf]) -> PathBuf {
        if let Ok(found) = file.canonicalize() {
            return found;
        }
        if file.is_relative() {
            if let Some(found) = includes
                .iter()
                .find_map(|dir| dir.join(file).canonicalize().ok())
            {
                return found;
            }
        }
        file.to_path_buf()
    }
}
