//! Fixture stager.
//!
//! Copies a fixture template, plus the shared helper directories, into an isolated directory and returns
//! the [`Workspace`] every later phase runs in. The workspace is the explicit working root: no phase reads
//! or changes the process's current directory.
//!
//! ## Layout
//!
//! ```text
//! <base>/
//!   project/      template + shared helpers; every tool runs here
//!   conan_home/   package cache for this workspace only
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use super::config::HarnessConfig;
use super::{HarnessError, HarnessResult};

const PROJECT_DIR: &str = "project";
const CACHE_HOME_DIR: &str = "conan_home";

/// Where a workspace lives.
#[derive(Debug, Clone, Default)]
pub enum Workdir {
    /// A fresh temporary directory, removed when the [`Workspace`] is dropped.
    #[default]
    Temp,
    /// A caller-owned directory that is left in place afterwards (useful for inspecting a failed build).
    At(PathBuf),
}

/// A staged fixture project.
#[derive(Debug)]
pub struct Workspace {
    fixture: String,
    base: PathBuf,
    root: PathBuf,
    cache_home: PathBuf,
    // Held for its Drop: removes the directory tree.
    _temp: Option<TempDir>,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn create(fixture: &str, workdir: Workdir) -> HarnessResult<Self> {
        let (base, temp) = match workdir {
            Workdir::Temp => {
                let temp = tempfile::Builder::new()
                    .prefix(&format!("toolbelt-{}-", fixture))
                    .tempdir()
                    .map_err(|e| HarnessError::io("failed to create temporary directory", e))?;
                (temp.path().to_path_buf(), Some(temp))
            }
            Workdir::At(dir) => (dir, None),
        };

        let root = base.join(PROJECT_DIR);
        let cache_home = base.join(CACHE_HOME_DIR);
        for dir in [&root, &cache_home] {
            fs::create_dir_all(dir).map_err(|e| HarnessError::io(format!("failed to create {}", dir.display()), e))?;
        }

        Ok(Self {
            fixture: fixture.to_string(),
            base,
            root,
            cache_home,
            _temp: temp,
        })
    }

    /// Fixture this workspace was staged from.
    pub fn fixture(&self) -> &str {
        &self.fixture
    }

    /// Project directory; the working directory of every tool invocation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Isolated package cache for this workspace.
    pub fn cache_home(&self) -> &Path {
        &self.cache_home
    }

    /// Directory holding both the project and the cache.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Whether the workspace is removed on drop.
    pub fn is_temporary(&self) -> bool {
        self._temp.is_some()
    }

    /// Read a file from the project directory (e.g. a fixture's expected-content file).
    pub fn read_to_string(&self, relative: impl AsRef<Path>) -> HarnessResult<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).map_err(|e| HarnessError::io(format!("failed to read {}", path.display()), e))
    }
}

/// Stage `fixture` from the configured template root into a new workspace.
///
/// The template tree is copied first, then each shared helper directory in configuration order. Later
/// copies overwrite same-named files from earlier ones.
#[tracing::instrument(skip_all, fields(fixture = fixture))]
pub fn stage(config: &HarnessConfig, fixture: &str, workdir: Workdir) -> HarnessResult<Workspace> {
    let template = resolve_template(config, fixture)?;

    let shared = config.shared_dirs();
    if let Some(missing) = shared.iter().find(|dir| !dir.is_dir()) {
        return Err(HarnessError::MissingSharedDir(missing.clone()));
    }

    let workspace = Workspace::create(fixture, workdir)?;
    copy_tree(&template, workspace.root())?;
    for dir in &shared {
        copy_tree(dir, workspace.root())?;
    }

    tracing::debug!("staged {} into {}", fixture, workspace.root().display());
    Ok(workspace)
}

/// Resolve a fixture name to its template directory.
///
/// Names are single path components; anything that could escape the template root is rejected as unknown.
pub fn resolve_template(config: &HarnessConfig, fixture: &str) -> HarnessResult<PathBuf> {
    let root = config.template_root();
    let path = root.join(fixture);

    let mut components = Path::new(fixture).components();
    let single_normal = matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none();

    if !single_normal || !path.is_dir() {
        return Err(HarnessError::UnknownFixture {
            name: fixture.to_string(),
            path,
        });
    }
    Ok(path)
}

/// Recursively copy the contents of `src` into `dst`, merging with what is already there.
pub fn copy_tree(src: &Path, dst: &Path) -> HarnessResult<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let context = format!("failed to walk {}", src.display());
            HarnessError::io(context, e.into())
        })?;

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| HarnessError::io(format!("failed to create {}", target.display()), e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| HarnessError::io(format!("failed to create {}", parent.display()), e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| {
                HarnessError::io(
                    format!("failed to copy {} to {}", entry.path().display(), target.display()),
                    e,
                )
            })?;
        }
    }
    Ok(())
}
