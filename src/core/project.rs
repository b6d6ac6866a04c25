//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::identity::{EntityId, EntityPrefix};

/// Name of the project marker directory
pub const PROJECT_DIR: &str = ".baskit";

/// Represents a Baskit project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .baskit/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Open the project at `--project` if given, otherwise discover it
    pub fn open(explicit: Option<&Path>) -> Result<Self, ProjectError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::write_structure(root)
    }

    /// Force initialization even if .baskit/ exists
    ///
    /// Rewrites config.yaml and catalog.yaml; orders and receipts are kept.
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(root)
    }

    fn write_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let baskit_dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(&baskit_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::write(baskit_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let catalog = Catalog::default_source().map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(baskit_dir.join("catalog.yaml"), catalog)
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        for prefix in EntityPrefix::all() {
            std::fs::create_dir_all(root.join(Self::entity_directory(*prefix)))
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Baskit Project Configuration

# Default author for purchase orders (can be overridden by global config)
# author: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto

# Default supplier sort (recommended, cheapest, closest, fastest, top-rated, best-match)
# default_sort: recommended

# Currency label used when printing money
# currency: Rp

# Country calling code used to normalize local phone numbers for wa.me links
# country_code: "62"

# Buyer address used as the reply-to in purchase order emails
# buyer_email: ""
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .baskit configuration directory
    pub fn baskit_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Path of the project's catalog override
    pub fn catalog_path(&self) -> PathBuf {
        self.baskit_dir().join("catalog.yaml")
    }

    /// Get the path for a new record file
    pub fn entity_path(&self, id: &EntityId) -> PathBuf {
        self.root
            .join(Self::entity_directory(id.prefix()))
            .join(format!("{}.yaml", id))
    }

    /// Get the directory for a given record prefix
    pub fn entity_directory(prefix: EntityPrefix) -> &'static str {
        match prefix {
            EntityPrefix::Po => "orders",
            EntityPrefix::Rcpt => "receipts",
        }
    }

    /// Absolute directory for a given record prefix
    pub fn entity_dir(&self, prefix: EntityPrefix) -> PathBuf {
        self.root.join(Self::entity_directory(prefix))
    }

    /// Iterate all record files of a given prefix type
    pub fn iter_entity_files(&self, prefix: EntityPrefix) -> impl Iterator<Item = PathBuf> {
        walkdir::WalkDir::new(self.entity_dir(prefix))
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "yaml"))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a Baskit project (searched from {searched_from:?}). Run 'baskit init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("Baskit project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
