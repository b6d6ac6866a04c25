//! Entity trait - common interface for records a project writes

use chrono::{DateTime, Utc};
use miette::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

use crate::core::identity::EntityPrefix;
use crate::core::loader;
use crate::core::project::Project;

/// Common trait for records stored as one YAML file each
pub trait Entity: Serialize + DeserializeOwned {
    /// The record type prefix, which also picks the project directory
    const PREFIX: EntityPrefix;

    /// The record's id as written in its file name
    fn record_id(&self) -> String;

    /// Creation timestamp
    fn created(&self) -> DateTime<Utc>;

    /// File this record lives in inside `project`
    fn path_in(&self, project: &Project) -> PathBuf {
        project
            .entity_dir(Self::PREFIX)
            .join(format!("{}.yaml", self.record_id()))
    }

    /// Write the record into `project`, returning the file path
    fn save(&self, project: &Project) -> Result<PathBuf> {
        let path = self.path_in(project);
        loader::save_entity(&path, self)?;
        Ok(path)
    }

    /// Load every record of this type from `project`, oldest first
    fn load_all(project: &Project) -> Result<Vec<Self>> {
        let mut records: Vec<Self> = loader::load_all(&project.entity_dir(Self::PREFIX))?;
        records.sort_by_key(|r| r.created());
        Ok(records)
    }
}
