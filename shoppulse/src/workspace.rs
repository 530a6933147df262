//! Workspace router: which ledger does a request target?
//!
//! Every core call takes an explicit `ProjectRef`; there is no ambient
//! current-user or current-project state. The router owns the on-disk layout:
//!
//! ```text
//! <root>/users/<user>/data.db               default project ledger
//! <root>/users/<user>/uploaded_files/       default project upload archive
//! <root>/users/<user>/projects/<p>/data.db  named project ledger
//! <root>/users/<user>/projects/<p>/uploads/
//! ```

use crate::ledger::Ledger;
use shoppulse_common::config::resolve_root_folder;
use shoppulse_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

const USERS_DIR: &str = "users";
const PROJECTS_DIR: &str = "projects";
const DB_FILE: &str = "data.db";

/// Addresses one ledger: a user workspace plus an optional named project.
/// `project: None` targets the user's default project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub user: String,
    pub project: Option<String>,
}

impl ProjectRef {
    pub fn new(user: impl Into<String>, project: Option<String>) -> Self {
        Self {
            user: user.into(),
            project,
        }
    }
}

/// Root folder holding every user workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the root folder from the usual priority chain
    /// (CLI argument, environment, config file, compiled default)
    pub fn resolve(cli_arg: Option<&str>) -> Self {
        Self::new(resolve_root_folder(cli_arg))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Database path for a project, validating names. Does not create
    /// anything on disk.
    pub fn db_path(&self, project: &ProjectRef) -> Result<PathBuf> {
        Ok(self.project_dir(project)?.join(DB_FILE))
    }

    /// Upload-archive directory for a project
    pub fn upload_dir(&self, project: &ProjectRef) -> Result<PathBuf> {
        let dir = self.project_dir(project)?;
        Ok(match project.project {
            // The default project predates named projects and keeps its
            // original archive directory name
            None => dir.join("uploaded_files"),
            Some(_) => dir.join("uploads"),
        })
    }

    /// Open (creating directories and schema as needed) the project's ledger
    pub async fn open_ledger(&self, project: &ProjectRef) -> Result<Ledger> {
        let upload_dir = self.upload_dir(project)?;
        std::fs::create_dir_all(&upload_dir)?;

        let db_path = self.db_path(project)?;
        let ledger = Ledger::open(&db_path).await?;
        ledger.ensure_initialized().await?;
        Ok(ledger)
    }

    /// Existing user workspaces, by directory name
    pub fn list_users(&self) -> Result<Vec<String>> {
        list_subdirectories(&self.root.join(USERS_DIR))
    }

    /// A user's named projects (the default project is implicit)
    pub fn list_projects(&self, user: &str) -> Result<Vec<String>> {
        let user = validate_name(user, "user name")?;
        list_subdirectories(
            &self
                .root
                .join(USERS_DIR)
                .join(user)
                .join(PROJECTS_DIR),
        )
    }

    /// Create a user workspace with the empty default-project structure.
    /// No-op when the workspace already exists.
    pub async fn ensure_user(&self, user: &str) -> Result<()> {
        let project = ProjectRef::new(validate_name(user, "user name")?, None);
        let db_path = self.db_path(&project)?;
        if !db_path.exists() {
            info!(user = project.user, "Creating user workspace");
        }
        let ledger = self.open_ledger(&project).await?;
        drop(ledger);
        Ok(())
    }

    fn project_dir(&self, project: &ProjectRef) -> Result<PathBuf> {
        let user = validate_name(&project.user, "user name")?;
        let user_dir = self.root.join(USERS_DIR).join(user);
        Ok(match &project.project {
            None => user_dir,
            Some(name) => user_dir
                .join(PROJECTS_DIR)
                .join(validate_name(name, "project name")?),
        })
    }
}

/// Names become directory components, so only alphanumerics, spaces,
/// underscores and hyphens are allowed.
fn validate_name<'a>(name: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("Empty {what}")));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '_' || c == '-')
    {
        return Err(Error::InvalidInput(format!("Invalid {what}: {name:?}")));
    }
    Ok(trimmed)
}

fn list_subdirectories(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_project_lives_in_the_user_dir() {
        let ws = Workspace::new("/data");
        let db = ws.db_path(&ProjectRef::new("alice", None)).unwrap();
        assert_eq!(db, PathBuf::from("/data/users/alice/data.db"));
        let uploads = ws.upload_dir(&ProjectRef::new("alice", None)).unwrap();
        assert_eq!(uploads, PathBuf::from("/data/users/alice/uploaded_files"));
    }

    #[test]
    fn named_project_lives_under_projects() {
        let ws = Workspace::new("/data");
        let project = ProjectRef::new("alice", Some("Q3 Launch".to_string()));
        assert_eq!(
            ws.db_path(&project).unwrap(),
            PathBuf::from("/data/users/alice/projects/Q3 Launch/data.db")
        );
        assert_eq!(
            ws.upload_dir(&project).unwrap(),
            PathBuf::from("/data/users/alice/projects/Q3 Launch/uploads")
        );
    }

    #[test]
    fn path_traversal_names_are_rejected() {
        let ws = Workspace::new("/data");
        assert!(ws
            .db_path(&ProjectRef::new("../etc", None))
            .is_err());
        assert!(ws
            .db_path(&ProjectRef::new("alice", Some("a/b".to_string())))
            .is_err());
        assert!(ws.db_path(&ProjectRef::new("  ", None)).is_err());
    }
}
