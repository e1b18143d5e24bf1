//! Boundary to the external build tool.
//!
//! Everything on the far side of [`Connection`] belongs to the tooling
//! client: daemon lifecycle, version selection and the model-building
//! protocol itself. This side only opens a connection, runs one build
//! action against a [`BuildController`] and materializes what comes back.

pub mod process;
pub mod replay;

use crate::model::build::{ProjectModel, ProjectModels};

/// One addressable project of the composite build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub path: String,
}

/// Capability handed to a build action while the connection is open.
pub trait BuildController {
    /// Projects of the composite build, in the order the build reports them.
    fn projects(&self) -> &[ProjectRef];

    /// The model for one project, absent when the build could not produce it.
    fn find_model(&self, project: &ProjectRef) -> Option<&ProjectModel>;
}

/// An open connection to one build. Dropping the connection releases it;
/// that must happen exactly once, on every exit path.
pub trait Connection {
    /// Runs one build action against the open connection.
    fn run<T, F>(&mut self, action: F) -> anyhow::Result<T>
    where
        F: FnOnce(&dyn BuildController) -> anyhow::Result<T>;
}

/// Controller view over a fully materialized model dump.
pub struct DumpController {
    projects: Vec<ProjectRef>,
    models: ProjectModels,
}

impl DumpController {
    pub fn new(models: ProjectModels) -> DumpController {
        let projects = models
            .keys()
            .map(|path| ProjectRef { path: path.clone() })
            .collect();
        DumpController { projects, models }
    }
}

impl BuildController for DumpController {
    fn projects(&self) -> &[ProjectRef] {
        &self.projects
    }

    fn find_model(&self, project: &ProjectRef) -> Option<&ProjectModel> {
        self.models.get(&project.path).and_then(|model| model.as_ref())
    }
}
