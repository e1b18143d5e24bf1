//! Session driver: one connection, one build action, timed.

use std::time::Instant;

use log::info;

use crate::{
    connector::{BuildController, Connection},
    model::build::ProjectModels,
};

/// Submits the model query over an open connection and returns the
/// per-project models. The connection is released when it goes out of
/// scope here, whatever the outcome.
pub fn run_session<C: Connection>(mut connection: C) -> anyhow::Result<ProjectModels> {
    info!("* Running action");
    let action_timer = Instant::now();

    let models = connection.run(build_models)?;

    info!(
        "Running action took {:.3}s",
        action_timer.elapsed().as_secs_f64()
    );
    info!("Received models: {}", models.len());
    Ok(models)
}

/// The build action: list the projects of the composite build and fetch
/// each project's model, keyed and sorted by project path.
fn build_models(controller: &dyn BuildController) -> anyhow::Result<ProjectModels> {
    info!("* Building models");
    let timer = Instant::now();

    let mut models = ProjectModels::new();
    for project in controller.projects() {
        models.insert(
            project.path.clone(),
            controller.find_model(project).cloned(),
        );
    }

    info!("building models took {:.3}s", timer.elapsed().as_secs_f64());
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        connector::ProjectRef,
        model::build::ProjectModel,
    };

    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    struct FakeController {
        projects: Vec<ProjectRef>,
        models: HashMap<String, ProjectModel>,
    }

    impl BuildController for FakeController {
        fn projects(&self) -> &[ProjectRef] {
            &self.projects
        }

        fn find_model(&self, project: &ProjectRef) -> Option<&ProjectModel> {
            self.models.get(&project.path)
        }
    }

    #[test]
    fn build_models_keeps_absent_projects() {
        let controller = FakeController {
            projects: vec![
                ProjectRef {
                    path: ":library".to_string(),
                },
                ProjectRef {
                    path: ":app".to_string(),
                },
            ],
            models: HashMap::from([(
                ":app".to_string(),
                ProjectModel {
                    name: "app".to_string(),
                    variants: vec![],
                },
            )]),
        };

        let models = build_models(&controller).unwrap();
        assert_eq!(models.len(), 2);
        assert!(models[":library"].is_none());
        assert_eq!(models[":app"].as_ref().unwrap().name, "app");
        // Sorted by path, not by the order the build listed them.
        assert_eq!(
            models.keys().collect::<Vec<_>>(),
            vec![":app", ":library"]
        );
    }
}
