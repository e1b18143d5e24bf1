//! The four-relation dependency census.
//!
//! Every library reachable from any variant is recorded under four
//! equivalence relations: value equality, jar-file equality, instance
//! identity and backing-object identity. When the model cache behaves, the
//! four counts per kind converge; divergence means the build handed out
//! duplicate representations of one logical library.

use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Display},
    path::PathBuf,
    rc::Rc,
    time::Instant,
};

use log::info;

use crate::model::build::{
    AndroidLibrary, BackingKey, DependencySet, InstanceId, JavaLibrary, ProjectModel,
    ProjectModels, Variant,
};

/// Distinct-count of one library kind under each equivalence relation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationCounts {
    pub by_value: usize,
    pub by_file: usize,
    pub by_identity: usize,
    pub by_backing: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub android: RelationCounts,
    pub java: RelationCounts,
}

impl Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "Android libs: {}", self.android.by_value)?;
        writeln!(f, "Android libs by file: {}", self.android.by_file)?;
        writeln!(f, "Android libs by id: {}", self.android.by_identity)?;
        writeln!(f, "Android libs by id (backing): {}", self.android.by_backing)?;
        writeln!(f, "Java libs: {}", self.java.by_value)?;
        writeln!(f, "Java libs by file: {}", self.java.by_file)?;
        writeln!(f, "Java libs by id: {}", self.java.by_identity)?;
        writeln!(f, "Java libs by id (backing): {}", self.java.by_backing)?;
        write!(f, "---")
    }
}

/// Walks every present model once and reports the eight distinct-counts.
/// Absent models are skipped, they are an expected outcome of the query.
pub fn inspect_models(models: &ProjectModels) -> AggregateReport {
    info!("* Inspecting");
    let timer = Instant::now();

    let mut context = AggregationContext::default();
    for model in models.values().flatten() {
        context.visit_project(model);
    }

    info!("Inspect took {:.3}s", timer.elapsed().as_secs_f64());
    context.report()
}

#[derive(Default)]
struct AggregationContext {
    // Termination guard: nothing promises the external graph is acyclic.
    // Recording is idempotent per instance, so skipping a node that was
    // already walked cannot change any count.
    visited: HashSet<InstanceId>,

    android_by_value: HashSet<Rc<AndroidLibrary>>,
    android_by_file: HashMap<PathBuf, Rc<AndroidLibrary>>,
    android_by_identity: HashMap<InstanceId, Rc<AndroidLibrary>>,
    android_by_backing: HashMap<BackingKey, Rc<AndroidLibrary>>,

    java_by_value: HashSet<Rc<JavaLibrary>>,
    java_by_file: HashMap<PathBuf, Rc<JavaLibrary>>,
    java_by_identity: HashMap<InstanceId, Rc<JavaLibrary>>,
    java_by_backing: HashMap<BackingKey, Rc<JavaLibrary>>,
}

impl AggregationContext {
    fn visit_project(&mut self, model: &ProjectModel) {
        for variant in &model.variants {
            self.visit_variant(variant);
        }
    }

    fn visit_variant(&mut self, variant: &Variant) {
        self.visit_dependencies(&variant.main_artifact.dependencies);
        self.visit_dependencies(&variant.main_artifact.package_dependencies);
        for artifact in &variant.extra_artifacts {
            self.visit_dependencies(&artifact.dependencies);
        }
    }

    fn visit_dependencies(&mut self, dependencies: &DependencySet) {
        for library in &dependencies.android_libraries {
            self.visit_android_library(library);
        }
        for library in &dependencies.java_libraries {
            self.visit_java_library(library);
        }
    }

    // Android libraries use overwrite semantics: the last instance seen for
    // a given jar file stays in the map.
    fn visit_android_library(&mut self, library: &Rc<AndroidLibrary>) {
        if !self.visited.insert(library.instance()) {
            return;
        }
        self.android_by_value.insert(library.clone());
        self.android_by_file
            .insert(library.jar_file().to_path_buf(), library.clone());
        self.android_by_identity
            .insert(library.instance(), library.clone());
        self.android_by_backing
            .insert(library.backing().clone(), library.clone());
        for dependency in library.android_dependencies() {
            self.visit_android_library(dependency);
        }
        for dependency in library.java_dependencies() {
            self.visit_java_library(dependency);
        }
    }

    // Java libraries use first-seen-wins semantics for the file and identity
    // maps. The asymmetry with android libraries is deliberate and mirrors
    // what each kind treats as the canonical occurrence.
    fn visit_java_library(&mut self, library: &Rc<JavaLibrary>) {
        if !self.visited.insert(library.instance()) {
            return;
        }
        self.java_by_value.insert(library.clone());
        self.java_by_file
            .entry(library.jar_file().to_path_buf())
            .or_insert_with(|| library.clone());
        self.java_by_identity
            .entry(library.instance())
            .or_insert_with(|| library.clone());
        self.java_by_backing
            .insert(library.backing().clone(), library.clone());
        for dependency in library.dependencies() {
            self.visit_java_library(dependency);
        }
    }

    fn report(&self) -> AggregateReport {
        AggregateReport {
            android: RelationCounts {
                by_value: self.android_by_value.len(),
                by_file: self.android_by_file.len(),
                by_identity: self.android_by_identity.len(),
                by_backing: self.android_by_backing.len(),
            },
            java: RelationCounts {
                by_value: self.java_by_value.len(),
                by_file: self.java_by_file.len(),
                by_identity: self.java_by_identity.len(),
                by_backing: self.java_by_backing.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build::Artifact;

    use std::path::Path;

    use pretty_assertions::assert_eq;

    fn android(jar: &str) -> Rc<AndroidLibrary> {
        Rc::new(AndroidLibrary::new(jar, vec![], vec![], None))
    }

    fn java(jar: &str) -> Rc<JavaLibrary> {
        Rc::new(JavaLibrary::new(jar, vec![], None))
    }

    fn single_project(dependencies: DependencySet) -> ProjectModels {
        let model = ProjectModel {
            name: "app".to_string(),
            variants: vec![Variant {
                name: "debug".to_string(),
                main_artifact: Artifact {
                    dependencies,
                    package_dependencies: DependencySet::default(),
                },
                extra_artifacts: vec![],
            }],
        };
        ProjectModels::from([(":app".to_string(), Some(model))])
    }

    #[test]
    fn absent_models_count_nothing() {
        let models = ProjectModels::from([(":a".to_string(), None), (":b".to_string(), None)]);
        assert_eq!(inspect_models(&models), AggregateReport::default());
    }

    #[test]
    fn java_file_map_retains_first_instance() {
        let first = java("/m2/guava.jar");
        let second = java("/m2/guava.jar");

        let mut context = AggregationContext::default();
        context.visit_java_library(&first);
        context.visit_java_library(&second);

        let retained = &context.java_by_file[Path::new("/m2/guava.jar")];
        assert_eq!(retained.instance(), first.instance());
        assert_eq!(context.java_by_identity.len(), 2);
        assert_eq!(context.java_by_value.len(), 1);
    }

    #[test]
    fn android_file_map_retains_last_instance() {
        let first = android("/m2/support/classes.jar");
        let second = android("/m2/support/classes.jar");

        let mut context = AggregationContext::default();
        context.visit_android_library(&first);
        context.visit_android_library(&second);

        let retained = &context.android_by_file[Path::new("/m2/support/classes.jar")];
        assert_eq!(retained.instance(), second.instance());
        assert_eq!(context.android_by_identity.len(), 2);
        assert_eq!(context.android_by_value.len(), 1);
    }

    #[test]
    fn nested_libraries_are_all_visited() {
        let left = Rc::new(JavaLibrary::new(
            "/m2/left.jar",
            vec![java("/m2/left-child.jar")],
            None,
        ));
        let right = Rc::new(JavaLibrary::new("/m2/right.jar", vec![], None));
        let root = Rc::new(AndroidLibrary::new(
            "/m2/root/classes.jar",
            vec![],
            vec![left, right],
            None,
        ));

        let mut context = AggregationContext::default();
        context.visit_android_library(&root);

        assert_eq!(context.android_by_identity.len(), 1);
        assert_eq!(context.java_by_identity.len(), 3);
    }

    #[test]
    fn shared_instance_is_counted_once() {
        let shared = java("/m2/shared.jar");
        let dependencies = DependencySet {
            android_libraries: vec![],
            java_libraries: vec![shared.clone(), shared],
        };

        let report = inspect_models(&single_project(dependencies));
        assert_eq!(report.java.by_identity, 1);
        assert_eq!(report.java.by_value, 1);
    }

    #[test]
    fn package_and_extra_artifact_dependencies_are_visited() {
        let model = ProjectModel {
            name: "app".to_string(),
            variants: vec![Variant {
                name: "debug".to_string(),
                main_artifact: Artifact {
                    dependencies: DependencySet {
                        android_libraries: vec![],
                        java_libraries: vec![java("/m2/compile.jar")],
                    },
                    package_dependencies: DependencySet {
                        android_libraries: vec![],
                        java_libraries: vec![java("/m2/packaged.jar")],
                    },
                },
                extra_artifacts: vec![Artifact {
                    dependencies: DependencySet {
                        android_libraries: vec![android("/m2/test-fixture/classes.jar")],
                        java_libraries: vec![],
                    },
                    package_dependencies: DependencySet::default(),
                }],
            }],
        };
        let models = ProjectModels::from([(":app".to_string(), Some(model))]);

        let report = inspect_models(&models);
        assert_eq!(report.java.by_identity, 2);
        assert_eq!(report.android.by_identity, 1);
    }

    #[test]
    fn duplicate_representations_diverge_per_relation() {
        // Android: two distinct jars, the second jar seen as two instances.
        // Java: three libraries, one duplicated by jar file.
        let dependencies = DependencySet {
            android_libraries: vec![
                android("/m2/one/classes.jar"),
                android("/m2/two/classes.jar"),
                android("/m2/two/classes.jar"),
            ],
            java_libraries: vec![
                java("/m2/alpha.jar"),
                java("/m2/beta.jar"),
                java("/m2/alpha.jar"),
            ],
        };

        let report = inspect_models(&single_project(dependencies));
        assert_eq!(report.android.by_value, 2);
        assert_eq!(report.android.by_file, 2);
        assert_eq!(report.android.by_identity, 3);
        assert_eq!(report.android.by_backing, 2);
        assert_eq!(report.java.by_value, 2);
        assert_eq!(report.java.by_file, 2);
        assert_eq!(report.java.by_identity, 3);
        assert_eq!(report.java.by_backing, 2);
    }

    #[test]
    fn shared_backing_key_collapses_proxies() {
        let first = Rc::new(JavaLibrary::new(
            "/m2/guava.jar",
            vec![],
            Some(BackingKey::new("obj-1")),
        ));
        let second = Rc::new(JavaLibrary::new(
            "/m2/guava.jar",
            vec![],
            Some(BackingKey::new("obj-1")),
        ));
        let dependencies = DependencySet {
            android_libraries: vec![],
            java_libraries: vec![first, second],
        };

        let report = inspect_models(&single_project(dependencies));
        assert_eq!(report.java.by_identity, 2);
        assert_eq!(report.java.by_backing, 1);
        assert_eq!(report.java.by_file, 1);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let dependencies = DependencySet {
            android_libraries: vec![android("/m2/support/classes.jar")],
            java_libraries: vec![java("/m2/guava.jar"), java("/m2/guava.jar")],
        };
        let models = single_project(dependencies);

        assert_eq!(inspect_models(&models), inspect_models(&models));
    }

    #[test]
    fn report_renders_the_count_block() {
        let report = inspect_models(&single_project(DependencySet {
            android_libraries: vec![android("/m2/support/classes.jar")],
            java_libraries: vec![java("/m2/guava.jar")],
        }));

        let rendered = report.to_string();
        assert_eq!(
            rendered,
            "---\n\
             Android libs: 1\n\
             Android libs by file: 1\n\
             Android libs by id: 1\n\
             Android libs by id (backing): 1\n\
             Java libs: 1\n\
             Java libs by file: 1\n\
             Java libs by id: 1\n\
             Java libs by id (backing): 1\n\
             ---"
        );
    }
}
