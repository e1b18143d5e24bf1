//! The materialized build model, one per project of the composite build.
//!
//! Library nodes are shared via `Rc`, so a dependency that the build reports
//! as one object stays one object here. Each node additionally carries two
//! synthetic keys: an [`InstanceId`] standing in for reference identity, and
//! a [`BackingKey`], the canonical key of the de-proxied backing object as
//! reported by the tooling client. Value equality covers the model content
//! only, never the synthetic keys.

use std::{
    collections::BTreeMap,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

/// Per-project models keyed by project path, absent where the build could
/// not produce one. Kept sorted by path so output order is deterministic.
pub type ProjectModels = BTreeMap<String, Option<ProjectModel>>;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Opaque handle assigned once per constructed library node.
///
/// Two handles compare equal exactly when they refer to the same in-memory
/// node, which makes this the identity-map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> InstanceId {
        InstanceId(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Canonical key of the backing object behind a library node.
///
/// The tooling client reports this for each de-proxied library; when it does
/// not, the key falls back to the jar path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackingKey(String);

impl BackingKey {
    pub fn new(key: impl Into<String>) -> BackingKey {
        BackingKey(key.into())
    }

    pub fn from_jar(jar: &Path) -> BackingKey {
        BackingKey(jar.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectModel {
    pub name: String,
    pub variants: Vec<Variant>,
}

/// One named build configuration of a project, e.g. `debug` or `release`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub name: String,
    pub main_artifact: Artifact,
    pub extra_artifacts: Vec<Artifact>,
}

/// One produced artifact with its resolved dependencies. The package set is
/// a second dependency view used for packaging rather than compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artifact {
    pub dependencies: DependencySet,
    pub package_dependencies: DependencySet,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencySet {
    pub android_libraries: Vec<Rc<AndroidLibrary>>,
    pub java_libraries: Vec<Rc<JavaLibrary>>,
}

/// A platform-packaged dependency, itself produced by the build tool and
/// possibly carrying further android and java dependencies.
#[derive(Debug)]
pub struct AndroidLibrary {
    jar_file: PathBuf,
    android_dependencies: Vec<Rc<AndroidLibrary>>,
    java_dependencies: Vec<Rc<JavaLibrary>>,
    instance: InstanceId,
    backing: BackingKey,
}

impl AndroidLibrary {
    pub fn new(
        jar_file: impl Into<PathBuf>,
        android_dependencies: Vec<Rc<AndroidLibrary>>,
        java_dependencies: Vec<Rc<JavaLibrary>>,
        backing: Option<BackingKey>,
    ) -> AndroidLibrary {
        let jar_file = jar_file.into();
        let backing = backing.unwrap_or_else(|| BackingKey::from_jar(&jar_file));
        AndroidLibrary {
            instance: InstanceId::next(),
            backing,
            jar_file,
            android_dependencies,
            java_dependencies,
        }
    }

    pub fn jar_file(&self) -> &Path {
        &self.jar_file
    }

    pub fn android_dependencies(&self) -> &[Rc<AndroidLibrary>] {
        &self.android_dependencies
    }

    pub fn java_dependencies(&self) -> &[Rc<JavaLibrary>] {
        &self.java_dependencies
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn backing(&self) -> &BackingKey {
        &self.backing
    }
}

impl PartialEq for AndroidLibrary {
    fn eq(&self, other: &Self) -> bool {
        self.jar_file == other.jar_file
            && self.android_dependencies == other.android_dependencies
            && self.java_dependencies == other.java_dependencies
    }
}

impl Eq for AndroidLibrary {}

impl Hash for AndroidLibrary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.jar_file.hash(state);
        for dependency in &self.android_dependencies {
            dependency.hash(state);
        }
        for dependency in &self.java_dependencies {
            dependency.hash(state);
        }
    }
}

/// A plain jar dependency with no platform-specific nesting; its children
/// are always further java libraries.
#[derive(Debug)]
pub struct JavaLibrary {
    jar_file: PathBuf,
    dependencies: Vec<Rc<JavaLibrary>>,
    instance: InstanceId,
    backing: BackingKey,
}

impl JavaLibrary {
    pub fn new(
        jar_file: impl Into<PathBuf>,
        dependencies: Vec<Rc<JavaLibrary>>,
        backing: Option<BackingKey>,
    ) -> JavaLibrary {
        let jar_file = jar_file.into();
        let backing = backing.unwrap_or_else(|| BackingKey::from_jar(&jar_file));
        JavaLibrary {
            instance: InstanceId::next(),
            backing,
            jar_file,
            dependencies,
        }
    }

    pub fn jar_file(&self) -> &Path {
        &self.jar_file
    }

    pub fn dependencies(&self) -> &[Rc<JavaLibrary>] {
        &self.dependencies
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn backing(&self) -> &BackingKey {
        &self.backing
    }
}

impl PartialEq for JavaLibrary {
    fn eq(&self, other: &Self) -> bool {
        self.jar_file == other.jar_file && self.dependencies == other.dependencies
    }
}

impl Eq for JavaLibrary {}

impl Hash for JavaLibrary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.jar_file.hash(state);
        for dependency in &self.dependencies {
            dependency.hash(state);
        }
    }
}
