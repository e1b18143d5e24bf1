//! The model dump format the tooling client writes to stdout.
//!
//! A dump is a TOML document: a table of library definitions keyed by id,
//! followed by the project list. Dependency lists reference libraries by id,
//! and every reference to one id hydrates to the same shared node, so the
//! aliasing the probe measures survives the trip through the dump. Two
//! definitions with the same jar stay two distinct instances.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::{self, Display},
    path::{Path, PathBuf},
    rc::Rc,
};

use serde::Deserialize;

use super::{
    build::{
        AndroidLibrary, Artifact, BackingKey, DependencySet, JavaLibrary, ProjectModel,
        ProjectModels, Variant,
    },
    ParseError,
};

#[derive(Debug, Deserialize)]
pub struct ModelDump {
    #[serde(default)]
    pub library: BTreeMap<String, LibraryDef>,
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectDump>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDef {
    pub kind: LibraryKind,
    pub jar: PathBuf,
    #[serde(default)]
    pub backing: Option<String>,
    #[serde(default)]
    pub android_dependencies: Vec<String>,
    #[serde(default)]
    pub java_dependencies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    Android,
    Java,
}

impl Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LibraryKind::Android => write!(f, "android"),
            LibraryKind::Java => write!(f, "java"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectDump {
    pub path: String,
    #[serde(default)]
    pub model: Option<ProjectModelDump>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectModelDump {
    pub name: String,
    #[serde(default, rename = "variant")]
    pub variants: Vec<VariantDump>,
}

#[derive(Debug, Deserialize)]
pub struct VariantDump {
    pub name: String,
    #[serde(default)]
    pub main: ArtifactDump,
    #[serde(default, rename = "extra")]
    pub extras: Vec<ArtifactDump>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtifactDump {
    #[serde(default)]
    pub dependencies: DependencySetDump,
    #[serde(default)]
    pub package_dependencies: DependencySetDump,
}

#[derive(Debug, Default, Deserialize)]
pub struct DependencySetDump {
    #[serde(default)]
    pub android: Vec<String>,
    #[serde(default)]
    pub java: Vec<String>,
}

impl ModelDump {
    pub fn from_file(file: &Path) -> Result<ModelDump, ParseError> {
        ModelDump::from_toml(&std::fs::read_to_string(file)?)
    }

    pub fn from_toml(s: &str) -> Result<ModelDump, ParseError> {
        toml::from_str(s).map_err(Into::into)
    }

    /// Materializes the dump into per-project models with shared library
    /// nodes. Rejects unknown ids, kind mismatches and definition cycles.
    pub fn hydrate(self) -> Result<ProjectModels, ParseError> {
        let mut hydrator = Hydrator::new(self.library);
        let mut models = ProjectModels::new();
        for project in self.projects {
            let model = project.model.map(|m| hydrator.project(m)).transpose()?;
            models.insert(project.path, model);
        }
        Ok(models)
    }
}

struct Hydrator {
    defs: BTreeMap<String, LibraryDef>,
    android: HashMap<String, Rc<AndroidLibrary>>,
    java: HashMap<String, Rc<JavaLibrary>>,
    in_progress: HashSet<String>,
}

impl Hydrator {
    fn new(defs: BTreeMap<String, LibraryDef>) -> Hydrator {
        Hydrator {
            defs,
            android: HashMap::new(),
            java: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn project(&mut self, dump: ProjectModelDump) -> Result<ProjectModel, ParseError> {
        let variants = dump
            .variants
            .into_iter()
            .map(|variant| self.variant(variant))
            .collect::<Result<_, _>>()?;
        Ok(ProjectModel {
            name: dump.name,
            variants,
        })
    }

    fn variant(&mut self, dump: VariantDump) -> Result<Variant, ParseError> {
        let main_artifact = self.artifact(dump.main)?;
        let extra_artifacts = dump
            .extras
            .into_iter()
            .map(|artifact| self.artifact(artifact))
            .collect::<Result<_, _>>()?;
        Ok(Variant {
            name: dump.name,
            main_artifact,
            extra_artifacts,
        })
    }

    fn artifact(&mut self, dump: ArtifactDump) -> Result<Artifact, ParseError> {
        Ok(Artifact {
            dependencies: self.dependency_set(dump.dependencies)?,
            package_dependencies: self.dependency_set(dump.package_dependencies)?,
        })
    }

    fn dependency_set(&mut self, dump: DependencySetDump) -> Result<DependencySet, ParseError> {
        Ok(DependencySet {
            android_libraries: self.android_libraries(&dump.android)?,
            java_libraries: self.java_libraries(&dump.java)?,
        })
    }

    fn android_libraries(&mut self, ids: &[String]) -> Result<Vec<Rc<AndroidLibrary>>, ParseError> {
        ids.iter().map(|id| self.android_library(id)).collect()
    }

    fn java_libraries(&mut self, ids: &[String]) -> Result<Vec<Rc<JavaLibrary>>, ParseError> {
        ids.iter().map(|id| self.java_library(id)).collect()
    }

    fn android_library(&mut self, id: &str) -> Result<Rc<AndroidLibrary>, ParseError> {
        if let Some(library) = self.android.get(id) {
            return Ok(library.clone());
        }
        let def = self.lookup(id, LibraryKind::Android)?;
        if !self.in_progress.insert(id.to_string()) {
            return Err(ParseError::LibraryCycle(id.to_string()));
        }
        let android_dependencies = self.android_libraries(&def.android_dependencies)?;
        let java_dependencies = self.java_libraries(&def.java_dependencies)?;
        self.in_progress.remove(id);
        let library = Rc::new(AndroidLibrary::new(
            def.jar,
            android_dependencies,
            java_dependencies,
            def.backing.map(BackingKey::new),
        ));
        self.android.insert(id.to_string(), library.clone());
        Ok(library)
    }

    fn java_library(&mut self, id: &str) -> Result<Rc<JavaLibrary>, ParseError> {
        if let Some(library) = self.java.get(id) {
            return Ok(library.clone());
        }
        let def = self.lookup(id, LibraryKind::Java)?;
        if !def.android_dependencies.is_empty() {
            return Err(ParseError::JavaWithAndroidDependencies(id.to_string()));
        }
        if !self.in_progress.insert(id.to_string()) {
            return Err(ParseError::LibraryCycle(id.to_string()));
        }
        let dependencies = self.java_libraries(&def.java_dependencies)?;
        self.in_progress.remove(id);
        let library = Rc::new(JavaLibrary::new(
            def.jar,
            dependencies,
            def.backing.map(BackingKey::new),
        ));
        self.java.insert(id.to_string(), library.clone());
        Ok(library)
    }

    fn lookup(&self, id: &str, referenced: LibraryKind) -> Result<LibraryDef, ParseError> {
        let def = self
            .defs
            .get(id)
            .ok_or_else(|| ParseError::UnknownLibrary(id.to_string()))?;
        if def.kind != referenced {
            return Err(ParseError::LibraryKindMismatch {
                id: id.to_string(),
                declared: def.kind,
                referenced,
            });
        }
        Ok(def.clone())
    }
}
