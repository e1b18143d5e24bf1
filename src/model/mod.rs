use thiserror::Error;

pub mod build;
pub mod dump;

use dump::LibraryKind;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading model dump: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Model dump references unknown library `{0}`")]
    UnknownLibrary(String),
    #[error("Library `{0}` participates in a dependency cycle")]
    LibraryCycle(String),
    #[error("Library `{id}` is declared as a {declared} library but referenced as a {referenced} library")]
    LibraryKindMismatch {
        id: String,
        declared: LibraryKind,
        referenced: LibraryKind,
    },
    #[error("Java library `{0}` cannot declare android dependencies")]
    JavaWithAndroidDependencies(String),
}
