pub mod cli;
pub mod connector;
pub mod inspect;
pub mod model;
pub mod session;

mod api;

pub use api::{Modelprobe, ModelprobeBuilder};
