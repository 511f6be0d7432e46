pub mod clean;
pub mod cmake;
pub mod component;
pub mod maven;
pub mod pip;
pub mod sdk;
pub mod toolchain;

pub use clean::clean_build;
pub use cmake::CmakeAdapter;
pub use component::Component;
pub use maven::MavenAdapter;
pub use pip::PipAdapter;
pub use sdk::{CppSdk, JavaSdk, PythonSdk, Sdk};
pub use toolchain::{Toolchain, VerifiedPip};

use compforge_core::classifier::Classifier;
use compforge_core::config::Tools;

/// Creates the classifier used for component resolution.
///
/// CMake is tried before Maven, and Maven before pip.
pub fn classifier(tools: &Tools) -> Classifier {
    Classifier::new()
        .register(Box::new(CmakeAdapter::new(tools)))
        .register(Box::new(MavenAdapter::new(tools)))
        .register(Box::new(PipAdapter::new(tools)))
}
