//! Build-system kinds and the language directories they live in.

/// Language sub-directories of a multi-language component repository,
/// in the order they are searched.
pub const LANG_DIRS: [&str; 3] = ["cpp", "java", "python"];

/// Supported underlying build tool conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildSystem {
    Cmake,
    Maven,
    Pip,
}

impl BuildSystem {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildSystem::Cmake => "cmake",
            BuildSystem::Maven => "maven",
            BuildSystem::Pip => "pip",
        }
    }

    /// Human-readable tool name used in diagnostics.
    pub fn tool_name(&self) -> &'static str {
        match self {
            BuildSystem::Cmake => "CMake",
            BuildSystem::Maven => "Maven",
            BuildSystem::Pip => "Python",
        }
    }
}

impl std::fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(BuildSystem::Cmake.to_string(), "cmake");
        assert_eq!(BuildSystem::Maven.to_string(), "maven");
        assert_eq!(BuildSystem::Pip.to_string(), "pip");
        assert_eq!(BuildSystem::Pip.tool_name(), "Python");
    }
}
