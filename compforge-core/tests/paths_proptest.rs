use std::path::{Path, PathBuf};

use compforge_core::paths::{generate_build_path, split_path_list, BUILD_DIR_SUFFIX};
use proptest::prelude::*;

fn gen_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,8}(/[a-zA-Z0-9_.-]{1,8}){0,3}/{0,2}"
}

fn gen_path_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof![gen_segment(), Just(String::new())], 0..8)
}

proptest! {
    #[test]
    fn test_split_drops_empty_segments(segments in gen_path_list()) {
        let joined = segments.join(":");
        let split = split_path_list(&joined);
        let expected = segments.iter().filter(|s| !s.is_empty()).count();
        prop_assert_eq!(split.len(), expected);
    }

    #[test]
    fn test_split_strips_trailing_slashes(segments in gen_path_list()) {
        for path in split_path_list(&segments.join(":")) {
            let text = path.to_string_lossy().to_string();
            prop_assert!(text == "/" || !text.ends_with('/'));
        }
    }

    #[test]
    fn test_split_preserves_order(segments in gen_path_list()) {
        let split = split_path_list(&segments.join(":"));
        let expected: Vec<PathBuf> = segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| PathBuf::from(s.trim_end_matches('/')))
            .collect();
        prop_assert_eq!(split, expected);
    }

    #[test]
    fn test_build_path_is_flat_child_of_base(
        parts in prop::collection::vec("[a-zA-Z0-9_.]{1,8}", 1..6)
    ) {
        let src = PathBuf::from(format!("/{}", parts.join("/")));
        let base = Path::new("/tmp/mpf-build");
        let build = generate_build_path(base, &src);

        prop_assert_eq!(build.parent(), Some(base));
        let name = build.file_name().unwrap().to_string_lossy().to_string();
        prop_assert!(name.ends_with(BUILD_DIR_SUFFIX));
        prop_assert!(!name.starts_with('-'));
        prop_assert_eq!(name, format!("{}{}", parts.join("-"), BUILD_DIR_SUFFIX));
    }
}
