use proptest::prelude::*;
use trellis_core::TrellisError;
use trellis_domain::{Path, PathResolver};

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,11}"
}

fn ambient() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        Just((String::new(), String::new())),
        name().prop_map(|b| (b, String::new())),
        (name(), name()),
    ]
}

fn ambient_depth(board: &str, list: &str) -> usize {
    [board, list].iter().filter(|s| !s.is_empty()).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_empty_input_is_ambient(board in name(), list in name()) {
        let path = PathResolver::new(&board, &list).resolve("").unwrap();
        prop_assert_eq!(path.names(), vec![board.as_str(), list.as_str()]);
        prop_assert!(path.card().name().is_none());
        prop_assert!(!path.has_trailing_slash());
    }

    #[test]
    fn prop_absolute_ignores_ambient(
        (board, list) in ambient(),
        b in name(),
        l in name(),
        c in name(),
    ) {
        let raw = format!("/{}/{}/{}", b, l, c);
        let path = PathResolver::new(&board, &list).resolve(&raw).unwrap();
        prop_assert_eq!(path, Path::from_names(&[b, l, c], false).unwrap());
    }

    /// Each `..` consumes one ambient level; one more than the ambient depth
    /// goes above the root.
    #[test]
    fn prop_parent_boundary((board, list) in ambient(), target in name()) {
        let resolver = PathResolver::new(&board, &list);
        let depth = ambient_depth(&board, &list);

        let legal = format!("{}{}", "../".repeat(depth), target);
        let path = resolver.resolve(&legal).unwrap();
        prop_assert_eq!(path.names(), vec![target.as_str()]);

        let too_far = format!("{}{}", "../".repeat(depth + 1), target);
        prop_assert!(matches!(resolver.resolve(&too_far), Err(TrellisError::InvalidPath(_))));
    }

    #[test]
    fn prop_absolute_parent_clamps_at_root((board, list) in ambient(), ups in 1usize..6, target in name()) {
        let raw = format!("/{}{}", "../".repeat(ups), target);
        let path = PathResolver::new(&board, &list).resolve(&raw).unwrap();
        prop_assert_eq!(path.names(), vec![target.as_str()]);
    }

    /// The rendered form of a resolved path resolves back to itself from
    /// any ambient location, trailing slash included.
    #[test]
    fn prop_display_round_trips(
        (board, list) in ambient(),
        (other_board, other_list) in ambient(),
        names in proptest::collection::vec(name(), 0..=4),
        trailing in any::<bool>(),
    ) {
        let path = Path::from_names(&names, trailing).unwrap();
        let rendered = path.to_string();
        let again = PathResolver::new(&board, &list).resolve(&rendered).unwrap();
        prop_assert_eq!(&again, &path);
        let elsewhere = PathResolver::new(&other_board, &other_list).resolve(&rendered).unwrap();
        prop_assert_eq!(elsewhere, path);
    }

    #[test]
    fn prop_repeated_empty_resolution_is_stable((board, list) in ambient()) {
        let resolver = PathResolver::new(&board, &list);
        let first = resolver.resolve("").unwrap();
        let second = resolver.resolve(&first.to_string()).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.depth(), ambient_depth(&board, &list));
    }

    #[test]
    fn prop_more_than_four_segments_is_invalid(
        (board, list) in ambient(),
        names in proptest::collection::vec(name(), 5..8),
    ) {
        let raw = format!("/{}", names.join("/"));
        let result = PathResolver::new(&board, &list).resolve(&raw);
        prop_assert!(matches!(result, Err(TrellisError::InvalidPath(_))));
    }

    #[test]
    fn prop_relative_join_appends_to_ambient(
        (board, list) in ambient(),
        names in proptest::collection::vec(name(), 1..=2),
    ) {
        let path = PathResolver::new(&board, &list).resolve(&names.join("/")).unwrap();
        let mut expected: Vec<&str> = [board.as_str(), list.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        expected.extend(names.iter().map(String::as_str));
        prop_assert_eq!(path.names(), expected);
    }
}

#[test]
fn test_parent_from_board_only() {
    let resolver = PathResolver::new("b", "");
    let sibling = resolver.resolve("../x").unwrap();
    assert_eq!(sibling.names(), vec!["x"]);
    assert!(matches!(
        resolver.resolve("../../x"),
        Err(TrellisError::InvalidPath(_))
    ));
}
