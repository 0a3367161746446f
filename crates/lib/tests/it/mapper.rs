//! Reflective mapper integration tests.

use treeform::convert::Registry;
use treeform::node::{Mapping, Node};
use treeform::{leaf_convertible, mapper, section};

#[derive(Debug, Default, PartialEq)]
struct Nested {
    b: String,
    c: Vec<i64>,
}

#[derive(Debug, Default, PartialEq)]
struct Config {
    a: i64,
    section: Nested,
}

section!(Nested { b: value, c: value });
section!(Config {
    a: value,
    section: nested,
});

fn expected_tree() -> Node {
    let mut inner = Mapping::new();
    inner.insert("b", Node::scalar("x")).unwrap();
    inner
        .insert(
            "c",
            Node::Sequence(vec![
                Node::scalar("1"),
                Node::scalar("2"),
                Node::scalar("3"),
            ]),
        )
        .unwrap();

    let mut outer = Mapping::new();
    outer.insert("a", Node::scalar("5")).unwrap();
    outer.insert("section", Node::Mapping(inner)).unwrap();
    Node::Mapping(outer)
}

#[test]
fn test_save_produces_exact_tree() {
    let registry = Registry::with_defaults();
    let config = Config {
        a: 5,
        section: Nested {
            b: "x".to_string(),
            c: vec![1, 2, 3],
        },
    };

    let tree = mapper::to_tree(&config, &registry).unwrap();
    assert_eq!(tree, expected_tree());
}

#[test]
fn test_load_reproduces_values() {
    let registry = Registry::with_defaults();
    let restored: Config = mapper::from_tree(&expected_tree(), &registry).unwrap();
    assert_eq!(
        restored,
        Config {
            a: 5,
            section: Nested {
                b: "x".to_string(),
                c: vec![1, 2, 3],
            },
        }
    );
}

#[test]
fn test_absent_and_null_entries_keep_defaults() {
    let registry = Registry::with_defaults();

    let mut partial = Mapping::new();
    partial.insert("a", Node::scalar("9")).unwrap();
    partial.insert("section", Node::Null).unwrap();

    let restored: Config = mapper::from_tree(&Node::Mapping(partial), &registry).unwrap();
    assert_eq!(restored.a, 9);
    assert_eq!(restored.section, Nested::default());
}

#[test]
fn test_loading_from_non_mapping_fails() {
    let registry = Registry::with_defaults();
    let err = mapper::from_tree::<Config>(&Node::scalar("5"), &registry).unwrap_err();
    assert!(err.is_not_a_section());
}

#[derive(Debug, Default, PartialEq)]
struct Optional {
    timeout: Option<u64>,
}

section!(Optional { timeout: value });

#[test]
fn test_option_fields_save_as_null_and_load_back() {
    let registry = Registry::with_defaults();

    let unset = Optional { timeout: None };
    let tree = mapper::to_tree(&unset, &registry).unwrap();
    assert_eq!(
        tree.as_mapping().unwrap().get("timeout"),
        Some(&Node::Null)
    );
    let restored: Optional = mapper::from_tree(&tree, &registry).unwrap();
    assert_eq!(restored, unset);

    let set = Optional { timeout: Some(30) };
    let tree = mapper::to_tree(&set, &registry).unwrap();
    let restored: Optional = mapper::from_tree(&tree, &registry).unwrap();
    assert_eq!(restored, set);
}

#[derive(Debug, Default)]
struct Renamed {
    keep_alive: bool,
}

section!(Renamed {
    keep_alive as "keep-alive": value,
});

#[test]
fn test_renamed_fields_use_declared_component() {
    let registry = Registry::with_defaults();
    let tree = mapper::to_tree(&Renamed { keep_alive: true }, &registry).unwrap();
    assert_eq!(
        tree.as_mapping().unwrap().get("keep-alive"),
        Some(&Node::scalar("true"))
    );
}

// A type that is declarable but has no registered converter; used to prove
// path validation runs before any conversion is attempted.
#[derive(Debug, Default, Clone, PartialEq)]
struct Unconverted(String);

leaf_convertible!(Unconverted);

#[derive(Debug, Default)]
struct LeafShadowsSection {
    broken: Unconverted,
    extra: Nested,
}

section!(LeafShadowsSection {
    broken: value,
    extra as "broken": nested,
});

#[test]
fn test_duplicate_path_detected_before_conversion() {
    let registry = Registry::with_defaults();
    let err = mapper::to_tree(&LeafShadowsSection::default(), &registry).unwrap_err();
    // The colliding path wins over the missing converter: validation runs first
    match err {
        mapper::MapperError::DuplicatedPath { path, first, second } => {
            assert_eq!(path, "broken");
            assert!(first.contains("LeafShadowsSection::broken"));
            assert!(second.contains("LeafShadowsSection::extra") || second.contains("broken"));
        }
        other => panic!("expected DuplicatedPath, got {other:?}"),
    }
}

#[derive(Debug, Default)]
struct DottedRename {
    a: i64,
}

section!(DottedRename {
    a as "b.c": value,
});

#[test]
fn test_dotted_rename_is_rejected_before_any_tree_is_built() {
    // A dotted name would validate as the nested path "b.c" but be stored
    // as one flat mapping key, unreachable through at_path. Reject it.
    let err = mapper::validate::<DottedRename>().unwrap_err();
    match err {
        mapper::MapperError::InvalidFieldName { name, declaration } => {
            assert_eq!(name, "b.c");
            assert!(declaration.contains("DottedRename::a"));
        }
        other => panic!("expected InvalidFieldName, got {other:?}"),
    }

    let registry = Registry::with_defaults();
    let err = mapper::to_tree(&DottedRename { a: 7 }, &registry).unwrap_err();
    assert!(err.is_invalid_field_name());
    let err = mapper::from_tree::<DottedRename>(&Node::Mapping(Mapping::new()), &registry)
        .unwrap_err();
    assert!(err.is_invalid_field_name());
}

#[derive(Debug, Default)]
struct SiblingSections {
    left: Nested,
    right: Nested,
}

section!(SiblingSections {
    left: nested,
    right as "left": nested,
});

#[test]
fn test_sibling_sections_with_colliding_paths_are_rejected() {
    let err = mapper::validate::<SiblingSections>().unwrap_err();
    assert!(err.is_duplicated_path());
}

#[test]
fn test_deeply_nested_leaves_do_not_collide_across_levels() {
    // "section.b" and a hypothetical "b" at the root are distinct paths
    mapper::validate::<Config>().unwrap();
}

#[derive(Debug, Default, PartialEq)]
struct Level3 {
    value: i64,
}

#[derive(Debug, Default, PartialEq)]
struct Level2 {
    level3: Level3,
}

#[derive(Debug, Default, PartialEq)]
struct Level1 {
    level2: Level2,
}

section!(Level3 { value: value });
section!(Level2 { level3: nested });
section!(Level1 { level2: nested });

#[test]
fn test_deep_nesting_round_trip() {
    let registry = Registry::with_defaults();
    let config = Level1 {
        level2: Level2 {
            level3: Level3 { value: 77 },
        },
    };
    let tree = mapper::to_tree(&config, &registry).unwrap();
    assert_eq!(
        tree.at_path(&"level2.level3.value".parse::<treeform::node::PathBuf>().unwrap()),
        Some(&Node::scalar("77"))
    );
    let restored: Level1 = mapper::from_tree(&tree, &registry).unwrap();
    assert_eq!(restored, config);
}
