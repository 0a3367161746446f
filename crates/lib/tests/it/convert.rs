//! Converter and registry integration tests.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use treeform::convert::{
    ConvertError, Converter, Convertible, DynValue, FallbackRule, Registry, TypeTag, ValueTag,
};
use treeform::leaf_convertible;
use treeform::node::Node;
use uuid::Uuid;

use crate::helpers::{Port, PortConverter};

#[test]
fn test_scalar_round_trips() {
    let registry = Registry::with_defaults();

    assert_eq!(registry.to_node_for(&5i64).unwrap(), Node::scalar("5"));
    assert_eq!(registry.to_node_for(&true).unwrap(), Node::scalar("true"));

    let id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let stamp: DateTime<Utc> = Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap();

    macro_rules! assert_round_trip {
        ($value:expr => $ty:ty) => {{
            let value: $ty = $value;
            let node = registry.to_node_for(&value).unwrap();
            assert_eq!(registry.from_node_for::<$ty>(&node).unwrap(), value);
        }};
    }

    assert_round_trip!(-42 => i64);
    assert_round_trip!(255 => u8);
    assert_round_trip!(3.5 => f64);
    assert_round_trip!(false => bool);
    assert_round_trip!('π' => char);
    assert_round_trip!("hello world".to_string() => String);
    assert_round_trip!(id => Uuid);
    assert_round_trip!(date => NaiveDate);
    assert_round_trip!(stamp => DateTime<Utc>);
}

#[test]
fn test_parse_failures_are_wrapped() {
    let registry = Registry::with_defaults();
    let err = registry
        .from_node_for::<i64>(&Node::scalar("not-a-number"))
        .unwrap_err();
    assert!(err.is_type_mismatch());
    let rendered = format!("{err}");
    assert!(rendered.contains("not-a-number"));

    let err = registry
        .from_node_for::<Uuid>(&Node::scalar("1234"))
        .unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_shape_mismatches() {
    let registry = Registry::with_defaults();

    // Scalar where a sequence is required
    let err = registry
        .from_node_for::<Vec<i64>>(&Node::scalar("5"))
        .unwrap_err();
    assert!(err.is_type_mismatch());

    // Sequence where a scalar is required
    let err = registry
        .from_node_for::<i64>(&Node::Sequence(vec![Node::scalar("5")]))
        .unwrap_err();
    assert!(err.is_type_mismatch());

    // Scalar where a mapping is required
    let err = registry
        .from_node_for::<BTreeMap<String, i64>>(&Node::scalar("5"))
        .unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_collection_round_trip_preserves_order() {
    let registry = Registry::with_defaults();
    let values = vec![3i64, 1, 2, 1];
    let node = registry.to_node_for(&values).unwrap();
    assert_eq!(
        node,
        Node::Sequence(vec![
            Node::scalar("3"),
            Node::scalar("1"),
            Node::scalar("2"),
            Node::scalar("1"),
        ])
    );
    assert_eq!(registry.from_node_for::<Vec<i64>>(&node).unwrap(), values);
}

#[test]
fn test_nested_collections() {
    let registry = Registry::with_defaults();
    let values = vec![vec![1i64, 2], vec![], vec![3]];
    let node = registry.to_node_for(&values).unwrap();
    assert_eq!(
        registry.from_node_for::<Vec<Vec<i64>>>(&node).unwrap(),
        values
    );
}

#[test]
fn test_array_length_is_enforced() {
    let registry = Registry::with_defaults();
    let values = [10u8, 20, 30];
    let node = registry.to_node_for(&values).unwrap();
    assert_eq!(registry.from_node_for::<[u8; 3]>(&node).unwrap(), values);

    let short = Node::Sequence(vec![Node::scalar("10"), Node::scalar("20")]);
    let err = registry.from_node_for::<[u8; 3]>(&short).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_map_keys_travel_as_scalar_text() {
    let registry = Registry::with_defaults();
    let mut map = BTreeMap::new();
    map.insert(7i64, "seven".to_string());
    map.insert(2i64, "two".to_string());

    let node = registry.to_node_for(&map).unwrap();
    let mapping = node.as_mapping().unwrap();
    let keys: Vec<&str> = mapping.keys().collect();
    // BTreeMap iterates in key order; the tree preserves that order
    assert_eq!(keys, vec!["2", "7"]);

    let restored: BTreeMap<i64, String> = registry.from_node_for(&node).unwrap();
    assert_eq!(restored, map);
}

#[test]
fn test_structural_map_keys_are_unsupported() {
    let registry = Registry::with_defaults();
    let mut map: BTreeMap<Vec<i64>, i64> = BTreeMap::new();
    map.insert(vec![1], 1);
    let err = registry.to_node_for(&map).unwrap_err();
    assert!(err.is_unsupported_type());
}

#[test]
fn test_unregistered_type_fails_loudly() {
    let registry = Registry::with_defaults();
    let err = registry.to_node_for(&Port(80)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_child_falls_back_to_parent() {
    let parent = Arc::new(Registry::with_defaults());
    parent.register(PortConverter);
    let child = parent.child();

    // The child has no local converters at all, yet converts through the chain
    let node = child.to_node_for(&Port(8080)).unwrap();
    assert_eq!(node, Node::scalar("8080"));
    assert_eq!(child.from_node_for::<Port>(&node).unwrap(), Port(8080));
}

#[test]
fn test_child_removal_leaves_parent_intact() {
    let parent = Arc::new(Registry::with_defaults());
    parent.register(PortConverter);
    let child = parent.child();
    child.register(PortConverter);

    child.remove::<Port>();
    // Removal is local; the parent still supplies the converter transparently
    assert!(child.to_node_for(&Port(443)).is_ok());
    assert!(parent.to_node_for(&Port(443)).is_ok());

    child.remove_all();
    assert!(child.to_node_for(&Port(443)).is_ok());
}

#[test]
fn test_remove_by_converter_type() {
    let registry = Registry::with_defaults();
    registry.register(PortConverter);
    assert!(registry.to_node_for(&Port(80)).is_ok());

    // Removing by the converter's own type drops the binding as well
    registry.remove::<PortConverter>();
    assert!(registry.to_node_for(&Port(80)).unwrap_err().is_not_found());
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UserId(String);

leaf_convertible!(UserId);

struct IdFallbackConverter;

impl Converter for IdFallbackConverter {
    fn converter_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn target(&self) -> ValueTag {
        ValueTag::of::<UserId>()
    }

    fn to_node(&self, _registry: &Registry, value: &DynValue) -> Result<Node, ConvertError> {
        let id = value
            .downcast_ref::<UserId>()
            .ok_or_else(|| ConvertError::mismatch("IdFallbackConverter", "UserId", value.shape()))?;
        Ok(Node::scalar(id.0.clone()))
    }

    fn from_node(&self, _registry: &Registry, node: &Node) -> Result<DynValue, ConvertError> {
        let text = node.try_scalar().map_err(ConvertError::from)?;
        Ok(DynValue::of(UserId(text.to_string())))
    }
}

#[test]
fn test_fallback_rules_match_in_order_and_memoize() {
    let registry = Registry::with_defaults();
    let probes = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&probes);

    registry.add_fallback(FallbackRule::new(
        "user ids",
        move |tag| {
            counted.fetch_add(1, Ordering::SeqCst);
            tag.name.ends_with("UserId")
        },
        IdFallbackConverter,
    ));

    let id = UserId("alice".to_string());
    let node = registry.to_node_for(&id).unwrap();
    assert_eq!(node, Node::scalar("alice"));
    let probed_once = probes.load(Ordering::SeqCst);
    assert!(probed_once >= 1);

    // The first hit was memoized under UserId; the rule is not consulted again
    assert_eq!(registry.from_node_for::<UserId>(&node).unwrap(), id);
    assert_eq!(probes.load(Ordering::SeqCst), probed_once);
}

#[test]
fn test_mismatch_inside_erased_converter_names_the_converter() {
    let registry = Registry::with_defaults();
    // A decomposed collection handed to a leaf converter: the adapter
    // rejects the shape before the typed converter runs
    let err = registry
        .to_node(&vec![1i64, 2].to_dyn(), &TypeTag::value::<i64>())
        .unwrap_err();
    assert!(err.is_type_mismatch());
    let rendered = format!("{err}");
    assert!(rendered.contains("I64Converter"));
    assert!(rendered.contains("seq"));
}

#[test]
fn test_concurrent_conversion_and_registration() {
    let registry = Registry::with_defaults();
    registry.add_fallback(FallbackRule::new(
        "user ids",
        |tag| tag.name.ends_with("UserId"),
        IdFallbackConverter,
    ));

    std::thread::scope(|scope| {
        // Readers convert built-ins and trigger the memoizing cache fill
        for _ in 0..4 {
            scope.spawn(|| {
                for i in 0..200i64 {
                    let node = registry.to_node_for(&i).unwrap();
                    assert_eq!(registry.from_node_for::<i64>(&node).unwrap(), i);

                    let id = UserId(format!("user-{i}"));
                    let node = registry.to_node_for(&id).unwrap();
                    assert_eq!(registry.from_node_for::<UserId>(&node).unwrap(), id);
                }
            });
        }
        // A writer churns an unrelated binding the whole time
        scope.spawn(|| {
            for _ in 0..200 {
                registry.register(PortConverter);
                registry.remove::<PortConverter>();
            }
        });
    });

    // The churned binding never disturbed anything else
    assert_eq!(registry.to_node_for(&5i64).unwrap(), Node::scalar("5"));
    let id = UserId("carol".to_string());
    let node = registry.to_node_for(&id).unwrap();
    assert_eq!(registry.from_node_for::<UserId>(&node).unwrap(), id);
}

#[test]
fn test_registration_replaces_existing_binding() {
    let registry = Registry::with_defaults();
    registry.register(PortConverter);
    registry.register(PortConverter);
    let node = registry.to_node_for(&Port(22)).unwrap();
    assert_eq!(node, Node::scalar("22"));
}
