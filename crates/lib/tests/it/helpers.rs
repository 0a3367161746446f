//! Shared fixtures for the integration tests.

use treeform::codec::Codec;
use treeform::convert::{ConvertError, ScalarConverter};
use treeform::node::Node;
use treeform::{Error, leaf_convertible};

/// A codec backed by the serde derives on `Node`, standing in for a real
/// wire-format codec at the boundary the core treats as opaque.
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn parse(&self, input: &str) -> treeform::Result<Node> {
        serde_json::from_str(input).map_err(Error::codec)
    }

    fn render(&self, node: &Node) -> treeform::Result<String> {
        serde_json::to_string(node).map_err(Error::codec)
    }
}

/// A domain-specific scalar type, registered by tests rather than built in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port(pub u16);

leaf_convertible!(Port);

#[derive(Debug, Default, Clone, Copy)]
pub struct PortConverter;

impl ScalarConverter for PortConverter {
    type Target = Port;

    fn to_node(&self, value: &Port) -> Result<Node, ConvertError> {
        Ok(Node::scalar(value.0.to_string()))
    }

    fn from_node(&self, node: &Node) -> Result<Port, ConvertError> {
        let text = node.try_scalar().map_err(ConvertError::from)?;
        text.parse::<u16>()
            .map(Port)
            .map_err(|err| ConvertError::parse_failure("PortConverter", "Port", text, err))
    }
}
