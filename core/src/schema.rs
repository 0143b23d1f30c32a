//! Serializable description of a declared command tree.
//!
//! [`TreeSchema`] snapshots the names, aliases and parameters of every node
//! so the surface of a CLI can be exported as JSON for documentation or
//! shell-completion tooling. It carries no handlers and no bound values.

use serde::{Deserialize, Serialize};

use crate::param::ParameterDescriptor;
use crate::tree::{CommandNode, CommandTree};
use crate::types::{Value, ValueType};

/// Version of the exported schema format (semver).
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Whether a node routes or executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    VerbGroup,
    Command,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Set for positional parameters only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub value_type: ValueType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl From<&ParameterDescriptor> for ParameterSchema {
    fn from(d: &ParameterDescriptor) -> Self {
        Self {
            name: d.primary_name().to_string(),
            aliases: d.aliases().to_vec(),
            position: d.position_index(),
            value_type: d.value_type().clone(),
            required: d.is_required(),
            default: d.default_value().cloned(),
            help: d.help().map(String::from),
        }
    }
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSchema {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSchema>,
}

impl From<&CommandNode> for NodeSchema {
    fn from(node: &CommandNode) -> Self {
        let (kind, parameters, children) = match node {
            CommandNode::VerbGroup(group) => (
                NodeKind::VerbGroup,
                Vec::new(),
                group.children().iter().map(NodeSchema::from).collect(),
            ),
            CommandNode::Command(command) => (
                NodeKind::Command,
                command
                    .resolved_parameters()
                    .iter()
                    .map(|d| ParameterSchema::from(d.as_ref()))
                    .collect(),
                Vec::new(),
            ),
        };

        Self {
            name: node.name().to_string(),
            kind,
            aliases: node.aliases().to_vec(),
            description: node.description().map(String::from),
            parameters,
            children,
        }
    }
}

/// Exported tree.
///
/// # Examples
///
/// ```
/// use verbtree_core::*;
///
/// let port = Param::<u16>::named("--port").default_value(8080).build();
/// let tree = CommandTree::new(
///     VerbGroup::new("svc").child(Command::new("serve").param(&port).handler_sync(|| ())),
/// )
/// .unwrap();
///
/// let schema = TreeSchema::from_tree(&tree);
/// let serve = schema.find(&["serve"]).unwrap();
/// assert_eq!(serve.parameters[0].name, "--port");
/// assert!(!serve.parameters[0].required);
///
/// let json = schema.to_json().unwrap();
/// assert!(json.contains("\"--port\""));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSchema {
    pub schema_version: String,
    pub root: NodeSchema,
}

impl TreeSchema {
    pub fn from_tree(tree: &CommandTree) -> Self {
        Self {
            schema_version: SCHEMA_CONTRACT_VERSION.to_string(),
            root: NodeSchema::from(tree.root()),
        }
    }

    /// Follows child names (not aliases) below the root.
    pub fn find(&self, path: &[&str]) -> Option<&NodeSchema> {
        path.iter().try_fold(&self.root, |node, name| {
            node.children.iter().find(|c| c.name == *name)
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, Param, VerbGroup};

    #[test]
    fn test_schema_round_trips_through_json() {
        let name = Param::<String>::positional("name", 0).build();
        let tree = CommandTree::new(
            VerbGroup::new("app")
                .description("Demo")
                .child(Command::new("greet").alias("hi").param(&name).handler_sync(|| ())),
        )
        .unwrap();

        let schema = TreeSchema::from_tree(&tree);
        let json = schema.to_json().unwrap();
        let parsed: TreeSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);

        let greet = parsed.find(&["greet"]).unwrap();
        assert_eq!(greet.kind, NodeKind::Command);
        assert_eq!(greet.aliases, vec!["hi".to_string()]);
        assert_eq!(greet.parameters[0].position, Some(0));
        assert!(greet.parameters[0].required);
    }

    #[test]
    fn test_find_unknown_path() {
        let tree = CommandTree::new(Command::new("tool").handler_sync(|| ())).unwrap();
        let schema = TreeSchema::from_tree(&tree);
        assert!(schema.find(&[]).is_some());
        assert!(schema.find(&["missing"]).is_none());
    }
}
