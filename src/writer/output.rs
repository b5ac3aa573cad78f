//! Result of a compilation pass

use crate::tree::{MarkupTree, NodeId};

use super::fields::{FieldName, GeneratedField};

/// A widget element replaced by placeholder markup
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub node: NodeId,
    pub fragment: String,
}

/// Generated construction code plus the rewritten template
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledBinder {
    /// Field declarations in declaration order
    pub fields: Vec<GeneratedField>,
    /// Initialization statements in emission order
    pub init_statements: Vec<String>,
    /// Field holding the root widget
    pub root_field: FieldName,
    /// Placeholder substitutions in document order
    pub substitutions: Vec<Substitution>,
    /// Template markup after substitutions were applied
    pub markup: String,
}

impl CompiledBinder {
    /// Swap every substituted widget element for its placeholder
    pub fn apply_substitutions(&self, tree: &mut MarkupTree) {
        for sub in &self.substitutions {
            tree.substitute(sub.node, sub.fragment.as_str());
        }
    }

    /// Render the construction code: fields, then statements, then the root
    pub fn render(&self) -> String {
        let mut out = String::new();
        for field in &self.fields {
            out.push_str(&field.declaration());
            out.push('\n');
        }
        for statement in &self.init_statements {
            out.push_str(statement);
            out.push('\n');
        }
        out.push_str(&format!("return {};\n", self.root_field));
        out
    }
}
