use crate::error::CompileError;
use crate::tree::{MarkupTree, NodeId, BINDER_URI};
use crate::writer::HostWriter;

use super::Interpreter;

/// Binds plain HTML elements carrying `ui:field` to a host element
/// reference. Never replaces the element.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldInterpreter;

impl Interpreter for FieldInterpreter {
    fn interpret(
        &self,
        writer: &mut dyn HostWriter,
        tree: &MarkupTree,
        elem: NodeId,
    ) -> Result<Option<String>, CompileError> {
        let Some(data) = tree.element(elem) else {
            return Ok(None);
        };
        if writer.is_widget_element(tree, elem) {
            return Ok(None);
        }
        let Some(attr) = data.attribute(Some(BINDER_URI), "field") else {
            return Ok(None);
        };

        let name = writer.reserve_field_name(&attr.value, attr.span.clone())?;
        let access = writer.dom_access_expression(name.as_str(), &data.local_name)?;
        let host_type = writer.host_element_type().to_string();
        writer.add_init_statement("%s %s = %s;", &[&host_type, name.as_str(), &access])?;

        tracing::debug!(field = %name, element = %data.local_name, "bound element field");
        Ok(None)
    }
}
