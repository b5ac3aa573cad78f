//! Placeholder substitution for widgets embedded in HTML

use crate::error::CompileError;
use crate::tree::{MarkupTree, NodeId};
use crate::writer::{FieldName, HostWriter, ELEMENT_POINTER_PREFIX};

use super::Interpreter;

/// Replaces a widget element inside an HTML container with an empty
/// placeholder element and emits the code that swaps the widget in at
/// runtime.
///
/// For the first widget inside a `<table>` of panel `p`, with the table
/// reached at runtime as `table`, this emits:
///
/// ```text
/// Element element2 = DomCursor.child(table, 0, "tbody");
/// p.addAndReplaceElement(f_Button_1, element2);
/// ```
///
/// and returns `<tbody></tbody>`.
#[derive(Debug, Clone)]
pub struct WidgetInterpreter {
    /// Field of the container that owns the placeholder
    field: FieldName,
}

impl WidgetInterpreter {
    pub fn new(field: FieldName) -> Self {
        Self { field }
    }
}

impl Interpreter for WidgetInterpreter {
    fn interpret(
        &self,
        writer: &mut dyn HostWriter,
        tree: &MarkupTree,
        elem: NodeId,
    ) -> Result<Option<String>, CompileError> {
        if !writer.is_widget_element(tree, elem) {
            return Ok(None);
        }

        let tag = writer
            .placeholder_policy()
            .legal_placeholder_tag(tree, elem)
            .to_string();

        let child_field = writer.parse_element_to_field(tree, elem)?;

        let var = format!("{}{}", ELEMENT_POINTER_PREFIX, writer.unique_id());
        let access = writer.dom_access_expression(&var, &tag)?;
        let host_type = writer.host_element_type().to_string();

        writer.add_init_statement("%s %s = %s;", &[&host_type, &var, &access])?;
        writer.add_init_statement(
            "%1$s.addAndReplaceElement(%2$s, %3$s);",
            &[self.field.as_str(), child_field.as_str(), &var],
        )?;

        writer.current_dom_cursor()?.advance_child();

        tracing::debug!(
            container = %self.field,
            widget = %child_field,
            temporary = %var,
            placeholder = %tag,
            "substituted widget"
        );
        Ok(Some(format!("<{0}></{0}>", tag)))
    }
}
