//! Element interpreters
//!
//! A structural parser offers each element it visits to an [`InterpreterPipe`].
//! The first interpreter that returns a fragment wins and the fragment
//! replaces the element; `None` from every interpreter means the element is
//! ordinary markup and the parser descends into it.

mod field;
mod panel;
mod widget;

pub use field::FieldInterpreter;
pub use panel::{HtmlPanelParser, VOID_ELEMENTS};
pub use widget::WidgetInterpreter;

use crate::error::CompileError;
use crate::tree::{MarkupTree, NodeId};
use crate::writer::HostWriter;

/// One strategy for handling an element
pub trait Interpreter {
    /// Replacement markup for `elem`, or `None` when this interpreter does
    /// not apply
    fn interpret(
        &self,
        writer: &mut dyn HostWriter,
        tree: &MarkupTree,
        elem: NodeId,
    ) -> Result<Option<String>, CompileError>;
}

/// Interpreters tried in a fixed order
#[derive(Default)]
pub struct InterpreterPipe {
    interpreters: Vec<Box<dyn Interpreter>>,
}

impl InterpreterPipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interpreter with lower priority than those already added
    pub fn with(mut self, interpreter: impl Interpreter + 'static) -> Self {
        self.interpreters.push(Box::new(interpreter));
        self
    }

    pub fn len(&self) -> usize {
        self.interpreters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpreters.is_empty()
    }
}

impl Interpreter for InterpreterPipe {
    fn interpret(
        &self,
        writer: &mut dyn HostWriter,
        tree: &MarkupTree,
        elem: NodeId,
    ) -> Result<Option<String>, CompileError> {
        for interpreter in &self.interpreters {
            if let Some(fragment) = interpreter.interpret(writer, tree, elem)? {
                return Ok(Some(fragment));
            }
        }
        Ok(None)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{find, tree, RecordingWriter};
    use super::*;

    struct Fixed(&'static str);

    impl Interpreter for Fixed {
        fn interpret(
            &self,
            _writer: &mut dyn HostWriter,
            _tree: &MarkupTree,
            _elem: NodeId,
        ) -> Result<Option<String>, CompileError> {
            Ok(Some(self.0.to_string()))
        }
    }

    struct Never;

    impl Interpreter for Never {
        fn interpret(
            &self,
            _writer: &mut dyn HostWriter,
            _tree: &MarkupTree,
            _elem: NodeId,
        ) -> Result<Option<String>, CompileError> {
            Ok(None)
        }
    }

    #[test]
    fn test_first_fragment_wins() {
        let t = tree("<div><p/></div>");
        let p = find(&t, "p");
        let mut writer = RecordingWriter::new();
        let pipe = InterpreterPipe::new()
            .with(Never)
            .with(Fixed("<a></a>"))
            .with(Fixed("<b></b>"));
        assert_eq!(pipe.len(), 3);
        assert_eq!(
            pipe.interpret(&mut writer, &t, p).unwrap().as_deref(),
            Some("<a></a>")
        );
    }

    #[test]
    fn test_empty_pipe_does_not_apply() {
        let t = tree("<div/>");
        let mut writer = RecordingWriter::new();
        let pipe = InterpreterPipe::new();
        assert!(pipe.is_empty());
        assert_eq!(pipe.interpret(&mut writer, &t, t.root()).unwrap(), None);
    }
}
