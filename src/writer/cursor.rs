//! Generation-time position tracking inside a DOM container

use super::format::string_literal;

/// Position of the next child slot within one container.
///
/// `access` is the generated expression that reaches the container at
/// runtime. Only element children occupy slots; text nodes are skipped by the
/// runtime lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCursor {
    access: String,
    position: usize,
}

impl ChildCursor {
    pub fn new(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            position: 0,
        }
    }

    /// Expression reaching the container
    pub fn access(&self) -> &str {
        &self.access
    }

    /// Index the next child will occupy
    pub fn position(&self) -> usize {
        self.position
    }

    /// Runtime lookup of the `tag` element at the current position
    pub fn child_access(&self, function: &str, tag: &str) -> String {
        format!(
            "{}({}, {}, {})",
            function,
            self.access,
            self.position,
            string_literal(tag)
        )
    }

    /// Mark the current slot as consumed
    pub fn advance_child(&mut self) {
        self.position += 1;
    }
}
