/// Semantic role of a view, as exposed to hosts and assistive tooling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Container,
    Text,
    Button,
    TextField,
}

/// Semantics attached to a view. `layout_and_paint` flattens these into
/// `SemNode`s with resolved rects; hosts target widgets through them.
#[derive(Clone, Debug)]
pub struct Semantics {
    pub role: Role,
    pub label: Option<String>,
    pub focused: bool,
    pub enabled: bool,
}

impl Semantics {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            label: None,
            focused: false,
            enabled: true,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
