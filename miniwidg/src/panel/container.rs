//! Collapsible widget groups

/// Named group of layout items shown and hidden together.
///
/// While `open`, every layout item registered on the panel is appended to
/// `children`. Closing freezes the membership; the container's toggle then
/// drives `expanded`.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub(crate) open: bool,
    pub(crate) children: Vec<usize>,
    pub(crate) default: bool,
    pub(crate) initialized: bool,
    pub(crate) expanded: bool,
}

impl Container {
    pub(crate) fn new(default: bool) -> Self {
        Self {
            open: true,
            children: Vec::new(),
            default,
            initialized: false,
            // children stay visible until the first refresh syncs them
            expanded: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn default_state(&self) -> bool {
        self.default
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn contains(&self, item: usize) -> bool {
        self.children.contains(&item)
    }
}
