//! Node capability interface.
//!
//! Selector synthesis only needs to read a handful of things from a node: its
//! tag, its attributes and its parent/sibling links. Anything that can answer
//! those questions (the arena [`Document`](crate::Document), a live browser
//! binding, a test double) implements [`DomNode`].

/// Read-only view of a node in a hierarchical document tree.
pub trait DomNode: Clone {
    /// Whether this node is an element (as opposed to the document, text or comments).
    fn is_element(&self) -> bool;

    /// Tag name as stored by the host. Empty for non-elements.
    fn tag_name(&self) -> String;

    /// Raw attribute value, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    fn parent(&self) -> Option<Self>;

    fn previous_sibling(&self) -> Option<Self>;

    fn next_sibling(&self) -> Option<Self>;

    /// The `id` attribute. An empty id counts as absent.
    fn id(&self) -> Option<String> {
        self.attribute("id").filter(|id| !id.is_empty())
    }

    /// Classes in attribute order. Duplicates are kept.
    fn class_list(&self) -> Vec<String> {
        self.attribute("class")
            .map(|classes| {
                classes
                    .split_ascii_whitespace()
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Lowercased tag name.
    fn local_name(&self) -> String {
        self.tag_name().to_ascii_lowercase()
    }

    /// True if `other` is an element with the same tag, compared case-insensitively.
    fn same_tag(&self, other: &Self) -> bool {
        other.is_element() && self.tag_name().eq_ignore_ascii_case(&other.tag_name())
    }
}
