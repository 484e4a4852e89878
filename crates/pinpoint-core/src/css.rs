//! Shallow CSS selector synthesis.
//!
//! The selector is at most two levels deep (`parent > node`). It is a
//! best-effort locator: pages with repeated structure can produce selectors
//! that match more than one element. Use [`Uniqueness`](crate::Uniqueness) to
//! check a selector against a document.

use pinpoint_dom::DomNode;

/// Build a CSS selector for `node`.
///
/// Non-elements yield an empty string.
pub fn compute_css_selector<N: DomNode>(node: &N) -> String {
    if !node.is_element() {
        return String::new();
    }
    if let Some(id) = node.id() {
        return format!("#{}", id);
    }

    let mut selector = node.local_name();
    for class in node.class_list() {
        selector.push('.');
        selector.push_str(&class);
    }

    match node
        .parent()
        .filter(|parent| parent.is_element() && parent.local_name() != "body")
    {
        Some(parent) => {
            let prefix = match parent.id() {
                Some(id) => format!("#{}", id),
                None => parent.local_name(),
            };
            format!("{} > {}", prefix, selector)
        }
        None => selector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_dom::Document;

    #[test]
    fn test_parent_without_id_uses_tag() {
        let mut doc = Document::new();
        let nav = doc.append_element(doc.root(), "NAV", &[("class", "top")]);
        let link = doc.append_element(nav, "a", &[("class", "item")]);

        assert_eq!(compute_css_selector(&doc.node(link)), "nav > a.item");
    }

    #[test]
    fn test_grandparents_are_ignored() {
        let mut doc = Document::new();
        let outer = doc.append_element(doc.root(), "section", &[("id", "outer")]);
        let inner = doc.append_element(outer, "div", &[]);
        let span = doc.append_element(inner, "span", &[]);

        assert_eq!(compute_css_selector(&doc.node(span)), "div > span");
    }

    #[test]
    fn test_duplicate_classes_are_kept() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div", &[("class", "a b a")]);

        assert_eq!(compute_css_selector(&doc.node(div)), "div.a.b.a");
    }

    #[test]
    fn test_text_node_is_empty() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p", &[]);
        let text = doc.append_text(p, "hi");

        assert_eq!(compute_css_selector(&doc.node(text)), "");
    }
}
