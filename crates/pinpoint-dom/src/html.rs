//! HTML snapshot loading.
//!
//! Pages are parsed with `scraper` (html5ever underneath) and copied into an
//! arena [`Document`]. The parsed `Html` is kept around so full CSS queries
//! can be used to pick elements.

use crate::document::{Document, NodeId};
use crate::error::DomError;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use tracing::debug;

pub struct HtmlSnapshot {
    html: Html,
    document: Document,
    /// Arena ids of every element, in the pre-order `scraper` walks them.
    element_order: Vec<NodeId>,
}

impl HtmlSnapshot {
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        let mut document = Document::new();
        let mut element_order = Vec::new();

        copy_tree(&mut document, html.root_element(), &mut element_order);

        debug!(
            "Loaded HTML snapshot: {} nodes, {} elements",
            document.len(),
            element_order.len()
        );

        Self {
            html,
            document,
            element_order,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Run a CSS query against the page. Matches come back in document order.
    pub fn select(&self, query: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(query)
            .map_err(|e| DomError::InvalidSelector(format!("{}: {}", query, e)))?;
        let matched: HashSet<_> = self.html.select(&selector).map(|e| e.id()).collect();

        Ok(self
            .html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .zip(self.element_order.iter())
            .filter(|(element, _)| matched.contains(&element.id()))
            .map(|(_, &id)| id)
            .collect())
    }

    pub fn select_first(&self, query: &str) -> Result<NodeId, DomError> {
        self.select(query)?
            .into_iter()
            .next()
            .ok_or_else(|| DomError::NoMatch(query.to_string()))
    }
}

/// Copy the element subtree under `root` into `document`.
///
/// Walks with an explicit stack so deeply nested pages cannot exhaust the call
/// stack. Elements are popped in pre-order, which is the order `scraper`
/// reports them in.
fn copy_tree(document: &mut Document, root: ElementRef<'_>, order: &mut Vec<NodeId>) {
    let top = copy_element_data(document, root);
    let document_root = document.root();
    document.append_child(document_root, top);

    let mut stack = vec![(top, root)];
    while let Some((id, element)) = stack.pop() {
        order.push(id);

        let mut child_elements = Vec::new();
        for child in element.children() {
            match child.value() {
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        let child_id = copy_element_data(document, child_element);
                        document.append_child(id, child_id);
                        child_elements.push((child_id, child_element));
                    }
                }
                Node::Text(text) => {
                    document.append_text(id, &text.text);
                }
                Node::Comment(comment) => {
                    let node = document.create_comment(comment.comment.to_string());
                    document.append_child(id, node);
                }
                _ => {}
            }
        }
        stack.extend(child_elements.into_iter().rev());
    }
}

fn copy_element_data(document: &mut Document, element: ElementRef<'_>) -> NodeId {
    let value = element.value();
    let id = document.create_element(value.name());
    for (name, attr) in value.attrs() {
        document.set_attribute(id, name, attr);
    }
    id
}
