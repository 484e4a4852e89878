//! Absolute XPath synthesis.

use pinpoint_dom::DomNode;

/// Build an XPath for `node`.
///
/// An element with an id short-circuits to `//*[@id="..."]`. Otherwise the
/// path is absolute, one segment per element ancestor. A segment carries a
/// 1-based positional predicate only when a sibling shares its tag.
///
/// Returns `None` if `node` is not an element.
pub fn compute_xpath<N: DomNode>(node: &N) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    if let Some(id) = node.id() {
        return Some(format!("//*[@id=\"{}\"]", id));
    }

    let mut segments = Vec::new();
    let mut current = Some(node.clone());
    while let Some(element) = current {
        if !element.is_element() {
            break;
        }
        segments.push(segment(&element));
        current = element.parent();
    }

    if segments.is_empty() {
        return None;
    }
    segments.reverse();
    Some(format!("/{}", segments.join("/")))
}

fn segment<N: DomNode>(element: &N) -> String {
    let preceding = walk(element, N::previous_sibling)
        .filter(|sibling| element.same_tag(sibling))
        .count();
    let has_following = walk(element, N::next_sibling).any(|sibling| element.same_tag(&sibling));

    let name = element.local_name();
    if preceding > 0 || has_following {
        format!("{}[{}]", name, preceding + 1)
    } else {
        name
    }
}

fn walk<N: DomNode>(start: &N, step: fn(&N) -> Option<N>) -> impl Iterator<Item = N> {
    std::iter::successors(step(start), move |node| step(node))
}
