pub mod capture;
pub mod config;
pub mod css;
pub mod formatter;
pub mod locate;
pub mod xpath;

pub use capture::{CaptureOptions, ElementCapture, Rect, capture, parse_style_declarations};
pub use css::compute_css_selector;
pub use locate::{LocateError, Locator, Uniqueness};
pub use xpath::compute_xpath;

use pinpoint_dom::DomNode;
use serde::{Deserialize, Serialize};

/// The two locators synthesized for a node.
///
/// Both describe the same node at the time they were computed. Later changes to
/// the tree may invalidate either one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorResult {
    /// `None` when the node is not an element.
    pub xpath: Option<String>,
    pub css_selector: String,
}

pub fn synthesize<N: DomNode>(node: &N) -> SelectorResult {
    SelectorResult {
        xpath: compute_xpath(node),
        css_selector: compute_css_selector(node),
    }
}
