//! Selector Location
//!
//! Re-locates nodes from the selectors produced by [`synthesize`](crate::synthesize).
//! Only the grammar the synthesizer emits is understood:
//!
//! - XPath: `//*[@id="..."]` or an absolute path of `tag` / `tag[n]` steps
//! - CSS: `#id` or `tag.class...`, optionally behind one `parent > ` prefix
//!
//! Anything else is reported as [`LocateError::Unsupported`].

use crate::SelectorResult;
use pinpoint_dom::{Document, DomNode, NodeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Resolve synthesized selectors to nodes.
pub trait Locator {
    /// All nodes matched by `xpath`, in document order.
    fn locate_xpath(&self, xpath: &str) -> Result<Vec<NodeId>, LocateError>;

    /// All nodes matched by `selector`, in document order.
    fn locate_css(&self, selector: &str) -> Result<Vec<NodeId>, LocateError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("Empty selector")]
    Empty,

    /// Valid syntax outside the synthesized grammar
    #[error("Unsupported selector: {0}")]
    Unsupported(String),

    #[error("Invalid selector: {0}")]
    Invalid(String),
}

impl Locator for Document {
    fn locate_xpath(&self, xpath: &str) -> Result<Vec<NodeId>, LocateError> {
        let xpath = xpath.trim();
        if xpath.is_empty() {
            return Err(LocateError::Empty);
        }

        if let Some(rest) = xpath.strip_prefix("//*[@id=") {
            let value = rest
                .strip_suffix(']')
                .and_then(unquote)
                .ok_or_else(|| LocateError::Invalid(xpath.to_string()))?;
            return Ok(self
                .elements()
                .into_iter()
                .filter(|&id| self.node(id).id().as_deref() == Some(value))
                .collect());
        }

        let Some(path) = xpath.strip_prefix('/') else {
            return Err(LocateError::Unsupported(xpath.to_string()));
        };
        if path.starts_with('/') || path.contains("//") {
            return Err(LocateError::Unsupported(xpath.to_string()));
        }

        let steps = path
            .split('/')
            .map(|step| Step::parse(step, xpath))
            .collect::<Result<Vec<_>, _>>()?;

        let mut current = vec![self.root()];
        for step in &steps {
            current = current
                .into_iter()
                .flat_map(|parent| step.select(self, parent))
                .collect();
        }
        Ok(current)
    }

    fn locate_css(&self, selector: &str) -> Result<Vec<NodeId>, LocateError> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(LocateError::Empty);
        }

        let parts: Vec<&str> = selector.split('>').map(str::trim).collect();
        let (parent, target) = match parts.as_slice() {
            [target] => (None, Compound::parse(target, selector)?),
            [parent, target] => (
                Some(Compound::parse(parent, selector)?),
                Compound::parse(target, selector)?,
            ),
            _ => return Err(LocateError::Unsupported(selector.to_string())),
        };

        Ok(self
            .elements()
            .into_iter()
            .filter(|&id| target.matches(self, id))
            .filter(|&id| match &parent {
                Some(parent) => self
                    .parent(id)
                    .is_some_and(|p| self.element(p).is_some() && parent.matches(self, p)),
                None => true,
            })
            .collect())
    }
}

fn unquote(value: &str) -> Option<&str> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
}

/// One `tag` or `tag[n]` step of an absolute path.
struct Step<'a> {
    tag: &'a str,
    /// 1-based position among same-tag siblings
    position: Option<usize>,
}

impl<'a> Step<'a> {
    fn parse(step: &'a str, xpath: &str) -> Result<Self, LocateError> {
        let invalid = || LocateError::Invalid(xpath.to_string());

        let (tag, position) = match step.split_once('[') {
            Some((tag, predicate)) => {
                let n: usize = predicate
                    .strip_suffix(']')
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(invalid)?;
                if n == 0 {
                    return Err(invalid());
                }
                (tag, Some(n))
            }
            None => (step, None),
        };

        if tag.is_empty() || tag.contains(['*', '@', '(', ':']) {
            return Err(if tag.is_empty() {
                invalid()
            } else {
                LocateError::Unsupported(xpath.to_string())
            });
        }
        Ok(Self { tag, position })
    }

    fn select(&self, doc: &Document, parent: NodeId) -> Vec<NodeId> {
        let mut matching = doc.child_elements(parent).filter(|&child| {
            doc.element(child)
                .is_some_and(|e| e.tag.eq_ignore_ascii_case(self.tag))
        });
        match self.position {
            Some(n) => matching.nth(n - 1).into_iter().collect(),
            None => matching.collect(),
        }
    }
}

/// A compound selector without combinators.
enum Compound<'a> {
    Id(&'a str),
    Tag {
        /// `None` matches any element
        tag: Option<&'a str>,
        classes: Vec<&'a str>,
    },
}

impl<'a> Compound<'a> {
    fn parse(part: &'a str, selector: &str) -> Result<Self, LocateError> {
        if part.is_empty() {
            return Err(LocateError::Invalid(selector.to_string()));
        }
        if part.contains(char::is_whitespace) || part.contains(['[', ':', ',', '+', '~']) {
            return Err(LocateError::Unsupported(selector.to_string()));
        }

        if let Some(id) = part.strip_prefix('#') {
            if id.is_empty() {
                return Err(LocateError::Invalid(selector.to_string()));
            }
            // Ids are emitted verbatim, so everything after `#` belongs to the id.
            return Ok(Compound::Id(id));
        }

        let mut pieces = part.split('.');
        let tag = pieces
            .next()
            .filter(|tag| !tag.is_empty() && *tag != "*");
        let classes: Vec<&str> = pieces.collect();
        if classes.iter().any(|class| class.is_empty()) {
            return Err(LocateError::Invalid(selector.to_string()));
        }
        Ok(Compound::Tag { tag, classes })
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let node = doc.node(id);
        match self {
            Compound::Id(value) => node.id().as_deref() == Some(*value),
            Compound::Tag { tag, classes } => {
                if let Some(tag) = tag
                    && !node.tag_name().eq_ignore_ascii_case(tag)
                {
                    return false;
                }
                let present = node.class_list();
                classes
                    .iter()
                    .all(|class| present.iter().any(|p| p == class))
            }
        }
    }
}

/// How many nodes each synthesized locator matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uniqueness {
    pub xpath_matches: usize,
    pub css_matches: usize,
}

impl Uniqueness {
    /// Count matches for both locators. A locator that cannot be resolved counts as zero.
    pub fn of<L: Locator + ?Sized>(locator: &L, selector: &SelectorResult) -> Self {
        let xpath_matches = match &selector.xpath {
            Some(xpath) => count(locator.locate_xpath(xpath), xpath),
            None => 0,
        };
        let css_matches = count(
            locator.locate_css(&selector.css_selector),
            &selector.css_selector,
        );
        Self {
            xpath_matches,
            css_matches,
        }
    }

    pub fn is_unique(&self) -> bool {
        self.xpath_matches == 1 && self.css_matches == 1
    }
}

fn count(result: Result<Vec<NodeId>, LocateError>, selector: &str) -> usize {
    match result {
        Ok(nodes) => nodes.len(),
        Err(e) => {
            warn!("Could not resolve '{}': {}", selector, e);
            0
        }
    }
}
