use crate::config::schema::CaptureConfig;
use crate::locate::Uniqueness;
use crate::{SelectorResult, synthesize};
use pinpoint_dom::{DomNode, NodeRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Bounding box reported by the host. Static snapshots have no layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FromStr for Rect {
    type Err = String;

    /// Parses `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid rect '{}': {}", s, e))?;
        match values.as_slice() {
            [x, y, width, height] => Ok(Rect {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            }),
            _ => Err(format!("invalid rect '{}': expected x,y,width,height", s)),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.0},{:.0}) {:.0}x{:.0}", self.x, self.y, self.width, self.height)
    }
}

/// Everything a picker records about one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCapture {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    /// Style declarations: the inline `style` attribute, overlaid with
    /// whatever computed styles the host reports.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,

    #[serde(flatten)]
    pub selector: SelectorResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniqueness: Option<Uniqueness>,
}

impl ElementCapture {
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Merge host-reported styles over the captured ones.
    pub fn with_styles<I, K, V>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (property, value) in styles {
            let property = property.as_ref().trim().to_ascii_lowercase();
            let value = value.as_ref().trim();
            if !property.is_empty() && !value.is_empty() {
                self.styles.insert(property, value.to_string());
            }
        }
        self
    }

    /// `None` when uniqueness was not verified.
    pub fn is_unique(&self) -> Option<bool> {
        self.uniqueness.map(|u| u.is_unique())
    }
}

#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub include_attributes: bool,
    pub verify_uniqueness: bool,
    /// Captured text is cut to this many characters. Zero disables text capture.
    pub max_text_len: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        CaptureOptions::from(&CaptureConfig::default())
    }
}

impl From<&CaptureConfig> for CaptureOptions {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            include_attributes: config.include_attributes,
            verify_uniqueness: config.verify_uniqueness,
            max_text_len: config.max_text_len,
        }
    }
}

pub fn capture(node: NodeRef<'_>, options: &CaptureOptions) -> ElementCapture {
    let selector = synthesize(&node);

    let element = node.document().element(node.node_id());
    let attributes = match (options.include_attributes, element) {
        (true, Some(element)) => element.attributes.iter().cloned().collect(),
        _ => BTreeMap::new(),
    };
    let styles = element
        .and_then(|e| e.attr("style"))
        .map(parse_style_declarations)
        .unwrap_or_default();

    let uniqueness = options
        .verify_uniqueness
        .then(|| Uniqueness::of(node.document(), &selector));

    ElementCapture {
        tag: node.local_name(),
        id: node.id(),
        classes: node.class_list(),
        attributes,
        text: summarize_text(&node.text_content(), options.max_text_len),
        rect: None,
        styles,
        selector,
        uniqueness,
    }
}

/// Parse `prop: value; prop: value` declarations. Later declarations win.
pub fn parse_style_declarations(style: &str) -> BTreeMap<String, String> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(property, value)| (property.trim().to_ascii_lowercase(), value.trim()))
        .filter(|(property, value)| !property.is_empty() && !value.is_empty())
        .map(|(property, value)| (property, value.to_string()))
        .collect()
}

fn summarize_text(raw: &str, max_len: usize) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || max_len == 0 {
        return None;
    }
    Some(collapsed.chars().take(max_len).collect())
}
