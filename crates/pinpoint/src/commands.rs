use anyhow::{Context, Result, bail};
use pinpoint_core::config::schema::{OutputConfig, PinpointConfig};
use pinpoint_core::formatter::format_captures;
use pinpoint_core::{CaptureOptions, ElementCapture, Locator, Rect, capture};
use pinpoint_dom::HtmlSnapshot;
use tracing::{debug, info, warn};

pub struct CaptureArgs<'a> {
    pub query: &'a str,
    pub all: bool,
    pub rect: Option<Rect>,
    /// Host-reported computed styles, merged over inline ones
    pub styles: &'a [(String, String)],
}

pub enum LocateQuery<'a> {
    XPath(&'a str),
    Css(&'a str),
}

/// Pick elements with a full CSS query and capture them.
pub fn run_capture(
    snapshot: &HtmlSnapshot,
    config: &PinpointConfig,
    output: &OutputConfig,
    args: CaptureArgs<'_>,
) -> Result<String> {
    let mut matches = snapshot
        .select(args.query)
        .with_context(|| format!("Failed to select '{}'", args.query))?;
    if matches.is_empty() {
        bail!("No element matched '{}'", args.query);
    }
    debug!("'{}' matched {} element(s)", args.query, matches.len());
    if !args.all {
        matches.truncate(1);
    }

    let options = CaptureOptions::from(&config.capture);
    let doc = snapshot.document();
    let captures: Vec<ElementCapture> = matches
        .into_iter()
        .map(|id| {
            let captured = capture(doc.node(id), &options)
                .with_styles(args.styles.iter().map(|(k, v)| (k, v)));
            match args.rect {
                Some(rect) => captured.with_rect(rect),
                None => captured,
            }
        })
        .collect();

    for captured in &captures {
        if captured.is_unique() == Some(false) {
            warn!(
                "Selector for <{}> is ambiguous: {}",
                captured.tag, captured.selector.css_selector
            );
        }
    }

    Ok(format_captures(&captures, output)?)
}

/// Resolve a synthesized selector and capture whatever it matches.
pub fn run_locate(
    snapshot: &HtmlSnapshot,
    config: &PinpointConfig,
    output: &OutputConfig,
    query: LocateQuery<'_>,
) -> Result<String> {
    let doc = snapshot.document();
    let (matches, shown) = match query {
        LocateQuery::XPath(xpath) => (doc.locate_xpath(xpath), xpath),
        LocateQuery::Css(css) => (doc.locate_css(css), css),
    };
    let matches = matches.with_context(|| format!("Failed to locate '{}'", shown))?;

    match matches.len() {
        0 => bail!("No element matched '{}'", shown),
        1 => info!("'{}' resolved to a single element", shown),
        n => warn!("'{}' resolved to {} elements", shown, n),
    }

    let options = CaptureOptions::from(&config.capture);
    let captures: Vec<ElementCapture> = matches
        .into_iter()
        .map(|id| capture(doc.node(id), &options))
        .collect();

    Ok(format_captures(&captures, output)?)
}
