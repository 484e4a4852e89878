use crate::capture::ElementCapture;
use crate::config::schema::{OutputConfig, OutputFormat};

/// Render one capture as a compact text block.
pub fn format_capture(capture: &ElementCapture) -> String {
    // e.g. [button#save.btn.primary] "Save" @ (10,20) 80x24
    let mut header = capture.tag.clone();
    if let Some(id) = &capture.id {
        header.push('#');
        header.push_str(id);
    }
    for class in &capture.classes {
        header.push('.');
        header.push_str(class);
    }

    let mut output = format!("[{}]", header);
    if let Some(text) = &capture.text {
        output.push_str(&format!(" {:?}", text));
    }
    if let Some(rect) = &capture.rect {
        output.push_str(&format!(" @ {}", rect));
    }
    output.push('\n');

    let xpath = capture.selector.xpath.as_deref().unwrap_or("-");
    output.push_str(&format!("  xpath: {}\n", xpath));
    output.push_str(&format!("  css:   {}\n", capture.selector.css_selector));

    if !capture.styles.is_empty() {
        let declarations: Vec<String> = capture
            .styles
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect();
        output.push_str(&format!("  styles: {}\n", declarations.join("; ")));
    }

    if let Some(uniqueness) = &capture.uniqueness {
        output.push_str(&format!(
            "  matches: xpath={} css={}{}\n",
            uniqueness.xpath_matches,
            uniqueness.css_matches,
            if uniqueness.is_unique() { "" } else { " (ambiguous)" }
        ));
    }

    output
}

/// Render a batch of captures in the configured format.
pub fn format_captures(
    captures: &[ElementCapture],
    config: &OutputConfig,
) -> Result<String, serde_json::Error> {
    match config.format {
        // A single capture is printed as an object, anything else as an array.
        OutputFormat::Json => match captures {
            [single] if config.pretty => serde_json::to_string_pretty(single),
            [single] => serde_json::to_string(single),
            _ if config.pretty => serde_json::to_string_pretty(captures),
            _ => serde_json::to_string(captures),
        },
        OutputFormat::Text => Ok(captures
            .iter()
            .map(format_capture)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectorResult;
    use crate::capture::Rect;
    use crate::locate::Uniqueness;
    use std::collections::BTreeMap;

    fn sample() -> ElementCapture {
        ElementCapture {
            tag: "button".to_string(),
            id: None,
            classes: vec!["btn".to_string(), "primary".to_string()],
            attributes: BTreeMap::new(),
            text: Some("Save".to_string()),
            rect: Some(Rect {
                x: 10.0,
                y: 20.0,
                width: 80.0,
                height: 24.0,
            }),
            styles: BTreeMap::new(),
            selector: SelectorResult {
                xpath: Some("/html/body/div/button[1]".to_string()),
                css_selector: "#toolbar > button.btn.primary".to_string(),
            },
            uniqueness: Some(Uniqueness {
                xpath_matches: 1,
                css_matches: 1,
            }),
        }
    }

    #[test]
    fn test_format_capture_text() {
        let text = format_capture(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[button.btn.primary] \"Save\" @ (10,20) 80x24");
        assert_eq!(lines[1], "  xpath: /html/body/div/button[1]");
        assert_eq!(lines[2], "  css:   #toolbar > button.btn.primary");
        assert_eq!(lines[3], "  matches: xpath=1 css=1");
    }

    #[test]
    fn test_format_capture_flags_ambiguous() {
        let mut capture = sample();
        capture.uniqueness = Some(Uniqueness {
            xpath_matches: 1,
            css_matches: 3,
        });
        assert!(format_capture(&capture).contains("css=3 (ambiguous)"));

        capture.uniqueness = None;
        assert!(!format_capture(&capture).contains("matches"));
    }

    #[test]
    fn test_format_capture_lists_styles() {
        assert!(!format_capture(&sample()).contains("styles"));

        let capture = sample().with_styles([("display", "flex"), ("color", "red")]);
        let text = format_capture(&capture);
        assert_eq!(text.lines().nth(3), Some("  styles: color: red; display: flex"));
    }

    #[test]
    fn test_format_captures_json_shape() {
        let config = OutputConfig {
            format: OutputFormat::Json,
            pretty: false,
        };

        let single = format_captures(&[sample()], &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&single).unwrap();
        assert_eq!(value["cssSelector"], "#toolbar > button.btn.primary");
        assert_eq!(value["uniqueness"]["cssMatches"], 1);

        let many = format_captures(&[sample(), sample()], &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&many).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(2));
    }
}
