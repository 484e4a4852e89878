use pinpoint_dom::{DomError, DomNode, HtmlSnapshot, NodeKind};

const PAGE: &str = r#"
<!DOCTYPE html>
<html>
  <head><title>Shop</title></head>
  <body>
    <div id="toolbar">
      <button class="btn primary">Save</button>
      <button class="btn">Cancel</button>
    </div>
    <!-- product list -->
    <ul>
      <li>One</li>
      <li>Two</li>
      <li>Three</li>
    </ul>
  </body>
</html>
"#;

#[test]
fn test_parse_builds_element_tree() {
    let snapshot = HtmlSnapshot::parse(PAGE);
    let doc = snapshot.document();

    let html = doc.child_elements(doc.root()).next().expect("html element");
    assert_eq!(doc.element(html).unwrap().tag, "html");

    let body = doc.body().expect("body element");
    let tags: Vec<String> = doc
        .child_elements(body)
        .map(|id| doc.element(id).unwrap().tag.clone())
        .collect();
    assert_eq!(tags, vec!["div", "ul"]);
}

#[test]
fn test_parse_preserves_attributes_and_text() {
    let snapshot = HtmlSnapshot::parse(PAGE);
    let doc = snapshot.document();

    let toolbar = doc.get_element_by_id("toolbar").expect("toolbar");
    let save = doc.child_elements(toolbar).next().unwrap();
    let node = doc.node(save);
    assert_eq!(node.class_list(), vec!["btn", "primary"]);
    assert_eq!(node.text_content(), "Save");
}

#[test]
fn test_parse_keeps_comments() {
    let snapshot = HtmlSnapshot::parse(PAGE);
    let doc = snapshot.document();
    let body = doc.body().unwrap();

    let has_comment = doc
        .children(body)
        .any(|id| matches!(doc.kind(id), NodeKind::Comment(c) if c.contains("product list")));
    assert!(has_comment);
}

#[test]
fn test_select_maps_matches_in_document_order() {
    let snapshot = HtmlSnapshot::parse(PAGE);
    let doc = snapshot.document();

    let items = snapshot.select("ul > li").unwrap();
    assert_eq!(items.len(), 3);
    let texts: Vec<String> = items.iter().map(|&id| doc.text_content(id)).collect();
    assert_eq!(texts, vec!["One", "Two", "Three"]);

    let second = snapshot.select_first("li:nth-child(2)").unwrap();
    assert_eq!(second, items[1]);
}

#[test]
fn test_select_errors() {
    let snapshot = HtmlSnapshot::parse(PAGE);

    assert!(matches!(
        snapshot.select("div[[["),
        Err(DomError::InvalidSelector(_))
    ));
    assert!(matches!(
        snapshot.select_first("table"),
        Err(DomError::NoMatch(_))
    ));
}

// ============================================================================
// Large inputs
// ============================================================================

#[test]
fn test_parse_deeply_nested_page() {
    let depth = 50_000;
    let mut source = String::from("<html><body>");
    source.push_str(&"<div>".repeat(depth));
    source.push_str("deep");
    source.push_str(&"</div>".repeat(depth));
    source.push_str("</body></html>");

    let snapshot = HtmlSnapshot::parse(&source);
    let doc = snapshot.document();

    let divs = snapshot.select("div").unwrap();
    assert_eq!(divs.len(), depth);
    let innermost = *divs.last().unwrap();
    assert_eq!(doc.text_content(innermost), "deep");
    assert_eq!(doc.parent(innermost), Some(divs[depth - 2]));
}

#[test]
fn test_select_universal_returns_every_element_in_order() {
    let snapshot = HtmlSnapshot::parse(PAGE);
    let doc = snapshot.document();

    let all = snapshot.select("*").unwrap();
    assert_eq!(all, doc.elements());

    let tags: Vec<String> = all
        .iter()
        .map(|&id| doc.element(id).unwrap().tag.clone())
        .collect();
    assert_eq!(
        tags,
        vec!["html", "head", "title", "body", "div", "button", "button", "ul", "li", "li", "li"]
    );
}
