use super::*;

fn roundtrip(html: &str) -> String {
    Document::parse(html).to_html()
}

#[test]
fn test_parse_serialize_roundtrip() {
    let html = "<!DOCTYPE html><html><head><title>Doc</title></head>\
                <body><p class=\"lead\" id=\"a\">Hello <b>bold</b> and <i>it<u>al</u></i></p>\
                <!-- comment --><img src=\"x.png\" alt=\"\"><br></body></html>";
    assert_eq!(roundtrip(html), html);
}

#[test]
fn test_text_escaping() {
    let mut doc = Document::new();
    let p = doc.create_element("p");
    let text = doc.create_text("a < b && c > d\u{a0}e \"q\"");
    doc.append_child(p, text).unwrap();
    assert_eq!(doc.serialize(p), "<p>a &lt; b &amp;&amp; c &gt; d&nbsp;e \"q\"</p>");
}

#[test]
fn test_attribute_escaping_roundtrip() {
    let mut doc = Document::new();
    let span = doc.create_element("span");
    if let Some(el) = doc.element_mut(span) {
        el.set_attr("title", "say \"hi\" & <bye>");
    }
    let markup = doc.serialize(span);
    assert_eq!(markup, "<span title=\"say &quot;hi&quot; &amp; <bye>\"></span>");

    let fragment = doc.parse_fragment(&markup);
    let parsed = doc.children(fragment)[0];
    assert_eq!(
        doc.element(parsed).and_then(|e| e.attr("title")),
        Some("say \"hi\" & <bye>")
    );
}

#[test]
fn test_entities_are_decoded() {
    let doc = Document::parse("<p>&lt;tag&gt; &amp; &#65;&#x42; &unknown; & alone</p>");
    assert_eq!(doc.text_content(doc.root()), "<tag> & AB &unknown; & alone");
}

#[test]
fn test_fragment_roundtrip_preserves_structure() {
    let mut doc = Document::parse(
        "<body><div><p>one <a href=\"/x?a=1&amp;b=2\">two</a></p>three<br>four</div></body>",
    );
    let div = doc.descendants(doc.root())[1];
    let markup = doc.serialize_children(div);
    let fragment = doc.parse_fragment(&markup);
    assert_eq!(doc.serialize_children(fragment), markup);
    assert_eq!(doc.parent(fragment), None);
}

#[test]
fn test_unclosed_and_stray_end_tags() {
    assert_eq!(roundtrip("<div><p>open"), "<div><p>open</p></div>");
    assert_eq!(roundtrip("<p>text</span></p>"), "<p>text</p>");
    assert_eq!(roundtrip("<div><p>a</div>b"), "<div><p>a</p></div>b");
}

#[test]
fn test_self_closing_and_void_elements() {
    assert_eq!(roundtrip("<p>a<br/>b<hr />c</p>"), "<p>a<br>b<hr>c</p>");
    assert_eq!(roundtrip("<svg><path d=\"M0\"/></svg>"), "<svg><path d=\"M0\"></path></svg>");
}

#[test]
fn test_raw_text_elements_are_not_parsed() {
    let html = "<script>if (a < b && c) { x = \"</div>\"; }</script><style>p > b {}</style>";
    let doc = Document::parse(html);
    let script = doc.children(doc.root())[0];
    assert_eq!(doc.tag(script), Some("script"));
    assert_eq!(doc.children(script).len(), 1);
    assert_eq!(doc.to_html(), html);
}

#[test]
fn test_tags_and_attributes_are_lowercased() {
    assert_eq!(roundtrip("<DIV CLASS=x>Hi</DIV>"), "<div class=\"x\">Hi</div>");
}

#[test]
fn test_duplicate_attributes_keep_first() {
    assert_eq!(roundtrip("<p id=a id=b>x</p>"), "<p id=\"a\">x</p>");
}

#[test]
fn test_valueless_and_single_quoted_attributes() {
    assert_eq!(
        roundtrip("<input disabled value='it\"s'>"),
        "<input disabled=\"\" value=\"it&quot;s\">"
    );
}

#[test]
fn test_multibyte_text_and_lone_angle_brackets() {
    assert_eq!(roundtrip("<p>ünïcode — 1 < 2</p>"), "<p>ünïcode — 1 &lt; 2</p>");
    assert_eq!(roundtrip("a <3 b"), "a &lt;3 b");
}

#[test]
fn test_adjacent_text_is_merged() {
    let doc = Document::parse("<p>a &lt; b</p>");
    let p = doc.children(doc.root())[0];
    assert_eq!(doc.children(p).len(), 1);
}

#[test]
fn test_decode_entities_passthrough() {
    assert_eq!(decode_entities("no refs"), "no refs");
    assert_eq!(decode_entities("&#0;"), "\u{0}");
    assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
    assert_eq!(decode_entities("&nbsp;"), "\u{a0}");
}
