use tmpl_formatter::format;
use tmpl_parser::Language;

fn fmt(source: &str, language: Language) -> String {
    let out = format(source, language).unwrap();
    out.trim_end().to_string()
}

#[test]
fn test_snapshot_inline_paragraph() {
    insta::assert_snapshot!(
        fmt("<p>Hello   <b>world</b>  and {name}!</p>", Language::Template),
        @"<p>Hello <b>world</b> and {name}!</p>"
    );
}

#[test]
fn test_snapshot_attribute_spacing() {
    insta::assert_snapshot!(
        fmt("<input   type=\"checkbox\"   checked>", Language::Html),
        @r#"<input type="checkbox" checked>"#
    );
}

#[test]
fn test_snapshot_expressions() {
    insta::assert_snapshot!(
        fmt("{if(ready)|v|(<b>{v}</b>)else(<i>wait</i>)}", Language::Template),
        @"{if (ready) |v| (<b>{v}</b>) else (<i>wait</i>)}"
    );
}

#[test]
fn test_snapshot_html_braces_are_text() {
    insta::assert_snapshot!(
        fmt("<p>{if (x) (y)}</p>", Language::Html),
        @"<p>{if (x) (y)}</p>"
    );
}

#[test]
fn test_snapshot_xml_self_closing() {
    insta::assert_snapshot!(
        fmt("<root><item   key=\"a\" /><item/></root>", Language::Xml),
        @r#"<root><item key="a" /><item/></root>"#
    );
}
