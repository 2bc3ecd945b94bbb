use super::*;
use crate::assets::decode::empty_fontdb;
use crate::foundation::color::Rgb8;
use crate::foundation::core::Point;

fn item(content: &str) -> TextItem {
    TextItem {
        id: 0,
        content: content.to_string(),
        position: Point::new(10.0, 20.0),
        color: Rgb8::new(0x33, 0x33, 0x33),
        font_size: 16.0,
        pending: false,
    }
}

#[test]
fn svg_document_escapes_content() {
    let r = TextRasterizer::new(empty_fontdb(), "Avenir");
    let svg = r.svg_document(&[item("a < b & \"c\"")], DocumentSize::default(), 80, 60);
    assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    assert!(svg.contains(r#"x="10" y="36""#));
    assert!(svg.contains("fill=\"#333333\""));
    assert!(svg.contains(r#"viewBox="0 0 800 600""#));
}

#[test]
fn svg_document_parses() {
    let r = TextRasterizer::new(empty_fontdb(), "sans-serif");
    let svg = r.svg_document(&[item("hello"), item("<tag/>")], DocumentSize::default(), 80, 60);
    assert!(parse_svg_str(&svg, empty_fontdb()).is_ok());
}

#[test]
fn draw_without_items_leaves_target_untouched() {
    let r = TextRasterizer::new(empty_fontdb(), "sans-serif");
    let mut pm = Pixmap::new(8, 8).unwrap();
    r.draw(&mut pm, &[], DocumentSize::default()).unwrap();
    assert!(pm.data().iter().all(|&b| b == 0));
}

#[test]
fn draw_without_fonts_is_not_an_error() {
    let r = TextRasterizer::new(empty_fontdb(), "sans-serif");
    let mut pm = Pixmap::new(8, 8).unwrap();
    r.draw(&mut pm, &[item("x")], DocumentSize::default()).unwrap();
}
