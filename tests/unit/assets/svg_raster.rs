use super::*;
use crate::assets::decode::{empty_fontdb, parse_svg};

fn tree(svg: &str) -> usvg::Tree {
    parse_svg(svg.as_bytes(), empty_fontdb()).unwrap()
}

#[test]
fn rasterize_stretches_to_target_size() {
    let t = tree(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
            <rect x="0" y="0" width="5" height="10" fill="#ff0000"/>
        </svg>"##,
    );
    let pm = rasterize_svg(&t, SurfaceSize::new(20, 8).unwrap()).unwrap();
    assert_eq!((pm.width(), pm.height()), (20, 8));

    // Left half is the red rect, right half is transparent.
    let left = pm.pixel(2, 4).unwrap();
    assert_eq!((left.red(), left.green(), left.blue(), left.alpha()), (255, 0, 0, 255));
    let right = pm.pixel(17, 4).unwrap();
    assert_eq!(right.alpha(), 0);
}

#[test]
fn empty_svg_rasterizes_transparent() {
    let t = tree(r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"></svg>"#);
    let pm = rasterize_svg(&t, SurfaceSize::new(4, 4).unwrap()).unwrap();
    assert!(pm.data().iter().all(|&b| b == 0));
}
