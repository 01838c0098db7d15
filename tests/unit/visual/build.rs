use super::*;
use crate::{Config, params::parse};

fn params(token: &str) -> ValidatedParameters {
    parse(token, &Config::default()).unwrap()
}

#[test]
fn labels_follow_parameters() {
    let spec = build(&params("300x200@2x.png"));
    let texts: Vec<&str> = spec
        .root
        .children
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(texts, vec!["300x200", "@2x .png"]);

    let spec = build(&params("64@1.5x"));
    assert_eq!(spec.root.children[1].text, "@1.5x .svg");
}

#[test]
fn palette_swaps_on_dark() {
    let light = build(&params("100"));
    assert_eq!(light.root.background, Rgb8::hex(0xf7f7f7));
    assert_eq!(light.root.color, Rgb8::hex(0x1a1110));

    let dark = build(&params("100/dark"));
    assert_eq!(dark.root.background, Rgb8::hex(0x1a1110));
    assert_eq!(dark.root.color, Rgb8::hex(0xf7f7f7));
}

#[test]
fn content_is_centered_bold() {
    let spec = build(&params("100"));
    assert_eq!(spec.root.align_items, Align::Center);
    assert_eq!(spec.root.justify_content, Align::Center);
    assert_eq!(spec.root.font_weight, 600);
}

#[test]
fn font_size_scales_with_short_side_then_caps() {
    // 100 * 1 * 0.17
    assert!((font_size(&params("100x400")) - 17.0).abs() < 1e-4);
    // 200 * 2 * 0.17 = 68, under 90
    assert!((font_size(&params("200x300@2x")) - 68.0).abs() < 1e-4);
    // 1000 * 0.17 = 170, capped at 45
    assert!((font_size(&params("1000")) - 45.0).abs() < 1e-4);
    // 1000 * 3 * 0.17 = 510, capped at 135
    assert!((font_size(&params("1000@3x")) - 135.0).abs() < 1e-4);
}

#[test]
fn build_is_deterministic() {
    let p = params("321x123@2.5x.webp/dark");
    assert_eq!(build(&p), build(&p));
}
