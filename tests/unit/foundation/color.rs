use super::*;

#[test]
fn hex_parse_accepts_long_and_short_forms() {
    assert_eq!(Rgb8::from_hex("#FF0000").unwrap(), Rgb8::new(255, 0, 0));
    assert_eq!(Rgb8::from_hex("4ca765").unwrap(), Rgb8::new(0x4c, 0xa7, 0x65));
    assert_eq!(Rgb8::from_hex("#fff").unwrap(), Rgb8::WHITE);
    assert!(Rgb8::from_hex("#12345").is_err());
    assert!(Rgb8::from_hex("#GG0000").is_err());
}

#[test]
fn hex_format_is_uppercase() {
    assert_eq!(Rgb8::new(234, 88, 81).to_hex(), "#EA5851");
}

#[test]
fn serde_uses_hex_strings() {
    let c: Rgb8 = serde_json::from_str("\"#3C87D8\"").unwrap();
    assert_eq!(c, Rgb8::new(0x3c, 0x87, 0xd8));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#3C87D8\"");
    let c: Rgb8 = serde_json::from_str("[1, 2, 3]").unwrap();
    assert_eq!(c, Rgb8::new(1, 2, 3));
}

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(Rgb8::new(255, 0, 0).premul_with_alpha(128), [128, 0, 0, 128]);
    assert_eq!(Rgb8::WHITE.premul_with_alpha(0), [0, 0, 0, 0]);
}
