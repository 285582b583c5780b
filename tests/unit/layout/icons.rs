use super::*;

#[test]
fn zero_icons_is_empty() {
    assert!(distribute_icons(0, 57.0, 800.0, 960.0).is_empty());
}

#[test]
fn single_icon_is_centered() {
    assert_eq!(distribute_icons(1, 57.0, 800.0, 960.0), vec![960.0]);
}

#[test]
fn three_icons_span_reference_width() {
    let xs = distribute_icons(3, 57.0, 800.0, 960.0);
    assert_eq!(xs.len(), 3);
    let edge = 800.0 / 2.0 - 57.0 / 2.0;
    assert!((xs[0] - (960.0 - edge)).abs() < 1e-9);
    assert!((xs[1] - 960.0).abs() < 1e-9);
    assert!((xs[2] - (960.0 + edge)).abs() < 1e-9);
}

#[test]
fn spacing_is_even() {
    let xs = distribute_icons(5, 40.0, 1000.0, 500.0);
    let gaps: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    for g in &gaps {
        assert!((g - 240.0).abs() < 1e-9);
    }
}

#[test]
fn builtin_styles_use_nominal_width() {
    let mut s = TemplateState::default();
    for style in [IconStyle::Arrow, IconStyle::Dot, IconStyle::Star] {
        s.icon_style = style;
        assert_eq!(icon_rendered_width(&s), 57.0);
    }
    // Custom without data draws the arrow.
    s.icon_style = IconStyle::Custom;
    assert_eq!(icon_rendered_width(&s), 57.0);
}

#[test]
fn custom_icon_keeps_aspect_ratio() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#fff"/></svg>"##;
    let mut s = TemplateState {
        icon_style: IconStyle::Custom,
        ..TemplateState::default()
    };
    s.custom_icon.set("wide.svg", svg.as_bytes().to_vec());
    assert!((icon_rendered_width(&s) - 114.0).abs() < 1e-9);
}

#[test]
fn custom_icon_without_dimensions_is_square() {
    let mut s = TemplateState {
        icon_style: IconStyle::Custom,
        ..TemplateState::default()
    };
    s.custom_icon.set("broken.png", b"not an image".to_vec());
    assert_eq!(icon_rendered_width(&s), 57.0);
}
