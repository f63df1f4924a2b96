use super::*;
use crate::{
    corpus::backgrounds::{MemoryBackgrounds, NoBackgrounds},
    effects::FontStyle,
};

fn doc(sheet: &StyleSheet, text: &str, images: &dyn BackgroundImages) -> String {
    build_markup(&MarkupInput {
        canvas: Canvas::new(400, 300).unwrap(),
        font_family: "Vazir",
        font_size: 32,
        text,
        rtl: true,
        sheet,
        images,
    })
}

#[test]
fn empty_sheet_is_black_text_on_white() {
    let svg = doc(&StyleSheet::default(), "سلام", &NoBackgrounds);
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"viewBox="0 0 400 300""#));
    assert!(svg.contains(r##"fill="#ffffff""##));
    assert!(svg.contains(r##"<text fill="#000000">"##));
    assert!(svg.contains(r#"direction="rtl""#));
    assert!(svg.contains("سلام"));
    assert!(!svg.contains("<defs>"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn text_is_escaped() {
    let svg = doc(&StyleSheet::default(), r#"a<b & "c">'d'"#, &NoBackgrounds);
    assert!(svg.contains("a&lt;b &amp; &quot;c&quot;&gt;&apos;d&apos;"));
    assert!(!svg.contains("a<b"));
}

#[test]
fn container_layers_follow_declarations() {
    let mut pool = MemoryBackgrounds::new();
    pool.insert("wall.jpg", image::DynamicImage::new_rgb8(2, 2));
    let sheet = StyleSheet::partition([
        StyleDeclaration::Background(Fill::RadialGradient {
            from: Rgb::new(255, 0, 0),
            to: Rgb::new(0, 0, 255),
        }),
        StyleDeclaration::BackgroundImage {
            name: "wall.jpg".into(),
        },
        StyleDeclaration::BackgroundCover,
    ]);
    let svg = doc(&sheet, "x", &pool);
    let gradient = svg.find("<radialGradient").unwrap();
    let fill_rect = svg.find(r#"fill="url(#bg)""#).unwrap();
    let image = svg.find("<image ").unwrap();
    assert!(gradient < fill_rect && fill_rect < image);
    assert!(svg.contains(r#"preserveAspectRatio="xMidYMid slice""#));
    assert!(svg.contains(r#"xlink:href="wall.jpg""#));
    assert!(svg.contains(r#"r="250""#));
}

#[test]
fn text_attributes_use_last_declaration() {
    let sheet = StyleSheet::partition([
        StyleDeclaration::Color(Rgb::new(1, 2, 3)),
        StyleDeclaration::FontStyle(FontStyle::Oblique),
        StyleDeclaration::FontWeight(700),
        StyleDeclaration::Color(Rgb::new(0x12, 0x34, 0x56)),
    ]);
    let svg = doc(&sheet, "x", &NoBackgrounds);
    assert!(svg.contains(r##"<text fill="#123456">"##));
    assert!(!svg.contains("#010203"));
    assert!(svg.contains(r#"font-style="oblique""#));
    assert!(svg.contains(r#"font-weight="700""#));
}

#[test]
fn shadows_are_drawn_below_text_in_reverse_order() {
    let shadow = |x: f64, blur: f64, rgb: Rgb, alpha: Option<u8>| Shadow {
        offset: Vec2::new(x, 0.0),
        blur,
        color: Rgba { rgb, alpha },
    };
    let sheet = StyleSheet::partition([
        StyleDeclaration::Color(Rgb::BLACK),
        StyleDeclaration::TextShadow(vec![
            shadow(1.0, 4.0, Rgb::new(0xaa, 0, 0), Some(0x80)),
            shadow(2.0, 0.0, Rgb::new(0, 0xbb, 0), None),
        ]),
    ]);
    let svg = doc(&sheet, "x", &NoBackgrounds);
    let first = svg.find("#aa0000").unwrap();
    let second = svg.find("#00bb00").unwrap();
    let main = svg.find(r##"<text fill="#000000">"##).unwrap();
    assert!(second < first && first < main);
    assert!(svg.contains(r#"<feGaussianBlur stdDeviation="2"/>"#));
    assert!(svg.contains(r#"filter="url(#shadow0)""#));
    assert!(!svg.contains("url(#shadow1)"));
    assert!(svg.contains(r#"fill-opacity="0.502""#));
    // Offsets move the copy away from the canvas centre.
    assert!(svg.contains(r#"x="201""#) && svg.contains(r#"x="202""#));
}

#[test]
fn identity_transform_without_motion() {
    let svg = doc(&StyleSheet::default(), "x", &NoBackgrounds);
    assert!(svg.contains(r#"transform="matrix(1 0 0 1 0 0)""#));
}

#[test]
fn translate_is_relative_to_text_box() {
    let sheet = StyleSheet::partition([StyleDeclaration::Translate {
        x_pct: 10.0,
        y_pct: -50.0,
    }]);
    // 4 chars * 0.55 * 32 = 70.4 wide, 1.2 * 32 = 38.4 tall.
    let svg = doc(&sheet, "abcd", &NoBackgrounds);
    assert!(svg.contains("matrix(1 0 0 1 7.04 -19.2)"), "{svg}");
}

#[test]
fn rotation_keeps_the_centre_fixed() {
    let t = text_transform(Point::new(200.0, 150.0), Vec2::ZERO, 7.0, Vec2::ZERO);
    let c = t * Point::new(200.0, 150.0);
    assert!((c.x - 200.0).abs() < 1e-9 && (c.y - 150.0).abs() < 1e-9);
}

#[test]
fn gradient_line_matches_css_corners() {
    let size = Vec2::new(400.0, 300.0);
    let center = Point::new(200.0, 150.0);
    let (start, end) = css_gradient_line(90.0, size, center);
    assert!((start.x - 0.0).abs() < 1e-9 && (end.x - 400.0).abs() < 1e-9);
    assert!((start.y - 150.0).abs() < 1e-9);

    let (start, end) = css_gradient_line(0.0, size, center);
    assert!((start.y - 300.0).abs() < 1e-9 && end.y.abs() < 1e-9);
}

#[test]
fn long_sentences_wrap() {
    let canvas = Canvas::new(400, 300).unwrap();
    // 400 * 0.9 / (0.55 * 32) = 20 chars per line.
    let lines = wrap_lines("aaaa bbbb cccc dddd eeee ffff", canvas, 32);
    assert_eq!(lines, ["aaaa bbbb cccc dddd", "eeee ffff"]);
    assert_eq!(wrap_lines("", canvas, 32), [""]);
    assert_eq!(wrap_lines("a-very-long-unbroken-word-here", canvas, 32).len(), 1);
}

#[test]
fn number_formatting() {
    assert_eq!(fmt_num(-0.0001), "0");
    assert_eq!(fmt_num(1.23456), "1.235");
    assert_eq!(fmt_num(200.0), "200");
}
