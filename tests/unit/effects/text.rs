use image::{DynamicImage, Rgba, RgbaImage};

use super::*;
use crate::{
    color::contrast_ratio,
    corpus::backgrounds::{BackgroundImages, MemoryBackgrounds, NoBackgrounds},
    effects::style::Fill,
    foundation::core::Canvas,
};

fn ctx(images: &dyn BackgroundImages) -> EffectContext<'_> {
    EffectContext {
        canvas: Canvas::new(200, 100).unwrap(),
        font_family: "Test",
        images,
        require_background_images: false,
    }
}

#[test]
fn color_background_yields_complementary_text() {
    let mut rng = rand::rng();
    let bg = BackgroundDecision::Color(Fill::Solid(Rgb::new(0x20, 0x40, 0x60)));
    let out = text_color(&TextColorParams::default(), &ctx(&NoBackgrounds), &bg, &mut rng).unwrap();
    let expected = Rgb::new(0xdf, 0xbf, 0x9f);
    assert_eq!(out.text_color, Some(expected));
    assert_eq!(out.declarations, vec![StyleDeclaration::Color(expected)]);
}

#[test]
fn gradient_background_uses_first_stop() {
    let mut rng = rand::rng();
    let bg = BackgroundDecision::Color(Fill::RadialGradient {
        from: Rgb::WHITE,
        to: Rgb::new(1, 2, 3),
    });
    let out = text_color(&TextColorParams::default(), &ctx(&NoBackgrounds), &bg, &mut rng).unwrap();
    assert_eq!(out.text_color, Some(Rgb::BLACK));
}

#[test]
fn missing_background_defaults_to_black_text() {
    let mut rng = rand::rng();
    let out = text_color(
        &TextColorParams::default(),
        &ctx(&NoBackgrounds),
        &BackgroundDecision::None,
        &mut rng,
    )
    .unwrap();
    assert_eq!(out.text_color, Some(Rgb::BLACK));
}

#[test]
fn common_colors_replace_complement_when_forced() {
    let params = TextColorParams {
        common_color_chance: Probability::ALWAYS,
        ..TextColorParams::default()
    };
    let mut rng = rand::rng();
    let bg = BackgroundDecision::Color(Fill::Solid(Rgb::new(7, 7, 7)));
    for _ in 0..100 {
        let out = text_color(&params, &ctx(&NoBackgrounds), &bg, &mut rng).unwrap();
        let c = out.text_color.unwrap();
        assert!(COMMON_TEXT_COLORS.iter().any(|(common, _)| *common == c));
    }
}

#[test]
fn common_color_table_favours_black() {
    let mut rng = rand::rng();
    let trials = 4000;
    let black = (0..trials)
        .filter(|_| weighted_common_color(&mut rng) == Rgb::BLACK)
        .count();
    // Black carries 16 of 63 weight units (~25%).
    assert!(black > trials / 8, "black drawn {black}/{trials}");
}

#[test]
fn image_background_uses_readable_selector() {
    let mut pool = MemoryBackgrounds::new();
    let img = RgbaImage::from_pixel(64, 64, Rgba([245, 245, 240, 255]));
    pool.insert("paper.png", DynamicImage::ImageRgba8(img));

    let mut rng = rand::rng();
    let bg = BackgroundDecision::Image {
        name: "paper.png".into(),
    };
    let out = text_color(&TextColorParams::default(), &ctx(&pool), &bg, &mut rng).unwrap();
    let c = out.text_color.unwrap();
    let bg_lum = Rgb::new(245, 245, 240).luminance();
    assert!(contrast_ratio(c.luminance(), bg_lum) >= 4.5);
}

#[test]
fn unknown_image_is_a_transient_error() {
    let mut rng = rand::rng();
    let bg = BackgroundDecision::Image {
        name: "gone.png".into(),
    };
    let err = text_color(
        &TextColorParams::default(),
        &ctx(&MemoryBackgrounds::new()),
        &bg,
        &mut rng,
    )
    .unwrap_err();
    assert!(!err.is_config());
}

#[test]
fn font_style_and_weight_values() {
    let mut rng = rand::rng();
    for _ in 0..100 {
        let s = font_style(&mut rng);
        assert!(matches!(
            s.declarations[..],
            [StyleDeclaration::FontStyle(FontStyle::Italic | FontStyle::Oblique)]
        ));
        assert!(s.text_color.is_none());

        let w = font_weight(&mut rng);
        let [StyleDeclaration::FontWeight(weight)] = w.declarations[..] else {
            panic!("expected a single font-weight");
        };
        assert!((100..=900).contains(&weight) && weight % 100 == 0);
    }
}
