use image::DynamicImage;

use super::*;
use crate::{
    corpus::backgrounds::{MemoryBackgrounds, NoBackgrounds},
    effects::{
        BackgroundColorParams, Fill, RotationParams, StrokeParams, TextColorParams,
        TextShadowParams, TransformParams, default_effects,
    },
    foundation::core::{Canvas, Probability},
};

fn ctx<'a>(images: &'a dyn BackgroundImages, required: bool) -> EffectContext<'a> {
    EffectContext {
        canvas: Canvas::new(640, 480).unwrap(),
        font_family: "Vazir",
        images,
        require_background_images: required,
    }
}

fn one_image_pool() -> MemoryBackgrounds {
    let mut pool = MemoryBackgrounds::new();
    pool.insert("wall.png", DynamicImage::new_rgb8(8, 8));
    pool
}

fn every_effect() -> Vec<Effect> {
    vec![
        Effect::BackgroundColor(BackgroundColorParams::default()),
        Effect::BackgroundImage,
        Effect::TextColor(TextColorParams::default()),
        Effect::FontStyle,
        Effect::FontWeight,
        Effect::Stroke(StrokeParams::default()),
        Effect::TextShadow(TextShadowParams::default()),
        Effect::Rotation(RotationParams::default()),
        Effect::Transform(TransformParams::default()),
    ]
}

/// Background pool whose bitmaps never decode.
struct CorruptBackgrounds(Vec<String>);

impl BackgroundImages for CorruptBackgrounds {
    fn names(&self) -> &[String] {
        &self.0
    }

    fn bitmap(&self, name: &str) -> TextgenResult<DynamicImage> {
        Err(TextgenError::effect(format!("cannot decode '{name}'")))
    }

    fn href(&self, name: &str) -> String {
        name.to_owned()
    }
}

#[test]
fn zero_probability_never_contributes() {
    let pool = one_image_pool();
    let mut rng = rand::rng();
    for effect in every_effect() {
        let name = effect.name();
        let pipeline = EffectPipeline::new([EffectSpec::new(Probability::NEVER, effect)]).unwrap();
        for _ in 0..1000 {
            let out = pipeline.synthesize(&ctx(&pool, false), &mut rng).unwrap();
            assert!(out.sheet.is_empty(), "{name} contributed at probability 0");
            assert_eq!(out.background, BackgroundDecision::None);
            assert_eq!(out.text_color, None);
        }
    }
}

#[test]
fn certain_probability_always_contributes() {
    let pool = one_image_pool();
    let mut rng = rand::rng();
    for effect in every_effect() {
        let name = effect.name();
        let pipeline =
            EffectPipeline::new([EffectSpec::new(Probability::ALWAYS, effect)]).unwrap();
        for _ in 0..1000 {
            let out = pipeline.synthesize(&ctx(&pool, false), &mut rng).unwrap();
            assert!(!out.sheet.is_empty(), "{name} did not contribute at probability 1");
        }
    }
}

#[test]
fn declarations_are_routed_by_background_prefix() {
    let pool = one_image_pool();
    let specs = every_effect()
        .into_iter()
        .map(|e| EffectSpec::new(Probability::ALWAYS, e));
    let pipeline = EffectPipeline::new(specs).unwrap();
    let mut rng = rand::rng();
    for _ in 0..100 {
        let out = pipeline.synthesize(&ctx(&pool, false), &mut rng).unwrap();
        assert!(!out.sheet.container.is_empty());
        assert!(!out.sheet.text.is_empty());
        assert!(out.sheet.container.iter().all(|d| d.property().starts_with("background")));
        assert!(out.sheet.text.iter().all(|d| !d.property().starts_with("background")));
    }
}

#[test]
fn constructor_orders_stages_regardless_of_input_order() {
    let specs = every_effect()
        .into_iter()
        .rev()
        .map(|e| EffectSpec::new(Probability::ALWAYS, e));
    let pipeline = EffectPipeline::new(specs).unwrap();
    assert_eq!(pipeline.len(), 9);
    let bg: Vec<_> = pipeline
        .stage(EffectGroup::Background)
        .iter()
        .map(|s| s.effect.name())
        .collect();
    assert_eq!(bg, ["background_image", "background_color"]);
    assert_eq!(pipeline.stage(EffectGroup::Text).len(), 3);
    assert_eq!(pipeline.stage(EffectGroup::PostText).len(), 4);
}

#[test]
fn image_overrides_color_decision_and_drives_text_color() {
    let mut pool = MemoryBackgrounds::new();
    pool.insert(
        "night.png",
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(16, 16, image::Rgb([12, 12, 20]))),
    );
    let pipeline = EffectPipeline::new([
        EffectSpec::new(
            Probability::ALWAYS,
            Effect::BackgroundColor(BackgroundColorParams::default()),
        ),
        EffectSpec::new(Probability::ALWAYS, Effect::BackgroundImage),
        EffectSpec::new(
            Probability::ALWAYS,
            Effect::TextColor(TextColorParams::default()),
        ),
    ])
    .unwrap();

    let mut rng = rand::rng();
    let out = pipeline.synthesize(&ctx(&pool, true), &mut rng).unwrap();
    assert_eq!(
        out.background,
        BackgroundDecision::Image {
            name: "night.png".into()
        }
    );
    let bg_lum = Rgb::new(12, 12, 20).luminance();
    let text_lum = out.text_color.unwrap().luminance();
    assert!(crate::color::contrast_ratio(text_lum, bg_lum) >= 4.5);
}

#[test]
fn stroke_follows_the_text_color() {
    let pipeline = EffectPipeline::new([
        EffectSpec::new(
            Probability::ALWAYS,
            Effect::BackgroundColor(BackgroundColorParams {
                solid_bias: Probability::ALWAYS,
                ..BackgroundColorParams::default()
            }),
        ),
        EffectSpec::new(
            Probability::ALWAYS,
            Effect::TextColor(TextColorParams::default()),
        ),
        EffectSpec::new(Probability::ALWAYS, Effect::Stroke(StrokeParams::default())),
    ])
    .unwrap();
    let mut rng = rand::rng();
    for _ in 0..50 {
        let out = pipeline.synthesize(&ctx(&NoBackgrounds, false), &mut rng).unwrap();
        let BackgroundDecision::Color(Fill::Solid(bg)) = out.background else {
            panic!("expected a solid background");
        };
        let text = out.text_color.unwrap();
        assert_eq!(text, bg.complementary());
        let Some(StyleDeclaration::TextShadow(shadows)) = out.sheet.text.last() else {
            panic!("expected the stroke last");
        };
        let stroke = shadows[0].color.rgb;
        let dr = i32::from(stroke.r) - i32::from(text.r);
        let dg = i32::from(stroke.g) - i32::from(text.g);
        let db = i32::from(stroke.b) - i32::from(text.b);
        // Uniform shift, unless a channel hit the clamp.
        let clamped = |c: u8| c == 0 || c == 255;
        if !clamped(stroke.r) && !clamped(stroke.g) && !clamped(stroke.b) {
            assert!(dr == dg && dg == db);
        }
    }
}

#[test]
fn transient_effect_failure_is_isolated() {
    let pool = CorruptBackgrounds(vec!["broken.jpg".into()]);
    let pipeline = EffectPipeline::new([
        EffectSpec::new(Probability::ALWAYS, Effect::BackgroundImage),
        EffectSpec::new(
            Probability::ALWAYS,
            Effect::TextColor(TextColorParams::default()),
        ),
        EffectSpec::new(Probability::ALWAYS, Effect::Rotation(RotationParams::default())),
    ])
    .unwrap();

    let mut rng = rand::rng();
    let out = pipeline.synthesize(&ctx(&pool, true), &mut rng).unwrap();
    assert_eq!(out.text_color, None);
    assert_eq!(out.sheet.container.len(), 2);
    assert!(matches!(out.sheet.text[..], [StyleDeclaration::Rotate { .. }]));
}

#[test]
fn configuration_errors_propagate() {
    let pipeline = EffectPipeline::new([
        EffectSpec::new(Probability::ALWAYS, Effect::BackgroundImage),
        EffectSpec::new(Probability::ALWAYS, Effect::FontWeight),
    ])
    .unwrap();
    let mut rng = rand::rng();
    let err = pipeline
        .synthesize(&ctx(&NoBackgrounds, true), &mut rng)
        .unwrap_err();
    assert!(err.is_config());

    // Without the flag the image effect just declines.
    let out = pipeline
        .synthesize(&ctx(&NoBackgrounds, false), &mut rng)
        .unwrap();
    assert_eq!(out.background, BackgroundDecision::None);
    assert_eq!(out.sheet.text.len(), 1);
}

#[test]
fn resource_check_fails_fast() {
    let pipeline = EffectPipeline::new(default_effects()).unwrap();
    assert!(pipeline.check_resources(&NoBackgrounds, true).unwrap_err().is_config());
    pipeline.check_resources(&NoBackgrounds, false).unwrap();
    pipeline.check_resources(&one_image_pool(), true).unwrap();

    let without_images = EffectPipeline::new(
        default_effects()
            .into_iter()
            .filter(|s| s.effect != Effect::BackgroundImage),
    )
    .unwrap();
    without_images.check_resources(&NoBackgrounds, true).unwrap();
}

#[test]
fn invalid_tunables_are_rejected_up_front() {
    let bad = EffectSpec::new(
        Probability::ALWAYS,
        Effect::Rotation(RotationParams {
            angle: crate::foundation::core::FloatRange::new(5.0, -5.0),
        }),
    );
    assert!(EffectPipeline::new([bad]).is_err());

    let json = r#"[{"kind": "rotation", "probability": 1.0, "angle": {"min": -1e308, "max": 1e308}}]"#;
    let too_wide: Vec<EffectSpec> = serde_json::from_str(json).unwrap();
    let err = EffectPipeline::new(too_wide).unwrap_err();
    assert!(err.to_string().contains("too wide"), "{err}");
}
