//! SVG document assembly for one styled image.
//!
//! The container declarations become full-canvas layers (white base, fill, cover-fitted image);
//! the text declarations become attributes of a centred text group. Shadow layers are drawn as
//! offset copies of the text beneath it, the first shadow on top, as CSS stacks them.

use std::fmt::Write as _;

use kurbo::{Affine, Point, Vec2};

use crate::{
    color::{Rgb, Rgba},
    corpus::BackgroundImages,
    effects::{Fill, Shadow, StyleDeclaration, StyleSheet},
    foundation::core::Canvas,
};

/// Estimated glyph advance as a fraction of the font size.
const AVG_ADVANCE_EM: f64 = 0.55;
const LINE_HEIGHT_EM: f64 = 1.2;
/// Horizontal share of the canvas a line may occupy before it wraps.
const MAX_LINE_SHARE: f64 = 0.9;

/// Inputs for one document.
#[derive(Clone, Copy)]
pub struct MarkupInput<'a> {
    pub canvas: Canvas,
    pub font_family: &'a str,
    pub font_size: u32,
    pub text: &'a str,
    pub rtl: bool,
    pub sheet: &'a StyleSheet,
    pub images: &'a dyn BackgroundImages,
}

/// Text attributes after resolving the text declarations.
#[derive(Clone, Debug, Default, PartialEq)]
struct TextStyle {
    color: Option<Rgb>,
    font_style: Option<&'static str>,
    font_weight: Option<u16>,
    shadows: Vec<Shadow>,
    rotate_deg: f64,
    translate_pct: Vec2,
}

impl TextStyle {
    fn resolve(sheet: &StyleSheet) -> Self {
        let mut out = Self::default();
        for decl in sheet.resolved_text() {
            match decl {
                StyleDeclaration::Color(c) => out.color = Some(*c),
                StyleDeclaration::FontStyle(s) => out.font_style = Some(s.as_str()),
                StyleDeclaration::FontWeight(w) => out.font_weight = Some(*w),
                StyleDeclaration::TextShadow(s) => out.shadows = s.clone(),
                StyleDeclaration::Rotate { degrees } => out.rotate_deg = *degrees,
                StyleDeclaration::Translate { x_pct, y_pct } => {
                    out.translate_pct = Vec2::new(*x_pct, *y_pct)
                }
                StyleDeclaration::Background(_)
                | StyleDeclaration::BackgroundImage { .. }
                | StyleDeclaration::BackgroundCover => {}
            }
        }
        out
    }
}

pub fn build_markup(input: &MarkupInput<'_>) -> String {
    let w = input.canvas.width;
    let h = input.canvas.height;
    let mut defs = String::new();
    let mut body = String::new();

    let _ = writeln!(body, r##"<rect width="{w}" height="{h}" fill="#ffffff"/>"##);
    write_container(input, &mut defs, &mut body);

    let style = TextStyle::resolve(input.sheet);
    let lines = wrap_lines(input.text, input.canvas, input.font_size);
    let text_box = estimate_text_box(&lines, input.font_size);
    let center = input.canvas.center();
    let transform = text_transform(center, text_box, style.rotate_deg, style.translate_pct);

    let _ = write!(
        body,
        r#"<g transform="{}" font-family="{}" font-size="{}" text-anchor="middle" dominant-baseline="central""#,
        svg_matrix(transform),
        escape_xml(&format!("'{}', sans-serif", input.font_family)),
        input.font_size,
    );
    if let Some(s) = style.font_style {
        let _ = write!(body, r#" font-style="{s}""#);
    }
    if let Some(wt) = style.font_weight {
        let _ = write!(body, r#" font-weight="{wt}""#);
    }
    if input.rtl {
        let _ = write!(body, r#" direction="rtl""#);
    }
    body.push_str(">\n");

    for (i, shadow) in style.shadows.iter().enumerate().rev() {
        let filter = (shadow.blur > 0.0).then(|| {
            let id = format!("shadow{i}");
            let _ = writeln!(
                defs,
                r#"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{}"/></filter>"#,
                fmt_num(shadow.blur / 2.0)
            );
            id
        });
        write_text(
            &mut body,
            &lines,
            center + shadow.offset,
            input.font_size,
            shadow.color,
            filter.as_deref(),
        );
    }
    let fill = Rgba::opaque(style.color.unwrap_or(Rgb::BLACK));
    write_text(&mut body, &lines, center, input.font_size, fill, None);
    body.push_str("</g>\n");

    let mut doc = String::with_capacity(defs.len() + body.len() + 256);
    let _ = writeln!(
        doc,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    if !defs.is_empty() {
        let _ = write!(doc, "<defs>\n{defs}</defs>\n");
    }
    doc.push_str(&body);
    doc.push_str("</svg>\n");
    doc
}

fn write_container(input: &MarkupInput<'_>, defs: &mut String, body: &mut String) {
    let w = input.canvas.width;
    let h = input.canvas.height;
    for decl in input.sheet.resolved_container() {
        match decl {
            StyleDeclaration::Background(fill) => {
                let paint = write_fill(fill, input.canvas, defs);
                let _ = writeln!(body, r#"<rect width="{w}" height="{h}" fill="{paint}"/>"#);
            }
            StyleDeclaration::BackgroundImage { name } => {
                let href = escape_xml(&input.images.href(name));
                let _ = writeln!(
                    body,
                    r#"<image x="0" y="0" width="{w}" height="{h}" preserveAspectRatio="xMidYMid slice" xlink:href="{href}"/>"#
                );
            }
            // Cover fitting is the image element's `slice` aspect mode.
            _ => {}
        }
    }
}

fn write_fill(fill: &Fill, canvas: Canvas, defs: &mut String) -> String {
    let size = Vec2::new(f64::from(canvas.width), f64::from(canvas.height));
    let center = canvas.center();
    match *fill {
        Fill::Solid(c) => c.to_string(),
        Fill::LinearGradient {
            angle_deg,
            from,
            to,
        } => {
            let (start, end) = css_gradient_line(angle_deg, size, center);
            let _ = writeln!(
                defs,
                r#"<linearGradient id="bg" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}"><stop offset="0" stop-color="{from}"/><stop offset="1" stop-color="{to}"/></linearGradient>"#,
                fmt_num(start.x),
                fmt_num(start.y),
                fmt_num(end.x),
                fmt_num(end.y),
            );
            "url(#bg)".to_owned()
        }
        Fill::RadialGradient { from, to } => {
            let r = (size / 2.0).hypot();
            let _ = writeln!(
                defs,
                r#"<radialGradient id="bg" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}"><stop offset="0" stop-color="{from}"/><stop offset="1" stop-color="{to}"/></radialGradient>"#,
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(r),
            );
            "url(#bg)".to_owned()
        }
    }
}

/// Endpoints of a CSS `linear-gradient(<angle>)` line: 0deg points up, clockwise positive, and
/// the line is long enough for the corners to hit the first and last stop.
pub fn css_gradient_line(angle_deg: f64, size: Vec2, center: Point) -> (Point, Point) {
    let theta = angle_deg.to_radians();
    let dir = Vec2::new(theta.sin(), -theta.cos());
    let len = (size.x * theta.sin()).abs() + (size.y * theta.cos()).abs();
    let half = dir * (len / 2.0);
    (center - half, center + half)
}

/// Rotation about the box centre applied after the percentage translation.
fn text_transform(center: Point, text_box: Vec2, rotate_deg: f64, translate_pct: Vec2) -> Affine {
    let offset = Vec2::new(
        text_box.x * translate_pct.x / 100.0,
        text_box.y * translate_pct.y / 100.0,
    );
    Affine::rotate_about(rotate_deg.to_radians(), center) * Affine::translate(offset)
}

fn estimate_text_box(lines: &[String], font_size: u32) -> Vec2 {
    let size = f64::from(font_size);
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    Vec2::new(
        widest as f64 * AVG_ADVANCE_EM * size,
        lines.len().max(1) as f64 * LINE_HEIGHT_EM * size,
    )
}

/// Greedy word wrap against the estimated advance so long sentences stay on the canvas.
pub fn wrap_lines(text: &str, canvas: Canvas, font_size: u32) -> Vec<String> {
    let advance = AVG_ADVANCE_EM * f64::from(font_size.max(1));
    let max_chars = ((f64::from(canvas.width) * MAX_LINE_SHARE) / advance).floor().max(1.0) as usize;

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if !current.is_empty() && needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn write_text(
    out: &mut String,
    lines: &[String],
    anchor: Point,
    font_size: u32,
    color: Rgba,
    filter: Option<&str>,
) {
    let _ = write!(out, r#"<text fill="{}""#, color.rgb);
    if color.alpha.is_some() {
        let _ = write!(out, r#" fill-opacity="{}""#, fmt_num(color.opacity()));
    }
    if let Some(id) = filter {
        let _ = write!(out, r#" filter="url(#{id})""#);
    }
    out.push('>');

    let line_height = LINE_HEIGHT_EM * f64::from(font_size);
    let first_y = anchor.y - (lines.len().saturating_sub(1) as f64) * line_height / 2.0;
    for (i, line) in lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<tspan x="{}" y="{}">{}</tspan>"#,
            fmt_num(anchor.x),
            fmt_num(first_y + i as f64 * line_height),
            escape_xml(line)
        );
    }
    out.push_str("</text>\n");
}

fn svg_matrix(a: Affine) -> String {
    let c = a.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        fmt_num(c[0]),
        fmt_num(c[1]),
        fmt_num(c[2]),
        fmt_num(c[3]),
        fmt_num(c[4]),
        fmt_num(c[5])
    )
}

/// Short decimal form; `-0` prints as `0`.
fn fmt_num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 { "0".to_owned() } else { r.to_string() }
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/markup.rs"]
mod tests;
