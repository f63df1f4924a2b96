use std::fmt;

use kurbo::Vec2;

use crate::color::{Rgb, Rgba};

/// Background surface fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    /// CSS convention: 0deg points up, angles grow clockwise.
    LinearGradient { angle_deg: f64, from: Rgb, to: Rgb },
    /// Circle centred on the surface, reaching the farthest corner.
    RadialGradient { from: Rgb, to: Rgb },
}

impl Fill {
    /// The colour the fill starts from; what text colour is derived against.
    pub fn base(&self) -> Rgb {
        match *self {
            Self::Solid(c) => c,
            Self::LinearGradient { from, .. } | Self::RadialGradient { from, .. } => from,
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(c) => write!(f, "{c}"),
            Self::LinearGradient {
                angle_deg,
                from,
                to,
            } => write!(f, "linear-gradient({angle_deg}deg, {from}, {to})"),
            Self::RadialGradient { from, to } => write!(f, "radial-gradient(circle, {from}, {to})"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }
}

/// One text-shadow layer. A zero blur is omitted from the CSS form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub offset: Vec2,
    pub blur: f64,
    pub color: Rgba,
}

impl fmt::Display for Shadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.blur > 0.0 {
            write!(
                f,
                "{}px {}px {}px {}",
                self.offset.x, self.offset.y, self.blur, self.color
            )
        } else {
            write!(f, "{}px {}px {}", self.offset.x, self.offset.y, self.color)
        }
    }
}

/// A single style property produced by an effect.
///
/// Properties whose name starts with `background` style the outer container; everything else
/// styles the text node.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleDeclaration {
    Background(Fill),
    BackgroundImage { name: String },
    BackgroundCover,
    Color(Rgb),
    FontStyle(FontStyle),
    FontWeight(u16),
    TextShadow(Vec<Shadow>),
    Rotate { degrees: f64 },
    Translate { x_pct: f64, y_pct: f64 },
}

impl StyleDeclaration {
    pub fn property(&self) -> &'static str {
        match self {
            Self::Background(_) => "background",
            Self::BackgroundImage { .. } => "background-image",
            Self::BackgroundCover => "background-size",
            Self::Color(_) => "color",
            Self::FontStyle(_) => "font-style",
            Self::FontWeight(_) => "font-weight",
            Self::TextShadow(_) => "text-shadow",
            Self::Rotate { .. } => "rotate",
            Self::Translate { .. } => "transform",
        }
    }

    /// CSS value text.
    pub fn value(&self) -> String {
        match self {
            Self::Background(fill) => fill.to_string(),
            Self::BackgroundImage { name } => format!("url('{name}')"),
            Self::BackgroundCover => "cover".to_owned(),
            Self::Color(c) => c.to_string(),
            Self::FontStyle(s) => s.as_str().to_owned(),
            Self::FontWeight(w) => w.to_string(),
            Self::TextShadow(shadows) => shadows
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            Self::Rotate { degrees } => format!("{degrees}deg"),
            Self::Translate { x_pct, y_pct } => format!("translate({x_pct}%, {y_pct}%)"),
        }
    }

    pub fn targets_container(&self) -> bool {
        self.property().starts_with("background")
    }
}

impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.property(), self.value())
    }
}

/// Declarations split by target element, in emission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSheet {
    pub container: Vec<StyleDeclaration>,
    pub text: Vec<StyleDeclaration>,
}

impl StyleSheet {
    pub fn partition(declarations: impl IntoIterator<Item = StyleDeclaration>) -> Self {
        let (container, text) = declarations
            .into_iter()
            .partition(StyleDeclaration::targets_container);
        Self { container, text }
    }

    /// Effective container declarations: the last one wins per property.
    pub fn resolved_container(&self) -> Vec<&StyleDeclaration> {
        resolve(&self.container)
    }

    /// Effective text declarations: the last one wins per property.
    pub fn resolved_text(&self) -> Vec<&StyleDeclaration> {
        resolve(&self.text)
    }

    pub fn container_css(&self) -> String {
        to_css(&self.resolved_container())
    }

    pub fn text_css(&self) -> String {
        to_css(&self.resolved_text())
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty() && self.text.is_empty()
    }
}

fn resolve(decls: &[StyleDeclaration]) -> Vec<&StyleDeclaration> {
    decls
        .iter()
        .enumerate()
        .filter(|(i, d)| {
            !decls[i + 1..]
                .iter()
                .any(|later| later.property() == d.property())
        })
        .map(|(_, d)| d)
        .collect()
}

fn to_css(decls: &[&StyleDeclaration]) -> String {
    decls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
