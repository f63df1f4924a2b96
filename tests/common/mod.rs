use std::path::PathBuf;

/// A TrueType font for tests that need real glyphs: `OCR_TEXTGEN_TEST_FONT` if set, else a common
/// system location. Tests skip themselves when none exists.
#[allow(dead_code)]
pub fn test_font_path() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("OCR_TEXTGEN_TEST_FONT") {
        let p = PathBuf::from(p);
        return p.is_file().then_some(p);
    }
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

#[allow(dead_code)]
pub fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ocr-textgen"))
}
