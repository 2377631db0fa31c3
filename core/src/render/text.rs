/// Measures rendered text width in logical units.
///
/// Hosts with access to real font metrics should supply their own
/// implementation; label boxes are sized from this value.
pub trait TextMeasure {
    fn measure(&self, text: &str, size: f32, bold: bool) -> f32;
}

/// Width estimate from per-character advance classes of a sans-serif face.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedTextMeasure;

impl TextMeasure for EstimatedTextMeasure {
    fn measure(&self, text: &str, size: f32, bold: bool) -> f32 {
        let ems: f32 = text.chars().map(advance).sum();
        let weight = if bold { 1.05 } else { 1.0 };
        ems * size * weight
    }
}

fn advance(c: char) -> f32 {
    match c {
        ' ' | 'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        'm' | 'w' | 'M' | 'W' => 0.85,
        c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.62,
        c if c.is_ascii() => 0.55,
        c if is_wide(c) => 1.0,
        _ => 0.6,
    }
}

// East Asian wide ranges: Hangul, CJK, fullwidth forms, emoji.
fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1FAFF
    )
}
