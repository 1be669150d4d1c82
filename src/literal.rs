//! Literal-shape sniffing for values captured from source.
//!
//! Values stay strings through parsing; this is the only place that looks
//! at what they contain. Nothing is evaluated: `counter + 1` is text.

use crate::config::ConverterConfig;

/// Palette block used for `#RRGGBB` values that match no named colour.
pub const HEX_COLOR_BLOCK: &str = "color_black";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `argb` is in `&HAARRGGBB` form.
    Color { block: String, argb: String },
    Number(String),
    Boolean(bool),
    Text(String),
}

/// Classifies `value`, trying in order: named colour, all-digit number,
/// `true`/`false` (any case), `#RRGGBB`, text.
pub fn classify(value: &str, config: &ConverterConfig) -> Literal {
    if let Some(color) = config.color(value) {
        return Literal::Color {
            block: color.block.clone(),
            argb: color.argb.clone(),
        };
    }
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return Literal::Number(value.to_string());
    }
    if value.eq_ignore_ascii_case("true") {
        return Literal::Boolean(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Literal::Boolean(false);
    }
    if let Some(argb) = hex_to_argb(value) {
        return Literal::Color {
            block: HEX_COLOR_BLOCK.to_string(),
            argb,
        };
    }
    Literal::Text(value.to_string())
}

/// `#1a2b3c` → `&HFF1A2B3C`
pub fn hex_to_argb(value: &str) -> Option<String> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("&HFF{}", digits.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sniff(value: &str) -> Literal {
        classify(value, &ConverterConfig::default())
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(
            sniff("Green"),
            Literal::Color {
                block: "color_green".into(),
                argb: "&HFF00FF00".into()
            }
        );
        assert_eq!(sniff("5"), Literal::Number("5".into()));
        assert_eq!(sniff("true"), Literal::Boolean(true));
        assert_eq!(sniff("FALSE"), Literal::Boolean(false));
        assert_eq!(
            sniff("#ff8800"),
            Literal::Color {
                block: HEX_COLOR_BLOCK.into(),
                argb: "&HFFFF8800".into()
            }
        );
        assert_eq!(sniff("counter + 1"), Literal::Text("counter + 1".into()));
    }

    #[test]
    fn test_near_misses_are_text() {
        assert_eq!(sniff("-5"), Literal::Text("-5".into()));
        assert_eq!(sniff("3.5"), Literal::Text("3.5".into()));
        assert_eq!(sniff("#12345"), Literal::Text("#12345".into()));
        assert_eq!(sniff("#GGGGGG"), Literal::Text("#GGGGGG".into()));
        assert_eq!(sniff("green"), Literal::Text("green".into()));
        assert_eq!(sniff(""), Literal::Text(String::new()));
    }
}
