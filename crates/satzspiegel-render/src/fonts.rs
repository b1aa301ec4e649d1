// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resolution — maps extracted font names onto the fourteen PDF
// builtin fonts. Replay never embeds template fonts; an unknown name
// degrades to Helvetica rather than failing.

use printpdf::BuiltinFont;
use tracing::trace;

/// Resolve an extracted font name to the closest builtin font.
///
/// Matching is case-insensitive on family keywords, with bold/italic
/// modifiers honored where the builtin set has them. Anything unrecognized
/// resolves to plain Helvetica — the named fallback, never an error.
pub fn resolve_builtin(name: &str) -> BuiltinFont {
    let lower = name.to_ascii_lowercase();
    let bold = lower.contains("bold");
    let italic = lower.contains("italic") || lower.contains("oblique");

    let font = if lower.contains("times") || (lower.contains("serif") && !lower.contains("sans")) {
        match (bold, italic) {
            (true, true) => BuiltinFont::TimesBoldItalic,
            (true, false) => BuiltinFont::TimesBold,
            (false, true) => BuiltinFont::TimesItalic,
            (false, false) => BuiltinFont::TimesRoman,
        }
    } else if lower.contains("courier") || lower.contains("mono") {
        match (bold, italic) {
            (true, true) => BuiltinFont::CourierBoldOblique,
            (true, false) => BuiltinFont::CourierBold,
            (false, true) => BuiltinFont::CourierOblique,
            (false, false) => BuiltinFont::Courier,
        }
    } else if lower.contains("zapf") || lower.contains("dingbat") {
        BuiltinFont::ZapfDingbats
    } else if lower.contains("symbol") {
        BuiltinFont::Symbol
    } else {
        match (bold, italic) {
            (true, true) => BuiltinFont::HelveticaBoldOblique,
            (true, false) => BuiltinFont::HelveticaBold,
            (false, true) => BuiltinFont::HelveticaOblique,
            (false, false) => BuiltinFont::Helvetica,
        }
    };

    trace!(name, ?font, "Font resolved");
    font
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_keywords_resolve() {
        assert_eq!(resolve_builtin("Times-Roman"), BuiltinFont::TimesRoman);
        assert_eq!(resolve_builtin("TimesNewRomanPSMT"), BuiltinFont::TimesRoman);
        assert_eq!(resolve_builtin("Courier New"), BuiltinFont::Courier);
        assert_eq!(resolve_builtin("Helvetica"), BuiltinFont::Helvetica);
        assert_eq!(resolve_builtin("Symbol"), BuiltinFont::Symbol);
    }

    #[test]
    fn modifiers_are_honored() {
        assert_eq!(resolve_builtin("Times-BoldItalic"), BuiltinFont::TimesBoldItalic);
        assert_eq!(resolve_builtin("Arial-BoldMT"), BuiltinFont::HelveticaBold);
        assert_eq!(resolve_builtin("Courier-Oblique"), BuiltinFont::CourierOblique);
    }

    #[test]
    fn unknown_names_fall_back_to_helvetica() {
        assert_eq!(resolve_builtin("Wingdings3"), BuiltinFont::Helvetica);
        assert_eq!(resolve_builtin(""), BuiltinFont::Helvetica);
    }
}
