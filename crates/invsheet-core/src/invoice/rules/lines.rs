//! Line normalization for text produced by PDF extraction.

/// Ligature glyphs emitted by some PDF fonts, with their ASCII expansion.
const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Normalize one physical line.
///
/// Whitespace of any kind collapses to single ASCII spaces, glyph artifacts
/// are removed or expanded, and both ends are trimmed. Idempotent.
pub fn normalize_line(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars() {
        if is_artifact(c) {
            continue;
        }

        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }

        if let Some((_, expansion)) = LIGATURES.iter().find(|(glyph, _)| *glyph == c) {
            out.push_str(expansion);
        } else if let Some(ascii) = fullwidth_to_ascii(c) {
            out.push(ascii);
        } else {
            out.push(c);
        }
    }

    out
}

/// Flatten page texts into normalized, non-empty lines in document order.
pub fn split_lines<S: AsRef<str>>(pages: &[S]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| page.as_ref().lines())
        .map(normalize_line)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Characters that carry no text: zero-width marks, BOM, soft hyphen,
/// replacement and private-use glyphs, control codes.
fn is_artifact(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200D}'
            | '\u{2060}'
            | '\u{FEFF}'
            | '\u{00AD}'
            | '\u{FFFD}'
            | '\u{E000}'..='\u{F8FF}'
    ) || (c.is_control() && !c.is_whitespace())
}

fn fullwidth_to_ascii(c: char) -> Option<char> {
    match c {
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFF01 + 0x21),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_line("  125709 \t LAMP   COVER  "), "125709 LAMP COVER");
        assert_eq!(normalize_line("1\u{00A0}PZ\u{2009}1.95\u{3000}€"), "1 PZ 1.95 €");
    }

    #[test]
    fn test_removes_artifacts() {
        assert_eq!(normalize_line("\u{FEFF}VEN-\u{200B}"), "VEN-");
        assert_eq!(normalize_line("SHO\u{00AD}WER\u{E001}"), "SHOWER");
        assert_eq!(normalize_line("A\u{0007}B"), "AB");
    }

    #[test]
    fn test_expands_ligatures_and_fullwidth() {
        assert_eq!(normalize_line("\u{FB01}lter \u{FB02}ange"), "filter flange");
        assert_eq!(normalize_line("ＶＥＮ－"), "VEN-");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            " a  b ",
            "\u{FB03}x\u{00A0}\u{00A0}y",
            "1 PZ 1.95 € 1.95 €",
        ];
        for s in samples {
            let once = normalize_line(s);
            assert_eq!(normalize_line(&once), once);
        }
    }

    #[test]
    fn test_split_lines_skips_empty() {
        let pages = vec!["VEN-\n\n  \n161.167 D.35.8 SHOWER".to_string(), String::new(), "1 PZ 1.95 € 1.95 €".to_string()];
        assert_eq!(
            split_lines(&pages),
            vec!["VEN-", "161.167 D.35.8 SHOWER", "1 PZ 1.95 € 1.95 €"]
        );
    }
}
