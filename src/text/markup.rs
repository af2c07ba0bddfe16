use crate::color::{Rgba8, rgb};
use crate::error::{CardError, Result};

/// Opening sequence of a color directive, `[c/RRGGBB:payload]`.
const DIRECTIVE_OPEN: [char; 3] = ['[', 'c', '/'];
const DIRECTIVE_SEPARATOR: char = ':';
const DIRECTIVE_CLOSE: char = ']';

/// Contiguous run of text drawn in a single color.
///
/// Snippets only come out of [`parse`]; concatenating their `text` fields in
/// order gives the display name with all directives stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSnippet {
    pub text: String,
    pub color: Rgba8,
}

/// How a directive whose color code does not decode to exactly three bytes
/// is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Log the bad code and keep the snippet. Channels that did decode are
    /// used, missing ones are 0 and alpha stays opaque.
    #[default]
    Lenient,
    /// Reject the whole name with [`CardError::MalformedMarkup`].
    Strict,
}

/// Splits a display name into colored snippets using [`ColorPolicy::Lenient`].
///
/// Text outside directives gets `default_color`. HTML entities are not
/// touched here; unescape before calling if the source is HTML-encoded.
pub fn parse(raw: &str, default_color: Rgba8) -> Result<Vec<TextSnippet>> {
    parse_with_policy(raw, default_color, ColorPolicy::Lenient)
}

/// Splits a display name into colored snippets.
///
/// The scan runs once over the code points of `raw`. A directive that hits
/// the end of input before its `:` or `]` is reported as
/// [`CardError::MalformedMarkup`] with the code point index of its `[`.
pub fn parse_with_policy(
    raw: &str,
    default_color: Rgba8,
    policy: ColorPolicy,
) -> Result<Vec<TextSnippet>> {
    let chars: Vec<char> = raw.chars().collect();
    let mut snippets = Vec::new();
    let mut index = 0;

    while index < chars.len() {
        if opens_directive(&chars, index) {
            let (snippet, next) = scan_directive(&chars, index, policy)?;
            snippets.push(snippet);
            index = next;
            continue;
        }

        // literal run: always take the current char, stop in front of the next directive
        let start = index;
        index += 1;
        while index < chars.len() && !opens_directive(&chars, index) {
            index += 1;
        }

        snippets.push(TextSnippet {
            text: chars[start..index].iter().collect(),
            color: default_color,
        });
    }

    Ok(snippets)
}

/// Joins the snippet texts back into one string.
pub fn plain_text(snippets: &[TextSnippet]) -> String {
    snippets.iter().map(|snippet| snippet.text.as_str()).collect()
}

fn opens_directive(chars: &[char], index: usize) -> bool {
    chars
        .get(index..index + DIRECTIVE_OPEN.len())
        .is_some_and(|window| window == DIRECTIVE_OPEN.as_slice())
}

fn is_code_digit(ch: char) -> bool {
    matches!(ch, '0'..='9' | 'A'..='F')
}

/// Scans one directive starting at `start` (the `[`).
///
/// Returns the snippet and the index just past the closing `]`.
fn scan_directive(
    chars: &[char],
    start: usize,
    policy: ColorPolicy,
) -> Result<(TextSnippet, usize)> {
    let mut index = start + DIRECTIVE_OPEN.len();

    let code_start = index;
    while index < chars.len() && is_code_digit(chars[index]) {
        index += 1;
    }
    let code: String = chars[code_start..index].iter().collect();

    // exactly one separator char, normally ':'
    if index >= chars.len() {
        return Err(CardError::MalformedMarkup {
            position: start,
            reason: "directive ends before its ':' separator",
        });
    }
    if chars[index] != DIRECTIVE_SEPARATOR {
        log::debug!(
            "directive at {start} uses {:?} instead of ':' as separator",
            chars[index]
        );
    }
    index += 1;

    let payload_start = index;
    let Some(length) = chars[payload_start..]
        .iter()
        .position(|&ch| ch == DIRECTIVE_CLOSE)
    else {
        return Err(CardError::MalformedMarkup {
            position: start,
            reason: "directive is missing its closing ']'",
        });
    };
    let payload_end = payload_start + length;

    let snippet = TextSnippet {
        text: chars[payload_start..payload_end].iter().collect(),
        color: directive_color(&code, policy, start)?,
    };

    Ok((snippet, payload_end + 1))
}

fn directive_color(code: &str, policy: ColorPolicy, position: usize) -> Result<Rgba8> {
    let problem = match hex::decode(code) {
        Ok(bytes) if bytes.len() == 3 => return Ok(rgb(bytes[0], bytes[1], bytes[2])),
        Ok(bytes) => format!("decoded {} color bytes, expected 3", bytes.len()),
        Err(err) => err.to_string(),
    };

    match policy {
        ColorPolicy::Strict => Err(CardError::MalformedMarkup {
            position,
            reason: "color code is not six hex digits",
        }),
        ColorPolicy::Lenient => {
            log::warn!("color directive at {position} has bad code {code:?}: {problem}");
            Ok(salvage_color(code))
        }
    }
}

/// Best-effort color from whatever complete hex pairs `code` holds.
fn salvage_color(code: &str) -> Rgba8 {
    // `code` only holds ASCII hex digits, so every even prefix decodes
    let pairs = &code[..code.len() & !1];
    let bytes = hex::decode(pairs).unwrap_or_default();
    let channel = |i: usize| bytes.get(i).copied().unwrap_or(0);

    rgb(channel(0), channel(1), channel(2))
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, WHITE};

    const GRAY: Rgba8 = rgb(128, 128, 128);

    fn snippet(text: &str, color: Rgba8) -> TextSnippet {
        TextSnippet {
            text: text.to_string(),
            color,
        }
    }

    #[test]
    fn directive_followed_by_literal() {
        let snippets = parse("[c/FF0000:hi] there", GRAY).unwrap();
        assert_eq!(
            snippets,
            vec![snippet("hi", rgb(255, 0, 0)), snippet(" there", GRAY)]
        );
    }

    #[test]
    fn plain_name_is_one_snippet() {
        let snippets = parse("no tags here", GRAY).unwrap();
        assert_eq!(snippets, vec![snippet("no tags here", GRAY)]);
    }

    #[test]
    fn names_without_directive_stay_whole() {
        for raw in ["a[b", "[", "[c", "[c:FF]", "x]y", "c/FF0000:", "[ c/00FF00:z]"] {
            let snippets = parse(raw, WHITE).unwrap();
            assert_eq!(snippets, vec![snippet(raw, WHITE)], "input {raw:?}");
        }
    }

    #[test]
    fn empty_name_has_no_snippets() {
        assert!(parse("", WHITE).unwrap().is_empty());
    }

    #[test]
    fn stripped_text_is_preserved() {
        let cases = [
            ("[c/00FF00:Calamity] Mod", "Calamity Mod"),
            ("The [c/FFD700:Golden] [c/0000FF:Blue] one", "The Golden Blue one"),
            ("[c/123456:a][c/654321:b]", "ab"),
            ("pre [c/ABCDEF:mid[dle] post", "pre mid[dle post"),
        ];
        for (raw, expected) in cases {
            let snippets = parse(raw, WHITE).unwrap();
            assert_eq!(plain_text(&snippets), expected);
        }
    }

    #[test]
    fn colors_are_decoded_per_run() {
        let snippets = parse("a[c/00FF00:b]c[c/0000FF:d]", WHITE).unwrap();
        let colors: Vec<_> = snippets.iter().map(|s| s.color).collect();
        assert_eq!(colors, vec![WHITE, rgb(0, 255, 0), WHITE, rgb(0, 0, 255)]);
    }

    #[test]
    fn directives_do_not_nest() {
        let snippets = parse("[c/FF0000:a[c/00FF00:b]]", WHITE).unwrap();
        assert_eq!(
            snippets,
            vec![snippet("a[c/00FF00:b", rgb(255, 0, 0)), snippet("]", WHITE)]
        );
    }

    #[test]
    fn multibyte_text_is_not_split() {
        let snippets = parse("héllo [c/00FF00:wörld ✨]!", WHITE).unwrap();
        assert_eq!(
            snippets,
            vec![
                snippet("héllo ", WHITE),
                snippet("wörld ✨", rgb(0, 255, 0)),
                snippet("!", WHITE),
            ]
        );
    }

    #[test]
    fn unterminated_directive_is_malformed() {
        for raw in ["[c/FF0000:never closed", "[c/FF0000", "[c/", "ok [c/12"] {
            let err = parse(raw, WHITE).unwrap_err();
            assert!(
                matches!(err, CardError::MalformedMarkup { .. }),
                "input {raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn malformed_position_points_at_the_directive() {
        let err = parse("ab✨[c/FF0000:x", WHITE).unwrap_err();
        assert!(matches!(err, CardError::MalformedMarkup { position: 3, .. }));
    }

    #[test]
    fn odd_length_code_keeps_complete_pairs() {
        let snippets = parse("[c/FFF:x]", WHITE).unwrap();
        assert_eq!(snippets, vec![snippet("x", rgb(255, 0, 0))]);
    }

    #[test]
    fn short_code_falls_back_to_black() {
        let snippets = parse("[c/:x]", WHITE).unwrap();
        assert_eq!(snippets, vec![snippet("x", BLACK)]);
    }

    #[test]
    fn long_code_is_rejected_when_strict() {
        assert!(parse_with_policy("[c/FF00FF00:x]", WHITE, ColorPolicy::Strict).is_err());
        assert!(parse_with_policy("[c/FFF:x]", WHITE, ColorPolicy::Strict).is_err());
        assert!(parse_with_policy("[c/FF00FF:x]", WHITE, ColorPolicy::Strict).is_ok());
    }

    #[test]
    fn lowercase_digits_are_not_part_of_the_code() {
        // 'f' is taken as the separator and the rest becomes payload
        let snippets = parse("[c/ff0000:x]", WHITE).unwrap();
        assert_eq!(snippets, vec![snippet("f0000:x", BLACK)]);
    }

    #[test]
    fn empty_payload_yields_empty_snippet() {
        let snippets = parse("[c/FF0000:]tail", WHITE).unwrap();
        assert_eq!(
            snippets,
            vec![snippet("", rgb(255, 0, 0)), snippet("tail", WHITE)]
        );
    }
}
