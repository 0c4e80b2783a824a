//! Restricted inline markup: `<br/>` line breaks and `<strong>`/`<b>` emphasis.
//!
//! [`sanitize`] normalizes generated text before it is embedded in a
//! document; [`parse_lines`] is what the renderer runs on the result.

use crate::model::RenderError;
use regex::Regex;
use std::sync::LazyLock;

static BREAK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:<br\s*/?>\s*){2,}").expect("valid break-run pattern"));
static BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break pattern"));
static AFTER_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br/>\s+").expect("valid pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid pattern"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</?(?:strong|b)>").expect("valid tag pattern"));

/// Normalizes free text for the document renderer. Total and idempotent.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = BREAK_RUN.replace_all(text, "<br/><br/>");
    let text = BREAK.replace_all(&text, "<br/>");
    let text = AFTER_BREAK.replace_all(&text, "<br/> ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Escapes characters that would otherwise be read as markup.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

/// Splits sanitized markup into lines of styled runs.
///
/// Unknown tags are kept as literal text. A break that is not self-closing
/// is rejected; emphasis left open ends with the paragraph.
pub fn parse_lines(markup: &str) -> Result<Vec<Vec<Run>>, RenderError> {
    let mut lines: Vec<Vec<Run>> = vec![Vec::new()];
    let mut bold_depth = 0usize;
    let mut cursor = 0;

    for tag in TAG.find_iter(markup) {
        push_text(&mut lines, &markup[cursor..tag.start()], bold_depth > 0);
        cursor = tag.end();

        let lowered = tag.as_str().to_ascii_lowercase();
        if lowered.starts_with("<br") {
            if !lowered.ends_with("/>") {
                return Err(RenderError::Markup(format!(
                    "line break '{}' must be written as <br/>",
                    tag.as_str()
                )));
            }
            lines.push(Vec::new());
        } else if lowered.starts_with("</") {
            bold_depth = bold_depth.saturating_sub(1);
        } else {
            bold_depth += 1;
        }
    }
    push_text(&mut lines, &markup[cursor..], bold_depth > 0);
    Ok(lines)
}

fn push_text(lines: &mut [Vec<Run>], raw: &str, bold: bool) {
    if raw.is_empty() {
        return;
    }
    let text = raw.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&");
    if let Some(line) = lines.last_mut() {
        match line.last_mut() {
            Some(last) if last.bold == bold => last.text.push_str(&text),
            _ => line.push(Run { text, bold }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("   \n\t "), "");
    }

    #[test]
    fn double_breaks_become_a_normalized_pair() {
        assert_eq!(sanitize("uno<br><br>dos"), "uno<br/><br/>dos");
        assert_eq!(sanitize("uno<br>  <BR />\n<br>dos"), "uno<br/><br/>dos");
    }

    #[test]
    fn single_breaks_are_self_closed_and_spaced() {
        assert_eq!(sanitize("a<br>b"), "a<br/>b");
        assert_eq!(sanitize("a<br>   \n  b"), "a<br/> b");
        assert_eq!(sanitize("a <br /> b"), "a <br/> b");
    }

    #[test]
    fn emphasis_is_untouched() {
        let text = "<strong>Estado:</strong>   bueno <b>x</b>";
        assert_eq!(sanitize(text), "<strong>Estado:</strong> bueno <b>x</b>");
    }

    #[test]
    fn parse_splits_lines_and_emphasis() {
        let lines = parse_lines("<strong>Título:</strong> texto<br/>segunda &lt;línea&gt;").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![
            Run { text: "Título:".into(), bold: true },
            Run { text: " texto".into(), bold: false },
        ]);
        assert_eq!(lines[1], vec![Run { text: "segunda <línea>".into(), bold: false }]);
    }

    #[test]
    fn parse_rejects_open_breaks() {
        assert!(matches!(parse_lines("a<br>b"), Err(RenderError::Markup(_))));
        assert!(parse_lines(&sanitize("a<br>b")).is_ok());
    }

    #[test]
    fn parse_keeps_unknown_tags_literally() {
        let lines = parse_lines("x <font size=2>y</font>").unwrap();
        assert_eq!(lines[0][0].text, "x <font size=2>y</font>");
    }

    #[test]
    fn escaped_text_round_trips_through_parse() {
        let lines = parse_lines(&escape("Lote <A&B>")).unwrap();
        assert_eq!(lines[0][0].text, "Lote <A&B>");
    }

    #[test]
    fn unclosed_emphasis_ends_with_paragraph() {
        let lines = parse_lines("<b>todo en negrita").unwrap();
        assert!(lines[0][0].bold);
    }

    fn markup_like() -> impl Strategy<Value = String> {
        let atom = prop_oneof![
            Just("<br>".to_string()),
            Just("<br/>".to_string()),
            Just("<BR />".to_string()),
            Just("<strong>".to_string()),
            Just("</strong>".to_string()),
            Just(" ".to_string()),
            Just("\n\t".to_string()),
            "[a-zñá ]{0,6}",
        ];
        prop::collection::vec(atom, 0..16).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(text in markup_like()) {
            let once = sanitize(&text);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn sanitize_is_idempotent_on_arbitrary_text(text in ".*") {
            let once = sanitize(&text);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn sanitized_text_has_no_open_breaks(text in markup_like()) {
            let clean = sanitize(&text);
            prop_assert!(!clean.to_lowercase().contains("<br>"));
            prop_assert!(!clean.contains("<br/> <br/>"));
            prop_assert!(!clean.contains("<br/><br/><br/>"));
            prop_assert!(parse_lines(&clean).is_ok());
        }
    }
}
