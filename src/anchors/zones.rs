//! Multi-line comment zones
//!
//! Decides whether a line sits inside a docstring (`"""` / `'''`) or an HTML
//! comment block (`<!--` ... `-->`). A line belongs to a zone if the zone is
//! open when the line starts, or if the line opens one. A zone still open at
//! the end of the document extends to the last line.

use crate::anchors::kind::ZoneRule;

const DOCSTRING_DELIMITERS: &[&str] = &["\"\"\"", "'''"];
const HTML_OPEN: &str = "<!--";
const HTML_CLOSE: &str = "-->";

/// Zone membership for every line at once
pub fn zone_mask<S: AsRef<str>>(lines: &[S], rule: ZoneRule) -> Vec<bool> {
    if rule == ZoneRule::None {
        return vec![false; lines.len()];
    }

    let mut open: Option<&'static str> = None;
    lines
        .iter()
        .map(|line| {
            let open_at_start = open.is_some();
            let opened = advance(line.as_ref(), rule, &mut open);
            open_at_start || opened
        })
        .collect()
}

/// Whether `lines[index]` is inside a zone for `rule`
#[allow(dead_code)]
pub fn line_in_zone<S: AsRef<str>>(lines: &[S], index: usize, rule: ZoneRule) -> bool {
    if rule == ZoneRule::None || index >= lines.len() {
        return false;
    }

    let mut open: Option<&'static str> = None;
    for line in &lines[..index] {
        advance(line.as_ref(), rule, &mut open);
    }
    let open_at_start = open.is_some();
    open_at_start || advance(lines[index].as_ref(), rule, &mut open)
}

/// Walk the delimiters of one line, updating the open-zone state.
/// Returns true if any zone was opened on this line.
fn advance(line: &str, rule: ZoneRule, open: &mut Option<&'static str>) -> bool {
    let mut rest = line;
    let mut opened = false;

    loop {
        match *open {
            Some(closer) => match rest.find(closer) {
                Some(pos) => {
                    rest = &rest[pos + closer.len()..];
                    *open = None;
                }
                None => return opened,
            },
            None => match next_opener(rest, rule) {
                Some((pos, token, closer)) => {
                    rest = &rest[pos + token.len()..];
                    *open = Some(closer);
                    opened = true;
                }
                None => return opened,
            },
        }
    }
}

/// Earliest opening delimiter in `text`: (offset, opener, matching closer)
fn next_opener(text: &str, rule: ZoneRule) -> Option<(usize, &'static str, &'static str)> {
    match rule {
        ZoneRule::None => None,
        ZoneRule::Docstring => DOCSTRING_DELIMITERS
            .iter()
            .filter_map(|d| text.find(d).map(|pos| (pos, *d, *d)))
            .min_by_key(|(pos, _, _)| *pos),
        ZoneRule::HtmlComment => text.find(HTML_OPEN).map(|pos| (pos, HTML_OPEN, HTML_CLOSE)),
    }
}
