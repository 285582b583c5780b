/// Word that, when present in a longer title, ends the first line.
pub const BREAK_AFTER_KEYWORD: &str = "PRODUCT";

/// Main title split into at most two upper-cased lines. An empty `line2` means single-line.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TitleLines {
    pub line1: String,
    pub line2: String,
}

impl TitleLines {
    pub fn is_single_line(&self) -> bool {
        self.line2.is_empty()
    }

    /// Lines with visible text, in display order.
    pub fn lines(&self) -> Vec<&str> {
        [self.line1.as_str(), self.line2.as_str()]
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines().len()
    }
}

/// Split a main title into at most two lines.
///
/// The title is upper-cased and split on single spaces, then:
/// one word stays on one line; two words get a line each; longer titles break right after the
/// first `PRODUCT` unless it is the last word; otherwise the first `ceil(n / 2)` words go on
/// line one.
///
/// Surrounding and repeated spaces are not collapsed: they produce empty words that count
/// towards the split.
pub fn break_lines(title: &str) -> TitleLines {
    let upper = title.to_uppercase();
    let words: Vec<&str> = upper.split(' ').collect();

    match words.as_slice() {
        [] | [_] => TitleLines {
            line1: upper.clone(),
            line2: String::new(),
        },
        [first, second] => TitleLines {
            line1: (*first).to_owned(),
            line2: (*second).to_owned(),
        },
        _ => {
            let split_at = words
                .iter()
                .position(|w| *w == BREAK_AFTER_KEYWORD)
                .map(|i| i + 1)
                .filter(|&at| at < words.len())
                .unwrap_or_else(|| words.len().div_ceil(2));
            TitleLines {
                line1: words[..split_at].join(" "),
                line2: words[split_at..].join(" "),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/line_break.rs"]
mod tests;
