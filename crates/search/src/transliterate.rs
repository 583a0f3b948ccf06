//! Han-to-pinyin query rewriting for catalogs that only index Latin text.

use pinyin::ToPinyin;
use regex::Regex;
use std::sync::LazyLock;

static HAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Han}").unwrap());

pub fn contains_han(value: &str) -> bool {
    HAN_RE.is_match(value)
}

fn is_han(ch: char) -> bool {
    HAN_RE.is_match(ch.encode_utf8(&mut [0; 4]))
}

/// Toneless pinyin form of `query`, one syllable per Han character.
///
/// Queries without Han characters are returned unchanged. Non-Han runs are
/// kept as their own tokens, whitespace collapses to single spaces and the
/// result is trimmed. Han code points without a reading (iteration marks,
/// radicals) act as separators, so the output never contains Han.
pub fn to_pinyin_query(query: &str) -> String {
    if !contains_han(query) {
        return query.to_string();
    }

    let mut tokens: Vec<String> = Vec::new();
    let mut run = String::new();
    for ch in query.chars() {
        match ch.to_pinyin() {
            Some(py) => {
                if !run.is_empty() {
                    tokens.push(std::mem::take(&mut run));
                }
                tokens.push(py.plain().to_string());
            }
            None if is_han(ch) => {
                if !run.is_empty() {
                    tokens.push(std::mem::take(&mut run));
                }
            }
            None => run.push(ch),
        }
    }
    if !run.is_empty() {
        tokens.push(run);
    }

    tokens
        .iter()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_queries_pass_through() {
        assert_eq!(to_pinyin_query("Dune"), "Dune");
        assert_eq!(to_pinyin_query("  spaced   out "), "  spaced   out ");
    }

    #[test]
    fn han_queries_become_toneless_pinyin() {
        let out = to_pinyin_query("三体");
        assert!(!contains_han(&out));
        assert_eq!(out, "san ti");
    }

    #[test]
    fn mixed_queries_keep_latin_runs_and_collapse_whitespace() {
        let out = to_pinyin_query("  哈利   Potter 1 ");
        assert!(!contains_han(&out));
        assert_eq!(out, "ha li Potter 1");
    }

    #[test]
    fn han_without_reading_is_dropped() {
        assert_eq!(to_pinyin_query("人々"), "ren");
        assert_eq!(to_pinyin_query("⺀ABC"), "ABC");
        assert_eq!(to_pinyin_query("三体々 Tokyo"), "san ti Tokyo");
        assert!(!contains_han(&to_pinyin_query("人々⺀")));
    }
}
