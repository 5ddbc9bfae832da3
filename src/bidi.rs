use std::sync::OnceLock;

use regex::Regex;

/// One directional run of a mixed Arabic/Latin string.
///
/// `Ltr` runs are Latin/digit/punctuation content that must be rendered
/// left-to-right inside right-to-left text; everything else stays `Rtl`
/// and relies on the surface's implicit direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Rtl(String),
    Ltr(String),
}

impl Fragment {
    pub fn text(&self) -> &str {
        match self {
            Fragment::Rtl(s) | Fragment::Ltr(s) => s,
        }
    }

    pub fn is_ltr(&self) -> bool {
        matches!(self, Fragment::Ltr(_))
    }
}

// A run starts and ends on a character that is unambiguously LTR (letter,
// digit, or closing punctuation) so neutral spaces between Arabic words
// are never swallowed.
fn ltr_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[0-9A-Za-z][0-9A-Za-z .,:;()/\\#&@+%'"-]*[0-9A-Za-z).%]|[0-9A-Za-z]"#)
            .expect("ltr run pattern")
    })
}

/// Split `text` into directional fragments, in original order.
///
/// Concatenating the fragments' text reproduces the input exactly. The
/// empty string yields a single empty `Rtl` fragment.
pub fn segment(text: &str) -> Vec<Fragment> {
    if text.is_empty() {
        return vec![Fragment::Rtl(String::new())];
    }

    let mut fragments = Vec::new();
    let mut last_end = 0;
    for found in ltr_run().find_iter(text) {
        if found.start() > last_end {
            fragments.push(Fragment::Rtl(text[last_end..found.start()].to_string()));
        }
        fragments.push(Fragment::Ltr(found.as_str().to_string()));
        last_end = found.end();
    }
    if last_end < text.len() {
        fragments.push(Fragment::Rtl(text[last_end..].to_string()));
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(fragments: &[Fragment]) -> String {
        fragments.iter().map(Fragment::text).collect()
    }

    #[test]
    fn empty_input_yields_single_empty_fragment() {
        let fragments = segment("");
        assert_eq!(fragments, vec![Fragment::Rtl(String::new())]);
    }

    #[test]
    fn pure_latin_is_one_ltr_fragment() {
        let fragments = segment("Invoice 2025-114");
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].is_ltr());
        assert_eq!(rejoin(&fragments), "Invoice 2025-114");
    }

    #[test]
    fn pure_arabic_is_one_rtl_fragment() {
        let input = "دفعة أولى بتاريخ";
        let fragments = segment(input);
        assert_eq!(fragments.len(), 1);
        assert!(!fragments[0].is_ltr());
        assert_eq!(rejoin(&fragments), input);
    }

    #[test]
    fn mixed_string_round_trips() {
        let input = "دفعة أولى 52000 د.ل بتاريخ 2025-07-20";
        let fragments = segment(input);
        assert_eq!(rejoin(&fragments), input);
        let ltr: Vec<&str> = fragments
            .iter()
            .filter(|f| f.is_ltr())
            .map(Fragment::text)
            .collect();
        assert_eq!(ltr, vec!["52000", "2025-07-20"]);
    }

    #[test]
    fn neutral_spaces_stay_with_rtl_text() {
        let fragments = segment("رقم 7 من 9");
        assert_eq!(rejoin(&fragments), "رقم 7 من 9");
        // The spaces around the digits belong to the RTL fragments.
        assert!(matches!(&fragments[1], Fragment::Ltr(s) if s == "7"));
        assert!(matches!(&fragments[2], Fragment::Rtl(s) if s == " من "));
    }
}
