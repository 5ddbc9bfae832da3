use crate::measure::TextMeasurer;

/// Greedily wrap `text` into lines whose measured width stays within
/// `max_width`. Words are never split: a single word wider than the budget
/// still gets its own line. Deterministic for identical inputs and cache
/// state.
pub fn wrap_text(
    measurer: &mut TextMeasurer,
    text: &str,
    max_width: f32,
    font_size: f32,
    family: &str,
    weight: u16,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measurer.measure(&candidate, font_size, family, weight) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{FontMetrics, TextMeasurer};

    /// Fixed advance per character, ignoring shaping. Good enough to make
    /// wrapping arithmetic exact in tests.
    struct FixedAdvance(f32);

    impl FontMetrics for FixedAdvance {
        fn measure(&self, text: &str, font_size: f32, _family: &str, _weight: u16) -> Option<f32> {
            Some(text.chars().count() as f32 * font_size * self.0)
        }
    }

    fn measurer() -> TextMeasurer {
        TextMeasurer::new(Box::new(FixedAdvance(0.5)))
    }

    #[test]
    fn short_text_is_one_line() {
        let mut m = measurer();
        let lines = wrap_text(&mut m, "دفعة أولى", 1000.0, 42.0, "Cairo", 400);
        assert_eq!(lines, vec!["دفعة أولى"]);
    }

    #[test]
    fn committed_lines_stay_within_budget() {
        let mut m = measurer();
        let text = "دفعة أولى 52000 د.ل بتاريخ 2025-07-20";
        let lines = wrap_text(&mut m, text, 300.0, 42.0, "Cairo", 400);
        assert!(lines.len() >= 2, "expected a wrap, got {lines:?}");
        for line in &lines {
            assert!(
                m.measure(line, 42.0, "Cairo", 400) <= 300.0,
                "line over budget: {line:?}"
            );
        }
        // No word lost or reordered.
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn oversized_word_is_placed_alone() {
        let mut m = measurer();
        // 20 chars at 21 px each: 420 px, over a 100 px budget.
        let lines = wrap_text(&mut m, "x aaaaaaaaaaaaaaaaaaaa y", 100.0, 42.0, "Cairo", 400);
        assert_eq!(
            lines,
            vec!["x", "aaaaaaaaaaaaaaaaaaaa", "y"],
            "oversized word must not be split or dropped"
        );
    }

    #[test]
    fn whitespace_only_input_yields_no_lines() {
        let mut m = measurer();
        assert!(wrap_text(&mut m, "   ", 300.0, 42.0, "Cairo", 400).is_empty());
        assert!(wrap_text(&mut m, "", 300.0, 42.0, "Cairo", 400).is_empty());
    }
}
