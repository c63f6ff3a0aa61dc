/// Height of a one-line composer input, in layout pixels.
pub const COMPOSER_BASE_HEIGHT: f32 = 40.0;
/// Height added per extra visible line.
pub const COMPOSER_LINE_HEIGHT: f32 = 20.0;

/// Draft state for the message input bar.
///
/// The text is capped at a configured character count, and the derived
/// height grows one line at a time up to a configured visible-line cap,
/// matching the auto-growing input the chat screen renders.
#[derive(Debug, Clone)]
pub struct Composer {
    text: String,
    max_chars: usize,
    max_lines: usize,
}

impl Composer {
    pub fn new(max_chars: usize, max_lines: usize) -> Self {
        Self {
            text: String::new(),
            max_chars,
            max_lines: max_lines.max(1),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the draft, truncating at the character cap.
    pub fn set_text(&mut self, text: &str) {
        if text.chars().count() <= self.max_chars {
            self.text = text.to_string();
        } else {
            self.text = text.chars().take(self.max_chars).collect();
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Drains the draft for submission.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Line count the input grows to, capped at the visible maximum.
    pub fn visible_lines(&self) -> usize {
        let mut lines = self.text.lines().count().max(1);
        // A trailing newline opens an empty line the caret sits on.
        if self.text.ends_with('\n') {
            lines += 1;
        }
        lines.min(self.max_lines)
    }

    /// Pixel height for the grown input.
    pub fn height(&self) -> f32 {
        COMPOSER_BASE_HEIGHT + (self.visible_lines() - 1) as f32 * COMPOSER_LINE_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_text_truncates_at_character_cap() {
        let mut composer = Composer::new(5, 4);
        composer.set_text("hello world");

        assert_eq!(composer.text(), "hello");
    }

    #[test]
    fn character_cap_counts_chars_not_bytes() {
        let mut composer = Composer::new(3, 4);
        composer.set_text("👍❤️😂😮");

        assert_eq!(composer.text().chars().count(), 3);
    }

    #[test]
    fn take_drains_the_draft() {
        let mut composer = Composer::new(500, 4);
        composer.set_text("hi there");

        assert_eq!(composer.take(), "hi there");
        assert!(composer.is_blank());
    }

    #[test]
    fn whitespace_only_draft_is_blank() {
        let mut composer = Composer::new(500, 4);
        composer.set_text("   \n  ");

        assert!(composer.is_blank());
    }

    #[test]
    fn height_grows_per_line_up_to_the_cap() {
        let mut composer = Composer::new(500, 4);
        assert_eq!(composer.height(), 40.0);

        composer.set_text("one\ntwo");
        assert_eq!(composer.visible_lines(), 2);
        assert_eq!(composer.height(), 60.0);

        composer.set_text("1\n2\n3\n4\n5\n6");
        assert_eq!(composer.visible_lines(), 4);
        assert_eq!(composer.height(), 100.0);
    }

    #[test]
    fn trailing_newline_counts_as_an_open_line() {
        let mut composer = Composer::new(500, 4);
        composer.set_text("one\n");

        assert_eq!(composer.visible_lines(), 2);
    }
}
