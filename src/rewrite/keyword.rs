const KEYWORD: &[u8] = b"import";

/// Progress of the `import` keyword recognizer on the current line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeywordMatch {
    #[default]
    Idle,
    /// `n` letters of the keyword matched so far (1..KEYWORD.len()).
    Partial(usize),
    Complete,
}

/// Recognizes `import` when it starts after a space, a tab, or the line start.
///
/// Each letter must directly follow the previous keyword letter; any other
/// character resets the matcher.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordMatcher {
    state: KeywordMatch,
}

impl KeywordMatcher {
    pub fn state(&self) -> KeywordMatch {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == KeywordMatch::Complete
    }

    /// Advance with `c`, given the character that preceded it on the line.
    pub fn feed(&mut self, prev: char, c: char) -> KeywordMatch {
        let matched = match self.state {
            KeywordMatch::Partial(n) if KEYWORD[n] as char == c => n + 1,
            _ if c == KEYWORD[0] as char && (prev == ' ' || prev == '\t') => 1,
            _ => 0,
        };
        self.state = match matched {
            0 => KeywordMatch::Idle,
            n if n == KEYWORD.len() => KeywordMatch::Complete,
            n => KeywordMatch::Partial(n),
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::{KeywordMatch, KeywordMatcher};

    fn run(line: &str) -> KeywordMatcher {
        let mut m = KeywordMatcher::default();
        let mut prev = ' ';
        for c in line.chars() {
            m.feed(prev, c);
            prev = c;
        }
        m
    }

    #[test]
    fn matches_keyword_at_line_start_and_after_whitespace() {
        assert!(run("import").is_complete());
        assert!(run("\timport").is_complete());
        assert!(run("x := 1; import").is_complete());
    }

    #[test]
    fn rejects_keyword_glued_to_identifier() {
        assert!(!run("reimport").is_complete());
        assert!(!run("x.import").is_complete());
        assert!(!run("imp0rt").is_complete());
    }

    #[test]
    fn trailing_letters_reset_the_match() {
        let m = run("imports");
        assert_eq!(m.state(), KeywordMatch::Idle);
    }

    #[test]
    fn partial_progress_is_visible() {
        assert_eq!(run(" imp").state(), KeywordMatch::Partial(3));
    }
}
