use regex::Regex;

/// Runs of two or more word characters, lowercased. Single characters and
/// delimiter punctuation never become terms.
const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self { pattern: Regex::new(TOKEN_PATTERN).expect("token pattern compiles") }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
    }
}
