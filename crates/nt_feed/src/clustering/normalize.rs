use serde::Serialize;

/// Input is cut to this many characters before tokenizing.
pub const MAX_TITLE_CHARS: usize = 500;
/// At most this many tokens are kept per title.
pub const MAX_TOKENS: usize = 50;
/// Tokens this short (in characters) or shorter are dropped.
pub const MIN_TOKEN_CHARS: usize = 3;

/// A title reduced to its meaningful lowercase tokens, in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedTitle {
    tokens: Vec<String>,
}

impl NormalizedTitle {
    pub fn new(title: &str) -> Self {
        let bounded: String = title.chars().take(MAX_TITLE_CHARS).collect();
        let cleaned: String = bounded
            .to_lowercase()
            .chars()
            .filter(|c| is_word_char(*c) || c.is_whitespace())
            .collect();

        let tokens = cleaned
            .split_whitespace()
            .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
            .filter(|token| !is_stop_word(token))
            .take(MAX_TOKENS)
            .map(str::to_string)
            .collect();

        Self { tokens }
    }

    pub fn from_optional(title: Option<&str>) -> Self {
        title.map(Self::new).unwrap_or_default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<&str> for NormalizedTitle {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// English function words plus headline boilerplate that says nothing about the story.
pub fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "and" | "or" | "but" | "in" | "on" | "at" | "to" | "for" | "of" | "with" | "by" |
        "a" | "an" | "is" | "are" | "was" | "were" | "be" | "been" | "being" | "have" | "has" |
        "had" | "having" | "do" | "does" | "did" | "doing" | "will" | "would" | "could" |
        "should" | "may" | "might" | "must" | "can" | "this" | "that" | "these" | "those" |
        "about" | "above" | "after" | "again" | "against" | "also" | "amid" | "because" |
        "before" | "below" | "between" | "both" | "down" | "during" | "each" | "from" |
        "further" | "here" | "into" | "just" | "more" | "most" | "once" | "only" | "other" |
        "over" | "same" | "some" | "such" | "than" | "their" | "them" | "then" | "there" |
        "they" | "through" | "under" | "until" | "upon" | "very" | "what" | "when" | "where" |
        "which" | "while" | "who" | "whom" | "whose" | "your" | "yours" | "ours" | "theirs" |
        "news" | "report" | "reports" | "reported" | "breaking" | "update" | "updates" |
        "updated" | "latest" | "live" | "exclusive" | "watch" | "video" | "photos" | "today" |
        "says" | "said" | "sees" | "according"
    )
}
