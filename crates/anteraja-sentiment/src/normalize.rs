//! Text cleaning applied to translated text before scoring.
//!
//! The dictionary filter is a heuristic language filter. Loanwords and
//! domain vocabulary can slip through or be stripped.

use std::sync::LazyLock;

use regex::Regex;

use crate::dictionary::Dictionary;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9]+").expect("valid regex"));

static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\p{Extended_Pictographic}\p{Emoji_Presentation}\p{Emoji_Modifier}\x{1F1E6}-\x{1F1FF}\x{FE0F}\x{200D}\x{20E3}]",
    )
    .expect("valid regex")
});

/// Word runs or punctuation runs, mirroring a word/punct tokenizer.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\w\s]+").expect("valid regex"));

/// Clean `text` using the bundled English dictionary.
#[must_use]
pub fn normalize(text: &str) -> String {
    normalize_with(text, Dictionary::bundled())
}

/// Clean `text`, keeping alphabetic tokens only when `dictionary` knows them.
///
/// 1. Drop `@handle` mentions.
/// 2. Drop emoji code points.
/// 3. Drop `#` and `_`, keeping the rest of the hashtag / joined word.
/// 4. Tokenize into word and punctuation runs; keep non-alphabetic tokens
///    and dictionary words; join with single spaces.
#[must_use]
pub fn normalize_with(text: &str, dictionary: &Dictionary) -> String {
    let text = HANDLE_RE.replace_all(text, "");
    let text = EMOJI_RE.replace_all(&text, "");
    let text = text.replace(['#', '_'], "");

    TOKEN_RE
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|token| keep_token(token, dictionary))
        .collect::<Vec<_>>()
        .join(" ")
}

fn keep_token(token: &str, dictionary: &Dictionary) -> bool {
    !is_alphabetic(token) || dictionary.contains(&token.to_lowercase())
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}
