//! Lexicon polarity scorer for cleaned English text.

use std::sync::LazyLock;

use regex::Regex;

/// Word polarities.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("fast", 0.2),
    ("faster", 0.2),
    ("quick", 0.33),
    ("quickly", 0.33),
    ("happy", 0.8),
    ("satisfied", 0.5),
    ("satisfying", 0.5),
    ("helpful", 0.5),
    ("friendly", 0.375),
    ("polite", 0.5),
    ("kind", 0.6),
    ("love", 0.5),
    ("loved", 0.7),
    ("thanks", 0.2),
    ("thankful", 0.5),
    ("grateful", 0.5),
    ("recommend", 0.3),
    ("recommended", 0.3),
    ("safe", 0.5),
    ("safely", 0.5),
    ("smooth", 0.4),
    ("easy", 0.43),
    ("reliable", 0.5),
    ("perfect", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("pleased", 0.5),
    ("pleasant", 0.73),
    ("responsive", 0.4),
    ("efficient", 0.4),
    ("cheap", 0.4),
    ("affordable", 0.4),
    ("fine", 0.4),
    ("okay", 0.5),
    ("ok", 0.5),
    ("success", 0.3),
    ("successful", 0.75),
    ("impressive", 1.0),
    ("cool", 0.35),
    ("beautiful", 0.85),
    ("useful", 0.3),
    ("proper", 0.2),
    ("punctual", 0.5),
    // Negative signals
    ("bad", -0.7),
    ("worst", -1.0),
    ("worse", -0.4),
    ("terrible", -1.0),
    ("horrible", -1.0),
    ("awful", -1.0),
    ("poor", -0.4),
    ("poorly", -0.4),
    ("slow", -0.3),
    ("slowly", -0.3),
    ("slower", -0.3),
    ("late", -0.3),
    ("delayed", -0.2),
    ("delay", -0.2),
    ("lost", -0.2),
    ("broken", -0.4),
    ("damaged", -0.5),
    ("wrong", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("disappointment", -0.6),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("useless", -0.5),
    ("stupid", -0.8),
    ("rude", -0.3),
    ("lazy", -0.25),
    ("hate", -0.8),
    ("complaint", -0.3),
    ("complaints", -0.3),
    ("complain", -0.3),
    ("complained", -0.3),
    ("problem", -0.2),
    ("problems", -0.2),
    ("error", -0.3),
    ("failed", -0.5),
    ("fail", -0.5),
    ("failure", -0.5),
    ("expensive", -0.5),
    ("difficult", -0.5),
    ("hard", -0.3),
    ("careless", -0.3),
    ("irresponsible", -0.5),
    ("unprofessional", -0.5),
    ("ridiculous", -0.33),
    ("pathetic", -1.0),
    ("sad", -0.5),
    ("upset", -0.5),
    ("frustrated", -0.7),
    ("frustrating", -0.4),
    ("confusing", -0.3),
    ("stuck", -0.3),
    ("missing", -0.2),
    ("scam", -0.6),
    ("fake", -0.5),
    ("dirty", -0.6),
    ("unreliable", -0.5),
    ("unacceptable", -0.5),
    ("unfortunately", -0.5),
    ("sorry", -0.5),
    ("crazy", -0.6),
    ("waste", -0.2),
    ("wasted", -0.2),
    ("ugly", -0.7),
];

/// Multipliers applied to the polarity of the word that directly follows.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("so", 1.2),
    ("too", 1.3),
    ("super", 1.5),
    ("quite", 1.1),
    ("totally", 1.3),
    ("absolutely", 1.5),
    ("completely", 1.3),
    ("highly", 1.4),
    ("seriously", 1.3),
    ("incredibly", 1.5),
    ("truly", 1.2),
];

/// A negator within this many preceding tokens flips and damps a polarity.
const NEGATION_WINDOW: usize = 2;
const NEGATION_FACTOR: f64 = -0.5;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "none", "nobody", "neither", "nor", "without", "hardly",
    "cannot",
];

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("valid regex"));

fn polarity_of(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|&&(lex_word, _)| lex_word == word)
        .map(|&(_, weight)| weight)
}

fn intensity_of(word: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|&&(w, _)| w == word)
        .map(|&(_, factor)| factor)
}

/// Score a text string using the polarity lexicon.
///
/// Every lexicon word yields one assessment: its weight, multiplied by a
/// directly preceding intensifier and by `-0.5` when a negator appears in the
/// two preceding tokens. The result is the mean assessment clamped to
/// `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn score(text: &str) -> f64 {
    let tokens: Vec<String> = WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();

    let mut assessments: Vec<f64> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let Some(mut polarity) = polarity_of(token) else {
            continue;
        };
        if let Some(factor) = i.checked_sub(1).and_then(|prev| intensity_of(&tokens[prev])) {
            polarity *= factor;
        }
        let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
        if window.iter().any(|t| NEGATORS.contains(&t.as_str())) {
            polarity *= NEGATION_FACTOR;
        }
        assessments.push(polarity.clamp(-1.0, 1.0));
    }

    if assessments.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let denom = assessments.len() as f64;
    (assessments.iter().sum::<f64>() / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_returns_zero() {
        assert_eq!(score(""), 0.0);
    }

    #[test]
    fn whitespace_only_returns_zero() {
        assert_eq!(score("   "), 0.0);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert_eq!(score("the brown fox jumps over the dog"), 0.0);
    }

    #[test]
    fn positive_keyword_returns_positive() {
        let s = score("the courier was very friendly");
        assert!(s > 0.0, "expected positive score, got {s}");
    }

    #[test]
    fn negative_keyword_returns_negative() {
        let s = score("shipment very slow complaint");
        assert!(s < 0.0, "expected negative score, got {s}");
    }

    #[test]
    fn intensifier_amplifies() {
        assert!(score("very slow") < score("slow"));
        assert!(score("very good") > score("good"));
    }

    #[test]
    fn negation_flips_and_damps() {
        let s = score("not good");
        assert!((s - (-0.35)).abs() < 1e-9, "expected -0.35, got {s}");
    }

    #[test]
    fn negation_reaches_two_tokens_back() {
        assert!(score("not very good") < 0.0);
        assert!(score("not the very good") > 0.0);
    }

    #[test]
    fn mixed_text_returns_mean() {
        // good (+0.7) + bad (-0.7) = 0.0 mean
        assert_eq!(score("good but bad"), 0.0);
    }

    #[test]
    fn score_stays_in_range() {
        for text in [
            "absolutely perfect excellent awesome",
            "extremely terrible horrible worst",
            "super super super good",
        ] {
            let s = score(text);
            assert!((-1.0..=1.0).contains(&s), "out of range: {s} for {text}");
        }
    }

    #[test]
    fn punctuation_does_not_block_match() {
        let s = score("great!");
        assert!(s > 0.0, "expected positive score for 'great!', got {s}");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(score("GOOD"), score("good"));
    }

    #[test]
    fn deterministic() {
        let text = "package arrived late but the courier was polite";
        assert_eq!(score(text), score(text));
    }

    #[test]
    fn lexicon_words_survive_cleaning() {
        let dict = crate::dictionary::Dictionary::bundled();
        let vocabulary = LEXICON
            .iter()
            .map(|&(w, _)| w)
            .chain(INTENSIFIERS.iter().map(|&(w, _)| w))
            .chain(NEGATORS.iter().copied());
        for word in vocabulary {
            assert!(dict.contains(word), "{word} would be stripped before scoring");
        }
    }
}
