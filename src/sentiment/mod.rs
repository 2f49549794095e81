mod lexicon;
mod titles;

use std::sync::LazyLock;

use regex::Regex;

pub use titles::{PlaceholderTitles, TitleExtractor};

/// Maps free text to a compound polarity in [-1, 1].
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

const CAPS_INCREMENT: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const QUESTION_INCREMENT: f64 = 0.18;
const NORMALIZATION_ALPHA: f64 = 15.0;

/// How far back a booster or negation still reaches, with its damping.
const LOOKBACK_DAMPING: [f64; 3] = [1.0, 0.95, 0.9];

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z']*").expect("word pattern is valid"));

/// Lexicon and rule based scorer in the style of VADER.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = WORD.find_iter(text).map(|m| m.as_str()).collect();
        if tokens.is_empty() {
            return 0.0;
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps_differ = caps_differential(&tokens);

        let mut valences: Vec<f64> = (0..tokens.len())
            .map(|i| word_valence(&tokens, &lowered, i, caps_differ))
            .collect();

        if let Some(pivot) = lowered.iter().position(|w| w == "but") {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *v *= 0.5;
                } else if i > pivot {
                    *v *= 1.5;
                }
            }
        }

        let mut sum: f64 = valences.iter().sum();
        if sum == 0.0 {
            return 0.0;
        }

        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else {
            sum -= emphasis;
        }

        (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}

fn word_valence(tokens: &[&str], lowered: &[String], i: usize, caps_differ: bool) -> f64 {
    let word = lowered[i].as_str();
    if lexicon::booster(word).is_some() {
        return 0.0;
    }
    let Some(mut valence) = lexicon::valence(word) else {
        return 0.0;
    };

    if caps_differ && is_shouting(tokens[i]) {
        valence += CAPS_INCREMENT * valence.signum();
    }

    let mut negated = false;
    for (distance, damping) in LOOKBACK_DAMPING.iter().enumerate() {
        let Some(j) = i.checked_sub(distance + 1) else {
            break;
        };
        let previous = lowered[j].as_str();
        if let Some(boost) = lexicon::booster(previous) {
            let mut scalar = boost * valence.signum();
            if caps_differ && is_shouting(tokens[j]) {
                scalar += CAPS_INCREMENT * valence.signum();
            }
            valence += scalar * damping;
        }
        if lexicon::is_negation(previous) {
            negated = true;
        }
    }

    if negated {
        valence *= NEGATION_SCALAR;
    }
    valence
}

fn is_shouting(token: &str) -> bool {
    token.chars().filter(|c| c.is_alphabetic()).count() > 1
        && token.chars().all(|c| !c.is_lowercase())
}

/// True when some, but not all, words are upper case.
fn caps_differential(tokens: &[&str]) -> bool {
    let shouting = tokens.iter().filter(|t| is_shouting(t)).count();
    shouting > 0 && shouting < tokens.len()
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64;
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCREMENT,
        _ => 0.96,
    };
    exclamations * EXCLAMATION_INCREMENT + question_emphasis
}
