use std::collections::HashMap;
use std::sync::LazyLock;

/// Mean valence ratings on a [-4, 4] scale, general news vocabulary plus
/// common market terms.
const VALENCES: &[(&str, f64)] = &[
    ("abandon", -1.9),
    ("accomplish", 1.8),
    ("advance", 1.2),
    ("agree", 1.5),
    ("alarm", -1.4),
    ("anger", -2.7),
    ("angry", -2.3),
    ("attack", -2.1),
    ("bad", -2.5),
    ("bankrupt", -2.6),
    ("bankruptcy", -2.6),
    ("beautiful", 2.9),
    ("benefit", 2.0),
    ("best", 3.2),
    ("better", 1.9),
    ("boom", 1.9),
    ("boost", 1.7),
    ("breakthrough", 2.3),
    ("bright", 1.9),
    ("calm", 1.3),
    ("catastrophe", -3.4),
    ("celebrate", 2.7),
    ("collapse", -2.4),
    ("concern", -1.0),
    ("confident", 2.2),
    ("conflict", -1.3),
    ("crash", -1.7),
    ("crisis", -3.1),
    ("damage", -2.2),
    ("danger", -2.4),
    ("dead", -3.3),
    ("death", -2.9),
    ("decline", -1.1),
    ("default", -1.4),
    ("deficit", -1.7),
    ("delay", -1.3),
    ("destroy", -2.6),
    ("disaster", -3.1),
    ("dispute", -1.7),
    ("downturn", -1.6),
    ("drop", -1.1),
    ("easy", 1.9),
    ("excellent", 2.7),
    ("excited", 2.2),
    ("fail", -2.5),
    ("failure", -2.3),
    ("fall", -0.9),
    ("fear", -2.2),
    ("fine", 0.8),
    ("fraud", -2.8),
    ("gain", 2.0),
    ("gains", 1.8),
    ("good", 1.9),
    ("great", 3.1),
    ("grow", 1.6),
    ("growth", 1.6),
    ("happy", 2.7),
    ("harm", -2.5),
    ("hate", -2.7),
    ("help", 1.7),
    ("hope", 1.9),
    ("hurt", -2.4),
    ("improve", 1.9),
    ("improved", 2.1),
    ("innovative", 1.9),
    ("kill", -3.7),
    ("killed", -3.5),
    ("lose", -1.6),
    ("loss", -1.3),
    ("losses", -1.7),
    ("love", 3.2),
    ("nice", 1.8),
    ("optimism", 2.5),
    ("optimistic", 1.3),
    ("panic", -2.3),
    ("peace", 2.5),
    ("plunge", -1.8),
    ("poor", -2.1),
    ("positive", 2.6),
    ("profit", 1.9),
    ("profitable", 1.9),
    ("progress", 1.8),
    ("protest", -1.0),
    ("rally", 1.5),
    ("recession", -2.0),
    ("record", 0.5),
    ("recover", 1.6),
    ("recovery", 1.4),
    ("risk", -1.1),
    ("robust", 1.4),
    ("sad", -2.1),
    ("safe", 1.9),
    ("scandal", -2.6),
    ("slump", -1.9),
    ("soar", 2.0),
    ("stable", 1.2),
    ("strong", 2.3),
    ("success", 2.7),
    ("successful", 2.8),
    ("support", 1.7),
    ("surge", 1.6),
    ("terrible", -2.1),
    ("terror", -3.0),
    ("threat", -2.4),
    ("tumble", -1.5),
    ("uncertain", -1.2),
    ("uncertainty", -1.4),
    ("violence", -3.1),
    ("war", -2.9),
    ("weak", -1.9),
    ("win", 2.8),
    ("wins", 2.7),
    ("wonderful", 2.7),
    ("worry", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
];

/// Intensifiers (positive) and dampeners (negative) applied to the next
/// sentiment-bearing word.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("completely", 0.293),
    ("especially", 0.293),
    ("extremely", 0.293),
    ("highly", 0.293),
    ("hugely", 0.293),
    ("incredibly", 0.293),
    ("really", 0.293),
    ("so", 0.293),
    ("totally", 0.293),
    ("very", 0.293),
    ("barely", -0.293),
    ("hardly", -0.293),
    ("marginally", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
];

const NEGATIONS: &[&str] = &[
    "aint", "cannot", "cant", "didnt", "doesnt", "dont", "isnt", "neither", "never",
    "no", "nobody", "none", "nor", "not", "nothing", "nowhere", "wasnt", "without", "wont",
];

static VALENCE_MAP: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| VALENCES.iter().copied().collect());

static BOOSTER_MAP: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| BOOSTERS.iter().copied().collect());

pub fn valence(word: &str) -> Option<f64> {
    VALENCE_MAP.get(word).copied()
}

pub fn booster(word: &str) -> Option<f64> {
    BOOSTER_MAP.get(word).copied()
}

/// `word` must already be lowercase.
pub fn is_negation(word: &str) -> bool {
    word.ends_with("n't") || NEGATIONS.contains(&word.replace('\'', "").as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_have_no_duplicate_words() {
        assert_eq!(VALENCE_MAP.len(), VALENCES.len());
        assert_eq!(BOOSTER_MAP.len(), BOOSTERS.len());
    }

    #[test]
    fn negations_cover_contractions() {
        assert!(is_negation("isn't"));
        assert!(is_negation("dont"));
        assert!(is_negation("never"));
        assert!(!is_negation("known"));
    }
}
