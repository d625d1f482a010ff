use super::normalize::{fold_accent, normalize, strip_accents};

/// One character-level accent discrepancy between a submission and the
/// target, at a position in the normalized strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentMistake {
    pub position: usize,
    pub submitted: char,
    pub expected: char,
}

/// Locate accent-only mistakes. Returns an empty list when the normalized
/// strings already match (a true exact match) or when the accent-stripped
/// forms still differ (the error is not accent-only).
///
/// The positional comparison is exact: the accent table folds one char to
/// one char, so equal stripped forms imply equal character counts and the
/// zip below never truncates either string.
pub fn detect_accent_mistakes(submitted: &str, expected: &str) -> Vec<AccentMistake> {
    let submitted = normalize(submitted);
    let expected = normalize(expected);

    if submitted == expected {
        return Vec::new();
    }

    if strip_accents(&submitted) != strip_accents(&expected) {
        return Vec::new();
    }

    submitted
        .chars()
        .zip(expected.chars())
        .enumerate()
        .filter(|(_, (s, e))| s != e && fold_accent(*s) == fold_accent(*e))
        .map(|(position, (submitted, expected))| AccentMistake {
            position,
            submitted,
            expected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_has_no_mistakes() {
        assert!(detect_accent_mistakes("école", "école").is_empty());
    }

    #[test]
    fn exact_match_after_normalization_has_no_mistakes() {
        assert!(detect_accent_mistakes("  École! ", "école").is_empty());
    }

    #[test]
    fn missing_accent_is_located() {
        let mistakes = detect_accent_mistakes("ecole", "école");
        assert_eq!(
            mistakes,
            vec![AccentMistake {
                position: 0,
                submitted: 'e',
                expected: 'é',
            }]
        );
    }

    #[test]
    fn wrong_accent_counts_too() {
        let mistakes = detect_accent_mistakes("êcole", "école");
        assert_eq!(mistakes.len(), 1);
        assert_eq!(mistakes[0].submitted, 'ê');
        assert_eq!(mistakes[0].expected, 'é');
    }

    #[test]
    fn multiple_mistakes_stay_ordered() {
        let mistakes = detect_accent_mistakes("etudiant prefere", "étudiant préfère");
        let positions: Vec<usize> = mistakes.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 11, 13]);
    }

    #[test]
    fn non_accent_errors_yield_nothing() {
        assert!(detect_accent_mistakes("ecale", "école").is_empty());
        assert!(detect_accent_mistakes("chien", "chat").is_empty());
    }

    #[test]
    fn length_mismatch_is_not_accent_only() {
        assert!(detect_accent_mistakes("ecol", "école").is_empty());
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        assert!(detect_accent_mistakes("", "").is_empty());
        assert!(detect_accent_mistakes("", "école").is_empty());
    }
}
