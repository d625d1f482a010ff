use itertools::Itertools;

/// Produce the canonical comparable form of a submission or target:
/// lowercased, whitespace collapsed to single spaces and trimmed, and all
/// punctuation removed except apostrophes. Accented letters count as word
/// characters and survive the punctuation pass.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = lowered.split_whitespace().join(" ");

    collapsed
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '\'' | '_'))
        .collect()
}

/// Replace each accented French letter with its base letter. Only the
/// explicit table below is folded; everything else passes through. No
/// locale-aware Unicode decomposition is involved.
pub fn strip_accents(text: &str) -> String {
    text.chars().map(fold_accent).collect()
}

/// The fixed accent table: every entry maps one char to one char, so
/// stripping never changes a string's character count.
pub(crate) fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ä' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ÿ' => 'y',
        'ç' => 'c',
        other => other,
    }
}
