//! Text metrics computed over the main readable text of a page.

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Counts non-overlapping, case-insensitive occurrences of `keyword` in `text`.
pub fn count_keyword(text: &str, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    let keyword = keyword.to_lowercase();
    text.to_lowercase().matches(keyword.as_str()).count()
}

pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    haystack.to_lowercase().contains(&keyword.to_lowercase())
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keyword occurrences as a percentage of all words, 0 for empty text.
pub fn keyword_density(keyword_count: usize, total_words: usize) -> f64 {
    if total_words == 0 {
        return 0.0;
    }
    round2(keyword_count as f64 / total_words as f64 * 100.0)
}

/// Number of sentences, delimited by runs of `.`, `!` or `?`.
pub fn sentence_count(text: &str) -> usize {
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|segment| !segment.trim().is_empty())
        .count();

    if sentences == 0 && word_count(text) > 0 {
        1
    } else {
        sentences
    }
}

/// Word count of every non-empty sentence, in order.
pub fn sentence_lengths(text: &str) -> Vec<usize> {
    text.split(['.', '!', '?'])
        .map(word_count)
        .filter(|&words| words > 0)
        .collect()
}

/// Mean and population variance of `values`, both rounded; zeros when empty.
pub fn mean_and_variance(values: &[usize]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (round2(mean), round2(variance))
}

/// Estimates syllables by counting vowel groups.
pub fn syllable_count(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if letters.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut groups = 0;
    let mut previous_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }

    // silent trailing "e", but not "-le" as in "table"
    let len = letters.len();
    if groups > 1 && letters[len - 1] == 'e' && !(len >= 2 && letters[len - 2] == 'l') {
        groups -= 1;
    }

    groups.max(1)
}

/// Flesch reading-ease score, rounded to two decimals. Text without words scores 0.
pub fn flesch_reading_ease(text: &str) -> f64 {
    let words = word_count(text);
    if words == 0 {
        return 0.0;
    }

    let sentences = sentence_count(text).max(1);
    let syllables: usize = text.split_whitespace().map(syllable_count).sum();

    let words_per_sentence = words as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words as f64;

    round2(206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word)
}
