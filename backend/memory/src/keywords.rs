use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::stopwords::StopWordLanguage;

pub const DEFAULT_KEYWORD_COUNT: usize = 5;

/// The `k` most frequent content words of `text`, most frequent first.
///
/// Words are lowercased, must be purely alphabetic and must not be stop words
/// of `language`. Equal counts keep the order in which the words first appear.
pub fn extract_keywords(text: &str, k: usize, language: StopWordLanguage) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in lowered.unicode_words() {
        if !word.chars().all(char::is_alphabetic) || language.contains(word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // sort_by is stable, so ties stay in first-seen order
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(k).map(str::to_string).collect()
}
