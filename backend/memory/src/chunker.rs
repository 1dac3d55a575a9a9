//! Sentence-aware token chunking for LLM context.

use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_MAX_TOKENS: usize = 512;

/// An ordered run of tokens drawn from one or more whole sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenChunk(pub Vec<String>);

impl TokenChunk {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

/// Split `text` into sentences, each as its list of tokens.
///
/// Tokens are Unicode word-boundary segments with whitespace removed, so
/// punctuation comes out as tokens of its own.
pub fn sentence_tokens(text: &str) -> Vec<Vec<String>> {
    text.split_sentence_bounds()
        .map(|sentence| {
            sentence
                .split_word_bounds()
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// Every token of `text` in order, as the chunker sees them.
pub fn tokenize_words(text: &str) -> Vec<String> {
    sentence_tokens(text).into_iter().flatten().collect()
}

/// Greedily pack whole sentences into chunks of at most `max_tokens` tokens.
///
/// A sentence longer than `max_tokens` is never split; it becomes a chunk on
/// its own. Empty chunks are never produced.
pub fn tokenize(text: &str, max_tokens: usize) -> Vec<TokenChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for sentence in sentence_tokens(text) {
        if !current.is_empty() && current.len() + sentence.len() > max_tokens {
            chunks.push(TokenChunk(std::mem::take(&mut current)));
        }
        current.extend(sentence);
    }
    if !current.is_empty() {
        chunks.push(TokenChunk(current));
    }
    chunks
}

/// Flatten chunks back into text: tokens joined by spaces, one chunk per line.
pub fn render_chunks(chunks: &[TokenChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.0.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn splits_words_and_punctuation() {
        let tokens = tokenize_words("Hola, ¿cómo estás? Bien.");
        assert_eq!(tokens, vec!["Hola", ",", "¿", "cómo", "estás", "?", "Bien", "."]);
    }

    #[test]
    fn packs_sentences_greedily() {
        // 3 tokens per sentence
        let text = "One two. Three four. Five six.";
        let chunks = tokenize(text, 6);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].tokens(), ["One", "two", ".", "Three", "four", "."]);
        assert_eq!(chunks[1].tokens(), ["Five", "six", "."]);
    }

    #[test]
    fn oversized_sentence_is_its_own_chunk() {
        let text = "Short. This sentence is much longer than the limit allows. End.";
        let chunks = tokenize(text, 3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].tokens(), ["Short", "."]);
        assert!(chunks[1].len() > 3);
        assert_eq!(chunks[2].tokens(), ["End", "."]);
    }

    #[test]
    fn leading_oversized_sentence_yields_no_empty_chunk() {
        let chunks = tokenize("A very long opening sentence here. Ok.", 2);
        assert!(chunks.iter().all(|c| !c.is_empty()));
        assert_eq!(chunks.last().unwrap().tokens(), ["Ok", "."]);
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("", DEFAULT_MAX_TOKENS).is_empty());
        assert!(tokenize("   \n ", DEFAULT_MAX_TOKENS).is_empty());
        assert_eq!(render_chunks(&[]), "");
    }

    #[test]
    fn renders_one_line_per_chunk() {
        let chunks = tokenize("One two. Three four.", 3);
        assert_eq!(render_chunks(&chunks), "One two .\nThree four .");
    }

    proptest! {
        #[test]
        fn tokens_are_conserved_and_bounded(
            text in "[a-zA-Záéñ ,.?!]{0,400}",
            max_tokens in 1usize..64,
        ) {
            let sentences = sentence_tokens(&text);
            let chunks = tokenize(&text, max_tokens);

            let flattened: Vec<String> = chunks.iter().flat_map(|c| c.0.clone()).collect();
            prop_assert_eq!(flattened, tokenize_words(&text));

            for chunk in &chunks {
                prop_assert!(!chunk.is_empty());
                if chunk.len() > max_tokens {
                    prop_assert!(sentences.contains(&chunk.0));
                }
            }
        }

        #[test]
        fn chunking_is_deterministic(text in "\\PC{0,300}", max_tokens in 1usize..600) {
            prop_assert_eq!(tokenize(&text, max_tokens), tokenize(&text, max_tokens));
        }
    }
}
