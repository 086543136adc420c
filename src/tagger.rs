//! Part-of-speech tagging collaborators
//!
//! The engine only consumes `(surface text, tag)` pairs. Anything that can
//! produce them implements [`Tagger`]. Two taggers ship with the crate: a
//! word-list [`Lexicon`] and [`PreTagged`], which reads `word/TAG` text.

use crate::error::{GrammarError, TagError};
use crate::input_stream::InputStream;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A surface word and the tag assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        TaggedToken {
            text: text.into(),
            tag: tag.into(),
        }
    }

    /// Terminal instance named by the tag, carrying the surface text.
    pub fn to_symbol(&self) -> Symbol {
        Symbol::with_value(self.tag.clone(), self.text.clone())
    }
}

/// Maps raw text to an ordered sequence of tagged tokens.
pub trait Tagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TagError>;
}

/// A word with its character offset in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub position: usize,
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '\'' || ch == '-'
}

/// Contraction endings split off as their own token: `didn't` is `did` `n't`.
const CLITICS: [&str; 7] = ["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Byte offset where a trailing clitic starts, if the word has a head before it.
fn clitic_start(word: &str) -> Option<usize> {
    CLITICS.iter().find_map(|clitic| {
        let start = word.len().checked_sub(clitic.len())?;
        (start > 0 && word.is_char_boundary(start) && word[start..].eq_ignore_ascii_case(clitic))
            .then_some(start)
    })
}

/// Split text into words and single punctuation characters.
///
/// Contractions are split before their clitic (`man's` is `man` `'s`), so a
/// lexicon tags each part on its own. Positions are character offsets.
pub fn tokenize(text: &str) -> Vec<Word> {
    let mut stream = InputStream::new(text);
    let mut words = Vec::new();

    loop {
        stream.skip_whitespace();
        let position = stream.position();
        let Some(ch) = stream.current() else {
            break;
        };

        if !is_word_char(ch) {
            stream.advance();
            words.push(Word {
                text: ch.to_string(),
                position,
            });
            continue;
        }

        let mut text = stream.take_while(is_word_char);
        match clitic_start(&text) {
            Some(start) => {
                let clitic = text.split_off(start);
                let clitic_position = position + text.chars().count();
                words.push(Word { text, position });
                words.push(Word {
                    text: clitic,
                    position: clitic_position,
                });
            }
            None => words.push(Word { text, position }),
        }
    }

    words
}

/// Word-list tagger. Looks a word up as written, then lowercased.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, String>,
}

impl Lexicon {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Lexicon { entries }
    }

    /// Load `{ "word": "TAG", ... }`.
    pub fn from_json_str(json: &str) -> Result<Self, GrammarError> {
        Ok(Lexicon::new(serde_json::from_str(json)?))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let text = fs::read_to_string(path)?;
        Lexicon::from_json_str(&text)
    }

    pub fn insert(&mut self, word: impl Into<String>, tag: impl Into<String>) {
        self.entries.insert(word.into(), tag.into());
    }

    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.entries
            .get(word)
            .or_else(|| self.entries.get(&word.to_lowercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Tagger for Lexicon {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TagError> {
        tokenize(text)
            .into_iter()
            .map(|word| match self.lookup(&word.text) {
                Some(tag) => Ok(TaggedToken::new(word.text, tag)),
                None => {
                    let (line, column) = InputStream::new(text).line_col(word.position);
                    Err(TagError::UnknownWord {
                        word: word.text,
                        line,
                        column,
                    })
                }
            })
            .collect()
    }
}

/// Reads text that is already tagged: `The/ART man/N ate/V`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreTagged;

impl Tagger for PreTagged {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TagError> {
        text.split_whitespace()
            .map(|item| match item.rsplit_once('/') {
                Some((word, tag)) if !word.is_empty() && !tag.is_empty() => {
                    Ok(TaggedToken::new(word, tag))
                }
                _ => Err(TagError::Malformed(item.to_string())),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words_and_punctuation() {
        let words: Vec<String> = tokenize("The man ate a carrot, didn't he?")
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(
            words,
            vec!["The", "man", "ate", "a", "carrot", ",", "did", "n't", "he", "?"]
        );
    }

    #[test]
    fn test_tokenize_splits_clitics() {
        let words = tokenize("the man's dog");
        assert_eq!(words[1], Word { text: "man".into(), position: 4 });
        assert_eq!(words[2], Word { text: "'s".into(), position: 7 });
        assert_eq!(words[3], Word { text: "dog".into(), position: 10 });

        let words: Vec<String> = tokenize("They'll say I'm late, WON'T they")
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(
            words,
            vec!["They", "'ll", "say", "I", "'m", "late", ",", "WO", "N'T", "they"]
        );

        // A bare clitic or a hyphenated word stays whole.
        let words: Vec<String> = tokenize("'s well-known").into_iter().map(|w| w.text).collect();
        assert_eq!(words, vec!["'s", "well-known"]);
    }

    #[test]
    fn test_tokenize_positions() {
        let words = tokenize("  the  man");
        assert_eq!(words[0], Word { text: "the".into(), position: 2 });
        assert_eq!(words[1], Word { text: "man".into(), position: 7 });
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_lexicon_case_fallback() {
        let lexicon = Lexicon::from_json_str(r#"{"the": "ART", "man": "N"}"#).unwrap();

        let tokens = lexicon.tag("The man").unwrap();

        assert_eq!(
            tokens,
            vec![TaggedToken::new("The", "ART"), TaggedToken::new("man", "N")]
        );
    }

    #[test]
    fn test_lexicon_unknown_word_position() {
        let mut lexicon = Lexicon::default();
        lexicon.insert("the", "ART");

        let err = lexicon.tag("the\nthe zebra").unwrap_err();

        assert_eq!(
            err,
            TagError::UnknownWord {
                word: "zebra".to_string(),
                line: 2,
                column: 5
            }
        );
    }

    #[test]
    fn test_pretagged() {
        let tokens = PreTagged.tag("The/ART man/N  ate/VBD 1/2/CD").unwrap();
        assert_eq!(tokens[2], TaggedToken::new("ate", "VBD"));
        assert_eq!(tokens[3], TaggedToken::new("1/2", "CD"));
        assert_eq!(tokens[0].to_symbol().value.as_deref(), Some("The"));
    }

    #[test]
    fn test_pretagged_malformed() {
        assert_eq!(
            PreTagged.tag("The/ART man").unwrap_err(),
            TagError::Malformed("man".to_string())
        );
        assert!(PreTagged.tag("/N").is_err());
    }
}
