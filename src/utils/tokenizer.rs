/// Character class used to split names into words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Letter,
    Digit,
    Other,
}

impl CharClass {
    /// Classify a single char (Unicode-aware letters and digits)
    #[inline]
    pub fn of(ch: char) -> Self {
        if ch.is_alphabetic() {
            CharClass::Letter
        } else if ch.is_numeric() {
            CharClass::Digit
        } else {
            CharClass::Other
        }
    }
}

/// A run of chars of the same class inside a string.
///
/// Offsets are byte offsets into the string the word was split from and
/// always fall on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    pub start: usize,
    pub len: usize,
    pub class: CharClass,
}

impl Word {
    /// The text of this word within `source`
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.start + self.len]
    }

    /// First char of the word within `source`
    #[inline]
    pub fn first_char(&self, source: &str) -> Option<char> {
        self.text(source).chars().next()
    }

    /// Whether this word is letters or digits (not punctuation/separators)
    #[inline]
    pub fn is_salient(&self) -> bool {
        self.class != CharClass::Other
    }
}

/// Split a string into words.
/// Each word is only letters, only digits, or only other characters.
pub fn split_words(value: &str) -> Vec<Word> {
    let mut words = Vec::new();
    split_words_into(value, &mut words);
    words
}

/// Split a string into words, reusing `words` as the output buffer.
/// The buffer is cleared first.
pub fn split_words_into(value: &str, words: &mut Vec<Word>) {
    words.clear();

    let mut chars = value.char_indices();
    let Some((_, first)) = chars.next() else {
        return;
    };

    let mut current = Word {
        start: 0,
        len: 0,
        class: CharClass::of(first),
    };

    for (i, ch) in chars {
        let class = CharClass::of(ch);

        // New word each time the class changes
        if class != current.class {
            current.len = i - current.start;
            words.push(current);
            current = Word {
                start: i,
                len: 0,
                class,
            };
        }
    }

    current.len = value.len() - current.start;
    words.push(current);
}

/// Reverse a string by chars
pub fn reverse(value: &str) -> String {
    value.chars().rev().collect()
}
