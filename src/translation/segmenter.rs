/*!
 * Sentence segmentation for model inputs.
 *
 * Splits a block of free-form text into capitalized, punctuated sentence
 * units and keeps the whitespace that separated them, so translated
 * sentences can be stitched back together with the original layout.
 *
 * Boundaries are found by a small scanner instead of a regular expression:
 * a boundary is the whitespace run that follows a terminator, unless one of
 * the abbreviation guards recognizes the text right before it.
 */

use log::trace;

/// Result of segmenting a block of text.
///
/// `separators[i]` is the text that followed `sentences[i]` in the input.
/// There is one separator fewer than sentences, or as many when the input
/// ends with whitespace after its last terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    /// Normalized sentence units, in input order
    pub sentences: Vec<String>,

    /// Whitespace found between consecutive sentences, in input order
    pub separators: Vec<String>,
}

impl Segmentation {
    /// Number of sentence units
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether no sentence unit was produced
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Split into `(sentences, separators)`
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.sentences, self.separators)
    }
}

/// Context patterns that keep a terminator from ending a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbbreviationGuard {
    /// Word, period, word, terminator: `e.g.`, `U.S.`, `3.5?`
    DottedPair,

    /// ASCII capital, ASCII lowercase, period: `Mr.`, `Dr.`, `St.`
    CapitalizedAbbreviation,
}

impl AbbreviationGuard {
    /// Check the guard against the characters preceding a boundary candidate.
    ///
    /// The last element of `before` is the terminator itself.
    pub fn matches(&self, before: &[char]) -> bool {
        let n = before.len();
        match self {
            Self::DottedPair => {
                n >= 4
                    && is_word_char(before[n - 4])
                    && before[n - 3] == '.'
                    && is_word_char(before[n - 2])
            }
            Self::CapitalizedAbbreviation => {
                n >= 3
                    && before[n - 3].is_ascii_uppercase()
                    && before[n - 2].is_ascii_lowercase()
                    && before[n - 1] == '.'
            }
        }
    }
}

/// Rule set driving segmentation and per-sentence normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationRules {
    /// Characters that may end a sentence when followed by whitespace
    pub terminators: Vec<char>,

    /// Guards suppressing a boundary after an abbreviation
    pub abbreviation_guards: Vec<AbbreviationGuard>,

    /// Marks that get a single space inserted before them, applied in order
    pub spaced_marks: Vec<char>,

    /// Characters after which no space is ever inserted
    pub no_space_markers: Vec<char>,

    /// Characters a sentence unit may end with; otherwise a period is appended
    pub final_punctuation: Vec<char>,
}

impl Default for SegmentationRules {
    fn default() -> Self {
        Self {
            terminators: vec!['.', '?', '!'],
            abbreviation_guards: vec![
                AbbreviationGuard::DottedPair,
                AbbreviationGuard::CapitalizedAbbreviation,
            ],
            spaced_marks: vec!['!', '?', ':'],
            no_space_markers: vec!['^'],
            final_punctuation: vec!['.', '?', '!', ':'],
        }
    }
}

/// Sentence segmenter
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    rules: SegmentationRules,
}

impl Segmenter {
    /// Create a segmenter with the default rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter with a custom rule set
    pub fn with_rules(rules: SegmentationRules) -> Self {
        Self { rules }
    }

    /// Rules in use
    pub fn rules(&self) -> &SegmentationRules {
        &self.rules
    }

    /// Split `text` into normalized sentence units and their separators.
    ///
    /// Empty or whitespace-only text yields an empty segmentation.
    pub fn segment(&self, text: &str) -> Segmentation {
        if text.trim().is_empty() {
            return Segmentation::default();
        }

        let chars: Vec<char> = text.chars().collect();
        let offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
        let byte_at = |index: usize| offsets.get(index).copied().unwrap_or(text.len());

        let mut raw_segments = Vec::new();
        let mut separators = Vec::new();
        let mut segment_start = 0;
        let mut i = 0;

        while i < chars.len() {
            if chars[i].is_whitespace() && self.is_boundary(&chars[..i]) {
                let mut end = i;
                while end < chars.len() && chars[end].is_whitespace() {
                    end += 1;
                }

                raw_segments.push(&text[segment_start..byte_at(i)]);
                separators.push(text[byte_at(i)..byte_at(end)].to_string());
                segment_start = byte_at(end);
                i = end;
                continue;
            }
            i += 1;
        }
        raw_segments.push(&text[segment_start..]);

        let sentences: Vec<String> = raw_segments
            .into_iter()
            .map(|raw| self.normalize_sentence(raw))
            .collect();

        trace!("Segmented {} chars into {} sentence(s)", chars.len(), sentences.len());

        Segmentation { sentences, separators }
    }

    /// Whether the whitespace following `before` starts a sentence boundary
    fn is_boundary(&self, before: &[char]) -> bool {
        let Some(&last) = before.last() else {
            return false;
        };

        if !self.rules.terminators.contains(&last) {
            return false;
        }

        !self
            .rules
            .abbreviation_guards
            .iter()
            .any(|guard| guard.matches(before))
    }

    /// Trim, capitalize, fix spacing and terminate one raw segment.
    ///
    /// A segment that is empty after trimming stays empty.
    pub fn normalize_sentence(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let mut sentence = self.normalize_spacing(&capitalize_first(trimmed));

        if !sentence.ends_with(self.rules.final_punctuation.as_slice()) {
            sentence.push('.');
        }

        sentence
    }

    /// Remove spaces before `,` and `.`, then space out each spaced mark
    pub fn normalize_spacing(&self, sentence: &str) -> String {
        let mut result = sentence.replace(" ,", ",").replace(" .", ".");

        for &mark in &self.rules.spaced_marks {
            result = self.space_before_mark(&result, mark);
        }

        result
    }

    /// Insert one space before every `mark` that is glued to the preceding
    /// character.
    ///
    /// Matches do not overlap: a mark that was just spaced cannot serve as
    /// the preceding character of the next one, so `"Wow!!"` becomes
    /// `"Wow !!"`.
    fn space_before_mark(&self, text: &str, mark: char) -> String {
        let mut result = String::with_capacity(text.len() + 4);
        let mut previous: Option<char> = None;
        let mut previous_spaced = false;

        for ch in text.chars() {
            let mut spaced = false;

            if ch == mark {
                if let Some(prev) = previous {
                    if !previous_spaced
                        && !prev.is_whitespace()
                        && !self.rules.no_space_markers.contains(&prev)
                    {
                        result.push(' ');
                        spaced = true;
                    }
                }
            }

            result.push(ch);
            previous = Some(ch);
            previous_spaced = spaced;
        }

        result
    }
}

/// Segment `text` with the default rules
pub fn segment(text: &str) -> Segmentation {
    Segmenter::new().segment(text)
}

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
