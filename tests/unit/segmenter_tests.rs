/*!
 * Tests for sentence segmentation and per-sentence normalization
 */

use traduire::translation::segmenter::{AbbreviationGuard, Segmenter, SegmentationRules, capitalize_first};
use traduire::translation::segment;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Test the documented reference cases
#[test]
fn test_segment_withReferenceInputs_shouldMatchExpectedParts() {
    let empty = segment("");
    assert!(empty.sentences.is_empty());
    assert!(empty.separators.is_empty());

    let single = segment("Hello world.");
    assert_eq!(single.sentences, strings(&["Hello world."]));
    assert!(single.separators.is_empty());

    let pair = segment("Hello. World.");
    assert_eq!(pair.sentences, strings(&["Hello.", "World."]));
    assert_eq!(pair.separators, strings(&[" "]));
}

/// Test that separators keep the exact whitespace between sentences
#[test]
fn test_segment_withMixedWhitespace_shouldPreserveSeparators() {
    let segmentation = segment("Il pleut.\n\nIl vente!\t Quel temps? Bof.");

    assert_eq!(segmentation.sentences, strings(&["Il pleut.", "Il vente !", "Quel temps ?", "Bof."]));
    assert_eq!(segmentation.separators, strings(&["\n\n", "\t ", " "]));
}

/// Test trailing whitespace after the last terminator
#[test]
fn test_segment_withTrailingNewline_shouldEndWithEmptyUnit() {
    let segmentation = segment("Une. Deux.\n");

    assert_eq!(segmentation.sentences, strings(&["Une.", "Deux.", ""]));
    assert_eq!(segmentation.separators, strings(&[" ", "\n"]));
}

/// Test leading whitespace is trimmed away without creating a unit
#[test]
fn test_segment_withLeadingWhitespace_shouldTrimFirstUnit() {
    let segmentation = segment("   bonjour.");
    assert_eq!(segmentation.sentences, strings(&["Bonjour."]));
    assert!(segmentation.separators.is_empty());
}

/// Test the separator count invariant over a small corpus
#[test]
fn test_segment_withVariousInputs_shouldKeepSeparatorCountInvariant() {
    let corpus = [
        "Bonjour.",
        "Bonjour. ",
        "Bonjour. Salut.",
        "Mr. Smith est venu. Il est reparti!  ",
        "Eh bien... Oui.",
        "pas de ponctuation",
        "Où? Quand? Comment?",
        "\n\nA. B. C.\n",
    ];

    for text in corpus {
        let segmentation = segment(text);
        let sentences = segmentation.sentences.len();
        let separators = segmentation.separators.len();

        assert!(sentences >= 1, "input: {text:?}");
        assert!(separators + 1 >= sentences && separators <= sentences, "input: {text:?}");
    }
}

/// Test abbreviation guards with positive and negative examples
#[test]
fn test_segment_withAbbreviations_shouldFollowGuardHeuristic() {
    // (input, expected units)
    let cases: [(&str, &[&str]); 8] = [
        ("Mr. Smith arrived.", &["Mr. Smith arrived."]),
        ("Dr. Watson est là.", &["Dr. Watson est là."]),
        ("Il vit aux U.S. depuis 2010.", &["Il vit aux U.S. depuis 2010."]),
        ("Le taux est de 2.5? Non.", &["Le taux est de 2.5 ? Non."]),
        ("Mrs. Smith arrived.", &["Mrs.", "Smith arrived."]),
        ("Voici M. Dupont.", &["Voici M.", "Dupont."]),
        ("Eh bien... Oui.", &["Eh bien...", "Oui."]),
        ("Voir www.exemple.fr maintenant.", &["Voir www.exemple.fr maintenant."]),
    ];

    for (input, expected) in cases {
        assert_eq!(segment(input).sentences, strings(expected), "input: {input:?}");
    }
}

/// Test the guards directly on character windows
#[test]
fn test_abbreviationGuard_withCharacterWindows_shouldMatchPatterns() {
    let chars = |s: &str| s.chars().collect::<Vec<char>>();

    assert!(AbbreviationGuard::DottedPair.matches(&chars("e.g.")));
    assert!(AbbreviationGuard::DottedPair.matches(&chars("3.5?")));
    assert!(!AbbreviationGuard::DottedPair.matches(&chars("fin.")));
    assert!(!AbbreviationGuard::DottedPair.matches(&chars(".")));

    assert!(AbbreviationGuard::CapitalizedAbbreviation.matches(&chars("Mr.")));
    assert!(AbbreviationGuard::CapitalizedAbbreviation.matches(&chars(" St.")));
    assert!(!AbbreviationGuard::CapitalizedAbbreviation.matches(&chars("Mrs.")));
    assert!(!AbbreviationGuard::CapitalizedAbbreviation.matches(&chars("Mr!")));
}

/// Test per-sentence normalization of spacing, capitalization and punctuation
#[test]
fn test_normalizeSentence_withUntidyInput_shouldTidyIt() {
    let segmenter = Segmenter::new();

    assert_eq!(segmenter.normalize_sentence("bonjour , le monde ."), "Bonjour, le monde.");
    assert_eq!(segmenter.normalize_sentence("comment allez-vous?"), "Comment allez-vous ?");
    assert_eq!(segmenter.normalize_sentence("attention: chien méchant"), "Attention : chien méchant.");
    assert_eq!(segmenter.normalize_sentence("il est 10:30"), "Il est 10 :30.");
    assert_eq!(segmenter.normalize_sentence("déjà fini!"), "Déjà fini !");
    assert_eq!(segmenter.normalize_sentence("x^?"), "X^?");
}

/// Test that every non-empty unit ends with final punctuation
#[test]
fn test_segment_withUnterminatedText_shouldAppendPeriod() {
    let segmentation = segment("première phrase. deuxième phrase sans point");

    assert_eq!(segmentation.sentences, strings(&["Première phrase.", "Deuxième phrase sans point."]));
    for sentence in &segmentation.sentences {
        assert!(sentence.ends_with(['.', '?', '!', ':']));
    }
}

/// Test capitalization idempotence on a few scripts
#[test]
fn test_capitalizeFirst_appliedTwice_shouldEqualAppliedOnce() {
    for text in ["élève", "über", "ǆungla", "123 go", "Déjà", ""] {
        let once = capitalize_first(text);
        assert_eq!(capitalize_first(&once), once, "input: {text:?}");
    }
}

/// Test custom rules replacing the default terminators
#[test]
fn test_segmenter_withCustomTerminators_shouldSplitOnThem() {
    let rules = SegmentationRules {
        terminators: vec![';'],
        ..SegmentationRules::default()
    };
    let segmenter = Segmenter::with_rules(rules);

    let segmentation = segmenter.segment("un; deux. trois");
    assert_eq!(segmentation.sentences, strings(&["Un;.", "Deux. trois."]));
    assert_eq!(segmenter.rules().terminators, vec![';']);
}
