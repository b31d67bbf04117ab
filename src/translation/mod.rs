/*!
 * Sentence-level translation pipeline.
 *
 * - `segmenter`: splits text into sentence units and separators
 * - `reassembler`: sanitizes translations and restores the original layout
 * - `core`: the service driving a translator over the sentence units
 */

// Re-export main types for easier usage
pub use self::core::{CancellationFlag, TranslationOptions, TranslationOutput, TranslationService};
pub use self::reassembler::{reassemble, sanitize};
pub use self::segmenter::{segment, Segmentation, SegmentationRules, Segmenter};

// Submodules
pub mod core;
pub mod reassembler;
pub mod segmenter;
