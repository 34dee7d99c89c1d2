//! Transcript segments and result-batch folding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::RecognitionResult;

/// One finalized piece of recognized speech.  Never modified after it is
/// appended; only [`clear_transcript`] removes segments, all at once.
///
/// [`clear_transcript`]: super::RecognitionAdapter::clear_transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub is_final: bool,
    pub timestamp: DateTime<Utc>,
}

/// What a result batch contributes to the adapter state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOutcome {
    /// Segments to append, in result order.
    pub finals: Vec<TranscriptSegment>,
    /// The new interim text.  Replaces the previous one wholesale.
    pub interim: String,
}

/// Fold the results from `resume_index` onward.
///
/// Final results become segments (best alternative, stamped `now`); non-final
/// results are concatenated into a fresh interim string.
///
/// ```
/// use chrono::Utc;
/// use speech_adapters::platform::RecognitionResult;
/// use speech_adapters::recognition::fold_batch;
///
/// let results = vec![
///     RecognitionResult::final_text("hello"),
///     RecognitionResult::final_text("world"),
///     RecognitionResult::interim_text("how a"),
///     RecognitionResult::interim_text("re you"),
/// ];
/// let out = fold_batch(&results, 1, Utc::now());
/// assert_eq!(out.finals.len(), 1);
/// assert_eq!(out.finals[0].text, "world");
/// assert_eq!(out.interim, "how are you");
/// ```
pub fn fold_batch(
    results: &[RecognitionResult],
    resume_index: usize,
    now: DateTime<Utc>,
) -> BatchOutcome {
    let mut out = BatchOutcome::default();
    for result in results.iter().skip(resume_index) {
        if result.is_final {
            out.finals.push(TranscriptSegment {
                text: result.best().to_string(),
                is_final: true,
                timestamp: now,
            });
        } else {
            out.interim.push_str(result.best());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finals_keep_result_order() {
        let results = vec![
            RecognitionResult::final_text("one"),
            RecognitionResult::final_text("two"),
            RecognitionResult::final_text("three"),
        ];
        let out = fold_batch(&results, 0, Utc::now());
        let texts: Vec<_> = out.finals.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
        assert!(out.finals.iter().all(|s| s.is_final));
        assert!(out.interim.is_empty());
    }

    #[test]
    fn results_before_resume_index_are_skipped() {
        let results = vec![
            RecognitionResult::final_text("already seen"),
            RecognitionResult::interim_text("new"),
        ];
        let out = fold_batch(&results, 1, Utc::now());
        assert!(out.finals.is_empty());
        assert_eq!(out.interim, "new");
    }

    #[test]
    fn resume_index_past_end_yields_nothing() {
        let results = vec![RecognitionResult::final_text("x")];
        assert_eq!(fold_batch(&results, 5, Utc::now()), BatchOutcome::default());
    }

    #[test]
    fn mixed_batch() {
        let results = vec![
            RecognitionResult::interim_text("a"),
            RecognitionResult::final_text("b"),
            RecognitionResult::interim_text("c"),
        ];
        let out = fold_batch(&results, 0, Utc::now());
        assert_eq!(out.finals.len(), 1);
        assert_eq!(out.finals[0].text, "b");
        assert_eq!(out.interim, "ac");
    }

    #[test]
    fn segments_carry_the_given_timestamp() {
        let now = Utc::now();
        let out = fold_batch(&[RecognitionResult::final_text("t")], 0, now);
        assert_eq!(out.finals[0].timestamp, now);
    }
}
