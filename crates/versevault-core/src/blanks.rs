//! Fill-in-the-blank prompt generation and answer scoring.
//!
//! A verse is tokenized on whitespace. A handful of word positions are
//! chosen at random, replaced by numbered tags (`[1]`, `[2]`, ...) in
//! left-to-right order, and the stripped original words form the answer key.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Punctuation removed from expected words and user answers before comparing.
pub const PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '!', '?'];

/// Number of blanks for a verse with `word_count` words.
///
/// 3 up to 15 words, 5 up to 30, 7 beyond that, never more than the words
/// available.
pub fn blank_count(word_count: usize) -> usize {
    let target = if word_count <= 15 {
        3
    } else if word_count <= 30 {
        5
    } else {
        7
    };
    target.min(word_count)
}

/// Choose distinct word positions uniformly at random, sorted ascending.
pub fn choose_blanks<R: Rng + ?Sized>(rng: &mut R, word_count: usize) -> Vec<usize> {
    let amount = blank_count(word_count);
    let mut indices = rand::seq::index::sample(rng, word_count, amount).into_vec();
    indices.sort_unstable();
    indices
}

/// Remove every character in [`PUNCTUATION`].
pub fn strip_punctuation(word: &str) -> String {
    word.chars().filter(|c| !PUNCTUATION.contains(c)).collect()
}

/// Lower-case, trim, then strip punctuation.
pub fn normalize_answer(answer: &str) -> String {
    strip_punctuation(answer.to_lowercase().trim())
}

/// One tagged blank and the word that belongs there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankAnswer {
    /// Positional tag as shown in the prompt (e.g. "[1]").
    pub tag: String,
    /// The original word with punctuation stripped, case preserved.
    pub expected: String,
}

/// A rendered fill-in-the-blank prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Verse text with blanked words replaced by their tags.
    pub text: String,
    /// Answer key in tag order `[1]..[k]`.
    pub answers: Vec<BlankAnswer>,
}

/// Build the prompt for `text` with the words at `blank_indices` blanked.
///
/// Tags are numbered by ascending word position regardless of the order of
/// `blank_indices`. Duplicate and out-of-range positions are ignored.
pub fn build_prompt(text: &str, blank_indices: &[usize]) -> Prompt {
    let mut words: Vec<String> = text.split_whitespace().map(str::to_string).collect();

    let mut positions: Vec<usize> = blank_indices
        .iter()
        .copied()
        .filter(|&i| i < words.len())
        .collect();
    positions.sort_unstable();
    positions.dedup();

    let mut answers = Vec::with_capacity(positions.len());
    for (n, idx) in positions.into_iter().enumerate() {
        let tag = format!("[{}]", n + 1);
        let expected = strip_punctuation(&words[idx]);
        words[idx] = tag.clone();
        answers.push(BlankAnswer { tag, expected });
    }

    Prompt {
        text: words.join(" "),
        answers,
    }
}

/// Outcome for a single blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankResult {
    pub tag: String,
    /// Exactly what the user typed.
    pub user_answer: String,
    pub expected: String,
    pub correct: bool,
}

/// Score `user_answers` against the answer key.
///
/// `user_answers[k - 1]` is the answer for tag `[k]`; missing entries count
/// as empty. Comparison ignores case, surrounding whitespace, and
/// [`PUNCTUATION`].
pub fn score_answers<S: AsRef<str>>(
    answers: &[BlankAnswer],
    user_answers: &[S],
) -> Vec<BlankResult> {
    answers
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            let user_answer: &str = user_answers
                .get(i)
                .map(|s| s.as_ref())
                .unwrap_or_default();
            let correct = normalize_answer(user_answer) == answer.expected.to_lowercase();
            BlankResult {
                tag: answer.tag.clone(),
                user_answer: user_answer.to_string(),
                expected: answer.expected.clone(),
                correct,
            }
        })
        .collect()
}

/// Number of correct results.
pub fn correct_count(results: &[BlankResult]) -> usize {
    results.iter().filter(|r| r.correct).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn blank_count_policy() {
        assert_eq!(blank_count(10), 3);
        assert_eq!(blank_count(15), 3);
        assert_eq!(blank_count(16), 5);
        assert_eq!(blank_count(20), 5);
        assert_eq!(blank_count(30), 5);
        assert_eq!(blank_count(31), 7);
        assert_eq!(blank_count(40), 7);
        assert_eq!(blank_count(2), 2);
        assert_eq!(blank_count(0), 0);
    }

    #[test]
    fn choose_blanks_distinct_sorted_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in [0usize, 1, 2, 3, 10, 20, 40, 100] {
            let picked = choose_blanks(&mut rng, n);
            assert_eq!(picked.len(), blank_count(n));
            assert!(picked.windows(2).all(|w| w[0] < w[1]), "{picked:?}");
            assert!(picked.iter().all(|&i| i < n));
        }
    }

    #[test]
    fn prompt_tags_follow_word_order() {
        let prompt = build_prompt("In the beginning, God created", &[3, 0]);
        assert_eq!(prompt.text, "[1] the beginning, [2] created");
        assert_eq!(
            prompt.answers,
            vec![
                BlankAnswer {
                    tag: "[1]".into(),
                    expected: "In".into()
                },
                BlankAnswer {
                    tag: "[2]".into(),
                    expected: "God".into()
                },
            ]
        );
    }

    #[test]
    fn prompt_strips_punctuation_from_expected() {
        let prompt = build_prompt("Jesus wept; truly! Amen?", &[1, 2, 3]);
        assert_eq!(prompt.text, "Jesus [1] [2] [3]");
        let expected: Vec<&str> = prompt.answers.iter().map(|a| a.expected.as_str()).collect();
        assert_eq!(expected, vec!["wept", "truly", "Amen"]);
    }

    #[test]
    fn prompt_ignores_duplicate_and_out_of_range_positions() {
        let prompt = build_prompt("one two three", &[1, 1, 9]);
        assert_eq!(prompt.text, "one [1] three");
        assert_eq!(prompt.answers.len(), 1);
    }

    #[test]
    fn score_is_case_whitespace_and_punctuation_insensitive() {
        let key = vec![BlankAnswer {
            tag: "[1]".into(),
            expected: "Lord".into(),
        }];
        let results = score_answers(&key, &[" lord. "]);
        assert!(results[0].correct);
        assert_eq!(results[0].user_answer, " lord. ");
        assert_eq!(results[0].expected, "Lord");

        let results = score_answers(&key, &["lords"]);
        assert!(!results[0].correct);
    }

    #[test]
    fn score_preserves_tag_order_and_handles_missing_answers() {
        let prompt = build_prompt("For God so loved the world", &[1, 3, 5]);
        let results = score_answers(&prompt.answers, &["god", "LOVED"]);
        let tags: Vec<&str> = results.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["[1]", "[2]", "[3]"]);
        assert!(results[0].correct);
        assert!(results[1].correct);
        assert!(!results[2].correct);
        assert_eq!(results[2].user_answer, "");
        assert_eq!(correct_count(&results), 2);
    }
}
