//! Quiz session state.
//!
//! A [`QuizSession`] holds everything a quiz view needs between render
//! cycles: one [`Traversal`] per mode, the blanks chosen for each verse on
//! its current visit, submitted answers, and an epoch counter. The verse set
//! can change between cycles, so callers run
//! [`QuizSession::sync_traversal`] before every read.

use std::collections::{HashMap, HashSet};
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blanks::{self, BlankResult, Prompt};
use crate::error::QuizError;
use crate::model::{Verse, VerseId};

/// The two quiz modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    /// Type the whole verse from memory, newest verse first.
    Verbatim,
    /// Fill numbered blanks, verses in a shuffled order.
    FillInTheBlank,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Verbatim => write!(f, "memorization"),
            QuizMode::FillInTheBlank => write!(f, "fill in the blank"),
        }
    }
}

/// An ordered sequence of verse ids plus a cursor.
///
/// The sequence never contains duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    ids: Vec<VerseId>,
    cursor: usize,
}

impl Traversal {
    pub fn ids(&self) -> &[VerseId] {
        &self.ids
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Verse id under the cursor.
    pub fn current(&self) -> Option<VerseId> {
        self.ids.get(self.cursor).copied()
    }

    fn same_set(&self, ids: &[VerseId]) -> bool {
        let mine: HashSet<VerseId> = self.ids.iter().copied().collect();
        let theirs: HashSet<VerseId> = ids.iter().copied().collect();
        mine == theirs
    }

    /// Replace the sequence, keeping the cursor on the same verse if it is
    /// still present.
    fn rebuild_in_order(&mut self, ids: Vec<VerseId>) {
        let current = if self.ids.is_empty() {
            None
        } else {
            let clamped = self.cursor.min(self.ids.len() - 1);
            Some(self.ids[clamped])
        };
        self.ids = ids;
        self.cursor = current
            .and_then(|id| self.ids.iter().position(|&other| other == id))
            .unwrap_or(0);
    }

    /// Replace the sequence with a fresh shuffle and rewind.
    fn rebuild_shuffled<R: Rng + ?Sized>(&mut self, mut ids: Vec<VerseId>, rng: &mut R) {
        ids.shuffle(rng);
        self.ids = ids;
        self.cursor = 0;
    }

    /// Step forward, wrapping after the last verse. Returns the id that was
    /// left behind.
    fn advance(&mut self) -> Option<VerseId> {
        let left = self.current()?;
        self.cursor = (self.cursor + 1) % self.ids.len();
        Some(left)
    }
}

/// Per-session quiz state, passed through the presentation layer.
#[derive(Debug)]
pub struct QuizSession {
    verbatim: Traversal,
    fill: Traversal,
    blanks: HashMap<VerseId, Vec<usize>>,
    results: HashMap<VerseId, Vec<BlankResult>>,
    verbatim_answers: HashMap<VerseId, String>,
    epoch: u64,
    rng: StdRng,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// A session seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A session with a deterministic shuffle and blank selection.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            verbatim: Traversal::default(),
            fill: Traversal::default(),
            blanks: HashMap::new(),
            results: HashMap::new(),
            verbatim_answers: HashMap::new(),
            epoch: 0,
            rng,
        }
    }

    pub fn traversal(&self, mode: QuizMode) -> &Traversal {
        match mode {
            QuizMode::Verbatim => &self.verbatim,
            QuizMode::FillInTheBlank => &self.fill,
        }
    }

    /// Bumped on every advance. Presentation layers can key input state on
    /// it to drop stale values.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Bring the traversal for `mode` in line with the current verse ids.
    ///
    /// Nothing happens while the id set is unchanged, so order and cursor
    /// survive repeated renders. When the set changes, verbatim mode keeps
    /// the order given (newest first) and stays on the same verse if it is
    /// still present; fill-in-the-blank reshuffles and rewinds.
    pub fn sync_traversal(&mut self, mode: QuizMode, current_ids: &[VerseId]) {
        let mut seen = HashSet::with_capacity(current_ids.len());
        let ids: Vec<VerseId> = current_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        if self.traversal(mode).same_set(&ids) {
            return;
        }

        debug!(%mode, verses = ids.len(), "rebuilding quiz traversal");
        match mode {
            QuizMode::Verbatim => {
                self.verbatim_answers.retain(|id, _| seen.contains(id));
                self.verbatim.rebuild_in_order(ids);
            }
            QuizMode::FillInTheBlank => {
                self.blanks.retain(|id, _| seen.contains(id));
                self.results.retain(|id, _| seen.contains(id));
                self.fill.rebuild_shuffled(ids, &mut self.rng);
            }
        }
    }

    /// Verse under the cursor for `mode`, looked up in `verses`.
    pub fn current_verse<'a>(
        &self,
        mode: QuizMode,
        verses: &'a [Verse],
    ) -> Result<&'a Verse, QuizError> {
        let id = self.traversal(mode).current().ok_or(QuizError::EmptyState)?;
        verses
            .iter()
            .find(|v| v.id == id)
            .ok_or(QuizError::UnknownVerse(id))
    }

    /// Move to the next verse, wrapping to the first after the last.
    ///
    /// Cached submissions for the verse being left are dropped; in
    /// fill-in-the-blank mode its blanks are dropped too so the next visit
    /// draws new ones. No-op on an empty traversal.
    pub fn advance(&mut self, mode: QuizMode) {
        let left = match mode {
            QuizMode::Verbatim => self.verbatim.advance(),
            QuizMode::FillInTheBlank => self.fill.advance(),
        };
        let Some(left) = left else {
            return;
        };

        match mode {
            QuizMode::Verbatim => {
                self.verbatim_answers.remove(&left);
            }
            QuizMode::FillInTheBlank => {
                self.blanks.remove(&left);
                self.results.remove(&left);
            }
        }
        self.epoch += 1;
        debug!(%mode, verse = left, epoch = self.epoch, "advanced quiz");
    }

    /// Blank positions for `verse` on its current visit, ascending.
    ///
    /// Drawn once per visit and reused until the verse is advanced past.
    pub fn blanks_for(&mut self, verse: &Verse) -> Vec<usize> {
        let rng = &mut self.rng;
        self.blanks
            .entry(verse.id)
            .or_insert_with(|| blanks::choose_blanks(rng, verse.words().len()))
            .clone()
    }

    /// Fill-in-the-blank prompt for `verse` using its cached blanks.
    pub fn prompt_for(&mut self, verse: &Verse) -> Prompt {
        let positions = self.blanks_for(verse);
        blanks::build_prompt(&verse.text, &positions)
    }

    /// Score `answers` for `verse` and cache the results until advance.
    pub fn submit_blanks<S: AsRef<str>>(
        &mut self,
        verse: &Verse,
        answers: &[S],
    ) -> Vec<BlankResult> {
        let prompt = self.prompt_for(verse);
        let results = blanks::score_answers(&prompt.answers, answers);
        self.results.insert(verse.id, results.clone());
        results
    }

    /// Cached fill-in-the-blank results for `id`, if submitted this visit.
    pub fn results_for(&self, id: VerseId) -> Option<&[BlankResult]> {
        self.results.get(&id).map(Vec::as_slice)
    }

    /// Remember what the user typed in verbatim mode until advance.
    pub fn submit_verbatim(&mut self, id: VerseId, text: impl Into<String>) {
        self.verbatim_answers.insert(id, text.into());
    }

    pub fn verbatim_submission(&self, id: VerseId) -> Option<&str> {
        self.verbatim_answers.get(&id).map(String::as_str)
    }

    /// Whether answers for the current verse of `mode` have been submitted
    /// and should be shown.
    pub fn is_revealed(&self, mode: QuizMode) -> bool {
        let Some(id) = self.traversal(mode).current() else {
            return false;
        };
        match mode {
            QuizMode::Verbatim => self.verbatim_answers.contains_key(&id),
            QuizMode::FillInTheBlank => self.results.contains_key(&id),
        }
    }
}
