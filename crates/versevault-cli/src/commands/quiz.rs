//! The `versevault quiz` command.
//!
//! Each loop iteration is one render cycle: re-read the verse set, sync the
//! session, show the current verse, take answers, show results, and advance
//! if the user wants another verse.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use versevault_core::blanks::correct_count;
use versevault_core::{QuizMode, QuizSession, Verse, VerseId, VerseStore};

pub const EMPTY_VAULT_MESSAGE: &str = "Add at least one verse to use the quiz.";

pub async fn execute(store: &dyn VerseStore, mode: QuizMode) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout().lock();
    let mut session = QuizSession::new();
    run(store, &mut session, mode, &mut input, &mut output).await
}

/// Drive the quiz until the user stops or input ends.
pub async fn run<R: BufRead, W: Write>(
    store: &dyn VerseStore,
    session: &mut QuizSession,
    mode: QuizMode,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        let verses = store.list_verses().await?;
        if verses.is_empty() {
            writeln!(out, "{EMPTY_VAULT_MESSAGE}")?;
            return Ok(());
        }

        let ids: Vec<VerseId> = verses.iter().map(|v| v.id).collect();
        session.sync_traversal(mode, &ids);
        let verse = session.current_verse(mode, &verses)?;
        debug!(%mode, verse = verse.id, epoch = session.epoch(), "quiz cycle");

        let answered = match mode {
            QuizMode::Verbatim => memorize_cycle(session, verse, input, out)?,
            QuizMode::FillInTheBlank => blanks_cycle(session, verse, input, out)?,
        };
        if !answered || !ask_next(input, out)? {
            return Ok(());
        }
        session.advance(mode);
    }
}

fn memorize_cycle<R: BufRead, W: Write>(
    session: &mut QuizSession,
    verse: &Verse,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    writeln!(out, "\nVerse: {}", verse.reference)?;
    writeln!(out, "Type out the verse from memory:")?;
    out.flush()?;

    let Some(answer) = read_line(input)? else {
        return Ok(false);
    };
    let answer = answer.trim();
    session.submit_verbatim(verse.id, answer);

    writeln!(out, "\nYour answer:")?;
    writeln!(out, "{answer}")?;
    writeln!(out, "\nCorrect verse:")?;
    writeln!(out, "{}", verse.text)?;
    Ok(true)
}

fn blanks_cycle<R: BufRead, W: Write>(
    session: &mut QuizSession,
    verse: &Verse,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    let prompt = session.prompt_for(verse);
    writeln!(out, "\nVerse: {}", verse.reference)?;
    writeln!(out, "{}", prompt.text)?;

    let mut answers = Vec::with_capacity(prompt.answers.len());
    for blank in &prompt.answers {
        write!(out, "Answer for {}: ", blank.tag)?;
        out.flush()?;
        match read_line(input)? {
            Some(answer) => answers.push(answer),
            None => return Ok(false),
        }
    }
    let results = session.submit_blanks(verse, &answers);

    writeln!(out, "\nResults:")?;
    for result in &results {
        if result.correct {
            writeln!(out, "{}: {} ✅", result.tag, result.user_answer)?;
        } else {
            writeln!(
                out,
                "{}: {} ❌ (Correct: {})",
                result.tag, result.user_answer, result.expected
            )?;
        }
    }
    writeln!(out, "Score: {}/{}", correct_count(&results), results.len())?;
    Ok(true)
}

fn ask_next<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "\nNext verse? [Y/n] ")?;
    out.flush()?;
    let Some(reply) = read_line(input)? else {
        return Ok(false);
    };
    let reply = reply.trim().to_lowercase();
    Ok(!matches!(reply.as_str(), "n" | "no" | "q" | "quit"))
}

/// One line without its line ending, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
