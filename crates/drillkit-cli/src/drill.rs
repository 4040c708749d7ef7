//! Interactive terminal loop for one session.
//!
//! Besides answers, every prompt accepts `:s` (speak the term), `:r`
//! (restart the session) and `:q` (leave). End of input counts as `:q`.

use std::io::{self, Write};

use drillkit_engine::shuffle::Shuffler;
use drillkit_engine::{Answer, Card, FlushBatch, FlushQueue, Mode, Question, Session, Summary};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::speech::Speaker;

/// Line-based terminal I/O.
pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    /// Wrap an input stream and an output sink.
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    /// Print a line.
    pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", text.as_ref())
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    pub async fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{} ", label)?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }
}

/// How a drill ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every card was answered.
    Finished(Summary),
    /// The learner left early.
    Left(Summary),
}

enum Input {
    Answer(Answer),
    Restart,
    Quit,
}

/// Where flush batches go.
pub trait BatchSink {
    /// Hand off a batch without waiting.
    fn deliver(&self, batch: FlushBatch);
}

impl BatchSink for FlushQueue {
    fn deliver(&self, batch: FlushBatch) {
        self.send(batch);
    }
}

/// Drops batches. Used for local decks, which have no remote store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl BatchSink for Offline {
    fn deliver(&self, batch: FlushBatch) {
        debug!(reason = ?batch.reason, entries = batch.len(), "Offline, batch not sent");
    }
}

/// Run `session` until it completes or the learner leaves.
pub async fn run<S, R, W>(
    session: &mut Session<S>,
    console: &mut Console<R, W>,
    speaker: &dyn Speaker,
    sink: &dyn BatchSink,
) -> io::Result<Outcome>
where
    S: Shuffler,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if session.total() == 0 {
        console.say("No cards to practice.")?;
        return Ok(Outcome::Finished(session.summary()));
    }

    loop {
        let (Some(question), Some(card)) = (
            session.current_question().cloned(),
            session.current_card().cloned(),
        ) else {
            break;
        };

        let position = session.state().position();
        console.say("")?;
        console.say(format!(
            "[{}/{}] {}% done, score {}",
            position + 1,
            session.total(),
            session.progress_percent(),
            session.score()
        ))?;
        show(console, &question)?;

        match read_answer(console, &question, &card, speaker).await? {
            Input::Quit => {
                console.say("Leaving the session.")?;
                return Ok(Outcome::Left(session.summary()));
            }
            Input::Restart => {
                if let Some(batch) = session.reset() {
                    sink.deliver(batch);
                }
                console.say("Starting over.")?;
                continue;
            }
            Input::Answer(answer) => {
                let Some(verdict) = session.submit(answer) else {
                    continue;
                };
                if session.mode() != Mode::Review {
                    if verdict.correct {
                        console.say("Correct!")?;
                    } else {
                        console.say(format!("Not quite. The answer is: {}", verdict.expected))?;
                    }
                }
                if let Some(batch) = session.advance().and_then(|a| a.flush) {
                    sink.deliver(batch);
                }
            }
        }
    }

    let summary = session.summary();
    show_summary(console, &summary)?;
    Ok(Outcome::Finished(summary))
}

fn show<R, W>(console: &mut Console<R, W>, question: &Question) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match question.mode {
        Mode::Review => console.say(format!("  {}", question.prompt)),
        Mode::MultipleChoice => {
            console.say(format!("What does \"{}\" mean?", question.prompt))?;
            for (i, option) in question.options.iter().enumerate() {
                console.say(format!("  {}) {}", i + 1, option))?;
            }
            Ok(())
        }
        Mode::Cloze => {
            console.say("Fill in the blank:")?;
            console.say(format!("  {}", question.prompt))?;
            if let Some(hint) = &question.hint {
                console.say(format!("  hint: {}", hint))?;
            }
            Ok(())
        }
        Mode::Typing => console.say(format!("Type the Spanish for \"{}\":", question.prompt)),
    }
}

async fn read_answer<R, W>(
    console: &mut Console<R, W>,
    question: &Question,
    card: &Card,
    speaker: &dyn Speaker,
) -> io::Result<Input>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let label = match question.mode {
        Mode::Review => "Know it? [y/n, enter to flip]",
        Mode::MultipleChoice => "Choice:",
        Mode::Cloze | Mode::Typing => "Answer:",
    };

    loop {
        let Some(line) = console.ask(label).await? else {
            return Ok(Input::Quit);
        };

        match line.as_str() {
            ":q" => return Ok(Input::Quit),
            ":r" => return Ok(Input::Restart),
            ":s" => {
                speaker.speak(&card.term);
                continue;
            }
            _ => {}
        }

        let answer = match question.mode {
            Mode::Review => match line.to_lowercase().as_str() {
                "y" | "yes" => Some(Answer::Recall(true)),
                "n" | "no" => Some(Answer::Recall(false)),
                "" => {
                    console.say(format!("  = {}", card.gloss))?;
                    if !card.usage.is_empty() {
                        console.say(format!("  \"{}\"", card.usage))?;
                    }
                    None
                }
                _ => None,
            },
            Mode::MultipleChoice => line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| question.option(i))
                .map(|choice| Answer::Choice(choice.to_string())),
            Mode::Cloze | Mode::Typing if !line.is_empty() => Some(Answer::Typed(line)),
            Mode::Cloze | Mode::Typing => None,
        };

        if let Some(answer) = answer {
            return Ok(Input::Answer(answer));
        }
    }
}

fn show_summary<R, W>(console: &mut Console<R, W>, summary: &Summary) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.say("")?;
    match summary.mode {
        Mode::Review => console.say(format!(
            "Review complete: {} known, {} still learning.",
            summary.correct.len(),
            summary.incorrect.len()
        ))?,
        _ => console.say(format!(
            "Quiz complete: {}/{} ({}%)",
            summary.score, summary.total, summary.percentage
        ))?,
    }
    console.say(summary.grade.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::SilentSpeaker;
    use drillkit_engine::shuffle::NoShuffle;
    use drillkit_engine::{CardUpdate, Deck, FlushReason};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<FlushBatch>>);

    impl BatchSink for Collect {
        fn deliver(&self, batch: FlushBatch) {
            self.0.lock().unwrap().push(batch);
        }
    }

    fn deck() -> Deck {
        Deck::new(vec![
            Card::new(1, "Hola", "Hello", "¡Hola! ¿Cómo estás?"),
            Card::new(2, "Gracias", "Thank you", "Muchas gracias."),
            Card::new(3, "Adiós", "Goodbye", "Adiós, amigo."),
            Card::new(4, "Por favor", "Please", "Ayúdame, por favor."),
        ])
        .unwrap()
    }

    async fn drive(mode: Mode, input: &str, sink: &dyn BatchSink) -> (Outcome, String) {
        let deck = deck();
        let mut session = Session::new(mode, &deck, NoShuffle);
        let mut console = Console::new(input.as_bytes(), Vec::new());
        let outcome = run(&mut session, &mut console, &SilentSpeaker, sink)
            .await
            .unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        (outcome, output)
    }

    #[tokio::test]
    async fn test_review_session() {
        let sink = Collect::default();
        let (outcome, output) = drive(Mode::Review, "\ny\nn\n:s\ny\nyes\n", &sink).await;

        let Outcome::Finished(summary) = outcome else {
            panic!("expected a finished session");
        };
        assert_eq!(summary.correct, vec![1, 3, 4]);
        assert_eq!(summary.incorrect, vec![2]);
        assert!(output.contains("= Hello"));
        assert!(output.contains("3 known, 1 still learning"));

        let batches = sink.0.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].reason, FlushReason::Completion);
        assert_eq!(batches[0].len(), 4);
    }

    #[tokio::test]
    async fn test_multiple_choice_session() {
        // With no shuffling the correct gloss is always the last option.
        let (outcome, output) = drive(Mode::MultipleChoice, "4\n9\nx\n4\n1\n4\n", &Offline).await;

        let Outcome::Finished(summary) = outcome else {
            panic!("expected a finished session");
        };
        assert_eq!(summary.score, 3);
        assert_eq!(summary.percentage, 75);
        assert!(output.contains("1) Thank you"));
        assert!(output.contains("Not quite. The answer is: Goodbye"));
    }

    #[tokio::test]
    async fn test_typing_session_leaves_early() {
        let (outcome, output) = drive(Mode::Typing, "hola\n\ngracias\n:q\n", &Offline).await;

        let Outcome::Left(summary) = outcome else {
            panic!("expected the learner to leave");
        };
        assert_eq!(summary.score, 2);
        assert!(output.contains("Leaving the session."));
    }

    #[tokio::test]
    async fn test_end_of_input_leaves() {
        let (outcome, _) = drive(Mode::Cloze, "", &Offline).await;
        assert!(matches!(outcome, Outcome::Left(_)));
    }

    #[tokio::test]
    async fn test_restart_in_review_resets_remote() {
        let sink = Collect::default();
        let (outcome, output) = drive(Mode::Review, "y\n:r\n:q\n", &sink).await;

        assert!(matches!(outcome, Outcome::Left(ref s) if s.score == 0));
        assert!(output.contains("Starting over."));

        let batches = sink.0.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].reason, FlushReason::Reset);
        assert_eq!(batches[0].updates[0], CardUpdate::known(1, false));
    }

    #[tokio::test]
    async fn test_empty_deck() {
        let deck = Deck::default();
        let mut session = Session::new(Mode::Typing, &deck, NoShuffle);
        let mut console = Console::new("".as_bytes(), Vec::new());
        let outcome = run(&mut session, &mut console, &SilentSpeaker, &Offline)
            .await
            .unwrap();

        let Outcome::Finished(summary) = outcome else {
            panic!("expected a finished session");
        };
        assert_eq!(summary.percentage, 0);
    }
}
