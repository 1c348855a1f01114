use std::io::{BufRead, Write};

use anyhow::Result;

use super::{ReviewSession, SessionSnapshot, SessionState};
use crate::error::ReviewError;
use crate::parser::candidate::{CandidateId, JokeCandidate};

const UNTITLED: &str = "Untitled Joke";

/// Typed alone at an edit prompt, empties that field.
const CLEAR: &str = "-";

const HELP: &str = "\
Commands:
  l              list jokes
  v N            view joke N in full
  t N  (or N)    toggle joke N
  e N            edit joke N
  d N            delete joke N
  a / n          select all / none
  s              save selected jokes
  q              cancel without saving";

#[derive(Debug)]
pub enum Outcome {
    Committed(Vec<JokeCandidate>),
    Discarded,
}

/// Drive a review session from line-oriented input until the user saves or
/// cancels. Running out of input cancels.
pub fn run<R: BufRead, W: Write>(
    session: &mut ReviewSession,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome> {
    let snapshot = session.snapshot();
    if snapshot.state != SessionState::Active {
        return Err(ReviewError::SessionClosed.into());
    }

    let count = session.candidates().len();
    writeln!(
        out,
        "Found {} joke{}. Review and edit before saving ('?' for help).",
        count,
        if count == 1 { "" } else { "s" }
    )?;
    print_list(&snapshot, out)?;

    loop {
        write!(out, "review [{} selected]> ", session.selected_count())?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            session.discard()?;
            return Ok(Outcome::Discarded);
        };

        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let arg = parts.next();
        let snapshot = session.snapshot();

        match cmd {
            "" => {}
            "?" | "h" | "help" => writeln!(out, "{}", HELP)?,
            "l" | "list" => print_list(&snapshot, out)?,
            "a" | "all" => session.set_all_included(true)?,
            "n" | "none" => session.set_all_included(false)?,
            "v" | "view" => match pick(&snapshot, arg) {
                Some(c) => print_full(c, out)?,
                None => bad_index(&snapshot, out)?,
            },
            "t" | "toggle" => match pick(&snapshot, arg) {
                Some(c) => session.toggle_inclusion(c.id())?,
                None => bad_index(&snapshot, out)?,
            },
            "d" | "delete" => match pick(&snapshot, arg) {
                Some(c) => {
                    session.delete(c.id())?;
                    writeln!(out, "Deleted \"{}\".", display_title(c))?;
                }
                None => bad_index(&snapshot, out)?,
            },
            "e" | "edit" => match pick(&snapshot, arg) {
                Some(c) => edit(session, c.id(), c, input, out)?,
                None => bad_index(&snapshot, out)?,
            },
            "s" | "save" | "c" | "commit" => match session.commit() {
                Ok(jokes) => return Ok(Outcome::Committed(jokes)),
                Err(ReviewError::NothingSelected) => {
                    writeln!(out, "No jokes selected. Select at least one, or 'q' to cancel.")?
                }
                Err(e) => return Err(e.into()),
            },
            "q" | "quit" | "cancel" => {
                session.discard()?;
                return Ok(Outcome::Discarded);
            }
            n if n.parse::<usize>().is_ok() => match pick(&snapshot, Some(n)) {
                Some(c) => session.toggle_inclusion(c.id())?,
                None => bad_index(&snapshot, out)?,
            },
            other => writeln!(out, "Unknown command '{}'. Type '?' for help.", other)?,
        }
    }
}

fn edit<R: BufRead, W: Write>(
    session: &mut ReviewSession,
    id: CandidateId,
    current: &JokeCandidate,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    write!(out, "Title [{}] (blank keeps, '{}' clears): ", current.title(), CLEAR)?;
    out.flush()?;
    let title = read_line(input)?.unwrap_or_default();
    let title = replacement(&title, current.title());

    writeln!(
        out,
        "Body (end with a line holding only '.', blank keeps, '{}' clears):",
        CLEAR
    )?;
    let mut body_lines = Vec::new();
    while let Some(line) = read_line(input)? {
        if line.trim() == "." {
            break;
        }
        body_lines.push(line);
    }
    let body = replacement(&body_lines.join("\n"), current.body());

    session.edit(id, &title, &body)?;
    Ok(())
}

/// Blank input keeps `current`, a lone `-` clears the field.
fn replacement(typed: &str, current: &str) -> String {
    match typed.trim() {
        "" => current.to_string(),
        CLEAR => String::new(),
        _ => typed.to_string(),
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// 1-based position in the snapshot.
fn pick<'a>(snapshot: &'a SessionSnapshot, arg: Option<&str>) -> Option<&'a JokeCandidate> {
    let n: usize = arg?.parse().ok()?;
    snapshot.candidates.get(n.checked_sub(1)?)
}

fn bad_index<W: Write>(snapshot: &SessionSnapshot, out: &mut W) -> Result<()> {
    writeln!(out, "Pick a joke number between 1 and {}.", snapshot.candidates.len())?;
    Ok(())
}

fn display_title(c: &JokeCandidate) -> &str {
    if c.title().is_empty() {
        UNTITLED
    } else {
        c.title()
    }
}

fn print_list<W: Write>(snapshot: &SessionSnapshot, out: &mut W) -> Result<()> {
    for (i, c) in snapshot.candidates.iter().enumerate() {
        let mark = if c.is_included() { "x" } else { " " };
        let body = c.body().replace('\n', " ");
        if body.is_empty() {
            writeln!(out, "[{}] {:>2}. {}", mark, i + 1, truncate(display_title(c), 60))?;
        } else {
            writeln!(
                out,
                "[{}] {:>2}. {} | {}",
                mark,
                i + 1,
                truncate(display_title(c), 40),
                truncate(&body, 40)
            )?;
        }
    }
    writeln!(out, "{} of {} selected.", snapshot.selected, snapshot.candidates.len())?;
    Ok(())
}

fn print_full<W: Write>(c: &JokeCandidate, out: &mut W) -> Result<()> {
    writeln!(out, "{}", display_title(c))?;
    writeln!(out, "{}", "-".repeat(display_title(c).chars().count().min(60)))?;
    if !c.body().is_empty() {
        writeln!(out, "{}", c.body())?;
    }
    Ok(())
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session() -> ReviewSession {
        ReviewSession::new(vec![
            JokeCandidate::new("First", "one"),
            JokeCandidate::new("Second", "two"),
            JokeCandidate::new("", "third body"),
        ])
    }

    fn drive(session: &mut ReviewSession, script: &str) -> (Outcome, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let outcome = run(session, &mut input, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    fn committed_titles(outcome: Outcome) -> Vec<String> {
        match outcome {
            Outcome::Committed(jokes) => jokes.iter().map(|j| j.title().to_string()).collect(),
            Outcome::Discarded => panic!("expected commit"),
        }
    }

    #[test]
    fn save_everything() {
        let mut s = session();
        let (outcome, out) = drive(&mut s, "s\n");
        assert_eq!(committed_titles(outcome), vec!["First", "Second", ""]);
        assert!(out.contains("Found 3 jokes."));
        assert!(out.contains("Untitled Joke"));
        assert_eq!(s.snapshot().state, SessionState::Committed);
    }

    #[test]
    fn toggle_then_save() {
        let mut s = session();
        let (outcome, _) = drive(&mut s, "t 2\n3\ns\n");
        assert_eq!(committed_titles(outcome), vec!["First"]);
    }

    #[test]
    fn nothing_selected_keeps_prompting() {
        let mut s = session();
        let (outcome, out) = drive(&mut s, "n\ns\n1\ns\n");
        assert!(out.contains("No jokes selected."));
        assert_eq!(committed_titles(outcome), vec!["First"]);
    }

    #[test]
    fn delete_and_edit() {
        let mut s = session();
        let script = "d 1\ne 1\n  Renamed  \nline one\nline two\n.\ns\n";
        let (outcome, _) = drive(&mut s, script);
        match outcome {
            Outcome::Committed(jokes) => {
                assert_eq!(jokes.len(), 2);
                assert_eq!(jokes[0].title(), "Renamed");
                assert_eq!(jokes[0].body(), "line one\nline two");
            }
            Outcome::Discarded => panic!("expected commit"),
        }
    }

    #[test]
    fn edit_keeps_blank_fields() {
        let mut s = session();
        let (outcome, _) = drive(&mut s, "e 2\n\n.\ns\n");
        match outcome {
            Outcome::Committed(jokes) => {
                assert_eq!(jokes[1].title(), "Second");
                assert_eq!(jokes[1].body(), "two");
            }
            Outcome::Discarded => panic!("expected commit"),
        }
    }

    #[test]
    fn blank_body_lines_keep_body() {
        let mut s = session();
        let (outcome, _) = drive(&mut s, "e 1\n\n\n.\ns\n");
        match outcome {
            Outcome::Committed(jokes) => {
                assert_eq!(jokes[0].title(), "First");
                assert_eq!(jokes[0].body(), "one");
            }
            Outcome::Discarded => panic!("expected commit"),
        }
    }

    #[test]
    fn dash_clears_title_and_body() {
        let mut s = session();
        let (outcome, out) = drive(&mut s, "e 1\n-\n-\n.\nl\ns\n");
        assert!(out.contains("Untitled Joke"));
        match outcome {
            Outcome::Committed(jokes) => {
                assert_eq!(jokes[0].title(), "");
                assert_eq!(jokes[0].body(), "");
            }
            Outcome::Discarded => panic!("expected commit"),
        }
    }

    #[test]
    fn quit_discards() {
        let mut s = session();
        let (outcome, _) = drive(&mut s, "q\n");
        assert!(matches!(outcome, Outcome::Discarded));
        assert_eq!(s.snapshot().state, SessionState::Discarded);
    }

    #[test]
    fn eof_discards() {
        let mut s = session();
        let (outcome, _) = drive(&mut s, "t 1\n");
        assert!(matches!(outcome, Outcome::Discarded));
    }

    #[test]
    fn bad_index_reported() {
        let mut s = session();
        let (_, out) = drive(&mut s, "t 9\nv 0\nq\n");
        assert_eq!(out.matches("Pick a joke number between 1 and 3.").count(), 2);
    }

    #[test]
    fn view_prints_body() {
        let mut s = session();
        let (_, out) = drive(&mut s, "v 3\nq\n");
        assert!(out.contains("third body"));
    }

    #[test]
    fn closed_session_refused() {
        let mut s = session();
        s.discard().unwrap();
        let mut out = Vec::new();
        let err = run(&mut s, &mut Cursor::new(b"s\n".to_vec()), &mut out).unwrap_err();
        assert_eq!(err.downcast_ref::<ReviewError>(), Some(&ReviewError::SessionClosed));
    }

    #[test]
    fn truncate_long() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
