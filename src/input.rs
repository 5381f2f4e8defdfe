//! Terminal input surface.
//!
//! Each line read from the terminal becomes at most one [`Input`]:
//!
//! | Line | Input |
//! |---|---|
//! | empty | `Key(Enter)` |
//! | only whitespace | `Key(Space)` |
//! | `click`, `tap`, `touch` | `Pointer` |
//! | `key <Code>` | `Key(<Code>)` |
//!
//! Anything else is ignored.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::sequencer::{Input, KeyCode, SequencerHandle};

/// Maps one terminal line to an input.
#[must_use]
pub fn parse_line(line: &str) -> Option<Input> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Some(Input::Key(KeyCode::new("Enter")));
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Some(Input::Key(KeyCode::new("Space")));
    }
    if ["click", "tap", "touch"]
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        return Some(Input::Pointer);
    }

    let mut parts = trimmed.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cmd), Some(code), None) if cmd.eq_ignore_ascii_case("key") => {
            Some(Input::Key(KeyCode::new(code)))
        }
        _ => None,
    }
}

/// Forwards parsed lines from `reader` until EOF, cancellation, or the
/// sequencer going away.
pub fn spawn_line_reader<R>(
    reader: R,
    handle: SequencerHandle,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            let line = tokio::select! {
                () = cancel.cancelled() => break,
                line = lines.next_line() => line,
            };
            match line {
                Ok(Some(line)) => {
                    let Some(input) = parse_line(&line) else {
                        debug!(line = %line, "unrecognised input line");
                        continue;
                    };
                    if !handle.send(input) {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("input reached end of stream");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "failed to read input");
                    break;
                }
            }
        }
    })
}

/// Forwards stdin to the sequencer.
pub fn spawn_stdin_reader(handle: SequencerHandle, cancel: CancellationToken) -> JoinHandle<()> {
    spawn_line_reader(BufReader::new(tokio::io::stdin()), handle, cancel)
}
