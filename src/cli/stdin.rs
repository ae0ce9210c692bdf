//! Line-based control surface.
//!
//! Each line read is parsed into a [`WidgetCommand`] and forwarded to the
//! widget. Unparsable lines are logged and skipped. End of input closes the
//! channel, which ends the widget loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::widget::WidgetCommand;

/// Forwards commands read from `reader` until end of input, `quit`, or the
/// widget going away. Returns the number of commands forwarded.
pub async fn forward_commands<R>(reader: R, tx: mpsc::Sender<WidgetCommand>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("End of command input");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read command input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match WidgetCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, line = %line, "Unrecognized command");
                continue;
            }
        };
        let quit = command == WidgetCommand::Quit;
        if tx.send(command).await.is_err() {
            break;
        }
        forwarded += 1;
        if quit {
            break;
        }
    }
    forwarded
}

/// Spawns a task forwarding commands typed on standard input.
pub fn spawn_stdin_reader(tx: mpsc::Sender<WidgetCommand>) -> JoinHandle<usize> {
    tokio::spawn(forward_commands(BufReader::new(tokio::io::stdin()), tx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forwards_valid_lines_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let input: &[u8] = b"add 60 10\n\nsnooze\naway\n";

        let forwarded = forward_commands(input, tx).await;

        assert_eq!(forwarded, 2);
        assert_eq!(
            rx.recv().await,
            Some(WidgetCommand::AddPair {
                work_secs: Some(60),
                break_secs: Some(10)
            })
        );
        assert_eq!(rx.recv().await, Some(WidgetCommand::Away));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_stops_after_quit() {
        let (tx, mut rx) = mpsc::channel(8);
        let input: &[u8] = b"quit\nback\n";

        let forwarded = forward_commands(input, tx).await;

        assert_eq!(forwarded, 1);
        assert_eq!(rx.recv().await, Some(WidgetCommand::Quit));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_stops_when_widget_gone() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let input: &[u8] = b"away\nback\n";

        assert_eq!(forward_commands(input, tx).await, 0);
    }
}
