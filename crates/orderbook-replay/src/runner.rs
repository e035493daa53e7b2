//! Book-by-book replay loop.
//!
//! Every [`BookSession`] gets its own `MatchingEngine`, owned by this loop
//! for the duration of that book only; nothing carries over between books.
//!
//! Failure policy:
//! - an unparsable input fails the run before anything is replayed;
//! - an engine error fails its book. With `continue_on_error` the book's
//!   events are dropped and the next book runs, otherwise the run stops.

use anyhow::Context;
use orderbook_core::{EngineConfig, InputMessage, MatchingEngine, OutputMessage};
use orderbook_protocol::{format_output, split_sessions, BookSession, SessionCommand};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{error, info};

use crate::config::Config;

/// What a replay did, for logging and exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub books: usize,
    pub books_failed: usize,
    pub events: usize,
}

/// Replay the configured input file, writing event lines to stdout.
pub async fn run(config: &Config) -> anyhow::Result<ReplaySummary> {
    let mut stdout = BufWriter::new(tokio::io::stdout());
    replay_file(config, &mut stdout).await
}

/// Read `config.input_path` and replay it into `out`.
pub async fn replay_file<W>(config: &Config, out: &mut W) -> anyhow::Result<ReplaySummary>
where
    W: AsyncWrite + Unpin,
{
    let input = tokio::fs::read_to_string(&config.input_path)
        .await
        .with_context(|| format!("failed to read input {}", config.input_path.display()))?;

    replay_to(&input, config, out).await
}

/// Replay `input` and write each book's event lines to `out`.
pub async fn replay_to<W>(input: &str, config: &Config, out: &mut W) -> anyhow::Result<ReplaySummary>
where
    W: AsyncWrite + Unpin,
{
    let sessions = split_sessions(input).context("failed to parse input")?;
    let engine_config = config.engine_config();
    let mut summary = ReplaySummary::default();

    for session in &sessions {
        info!(
            book = session.number,
            commands = session.commands.len(),
            "processing order book"
        );
        summary.books += 1;

        let outputs = match replay_session(session, engine_config) {
            Ok(outputs) => outputs,
            Err(e) if config.continue_on_error => {
                error!(book = session.number, error = %format!("{e:#}"), "order book failed, skipping");
                summary.books_failed += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut block = String::new();
        for msg in &outputs {
            block.push_str(&format_output(msg));
            block.push('\n');
        }
        if config.book_separator {
            block.push('\n');
        }

        out.write_all(block.as_bytes())
            .await
            .context("failed to write events")?;
        summary.events += outputs.len();
    }

    out.flush().await.context("failed to flush events")?;

    info!(
        books = summary.books,
        books_failed = summary.books_failed,
        events = summary.events,
        "replay finished"
    );
    Ok(summary)
}

/// Replay one book against a fresh engine, returning all its events.
///
/// The first engine error aborts the book; its context names the book,
/// the input line and the command.
pub fn replay_session(
    session: &BookSession,
    config: EngineConfig,
) -> anyhow::Result<Vec<OutputMessage>> {
    let mut engine = MatchingEngine::new(config);
    let mut outputs = Vec::new();

    for cmd in &session.commands {
        let events = engine
            .process_message(cmd.msg.clone())
            .with_context(|| describe_failure(session.number, cmd))?;
        outputs.extend(events);
    }

    Ok(outputs)
}

fn describe_failure(book: usize, cmd: &SessionCommand) -> String {
    let what = match &cmd.msg {
        InputMessage::NewOrder(n) => format!("new order {}", n.user_order_id),
        InputMessage::Cancel(c) => format!("cancel of order {}", c.user_order_id),
        InputMessage::Flush => "flush".to_string(),
    };
    format!("order book {} line {}: error processing {}", book, cmd.line, what)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BOOKS: &str = "\
N, 1, IBM, 10, 100, B, 1
N, 2, IBM, 11, 100, S, 2
F
N, 1, VAL, 10, 50, B, 10
N, 2, VAL, 10, 50, S, 11
F
";

    async fn replay(input: &str, config: &Config) -> (anyhow::Result<ReplaySummary>, String) {
        let mut out = Vec::new();
        let result = replay_to(input, config, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn replays_each_book_from_scratch() {
        let (result, out) = replay(TWO_BOOKS, &Config::default()).await;

        // Second book: the sell at 10 meets the cached bid at 10 and is
        // rejected, since trading is disabled.
        let expected = "\
A, 1, 1
B, B, 10, 100
A, 2, 2
B, S, 11, 100

A, 1, 10
B, B, 10, 50
R, 2, 11

";
        assert_eq!(out, expected);
        assert_eq!(
            result.unwrap(),
            ReplaySummary {
                books: 2,
                books_failed: 0,
                events: 7
            }
        );
    }

    #[tokio::test]
    async fn trading_enabled_matches() {
        let config = Config {
            trading_enabled: true,
            book_separator: false,
            ..Config::default()
        };
        let (result, out) = replay(TWO_BOOKS, &config).await;
        assert!(result.is_ok());

        let second_book: Vec<&str> = out.lines().skip(4).collect();
        assert_eq!(
            second_book,
            vec![
                "A, 1, 10",
                "B, B, 10, 50",
                "A, 2, 11",
                "T, 1, 10, 2, 11, 10, 50",
                "B, B, -, -",
            ]
        );
    }

    #[tokio::test]
    async fn engine_error_aborts_by_default() {
        let input = "N, 1, IBM, 0, 100, B, 1\nF\nN, 1, IBM, 10, 100, B, 2\nF\n";
        let (result, out) = replay(input, &Config::default()).await;

        let err = result.unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("order book 1 line 1: error processing new order 1"), "{chain}");
        assert!(chain.contains("invalid price 0 for order 1"), "{chain}");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn continue_on_error_skips_the_failed_book() {
        let input = "N, 1, IBM, 10, 100, B, 1\nN, 1, IBM, 0, 100, B, 2\nF\nN, 1, IBM, 10, 100, B, 3\nF\n";
        let config = Config {
            continue_on_error: true,
            ..Config::default()
        };
        let (result, out) = replay(input, &config).await;

        assert_eq!(
            result.unwrap(),
            ReplaySummary {
                books: 2,
                books_failed: 1,
                events: 2
            }
        );
        assert_eq!(out, "A, 1, 3\nB, B, 10, 100\n\n");
    }

    #[tokio::test]
    async fn parse_error_fails_before_replay() {
        let input = "N, 1, IBM, 10, 100, B, 1\nF\nC, 1\nF\n";
        let (result, out) = replay(input, &Config::default()).await;

        let chain = format!("{:#}", result.unwrap_err());
        assert!(chain.contains("failed to parse input"), "{chain}");
        assert!(chain.contains("line 3"), "{chain}");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn replay_file_reads_the_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.csv");
        std::fs::write(&path, TWO_BOOKS).unwrap();

        let config = Config {
            input_path: path,
            book_separator: false,
            ..Config::default()
        };
        let mut out = Vec::new();
        let summary = replay_file(&config, &mut out).await.unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                books: 2,
                books_failed: 0,
                events: 7
            }
        );
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 7);
        assert!(text.ends_with("R, 2, 11\n"));
    }

    #[tokio::test]
    async fn run_reports_missing_input() {
        let config = Config {
            input_path: "/nonexistent/books.csv".into(),
            ..Config::default()
        };
        let err = run(&config).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/books.csv"));
    }

    #[test]
    fn replay_session_collects_in_order() {
        let sessions = split_sessions("N, 1, IBM, 10, 100, B, 1\nC, 1, 1\nC, 1, 1\nF\n").unwrap();
        let outputs = replay_session(&sessions[0], EngineConfig::default()).unwrap();
        assert_eq!(
            outputs,
            vec![
                OutputMessage::ack(1, 1),
                OutputMessage::top_of_book(orderbook_core::Side::Buy, 10, 100),
                OutputMessage::cancel_ack(1, 1),
                OutputMessage::top_of_book_eliminated(orderbook_core::Side::Buy),
            ]
        );
    }
}
