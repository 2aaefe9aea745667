//! Line-protocol tap for the tapestry stream index.
//!
//! This binary is the transport collaborator the core library scopes out:
//! it reads newline-delimited JSON envelopes, feeds them to a single
//! `MessageHandler` in arrival order, and renders each published dataset.
//!
//! Two sources are supported:
//!
//! - `tail` — read envelopes from a file or stdin, line by line.
//! - `listen` — accept TCP line-protocol connections; every received line
//!   is funneled through one channel into a single consumer thread, which
//!   preserves the one-batch-at-a-time processing model across any number
//!   of connections.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use clap::{Parser, Subcommand, ValueEnum};
use tapestry::{Category, Dataset, DatasetSink, Envelope, MessageHandler};

/// tapestry — line-protocol tap for the stream index.
#[derive(Parser)]
#[command(name = "tapestry", version, about)]
struct Cli {
    /// Output format for published datasets.
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Read newline-delimited JSON envelopes from a file, or '-' for stdin.
    Tail {
        /// Input path, or '-' for stdin.
        input: PathBuf,
    },

    /// Accept TCP line-protocol connections carrying JSON envelopes.
    Listen {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:19099")]
        addr: String,
    },
}

/// Output format for published datasets.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Compact human-readable summary per batch.
    Text,
    /// One JSON document per batch.
    Json,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tail { input } => cmd_tail(&input, cli.format),
        Commands::Listen { addr } => cmd_listen(&addr, cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Implements `tapestry tail <input>`.
fn cmd_tail(input: &PathBuf, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let reader: Box<dyn Read> = if input.as_os_str() == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(input).map_err(|e| format!("cannot open '{}': {e}", input.display()))?)
    };

    let mut handler = MessageHandler::new(StdoutSink { format });
    drain_lines(BufReader::new(reader), &mut handler);

    Ok(())
}

/// Implements `tapestry listen --addr <addr>`.
///
/// Each connection gets a reader thread, but every decoded line goes through
/// one channel to one consumer thread owning the handler. The datasets only
/// ever see fully serialized batches, whatever the connection count.
fn cmd_listen(addr: &str, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        TcpListener::bind(addr).map_err(|e| format!("cannot bind '{addr}': {e}"))?;
    tracing::info!("listening on {addr}");

    let (tx, rx) = mpsc::channel::<String>();

    let consumer = thread::spawn(move || {
        let mut handler = MessageHandler::new(StdoutSink { format });
        for line in rx {
            feed_line(&line, &mut handler);
        }
    });

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let tx = tx.clone();
                thread::spawn(move || serve_connection(stream, &tx));
            }
            Err(e) => tracing::warn!("accept error: {e}"),
        }
    }

    // Unreachable while the listener lives; keeps the consumer owned.
    drop(tx);
    consumer.join().expect("consumer thread panicked");
    Ok(())
}

/// Reads lines from one connection and forwards them to the consumer.
fn serve_connection(stream: TcpStream, tx: &mpsc::Sender<String>) {
    let peer = stream
        .peer_addr()
        .map_or_else(|_| "unknown".to_string(), |a| a.to_string());
    tracing::debug!("connection from {peer}");

    let reader = BufReader::new(stream);
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if tx.send(line).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::debug!("read error from {peer}: {e}");
                return;
            }
        }
    }

    tracing::debug!("connection from {peer} closed");
}

/// Feeds every non-empty line of `reader` to the handler, in read order.
fn drain_lines<R: BufRead, S: DatasetSink>(reader: R, handler: &mut MessageHandler<S>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if !line.trim().is_empty() {
                    feed_line(&line, handler);
                }
            }
            Err(e) => {
                tracing::warn!("read error: {e}");
                return;
            }
        }
    }
}

/// Decodes one line as an envelope and processes it. A line that fails to
/// decode is dropped whole — envelope-level failures never reach the core.
fn feed_line<S: DatasetSink>(line: &str, handler: &mut MessageHandler<S>) {
    match Envelope::from_json(line) {
        Ok(envelope) => {
            handler.on_envelope(&envelope);
        }
        Err(e) => tracing::warn!("dropping undecodable envelope: {e}"),
    }
}

/// Sink that renders each published dataset to stdout.
struct StdoutSink {
    format: OutputFormat,
}

impl DatasetSink for StdoutSink {
    fn publish(&mut self, category: Category, dataset: &Dataset) {
        match self.format {
            OutputFormat::Text => print_text(category, dataset),
            OutputFormat::Json => print_json(category, dataset),
        }
    }
}

/// Renders a compact per-batch summary.
fn print_text(category: Category, dataset: &Dataset) {
    let common_tags: Vec<&str> = dataset.common_tags.iter().map(String::as_str).collect();
    let common_attrs: Vec<String> = dataset
        .common_attributes
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();

    println!(
        "{}: {} series, common tags [{}], common attributes [{}]",
        category.as_str(),
        dataset.series_count(),
        common_tags.join(", "),
        common_attrs.join(", "),
    );

    // Sort by id for stable output; the dataset's map order is unspecified.
    let mut series: Vec<_> = dataset.series().collect();
    series.sort_by(|a, b| a.id.cmp(&b.id));

    for s in series {
        let latest = s
            .latest()
            .map_or_else(String::new, |v| format!("{} @ {}", v.value, v.time_ms));
        let mut distinguishing: Vec<String> = s.identifying_tags.clone();
        distinguishing.extend(s.identifying_keys.iter().map(|k| {
            let value = s.attributes.get(k).map_or("", String::as_str);
            format!("{k}={value}")
        }));
        println!("  {} {{{}}} = {latest}", s.id, distinguishing.join(", "));
    }
}

/// Renders the full dataset as one JSON document.
fn print_json(category: Category, dataset: &Dataset) {
    let document = serde_json::json!({
        "category": category.as_str(),
        "dataset": dataset,
    });
    match serde_json::to_string(&document) {
        Ok(encoded) => println!("{encoded}"),
        Err(e) => tracing::error!("cannot encode dataset: {e}"),
    }
}
