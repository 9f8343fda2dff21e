//! # Struk CLI
//!
//! Command-line interface for shipment receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # Render the PDF receipt and save it as receipt_<plate>_<date>.pdf
//! struk pdf shipment.json --out-dir receipts/
//!
//! # Show the ESC/POS bytes as a hex dump, or write them to a file
//! struk escpos shipment.json
//! struk escpos shipment.json --output receipt.bin
//!
//! # Print on a Bluetooth LE printer whose name contains "RPP"
//! struk print shipment.json --name RPP
//!
//! # Run the whole print pipeline against a simulated printer
//! struk print shipment.json --dry-run
//! ```
//!
//! Payloads are JSON files (`-` reads stdin). Logging is controlled with
//! `RUST_LOG` (default `struk=info`).

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use struk::{
    Payload, StrukError,
    document::{RenderOptions, VectorRenderer},
    payload::FieldValue,
    printer::PaperProfile,
    receipt,
    transport::{
        self, ChunkedSender, DEFAULT_CHUNK_SIZE,
        memory::{MemoryHost, MemoryPeer},
    },
};

/// Struk - shipment receipt printing
#[derive(Parser, Debug)]
#[command(name = "struk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the 58mm PDF receipt
    Pdf {
        /// Payload JSON file, or `-` for stdin
        payload: String,

        /// Directory the PDF is saved into
        #[arg(long, env = "STRUK_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Do not save the PDF
        #[arg(long)]
        no_save: bool,

        /// Write the PDF bytes to stdout
        #[arg(long)]
        stdout: bool,
    },

    /// Encode the ESC/POS receipt
    Escpos {
        /// Payload JSON file, or `-` for stdin
        payload: String,

        /// Paper class (58mm or 80mm)
        #[arg(long, default_value = "58mm")]
        paper: String,

        /// Write raw bytes to this file instead of a hex dump
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print the receipt on a Bluetooth LE thermal printer
    Print {
        /// Payload JSON file, or `-` for stdin
        payload: String,

        /// Paper class (58mm or 80mm)
        #[arg(long, default_value = "58mm")]
        paper: String,

        /// Pick the first printer whose name contains this text
        #[arg(long, default_value = "")]
        name: String,

        /// Scan window in seconds
        #[arg(long, default_value_t = 5)]
        scan_secs: u64,

        /// Bytes per write
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Send to a simulated printer instead
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("struk=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StrukError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pdf {
            payload,
            out_dir,
            no_save,
            stdout,
        } => {
            let payload = load_payload(&payload)?;
            let options = RenderOptions {
                persist_dir: (!no_save).then_some(out_dir),
            };
            let (receipt, saved) = VectorRenderer::default().render_with(&payload, &options)?;
            if stdout {
                io::stdout().write_all(&receipt.bytes)?;
            }
            if let Some(path) = saved {
                eprintln!("Saved {}", path.display());
            }
        }

        Commands::Escpos {
            payload,
            paper,
            output,
        } => {
            let payload = load_payload(&payload)?;
            let paper = PaperProfile::parse(&paper).map_err(StrukError::InvalidConfig)?;
            let data = receipt::encode(&payload, &paper);
            match output {
                Some(path) => {
                    fs::write(&path, &data)?;
                    eprintln!("Wrote {} bytes to {}", data.len(), path.display());
                }
                None => print!("{}", hex_dump(&data)),
            }
        }

        Commands::Print {
            payload,
            paper,
            name,
            scan_secs,
            chunk_size,
            dry_run,
        } => {
            let payload = load_payload(&payload)?;
            let paper = PaperProfile::parse(&paper).map_err(StrukError::InvalidConfig)?;
            let sender = ChunkedSender::with_chunk_size(chunk_size)?;
            let data = receipt::encode(&payload, &paper);

            if dry_run {
                let peer = MemoryPeer::uart_printer("dry-run");
                let journal = peer.journal();
                let report = transport::deliver(&MemoryHost::with_peer(peer), &data, &sender).await?;
                let sizes: Vec<usize> = journal
                    .lock()
                    .map(|j| j.writes.iter().map(|(chunk, _)| chunk.len()).collect())
                    .unwrap_or_default();
                println!(
                    "Dry run: {} bytes in {} chunks {:?}",
                    report.bytes, report.chunks, sizes
                );
            } else {
                let report = print_over_ble(&data, &sender, &name, scan_secs).await?;
                println!("Printed {} bytes in {} chunks", report.bytes, report.chunks);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "ble")]
async fn print_over_ble(
    data: &[u8],
    sender: &ChunkedSender,
    name: &str,
    scan_secs: u64,
) -> Result<transport::SendReport, StrukError> {
    use std::time::Duration;
    use struk::transport::{NameChooser, ble::BtleplugHost};

    let host = BtleplugHost::new(Duration::from_secs(scan_secs), NameChooser::new(name)).await;
    transport::deliver(&host, data, sender).await
}

#[cfg(not(feature = "ble"))]
async fn print_over_ble(
    data: &[u8],
    sender: &ChunkedSender,
    _name: &str,
    _scan_secs: u64,
) -> Result<transport::SendReport, StrukError> {
    transport::deliver(&transport::UnavailableHost, data, sender).await
}

/// Read a payload from a JSON file or stdin; a missing date becomes now.
fn load_payload(source: &str) -> Result<Payload, StrukError> {
    let json = if source == "-" {
        let mut json = String::new();
        io::stdin().read_to_string(&mut json)?;
        json
    } else {
        fs::read_to_string(source)
            .map_err(|e| StrukError::Payload(format!("{}: {}", source, e)))?
    };

    let mut payload = Payload::from_json(&json)?;
    if payload.date.is_none() {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
        payload.date = Some(FieldValue::Text(now));
    }
    Ok(payload)
}

/// Hex dump, 16 bytes per line with printable ASCII on the right
fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (i, line) in data.chunks(16).enumerate() {
        let hex: Vec<String> = line.iter().map(|b| format!("{:02x}", b)).collect();
        let ascii: String = line
            .iter()
            .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
            .collect();
        out.push_str(&format!("{:08x}  {:<47}  {}\n", i * 16, hex.join(" "), ascii));
    }
    out
}
