//! `msgpack` CLI — convert between JSON and MessagePack from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to MessagePack, printed as hex (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | msgpack encode
//!
//! # Encode from file to a raw binary file
//! msgpack encode -i data.json -o data.msgpack
//!
//! # Decode MessagePack back to pretty-printed JSON
//! msgpack decode -i data.msgpack
//!
//! # Decode hex text, compact output
//! echo '82 a3 61 67 65 1e a4 6e 61 6d 65 a5 41 6c 69 63 65' | msgpack decode --hex --compact
//!
//! # Show size statistics
//! msgpack stats -i data.json
//!
//! # Codec settings from a file, with a flag override and debug logging
//! msgpack --config codec.json --max-depth 64 -v decode -i data.msgpack
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use msgpack_core::CodecConfig;
use std::io::{self, Read, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "msgpack", version, about = "JSON <-> MessagePack converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with codec settings (`max_depth`, `allow_trailing_bytes`)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Maximum container nesting depth (overrides the config file)
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Accept bytes after the first complete MessagePack value when decoding
    #[arg(long, global = true)]
    allow_trailing: bool,

    /// Log codec activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON to MessagePack
    Encode {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file for raw MessagePack bytes (writes hex to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write raw bytes to stdout instead of hex
        #[arg(long)]
        binary: bool,
    },
    /// Decode MessagePack back to JSON
    Decode {
        /// Input MessagePack file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Treat the input as hex text; whitespace is ignored
        #[arg(long)]
        hex: bool,
        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Show encoding statistics (JSON vs MessagePack size)
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref(), cli.max_depth, cli.allow_trailing)?;
    debug!(?config, "codec configuration");

    match cli.command {
        Commands::Encode {
            input,
            output,
            binary,
        } => {
            let json = read_text(input.as_deref())?;
            let bytes = msgpack_core::encode_with(&json, &config)
                .context("Failed to encode JSON to MessagePack")?;

            if output.is_some() || binary {
                write_output(output.as_deref(), &bytes)?;
            } else {
                write_output(None, format!("{}\n", hex::encode(&bytes)).as_bytes())?;
            }
        }
        Commands::Decode {
            input,
            output,
            hex,
            compact,
        } => {
            let raw = read_bytes(input.as_deref())?;
            let bytes = if hex { parse_hex(&raw)? } else { raw };

            let value = msgpack_core::decode_value_with(&bytes, &config)
                .context("Failed to decode MessagePack to JSON")?;
            let json = value
                .to_json()
                .context("Failed to convert decoded value to JSON")?;
            let mut text = if compact {
                serde_json::to_string(&json)?
            } else {
                serde_json::to_string_pretty(&json)?
            };
            text.push('\n');
            write_output(output.as_deref(), text.as_bytes())?;
        }
        Commands::Stats { input } => {
            let json = read_text(input.as_deref())?;
            let bytes = msgpack_core::encode_with(&json, &config)
                .context("Failed to encode JSON to MessagePack")?;
            let json_bytes = json.len();
            let msgpack_bytes = bytes.len();
            let ratio = if json_bytes > 0 {
                (1.0 - (msgpack_bytes as f64 / json_bytes as f64)) * 100.0
            } else {
                0.0
            };
            println!("JSON size:         {} bytes", json_bytes);
            println!("MessagePack size:  {} bytes", msgpack_bytes);
            println!("Reduction:         {:.1}%", ratio);
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose {
        "msgpack_core=debug,msgpack=debug"
    } else {
        "msgpack_core=warn"
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default).context("Invalid log filter")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

/// Build the codec configuration.
///
/// - `--config codec.json` loads `CodecConfig` from JSON; missing fields keep their defaults
/// - `--max-depth` replaces the file's `max_depth`
/// - `--allow-trailing` turns trailing bytes on; it never turns them off
fn load_config(path: Option<&str>, max_depth: Option<usize>, allow_trailing: bool) -> Result<CodecConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str::<CodecConfig>(&text)
                .with_context(|| format!("Invalid config file: {}", path))?
        }
        None => CodecConfig::default(),
    };

    if let Some(depth) = max_depth {
        config = config.with_max_depth(depth);
    }
    if allow_trailing {
        config = config.with_allow_trailing_bytes(true);
    }
    Ok(config)
}

fn parse_hex(raw: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(raw).context("Hex input is not valid UTF-8")?;
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).context("Hex input is not valid hex")
}

fn read_text(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn read_bytes(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
