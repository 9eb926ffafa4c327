//! Sheetstore Command-Line Client
//!
//! One-shot commands against a running `sheetstored`.
//!
//! # Usage
//!
//! ```bash
//! # Append records from a JSON file (array or single object)
//! sheetstore --token <secret> add -f records.json
//!
//! # Read everything
//! sheetstore --token <secret> read
//!
//! # Filtered, paginated listing
//! sheetstore --token <secret> list --from-date 2025-01-01 --limit 20
//!
//! # Update/delete by composite key
//! sheetstore --token <secret> update -f changed.json
//! sheetstore --token <secret> delete \
//!     --address "1 High St" --auction-name "March Sale" --auction-date 2025-03-01
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use sheetstore_proto::{Action, JsonMap, Request, Response};

mod client;
mod formatter;

use client::Client;
use formatter::OutputFormat;

/// Sheetstore command-line client
#[derive(Parser, Debug)]
#[command(
    name = "sheetstore",
    version,
    about = "Command-line client for the sheetstore row store"
)]
struct Args {
    /// Server hostname
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEETSTORE_HOST")]
    host: String,

    /// Server port
    #[arg(short = 'p', long, default_value_t = 7450, env = "SHEETSTORE_PORT")]
    port: u16,

    /// Shared authentication token
    #[arg(short = 't', long, env = "SHEETSTORE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Store id override (server default applies when omitted)
    #[arg(long)]
    sheet_id: Option<String>,

    /// Tab override (server default applies when omitted)
    #[arg(short = 's', long)]
    sheet_name: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    output: OutputFormatArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append records from a JSON file or stdin
    Add {
        /// JSON file with an array of records (or a single record);
        /// reads stdin when omitted
        #[arg(short = 'f', long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Read every row
    Read,
    /// Filtered, paginated listing
    List {
        /// Inclusive lower date bound (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from_date: Option<String>,
        /// Inclusive upper date bound
        #[arg(long)]
        to_date: Option<String>,
        /// Rows to skip after filtering
        #[arg(long)]
        offset: Option<usize>,
        /// Maximum rows to return
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Replace the row matching the record's composite key
    Update {
        /// JSON file with the replacement record; reads stdin when omitted
        #[arg(short = 'f', long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Delete the row matching the composite key
    Delete {
        /// Property address
        #[arg(long)]
        address: String,
        /// Auction event name
        #[arg(long)]
        auction_name: String,
        /// Auction date as stored
        #[arg(long)]
        auction_date: String,
    },
}

/// Output format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Display rows in a formatted table
    Table,
    /// Display rows as JSON
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let request = build_request(&args)?;
    let client = Client::new(&args.host, args.port);
    let response = client.send(&request)?;

    if !response.ok {
        eprintln!(
            "Error: {}",
            response.error.as_deref().unwrap_or("request failed")
        );
        return Ok(ExitCode::FAILURE);
    }

    print_response(&args, &response);
    Ok(ExitCode::SUCCESS)
}

fn build_request(args: &Args) -> Result<Request> {
    let mut request = match &args.command {
        Command::Add { file } => {
            let mut request = Request::new(Action::Add);
            request.rows = Some(read_records(file.as_deref())?);
            request
        }
        Command::Read => Request::new(Action::Read),
        Command::List {
            from_date,
            to_date,
            offset,
            limit,
        } => {
            let mut request = Request::new(Action::List);
            request.from_date = from_date.clone();
            request.to_date = to_date.clone();
            request.offset = offset.map(|v| v.to_string());
            request.limit = limit.map(|v| v.to_string());
            request
        }
        Command::Update { file } => {
            let mut records = read_records(file.as_deref())?;
            if records.len() != 1 {
                bail!("update expects exactly one record, got {}", records.len());
            }
            let mut request = Request::new(Action::UpdateRow);
            request.row_data = Some(records.remove(0));
            request
        }
        Command::Delete {
            address,
            auction_name,
            auction_date,
        } => {
            let mut key = JsonMap::new();
            key.insert("address".to_string(), Value::String(address.clone()));
            key.insert(
                "auction_name".to_string(),
                Value::String(auction_name.clone()),
            );
            key.insert(
                "auction_date".to_string(),
                Value::String(auction_date.clone()),
            );
            let mut request = Request::new(Action::DeleteRow);
            request.row_data = Some(key);
            request
        }
    };

    request.token = args.token.clone();
    request.sheet_id = args.sheet_id.clone();
    request.sheet_name = args.sheet_name.clone();
    Ok(request)
}

/// Reads one or more records from a JSON file or stdin: either an
/// array of objects or a single object.
fn read_records(file: Option<&std::path::Path>) -> Result<Vec<JsonMap>> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let value: Value = serde_json::from_str(&content).context("Invalid JSON input")?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Ok(object),
                other => bail!("expected a JSON object per record, got: {other}"),
            })
            .collect(),
        Value::Object(object) => Ok(vec![object]),
        other => bail!("expected a JSON object or array of objects, got: {other}"),
    }
}

fn print_response(args: &Args, response: &Response) {
    if let Some(rows) = &response.rows {
        println!("{}", formatter::format_rows(rows, args.output.into()));
        match (response.total, response.returned) {
            (Some(total), Some(returned)) => {
                println!(
                    "({returned} of {total} rows, offset {}, limit {})",
                    response.offset.unwrap_or(0),
                    response.limit.unwrap_or(0)
                );
            }
            _ => {
                if let Some(count) = response.count {
                    println!("({count} rows)");
                }
            }
        }
        return;
    }

    if let Some(message) = &response.message {
        println!("{message}");
        if let Some(index) = response.row_index {
            println!("(row index {index})");
        }
    } else {
        println!("ok");
    }
}
