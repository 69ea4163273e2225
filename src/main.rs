use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value, json};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

mod convert;
mod mcp;
mod request;
mod tools;

#[derive(Parser)]
#[command(name = "mcp-webp")]
#[command(version, about = "Convert PNG/JPEG images to WebP, standalone or as an MCP server")]
struct Cli {
    /// Log at debug level (also enabled by DEBUG=1; RUST_LOG wins over both)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct EncodeArgs {
    /// WebP quality passed to the encoder
    #[arg(long, default_value_t = mcp::contracts::DEFAULT_QUALITY)]
    quality: i64,
    /// Use lossless encoding
    #[arg(long)]
    lossless: bool,
}

#[derive(Args, Clone)]
struct FileArgs {
    #[command(flatten)]
    encode: EncodeArgs,
    /// Directory for the .webp output (defaults to the source's directory)
    #[arg(long)]
    output_dir: Option<String>,
    /// Keep the source image after a successful conversion
    #[arg(long)]
    keep_original: bool,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Path to the PNG/JPEG image
    #[arg(long)]
    path: String,
    #[command(flatten)]
    file: FileArgs,
}

#[derive(Args, Clone)]
struct BatchConvertArgs {
    /// Paths to the PNG/JPEG images, converted in order
    #[arg(required = true)]
    paths: Vec<String>,
    #[command(flatten)]
    file: FileArgs,
}

#[derive(Args, Clone)]
#[command(
    group(
        clap::ArgGroup::new("input")
            .required(true)
            .multiple(false)
            .args(["base64", "base64_file"])
    )
)]
struct ConvertBase64Args {
    /// Base64-encoded image, optionally with a data:image/...;base64, prefix
    #[arg(long)]
    base64: Option<String>,
    /// File containing the base64 payload
    #[arg(long)]
    base64_file: Option<PathBuf>,
    /// Where to write the .webp file
    #[arg(long)]
    output_path: String,
    #[command(flatten)]
    encode: EncodeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
    },
    /// Convert one image file to WebP
    Convert(ConvertArgs),
    /// Convert several image files to WebP
    BatchConvert(BatchConvertArgs),
    /// Convert a base64 payload to a WebP file
    ConvertBase64(ConvertBase64Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Serve { stdio } => {
            if stdio {
                run_stdio_server()
            } else {
                anyhow::bail!("only --stdio transport is supported")
            }
        }
        Commands::Convert(args) => run_convert(args),
        Commands::BatchConvert(args) => run_batch_convert(args),
        Commands::ConvertBase64(args) => run_convert_base64(args),
    }
}

/// Logs go to stderr; stdout carries the protocol.
fn init_logging(verbose: bool) {
    let debug_env = std::env::var("DEBUG").is_ok_and(|value| value == "1");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose || debug_env {
            EnvFilter::new("mcp_webp=debug")
        } else {
            EnvFilter::new("mcp_webp=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let mut map = build_file_args(&args.file);
    map.insert("image_path".to_string(), json!(args.path));
    let result = tools::convert_to_webp::call(&Value::Object(map));
    print_tool_result(result)
}

fn run_batch_convert(args: BatchConvertArgs) -> Result<()> {
    let mut map = build_file_args(&args.file);
    map.insert("image_paths".to_string(), json!(args.paths));
    let result = tools::batch_convert_to_webp::call(&Value::Object(map));
    print_tool_result(result)
}

fn run_convert_base64(args: ConvertBase64Args) -> Result<()> {
    let payload = match (args.base64, args.base64_file) {
        (Some(payload), _) => payload,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --base64 or --base64-file is required"),
    };

    let mut map = build_encode_args(&args.encode);
    map.insert("base64_image".to_string(), json!(payload.trim()));
    map.insert("output_path".to_string(), json!(args.output_path));
    let result = tools::convert_base64_to_webp::call(&Value::Object(map));
    print_tool_result(result)
}

fn build_encode_args(encode: &EncodeArgs) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("quality".to_string(), json!(encode.quality));
    map.insert("lossless".to_string(), json!(encode.lossless));
    map
}

fn build_file_args(file: &FileArgs) -> Map<String, Value> {
    let mut map = build_encode_args(&file.encode);
    if let Some(output_dir) = &file.output_dir {
        map.insert("output_dir".to_string(), json!(output_dir));
    }
    map.insert("keep_original".to_string(), json!(file.keep_original));
    map
}

fn print_tool_result(result: Value) -> Result<()> {
    let is_error = result
        .get("isError")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if is_error {
        let structured = result.get("structuredContent");
        let message = structured
            .and_then(|value| value.get("error"))
            .and_then(|error| {
                error
                    .as_str()
                    .or_else(|| error.get("message").and_then(|value| value.as_str()))
            })
            .unwrap_or("tool error");
        eprintln!("{message}");
        process::exit(1);
    }

    let text = result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("");
    println!("{text}");
    Ok(())
}

fn run_stdio_server() -> Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting webp converter MCP server on stdio"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let reader = stdin.lock().lines();
    let mut writer = io::BufWriter::new(stdout.lock());

    for line in reader {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unparseable request line");
                continue;
            }
        };

        if let Some(response) = handle_request(&request) {
            let serialized =
                serde_json::to_string(&response).context("failed to serialize response")?;
            writeln!(writer, "{serialized}").context("failed to write response")?;
            writer.flush().context("failed to flush response")?;
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

fn handle_request(request: &Value) -> Option<Value> {
    let method = request.get("method").and_then(|value| value.as_str());
    let id = request.get("id").cloned();
    tracing::debug!(method = method.unwrap_or("<none>"), "received request");

    let result = match (method, id.as_ref()) {
        (_, None) => return None,
        (Some("initialize"), Some(_)) => json!({
            "protocolVersion": "2025-11-25",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
        (Some("tools/list"), Some(_)) => json!({
            "tools": mcp::tool_definitions()
        }),
        (Some("tools/call"), Some(_)) => handle_tool_call(request),
        (Some("ping"), Some(_)) => json!({}),
        (Some("health"), Some(_)) => json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION")
        }),
        (method, Some(id)) => {
            let method = method.unwrap_or("<none>");
            tracing::debug!(method, "method not found");
            return Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": mcp::errors::METHOD_NOT_FOUND,
                    "message": format!("Method not found: {method}")
                }
            }));
        }
    };

    Some(json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    }))
}

fn handle_tool_call(request: &Value) -> Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result(mcp::errors::INVALID_INPUT, "params must be an object", None);
    };

    let name = params.get("name").and_then(|value| value.as_str());
    let Some(name) = name else {
        return tools::error_result(
            mcp::errors::INVALID_INPUT,
            "params.name must be a string",
            None,
        );
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    tracing::debug!(tool = name, "calling tool");
    match name {
        mcp::contracts::TOOL_CONVERT_TO_WEBP => tools::convert_to_webp::call(&args),
        mcp::contracts::TOOL_BATCH_CONVERT_TO_WEBP => tools::batch_convert_to_webp::call(&args),
        mcp::contracts::TOOL_CONVERT_BASE64_TO_WEBP => tools::convert_base64_to_webp::call(&args),
        _ => tools::error_result(
            mcp::errors::INVALID_INPUT,
            format!("tool not implemented: {name}"),
            Some(name),
        ),
    }
}
