// ABOUTME: CLI binary for the Telegraph article converter.
// ABOUTME: Reads a saved article page, converts it, and prints HTML, text, Markdown, nodes, or page JSON.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use digests_telegraph::{
    decode_html_bytes, formats, ArticleBuilder, CollisionPolicy, ContentType, Page,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "telegraph")]
#[command(about = "Convert a scraped article page into Telegraph-ready markup")]
struct Args {
    /// Output format: html (default), text/txt, markdown/md, nodes
    #[arg(short = 'f', long = "format", default_value = "html")]
    format: String,

    /// Output the whole page as JSON instead of the converted body
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Charset of the input, e.g. windows-1251 (default: detect)
    #[arg(long = "charset")]
    charset: Option<String>,

    /// On identical source positions keep the earlier converter's tag
    #[arg(long = "keep-first")]
    keep_first: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// HTML file to convert, or "-" for stdin
    input: String,
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("error reading stdin")?;
        return Ok(buf);
    }
    fs::read(input).with_context(|| format!("error reading file {:?}", input))
}

fn format_output(page: &Page, content_type: ContentType, json_output: bool) -> Result<String> {
    if json_output {
        return Ok(serde_json::to_string_pretty(page)?);
    }
    Ok(formats::render(page.html(), content_type)?)
}

fn run(args: &Args) -> Result<()> {
    let bytes = read_input(&args.input)?;
    let html = decode_html_bytes(&bytes, args.charset.as_deref());

    let collision = if args.keep_first {
        CollisionPolicy::KeepFirst
    } else {
        CollisionPolicy::KeepLast
    };
    let builder = ArticleBuilder::builder().collision(collision).build();

    let start = Instant::now();
    let page = builder.build(&html)?;
    let elapsed = start.elapsed();

    let output = format_output(&page, ContentType::from(args.format.as_str()), args.json_output)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("error writing to {:?}", path))?
        }
        None => println!("{}", output),
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
