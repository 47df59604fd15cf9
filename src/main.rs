//! fb2-reader - FictionBook 2.0 inspector

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fb2_reader::{Fb2Parser, ParseOptions, ParsedDocument};

#[derive(Parser)]
#[command(name = "fb2-reader")]
#[command(version, about = "Read FictionBook 2.0 e-books", long_about = None)]
#[command(after_help = "EXAMPLES:
    fb2-reader book.fb2                  Show title, author and cover info
    fb2-reader book.fb2.zip --text       Print the body text
    fb2-reader book.fb2 --cover out.jpg  Save the cover thumbnail
    fb2-reader book.fb2 --json           Print the record as JSON")]
struct Cli {
    /// Input file (.fb2 or .fb2.zip)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Print the body text
    #[arg(short, long, conflicts_with = "json")]
    text: bool,

    /// Print the parsed record as JSON
    #[arg(short, long)]
    json: bool,

    /// Write the cover thumbnail to this path
    #[arg(short, long, value_name = "PATH")]
    cover: Option<PathBuf>,

    /// Maximum cover width in pixels
    #[arg(long, value_name = "N", default_value_t = 400)]
    max_width: u32,

    /// Maximum cover height in pixels
    #[arg(long, value_name = "N", default_value_t = 600)]
    max_height: u32,

    /// Skip cover extraction
    #[arg(long, conflicts_with = "cover")]
    no_cover: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "fb2_reader=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = ParseOptions::default()
        .with_cover_box(cli.max_width, cli.max_height)
        .with_cover(!cli.no_cover);
    let doc = Fb2Parser::new(options)
        .parse_file(&cli.input)
        .map_err(|e| format!("{}: {e}", cli.input.display()))?;

    if let Some(path) = &cli.cover {
        let cover = doc
            .cover
            .as_ref()
            .ok_or_else(|| "book has no usable cover".to_string())?;
        std::fs::write(path, &cover.data).map_err(|e| format!("{}: {e}", path.display()))?;
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?;
        println!("{json}");
    } else if cli.text {
        println!("{}", doc.body_text);
    } else {
        show_info(cli, &doc);
    }

    Ok(())
}

fn show_info(cli: &Cli, doc: &ParsedDocument) {
    println!("File: {}", cli.input.display());
    println!("Title: {}", doc.title);
    println!("Author: {}", doc.author);
    match &doc.cover {
        Some(cover) => println!(
            "Cover: {}x{} {} ({} bytes)",
            cover.width,
            cover.height,
            cover.mime_type(),
            cover.len()
        ),
        None => println!("Cover: none"),
    }
    let sections = doc.body_text.split("\n\n").filter(|s| !s.is_empty()).count();
    println!("Sections: {sections}");
    println!("Text: {} characters", doc.body_text.chars().count());
}
