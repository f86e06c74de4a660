//! PDF Repage CLI tool
//!
//! A command-line tool for replacing page ranges in a PDF and extracting
//! document properties.

use clap::{Parser, Subcommand};
use glob::glob;
use std::path::PathBuf;
use std::process;

use pdf_repage::pdf::{extract_properties, replace_pages, write_properties_json};
use pdf_repage::plan::ReplacementPlan;
use pdf_repage::ranges::PageSelection;

/// PDF Repage - Replace page ranges and extract document properties
#[derive(Parser)]
#[command(name = "pdf-repage")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Replace base pages 1-4 with pages 1-3 and 4 of another document
    pdf-repage replace --base base.pdf -o output.pdf --pages \"input1.pdf:1-3,4@1\"

    # Replace from page 3 onward with every page of a second document
    pdf-repage replace --base base.pdf -o output.pdf --pages \"input2.pdf@3\"

    # Save document properties as JSON
    pdf-repage properties input.pdf -o properties.json

    # Properties of every PDF in a directory, printed to stdout
    pdf-repage properties \"*.pdf\"

    # Quick human-readable summary
    pdf-repage info input.pdf")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace page ranges of a base PDF with pages from other PDFs
    Replace {
        /// Base PDF whose pages will be replaced
        #[arg(short, long)]
        base: PathBuf,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Replacement spec "SOURCE[:RANGES]@POSITION" (repeatable).
        /// RANGES is a list like "1-3,5"; omit it (or use "all") to take
        /// every page of the source.
        #[arg(long = "pages", required = true)]
        pages: Vec<String>,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Extract document properties and save them as JSON
    Properties {
        /// Input PDF files. Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replace { base, output, pages, open } => {
            cmd_replace(base, output, pages, open)
        }
        Commands::Properties { inputs, output } => {
            cmd_properties(inputs, output)
        }
        Commands::Info { input } => {
            cmd_info(input)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Expand glob patterns in input paths
fn expand_globs(patterns: Vec<String>) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let mut matched = false;
            for entry in glob(&pattern)? {
                match entry {
                    Ok(path) => {
                        paths.push(path);
                        matched = true;
                    }
                    Err(e) => eprintln!("Warning: glob error for {}: {}", pattern, e),
                }
            }
            if !matched {
                return Err(format!("No files matched pattern: {}", pattern).into());
            }
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}

/// Open a file with the system default application
fn open_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Parse a replacement spec of the form "SOURCE[:RANGES]@POSITION"
///
/// The part after the last ':' is treated as a range list only when it parses
/// as one; otherwise the whole left side is the source path. This keeps
/// Windows drive letters working.
fn parse_replacement_spec(
    spec: &str,
) -> Result<(PathBuf, PageSelection, u32), Box<dyn std::error::Error>> {
    let (left, position_str) = spec
        .rsplit_once('@')
        .ok_or_else(|| format!("Missing @POSITION in replacement spec: {}", spec))?;

    let position: u32 = position_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid position in replacement spec: {}", position_str))?;

    if let Some((path, ranges)) = left.rsplit_once(':') {
        if !path.is_empty() {
            if let Ok(selection) = PageSelection::parse(ranges) {
                return Ok((PathBuf::from(path), selection, position));
            }
        }
    }

    Ok((PathBuf::from(left), PageSelection::WholeDocument, position))
}

/// Replace page ranges of a base PDF with pages from other PDFs
fn cmd_replace(
    base: PathBuf,
    output: PathBuf,
    pages: Vec<String>,
    open: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !base.exists() {
        return Err(format!("Base file not found: {}", base.display()).into());
    }

    let mut plan = ReplacementPlan::new(&base);
    for spec in &pages {
        let (source, selection, position) = parse_replacement_spec(spec)?;
        if !source.exists() {
            return Err(format!("Input file not found: {}", source.display()).into());
        }
        plan.add_replacement(&source, selection, position)?;
    }

    eprintln!(
        "Replacing pages in {} ({} replacement{})...",
        base.display(),
        plan.len(),
        if plan.len() == 1 { "" } else { "s" }
    );

    replace_pages(&plan, &output)?;

    eprintln!("Output: {}", output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Extract properties of one or more PDFs
fn cmd_properties(
    inputs: Vec<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Expand glob patterns
    let inputs = expand_globs(inputs)?;

    let mut all_props = Vec::new();
    for path in &inputs {
        if !path.exists() {
            return Err(format!("Input file not found: {}", path.display()).into());
        }
        eprintln!("Reading properties of {}...", path.display());
        all_props.push(extract_properties(path)?);
    }

    match output {
        Some(path) => {
            if all_props.len() == 1 {
                write_properties_json(&all_props[0], &path)?;
            } else {
                let file = std::fs::File::create(&path)?;
                serde_json::to_writer_pretty(file, &all_props)?;
            }
            eprintln!("Properties saved to: {}", path.display());
        }
        None => {
            for props in &all_props {
                println!("{}", serde_json::to_string_pretty(props)?);
            }
        }
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }

    let props = extract_properties(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", props.page_count);
    println!("PDF version: {}", props.pdf_version);
    println!("Size: {} bytes", props.file_size);
    if props.encrypted {
        println!("Encrypted: yes");
    }

    if let Some(title) = props.title {
        println!("Title: {}", title);
    }
    if let Some(author) = props.author {
        println!("Author: {}", author);
    }
    if let Some(subject) = props.subject {
        println!("Subject: {}", subject);
    }
    if let Some(creator) = props.creator {
        println!("Creator: {}", creator);
    }
    if let Some(producer) = props.producer {
        println!("Producer: {}", producer);
    }
    if let Some(created) = props.created {
        println!("Created: {}", created);
    }
    if let Some(modified) = props.modified {
        println!("Modified: {}", modified);
    }

    Ok(())
}
