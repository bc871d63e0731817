// drmd command-line front-end: read Markdown, write HTML.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Markdown to HTML converter.
#[derive(Parser)]
#[command(name = "drmd", version, about = "markdown to html converter")]
struct Args {
    /// Markdown file to read (stdin when omitted).
    src: Option<PathBuf>,

    /// Output HTML file (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stylesheet file to append to the output.
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match &args.src {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("Unable to open '{}': {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buf = String::new();
            if let Err(err) = io::stdin().read_to_string(&mut buf) {
                eprintln!("Error reading stdin: {err}");
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    let html = match drmd::to_html(&source) {
        Ok(html) => html,
        Err(err) => {
            eprintln!("Conversion failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => match fs::File::create(path) {
            Ok(file) => Box::new(file),
            Err(err) => {
                eprintln!("Unable to open '{}': {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdout().lock()),
    };

    if let Err(err) = output.write_all(html.as_bytes()) {
        eprintln!("Error writing output: {err}");
        return ExitCode::FAILURE;
    }

    // Appended verbatim; the file carries its own <style> tags.
    if let Some(path) = &args.stylesheet {
        match fs::read(path) {
            Ok(css) => {
                if let Err(err) = output.write_all(&css) {
                    eprintln!("Error writing output: {err}");
                    return ExitCode::FAILURE;
                }
            }
            Err(err) => {
                eprintln!("Unable to read stylesheet '{}': {}", path.display(), err);
            }
        }
    }

    if let Err(err) = output.flush() {
        eprintln!("Error writing output: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
