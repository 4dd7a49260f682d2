use clap::{ArgAction, Parser};
use std::io::{IsTerminal, Read, Write};
use std::process::ExitCode;

use stitch_patch::{
    DiffError, LocalFs, apply_commit, build_commit, load_current_files, parse_patch,
    process_patch, render_preview,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stitch")]
#[command(about = "Apply pseudo-diff patches read from standard input")]
struct Cli {
    /// Render the colored preview without applying any changes.
    #[arg(long, short = 'p', action = ArgAction::SetTrue)]
    preview: bool,
    /// Apply directly, skipping the preview and confirmation prompt.
    #[arg(long = "no-preview", action = ArgAction::SetTrue)]
    no_preview: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, DiffError> {
    let mut patch_text = String::new();
    std::io::stdin().read_to_string(&mut patch_text)?;
    if patch_text.is_empty() {
        eprintln!("please pass patch text through stdin");
        return Ok(ExitCode::from(1));
    }

    let fs = LocalFs;
    if cli.no_preview {
        let message = process_patch(&patch_text, &fs)?;
        println!("{message}");
        return Ok(ExitCode::SUCCESS);
    }

    // Preview path: parse and resolve without ever invoking the
    // applier, so nothing on disk changes until confirmed.
    if !patch_text.starts_with("*** Begin Patch") {
        return Err(DiffError::Patch(
            "patch text must start with '*** Begin Patch'".to_string(),
        ));
    }
    let originals = load_current_files(&patch_text, &fs)?;
    let (patch, fuzz) = parse_patch(&patch_text, &originals)?;

    print!("{}", render_preview(&patch, &originals)?);
    if fuzz > 0 {
        eprintln!("warning: context matched with fuzz {fuzz}");
    }

    if cli.preview {
        println!("preview complete; rerun without --preview to apply");
        return Ok(ExitCode::SUCCESS);
    }

    if !confirm()? {
        println!("patch application cancelled");
        return Ok(ExitCode::SUCCESS);
    }

    let commit = build_commit(&patch, &originals)?;
    apply_commit(&commit, &fs)?;
    println!("Done!");
    Ok(ExitCode::SUCCESS)
}

fn confirm() -> Result<bool, DiffError> {
    // Stdin already carried the patch text to EOF; without a terminal
    // there is nobody left to answer, so default to not applying.
    if !std::io::stdin().is_terminal() {
        println!("no interactive terminal; rerun with --no-preview to apply");
        return Ok(false);
    }
    print!("apply these changes? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
