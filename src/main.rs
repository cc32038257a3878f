//! Infers the types of a TIP file
//!
//! ```text
//! tip <file.tip> [--exprs] [--no-color]
//! ```

use std::{
    fs,
    io::{self, Write as _},
    process,
};

use base::InputFile;
use camino::Utf8PathBuf;
use clap::Parser;

/// Infers the types of a TIP file
#[derive(Debug, Parser)]
#[command(name = "tip")]
#[command(version)]
struct Args {
    /// Source file
    path: Utf8PathBuf,
    /// Print expression types, too
    #[arg(long)]
    exprs: bool,
    #[arg(long)]
    no_color: bool,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    match self::run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("can't process file {}: {}", args.path, err);
            process::exit(1);
        }
    }
}

/// Returns false on any diagnostic
fn run(args: &Args) -> io::Result<bool> {
    let src = fs::read_to_string(&args.path)?;
    let input_file = InputFile::new(args.path.as_str(), src);

    log::debug!("checking {}", args.path);

    let out = io::stdout();
    let mut out = out.lock();

    match tip::check_file(input_file) {
        Ok(analysis) => {
            write!(out, "{}", analysis.render_decls())?;
            if args.exprs {
                writeln!(out)?;
                write!(out, "{}", analysis.render_exprs())?;
            }
            out.flush()?;
            Ok(true)
        }
        Err(failure) => {
            write!(out, "{}", failure.render())?;
            out.flush()?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::Args;

    #[test]
    fn flags() {
        let args = Args::try_parse_from(["tip", "main.tip", "--exprs"]).unwrap();
        assert_eq!(args.path.as_str(), "main.tip");
        assert!(args.exprs);
        assert!(!args.no_color);

        let args = Args::try_parse_from(["tip", "--no-color", "a.tip"]).unwrap();
        assert_eq!(args.path.as_str(), "a.tip");
        assert!(args.no_color);
    }

    #[test]
    fn usage_errors() {
        assert!(Args::try_parse_from(["tip"]).is_err());
        assert!(Args::try_parse_from(["tip", "main.tip", "--unknown"]).is_err());
        assert!(Args::try_parse_from(["tip", "a.tip", "b.tip"]).is_err());
    }
}
