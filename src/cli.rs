use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert pseudo-code into an App Inventor .aia project")]
pub struct Cli {
    /// Pseudo-code file (or IR JSON with --ir)
    pub input: PathBuf,

    /// Archive to write [default: <input stem>.aia]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extension .aix file to bundle; may be repeated
    #[arg(short, long = "extension", value_name = "AIX")]
    pub extensions: Vec<PathBuf>,

    /// JSON file overriding the built-in tables
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Treat the input as a serialised IR document
    #[arg(long)]
    pub ir: bool,

    /// Parse and report diagnostics without writing an archive
    #[arg(long)]
    pub check: bool,

    /// Also write the parsed IR as JSON
    #[arg(long, value_name = "JSON")]
    pub emit_ir: Option<PathBuf>,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output(&self.input))
    }
}

/// `program.txt` -> `program.aia`, next to the input.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("aia")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_extensions_and_default_output() {
        let cli = Cli::parse_from([
            "pseudo-aia",
            "app.txt",
            "-e",
            "A.aix",
            "--extension",
            "B.aix",
            "--check",
        ]);
        assert_eq!(cli.extensions, vec![PathBuf::from("A.aix"), PathBuf::from("B.aix")]);
        assert!(cli.check);
        assert!(!cli.ir);
        assert_eq!(cli.output_path(), PathBuf::from("app.aia"));
    }

    #[test]
    fn test_explicit_output_wins() {
        let cli = Cli::parse_from(["pseudo-aia", "app.txt", "-o", "out/x.aia", "--emit-ir", "ir.json"]);
        assert_eq!(cli.output_path(), PathBuf::from("out/x.aia"));
        assert_eq!(cli.emit_ir, Some(PathBuf::from("ir.json")));
    }
}
