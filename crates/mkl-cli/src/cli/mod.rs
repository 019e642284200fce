use std::path::PathBuf;

use clap::Parser;
use mkl_config::{CliOverrides, OutputMode};

/// Where the pattern list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternInput {
    Stdin,
    File(PathBuf),
}

/// Top-level CLI parser for the `gen-mkl-rs` binary.
#[derive(Debug, Parser)]
#[command(name = "gen-mkl-rs", version, about = "generate select bindings for rust")]
pub struct Cli {
    /// List of functions to generate. Use * for s/d, # for S/D; `-` reads stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: String,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Path to mkl.h (defaults to $MKLROOT/include/mkl.h)
    #[arg(short = 'm', long = "mkl-header", value_name = "FILE")]
    pub mkl_header: Option<PathBuf>,

    /// MKL provider crate the generated code imports from
    #[arg(short = 'c', long = "mkl-provider-crate", value_name = "NAME")]
    pub provider_crate: Option<String>,

    /// Trait name
    #[arg(short, long = "trait-name", value_name = "NAME")]
    pub trait_name: Option<String>,

    /// Emit a C header instead of Rust bindings
    #[arg(long)]
    pub c_header: bool,

    /// Extra directory searched for included headers (repeatable)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn pattern_input(&self) -> PatternInput {
        if self.input == "-" {
            PatternInput::Stdin
        } else {
            PatternInput::File(PathBuf::from(&self.input))
        }
    }

    /// Command-line values as the top configuration layer.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            mkl_header: self.mkl_header.clone(),
            provider_crate: self.provider_crate.clone(),
            trait_name: self.trait_name.clone(),
            mode: self.c_header.then_some(OutputMode::CHeader),
            include_dirs: (!self.include.is_empty()).then(|| self.include.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_flags_parse() {
        let cli = Cli::try_parse_from([
            "gen-mkl-rs",
            "-i",
            "funcs.txt",
            "-o",
            "out.rs",
            "-m",
            "/opt/mkl/include/mkl.h",
            "-c",
            "mkl_sys",
            "-t",
            "Blas",
        ])
        .expect("cli should parse");

        assert_eq!(cli.pattern_input(), PatternInput::File(PathBuf::from("funcs.txt")));
        assert_eq!(cli.output, PathBuf::from("out.rs"));
        let overrides = cli.overrides();
        assert_eq!(overrides.mkl_header, Some(PathBuf::from("/opt/mkl/include/mkl.h")));
        assert_eq!(overrides.provider_crate.as_deref(), Some("mkl_sys"));
        assert_eq!(overrides.trait_name.as_deref(), Some("Blas"));
        assert_eq!(overrides.mode, None);
        assert_eq!(overrides.include_dirs, None);
    }

    #[test]
    fn dash_reads_stdin() {
        let cli = Cli::try_parse_from(["gen-mkl-rs", "-i", "-", "-o", "out.rs"])
            .expect("cli should parse");
        assert_eq!(cli.pattern_input(), PatternInput::Stdin);
    }

    #[test]
    fn c_header_flag_selects_mode() {
        let cli = Cli::try_parse_from([
            "gen-mkl-rs",
            "--input",
            "f.txt",
            "--output",
            "out.h",
            "--c-header",
            "-I",
            "/a",
            "-I",
            "/b",
        ])
        .expect("cli should parse");
        let overrides = cli.overrides();
        assert_eq!(overrides.mode, Some(OutputMode::CHeader));
        assert_eq!(
            overrides.include_dirs,
            Some(vec![PathBuf::from("/a"), PathBuf::from("/b")])
        );
    }

    #[test]
    fn input_and_output_are_required() {
        assert!(Cli::try_parse_from(["gen-mkl-rs", "-o", "out.rs"]).is_err());
        assert!(Cli::try_parse_from(["gen-mkl-rs", "-i", "f.txt"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let parsed = Cli::try_parse_from(["gen-mkl-rs", "-i", "f", "-o", "o", "-q", "-v"]);
        assert!(parsed.is_err());
    }
}
