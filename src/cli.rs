use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

pub const BIN_NAME: &str = "jarversion";

pub const BANNER: &str =
    "jarversion - Jar version CLI to query the version information in the MANIFEST.MF file.";

/// Flags of one invocation. Built fresh from the argument list every time.
#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(name = BIN_NAME)]
#[command(override_usage = "jarversion [options] <path-to-jar-file>")]
#[command(help_template = "{usage-heading} {usage}\n\n{all-args}")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// JAR file to inspect
    #[arg(value_name = "path-to-jar-file")]
    pub jar: Option<PathBuf>,

    /// Output version info in JSON format
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to specified file
    #[arg(long, value_name = "file", value_parser = OsStringValueParser::new().map(PathBuf::from))]
    pub json_file: Option<PathBuf>,

    /// Write version info to specified text file
    #[arg(long, value_name = "file", value_parser = OsStringValueParser::new().map(PathBuf::from))]
    pub text_file: Option<PathBuf>,

    /// Output MD5 hash of the JAR file
    #[arg(long)]
    pub md5: bool,

    /// Show tool version
    #[arg(long = "version")]
    pub show_version: bool,

    /// Show this help message
    #[arg(long = "help")]
    pub show_help: bool,
}

impl Cli {
    /// Parse `args`, which exclude the program name.
    pub fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv = std::iter::once(OsString::from(BIN_NAME)).chain(args.into_iter().map(Into::into));
        let mut cli = Self::try_parse_from(argv)?;
        // An empty file name means the option was not given.
        cli.json_file = cli.json_file.filter(|path| !path.as_os_str().is_empty());
        cli.text_file = cli.text_file.filter(|path| !path.as_os_str().is_empty());
        Ok(cli)
    }

    /// `--md5` without any JSON or text output flag skips the archive entirely.
    pub fn is_md5_only(&self) -> bool {
        self.md5 && !self.wants_json() && self.text_file.is_none()
    }

    pub fn wants_json(&self) -> bool {
        self.json || self.json_file.is_some()
    }
}

pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

pub fn version_line() -> String {
    format!("{BIN_NAME} CLI tool version: {}", env!("CARGO_PKG_VERSION"))
}
