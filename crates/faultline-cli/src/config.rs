use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use faultline::{RuntimeInfo, DEFAULT_MANIFEST};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Always,
    Never,
    Auto,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "faultline")]
#[command(about = "Serialize and format structured errors", long_about = None)]
pub struct Cli {
    /// Runtime that owns non-absolute file names, as name@version.
    #[arg(long, env = "FAULTLINE_RUNTIME", default_value = "runtime@unknown", global = true)]
    runtime: String,

    /// Colorize reports.
    #[arg(long, value_enum, env = "FAULTLINE_COLOR", default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    /// Manifest file looked up when resolving packages.
    #[arg(long, default_value = DEFAULT_MANIFEST, global = true)]
    manifest_name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serialize a capture document to canonical JSON.
    Serialize {
        /// Capture document path, or `-` for stdin.
        #[arg(value_name = "CAPTURE")]
        input: PathBuf,
    },
    /// Render an error-like JSON value as a text report.
    Format {
        /// JSON value path, or `-` for stdin.
        #[arg(value_name = "VALUE")]
        input: PathBuf,

        /// Treat the input as a capture document rather than a plain value.
        #[arg(long)]
        capture: bool,
    },
    /// Parse an eval-origin string and print its structure.
    Origin {
        #[arg(value_name = "RAW")]
        raw: String,
    },
    /// Show the code and ancestry of a kind, or list every registered kind.
    Kind {
        #[arg(value_name = "NAME", required_unless_present = "list")]
        name: Option<String>,

        #[arg(long, conflicts_with = "name")]
        list: bool,
    },
    /// Print the JSON schema of the serialized form.
    Schema,
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Serialize { .. } => "serialize",
            Self::Format { .. } => "format",
            Self::Origin { .. } => "origin",
            Self::Kind { .. } => "kind",
            Self::Schema => "schema",
        }
    }
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub runtime: RuntimeInfo,
    pub color: bool,
    pub manifest_name: String,
    pub command: Command,
}

impl CliConfig {
    pub fn new(command: Command) -> Self {
        Self {
            runtime: RuntimeInfo::default(),
            color: false,
            manifest_name: DEFAULT_MANIFEST.to_string(),
            command,
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimeInfo) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_manifest_name(mut self, manifest_name: impl Into<String>) -> Self {
        self.manifest_name = manifest_name.into();
        self
    }
}

impl Cli {
    pub fn into_config(self) -> anyhow::Result<CliConfig> {
        let runtime = self
            .runtime
            .parse::<RuntimeInfo>()
            .with_context(|| format!("Invalid --runtime value '{}'", self.runtime))?;

        Ok(CliConfig::new(self.command)
            .with_runtime(runtime)
            .with_color(self.color.enabled())
            .with_manifest_name(self.manifest_name))
    }
}
