/*!
 * Configuration handling for filizer
 *
 * Values come from three layers: command-line flags (and their environment
 * variables), the TOML file at `~/.config/filizer/cli-conf.toml`, and the
 * built-in defaults, in that order of precedence.
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use clap_complete::Shell;
use serde::Deserialize;
use url::Url;

use crate::error::Result;
use crate::report::ReportFormat;
use crate::{bail, ensure};

/// Per-call network timeout when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments for filizer
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "filizer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fingerprint local files and reconcile them against a remote file inventory",
    long_about = "Walks a directory tree, hashes every file and checks it against the remote inventory. New files and copies with new names are posted; files an operator flagged for deletion leave a MARKED_FOR_DELETION marker in their directory."
)]
pub struct Args {
    /// Directory to scan
    #[clap(default_value = ".")]
    pub directory: PathBuf,

    /// Inventory files endpoint, e.g. https://host/api/v1/files/
    #[clap(long, env = "FILIZER_URL")]
    pub url: Option<String>,

    /// Token sent as a bearer credential
    #[clap(long, env = "FILIZER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Classify and report without posting records or touching markers
    #[clap(long)]
    pub dry_run: bool,

    /// Remove deletion markers without asking
    #[clap(long)]
    pub force: bool,

    /// Comma-separated glob patterns matched against path segments
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Per-request timeout in seconds
    #[clap(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Alternate configuration file
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report layout printed at the end of the run
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report_format: ReportFormat,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Contents of the configuration file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub excludes: Vec<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Default location, `~/.config/filizer/cli-conf.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("filizer").join("cli-conf.toml"))
    }

    /// Load the file at `path`; a missing file yields an empty config
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .map_err(|e| crate::error!(Config, "Failed to parse {}: {}", path.display(), e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => bail!(Config, "Failed to read {}: {}", path.display(), e),
        }
    }
}

/// Validated run configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Root of the scan
    pub scan_root: PathBuf,

    /// Inventory files endpoint
    pub url: String,

    /// Bearer token
    pub token: Option<String>,

    /// Suppress record creation and marker changes
    pub dry_run: bool,

    /// Treat marker removal as pre-confirmed
    pub force: bool,

    /// User exclusion patterns
    pub excludes: Vec<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Report layout
    pub report_format: ReportFormat,
}

impl Config {
    /// Merge arguments over the file config and validate the result
    pub fn from_sources(args: Args, file: FileConfig) -> Result<Self> {
        let mut excludes = file.excludes;
        excludes.extend(args.exclude);

        let config = Self {
            scan_root: args.directory,
            url: args.url.or(file.url).unwrap_or_default(),
            token: args.token.or(file.token).filter(|t| !t.is_empty()),
            dry_run: args.dry_run,
            force: args.force,
            excludes,
            timeout: Duration::from_secs(
                args.timeout
                    .or(file.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            report_format: args.report_format,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load the config file named by the arguments (or the default one) and merge
    pub fn load(args: Args) -> Result<Self> {
        let file = match (&args.config, FileConfig::default_path()) {
            (Some(path), _) => {
                ensure!(
                    path.is_file(),
                    Config,
                    "Config file not found: {}",
                    path.display()
                );
                FileConfig::load(path)?
            }
            (None, Some(path)) => FileConfig::load(&path)?,
            (None, None) => FileConfig::default(),
        };
        Self::from_sources(args, file)
    }

    /// Parsed inventory endpoint
    pub fn endpoint(&self) -> Result<Url> {
        ensure!(
            !self.url.is_empty(),
            Config,
            "No inventory URL configured (use --url, FILIZER_URL or the config file)"
        );
        let url = Url::parse(&self.url)
            .map_err(|e| crate::error!(Config, "Invalid inventory URL {}: {}", self.url, e))?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            Config,
            "Inventory URL must use http or https: {}",
            self.url
        );
        Ok(url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.scan_root.is_dir(),
            Config,
            "Scan directory not found: {}",
            self.scan_root.display()
        );
        self.endpoint()?;
        ensure!(
            !self.timeout.is_zero(),
            Config,
            "Timeout must be greater than zero"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilizerError;
    use tempfile::tempdir;

    fn args(dir: &Path, extra: &[&str]) -> Args {
        let mut argv = vec!["filizer".to_string(), dir.display().to_string()];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::parse_from(argv)
    }

    #[test]
    fn test_missing_config_file_is_empty() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join(".config/filizer/cli-conf.toml");
        assert_eq!(FileConfig::load(&path)?, FileConfig::default());
        Ok(())
    }

    #[test]
    fn test_config_file_values() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("cli-conf.toml");
        fs::write(
            &path,
            "url = \"https://example.com/api\"\ntoken = \"test-token\"\nexcludes = [\"*.tmp\"]\n",
        )?;

        let file = FileConfig::load(&path)?;
        assert_eq!(file.url.as_deref(), Some("https://example.com/api"));
        assert_eq!(file.token.as_deref(), Some("test-token"));
        assert_eq!(file.excludes, vec!["*.tmp".to_string()]);
        assert_eq!(file.timeout_secs, None);
        Ok(())
    }

    #[test]
    fn test_malformed_config_file_is_fatal() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("cli-conf.toml");
        fs::write(&path, "url = [unterminated")?;

        let err = FileConfig::load(&path).unwrap_err();
        assert!(matches!(err, FilizerError::Config(_)));
        assert!(err.is_fatal());
        Ok(())
    }

    #[test]
    fn test_arguments_override_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let file = FileConfig {
            url: Some("https://file.example.com/files/".to_string()),
            token: Some("file-token".to_string()),
            excludes: vec!["cache".to_string()],
            timeout_secs: Some(5),
        };
        let config = Config::from_sources(
            args(
                temp_dir.path(),
                &["--url", "https://cli.example.com/files/", "--exclude", "a,b", "--dry-run"],
            ),
            file,
        )?;

        assert_eq!(config.url, "https://cli.example.com/files/");
        assert_eq!(config.token.as_deref(), Some("file-token"));
        assert_eq!(config.excludes, vec!["cache", "a", "b"]);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.dry_run);
        assert!(!config.force);
        Ok(())
    }

    #[test]
    fn test_missing_url_is_rejected() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut parsed = args(temp_dir.path(), &[]);
        parsed.url = None;

        let err = Config::from_sources(parsed, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("No inventory URL"));
        Ok(())
    }

    #[test]
    fn test_invalid_inputs_are_rejected() -> Result<()> {
        let temp_dir = tempdir()?;

        let bad_scheme = args(temp_dir.path(), &["--url", "ftp://example.com/files"]);
        assert!(Config::from_sources(bad_scheme, FileConfig::default()).is_err());

        let zero_timeout = args(
            temp_dir.path(),
            &["--url", "https://example.com/files/", "--timeout", "0"],
        );
        assert!(Config::from_sources(zero_timeout, FileConfig::default()).is_err());

        let missing_root = args(
            &temp_dir.path().join("nope"),
            &["--url", "https://example.com/files/"],
        );
        let err = Config::from_sources(missing_root, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Scan directory not found"));
        Ok(())
    }
}
