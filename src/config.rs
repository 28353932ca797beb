// Run configuration for apirecon
// Built once from the command line and passed explicitly to each stage

use crate::auth::{AuthType, DEFAULT_API_KEY_HEADER};
use crate::error::Result;
use crate::synth::DEFAULT_MAX_DEPTH;
use clap::ArgMatches;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "burp_requests";
pub const DEFAULT_SOURCE_DELAY: Duration = Duration::from_millis(500);

/// Settings for the `scan` subcommand
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// URLs from `--url` or the `--file` list
    pub urls: Vec<String>,
    /// Local documents or directories from `--spec`
    pub specs: Vec<PathBuf>,
    /// URL list file, when one was given
    pub url_list: Option<PathBuf>,
    pub silent: bool,
    pub output: Option<PathBuf>,
    pub csv_report: bool,
    /// Courtesy pause between network sources
    pub delay: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            specs: Vec::new(),
            url_list: None,
            silent: false,
            output: None,
            csv_report: false,
            delay: DEFAULT_SOURCE_DELAY,
        }
    }
}

impl ScanConfig {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            urls: matches
                .get_one::<String>("url")
                .map(|u| vec![u.clone()])
                .unwrap_or_default(),
            specs: matches
                .get_many::<String>("spec")
                .map(|vals| vals.map(PathBuf::from).collect())
                .unwrap_or_default(),
            url_list: matches.get_one::<String>("file").map(PathBuf::from),
            silent: matches.get_flag("silent"),
            output: matches.get_one::<String>("output").map(PathBuf::from),
            csv_report: matches.get_flag("csv_report"),
            delay: matches
                .get_one::<u64>("delay_ms")
                .map(|ms| Duration::from_millis(*ms))
                .unwrap_or(DEFAULT_SOURCE_DELAY),
        }
    }

    /// `#####` separates blocks when scanning a URL list, `-----` otherwise.
    pub fn separator(&self) -> &'static str {
        if self.url_list.is_some() {
            crate::reporting::LIST_SEPARATOR
        } else {
            crate::reporting::SEPARATOR
        }
    }
}

/// Credentials attached to generated requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub kind: AuthType,
    pub value: String,
    pub api_key_header: String,
}

/// Settings for the `requests` subcommand
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub spec: PathBuf,
    /// Overrides the host declared by the document
    pub host: Option<String>,
    pub auth: Option<AuthConfig>,
    pub proxy: Option<String>,
    pub output_dir: PathBuf,
    pub max_depth: usize,
}

impl GenerateConfig {
    pub fn new(spec: impl Into<PathBuf>) -> Self {
        Self {
            spec: spec.into(),
            host: None,
            auth: None,
            proxy: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let spec = matches
            .get_one::<String>("spec")
            .cloned()
            .unwrap_or_default();
        let auth = match matches.get_one::<String>("auth_value") {
            Some(value) => {
                let kind = matches
                    .get_one::<String>("auth_type")
                    .map(|s| s.parse::<AuthType>())
                    .transpose()?
                    .unwrap_or(AuthType::Bearer);
                Some(AuthConfig {
                    kind,
                    value: value.clone(),
                    api_key_header: matches
                        .get_one::<String>("api_key_header")
                        .cloned()
                        .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string()),
                })
            }
            None => None,
        };
        Ok(Self {
            spec: PathBuf::from(spec),
            host: matches.get_one::<String>("host").cloned(),
            auth,
            proxy: matches.get_one::<String>("proxy").cloned(),
            output_dir: matches
                .get_one::<String>("output_dir")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            max_depth: matches
                .get_one::<usize>("max_depth")
                .copied()
                .unwrap_or(DEFAULT_MAX_DEPTH),
        })
    }
}
