use getopts::Options;
use iritop::dashboard::Settings;
use iritop::node::{parse_node_url, CounterKind, Credentials, HttpNodeApi};
use iritop::view::SortOrder;
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub mod keys;
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_NODE: &str = "http://localhost:14265";
pub const DEFAULT_POLL_DELAY: f64 = 2.0;
pub const DEFAULT_BLINK_DELAY: f64 = 0.5;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Usage(#[from] getopts::Fail),
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid node URL: {0}")]
    InvalidUrl(String),
    #[error("username and password must be given together")]
    Credentials,
    #[error("invalid value for {option}: {value}")]
    InvalidNumber { option: &'static str, value: String },
}

/// Keys accepted in the YAML file given with `--config`. Every key is
/// optional and is overridden by the matching command-line flag.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub node: Option<String>,
    pub poll_delay: Option<f64>,
    pub blink_delay: Option<f64>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sort: Option<i64>,
    pub obscure_address: Option<bool>,
    pub incommunicado_threshold: Option<u32>,
    pub columns: Option<Vec<CounterKind>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(FileConfig::default());
        }
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub node: String,
    pub poll_delay: Duration,
    pub blink_delay: Duration,
    pub credentials: Option<Credentials>,
    /// Raw `--sort` argument; resolved against `columns`.
    pub sort: Option<i64>,
    pub obscure: bool,
    pub incommunicado_threshold: u32,
    pub columns: Vec<CounterKind>,
    pub log_file: Option<PathBuf>,
}

impl RunConfig {
    pub fn dashboard_settings(&self) -> Settings {
        Settings {
            node_url: self.node.clone(),
            incommunicado_threshold: self.incommunicado_threshold,
            columns: self.columns.clone(),
            sort: self.sort.map(|arg| SortOrder::from_arg(arg, &self.columns)),
            obscure: self.obscure,
            ..Settings::default()
        }
    }

    pub fn node_api(&self) -> Result<HttpNodeApi, iritop::Error> {
        HttpNodeApi::new(&self.node, self.credentials.clone(), REQUEST_TIMEOUT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Run(RunConfig),
    Help(String),
    Version,
}

pub fn iritop_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt(
        "n",
        "node",
        &format!("node API URL (default {DEFAULT_NODE})"),
        "URL",
    );
    opts.optopt(
        "p",
        "poll-delay",
        &format!("seconds between node polls (default {DEFAULT_POLL_DELAY})"),
        "SEC",
    );
    opts.optopt(
        "b",
        "blink-delay",
        &format!("seconds between screen refreshes (default {DEFAULT_BLINK_DELAY})"),
        "SEC",
    );
    opts.optopt("c", "config", "YAML configuration file", "FILE");
    opts.optopt("u", "username", "basic auth username", "USER");
    opts.optopt("w", "password", "basic auth password", "PASS");
    opts.optopt(
        "s",
        "sort",
        "sort by column N; negative sorts ascending",
        "N",
    );
    opts.optflag("o", "obscure-address", "obscure neighbor addresses");
    opts.optopt(
        "t",
        "threshold",
        "polls without new transactions before a neighbor is incommunicado (default 12)",
        "N",
    );
    opts.optopt("", "log", "write logs to FILE", "FILE");
    opts.optflag("V", "version", "print version and exit");
    opts.optflag("h", "help", "show this help");
    opts
}

pub fn usage(opts: &Options, program: &str) -> String {
    let brief = format!(
        "Usage: {program} [options]\n\n\
         Terminal monitor for IOTA IRI nodes.\n\
         Keys: q quit, b baseline, h hide addresses, s sort column, r reverse sort"
    );
    opts.usage(&brief)
}

/// Parses `args` (program name first). Flags override values from the
/// `--config` file, which override the defaults.
pub fn parse_cli(args: &[String]) -> Result<CliAction, ConfigError> {
    let opts = iritop_opts();
    let program = args.first().map(String::as_str).unwrap_or("iritop");
    let matches = opts.parse(args.iter().skip(1))?;

    if matches.opt_present("help") {
        return Ok(CliAction::Help(usage(&opts, program)));
    }
    if matches.opt_present("version") {
        return Ok(CliAction::Version);
    }

    let file = match matches.opt_str("config") {
        Some(path) => FileConfig::load(Path::new(&path))?,
        None => FileConfig::default(),
    };

    let node = matches
        .opt_str("node")
        .or(file.node)
        .unwrap_or_else(|| DEFAULT_NODE.to_string());
    if parse_node_url(&node).is_err() {
        return Err(ConfigError::InvalidUrl(node));
    }

    let poll_delay = match matches.opt_str("poll-delay") {
        Some(raw) => parse_number("--poll-delay", &raw)?,
        None => file.poll_delay.unwrap_or(DEFAULT_POLL_DELAY),
    };
    let blink_delay = match matches.opt_str("blink-delay") {
        Some(raw) => parse_number("--blink-delay", &raw)?,
        None => file.blink_delay.unwrap_or(DEFAULT_BLINK_DELAY),
    };
    let poll_delay = seconds("poll delay", poll_delay)?;
    let blink_delay = seconds("blink delay", blink_delay)?;

    let username = matches.opt_str("username").or(file.username);
    let password = matches.opt_str("password").or(file.password);
    let credentials = match (username, password) {
        (Some(username), Some(password)) => Some(Credentials { username, password }),
        (None, None) => None,
        _ => return Err(ConfigError::Credentials),
    };

    let sort = match matches.opt_str("sort") {
        Some(raw) => Some(parse_number("--sort", &raw)?),
        None => file.sort,
    };
    let incommunicado_threshold = match matches.opt_str("threshold") {
        Some(raw) => parse_number("--threshold", &raw)?,
        None => file
            .incommunicado_threshold
            .unwrap_or(iritop::state::DEFAULT_INCOMMUNICADO_THRESHOLD),
    };

    let columns = match file.columns {
        Some(columns) if !columns.is_empty() => columns,
        _ => CounterKind::DEFAULT_COLUMNS.to_vec(),
    };

    Ok(CliAction::Run(RunConfig {
        node,
        poll_delay,
        blink_delay,
        credentials,
        sort,
        obscure: matches.opt_present("obscure-address") || file.obscure_address.unwrap_or(false),
        incommunicado_threshold,
        columns,
        log_file: matches.opt_str("log").map(PathBuf::from),
    }))
}

fn parse_number<T: std::str::FromStr>(option: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        option,
        value: raw.to_string(),
    })
}

fn seconds(option: &'static str, value: f64) -> Result<Duration, ConfigError> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(ConfigError::InvalidNumber {
            option,
            value: value.to_string(),
        }),
    }
}

/// Sends `tracing` output to `path`. The terminal belongs to the dashboard,
/// so without a log file nothing is installed.
pub fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_rejects_non_positive() {
        assert_eq!(seconds("x", 0.5).unwrap(), Duration::from_millis(500));
        assert!(seconds("x", 0.0).is_err());
        assert!(seconds("x", -1.0).is_err());
        assert!(seconds("x", f64::NAN).is_err());
        assert!(seconds("x", f64::INFINITY).is_err());
        assert!(seconds("x", 1e20).is_err());
        assert!(seconds("x", 1e-12).is_err());
    }

    #[test]
    fn parse_number_names_option() {
        let err = parse_number::<u32>("--threshold", "many").unwrap_err();
        assert_eq!(err.to_string(), "invalid value for --threshold: many");
    }
}
