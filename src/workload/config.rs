use crate::workload::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATA_PATH: &str = "dados100_mil.txt";
pub const DEFAULT_OPERATIONS: usize = 50_000;

pub const USAGE: &str = "\
usage: balanced-trees [<path>] [--operations <n>] [--seed <n>] [--print] [--json] [--verbose]
                      [--log-file <path>]";

/// Settings for a single driver run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// File holding the keys as a list literal, e.g. `[3, -1, 42]`.
    pub data_path: PathBuf,
    /// Number of random insert/remove/count operations after the initial fill.
    pub operations: usize,
    /// Seed for the operation generator. Seeded from entropy when `None`.
    pub seed: Option<u64>,
    pub print_sorted: bool,
    pub json: bool,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            operations: DEFAULT_OPERATIONS,
            seed: None,
            print_sorted: false,
            json: false,
            verbose: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Builds a `Config` from command-line arguments, excluding the program name.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::workload::Config;
    ///
    /// let args = vec!["keys.txt", "--operations", "10", "--seed", "7"];
    /// let config = Config::from_args(args.into_iter().map(String::from)).unwrap();
    /// assert_eq!(config.operations, 10);
    /// assert_eq!(config.seed, Some(7));
    /// ```
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut data_path = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--operations" => config.operations = parse_value(&arg, args.next())?,
                "--seed" => config.seed = Some(parse_value(&arg, args.next())?),
                "--log-file" => {
                    config.log_file = Some(PathBuf::from(require_value(&arg, args.next())?));
                },
                "--print" => config.print_sorted = true,
                "--json" => config.json = true,
                "--verbose" | "-v" => config.verbose = true,
                "--help" | "-h" => return Err(Error::Usage(USAGE.to_string())),
                flag if flag.starts_with("--") => {
                    return Err(Error::Usage(format!("unknown flag `{}`", flag)));
                },
                path if data_path.is_none() => data_path = Some(PathBuf::from(path)),
                extra => return Err(Error::Usage(format!("unexpected argument `{}`", extra))),
            }
        }

        if let Some(data_path) = data_path {
            config.data_path = data_path;
        }
        Ok(config)
    }
}

fn require_value(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::Usage(format!("missing value for `{}`", flag)))
}

fn parse_value<T>(flag: &str, value: Option<String>) -> Result<T>
where
    T: FromStr,
{
    let value = require_value(flag, value)?;
    value
        .parse()
        .map_err(|_| Error::Usage(format!("invalid value `{}` for `{}`", value, flag)))
}
