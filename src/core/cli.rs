use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config_path: PathBuf,
    pub data_path: PathBuf,
    pub logs_dir: PathBuf,
    /// Now-marker refreshes to wait for before exiting; 0 prints once.
    pub ticks: u32,
}

impl CliArgs {
    pub fn from_env() -> Result<Self, String> {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = String>,
    {
        let mut parsed = Self::defaults();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    parsed.config_path = Self::next_path(&mut args, "--config")?;
                }
                "--data" => {
                    parsed.data_path = Self::next_path(&mut args, "--data")?;
                }
                "--logs" => {
                    parsed.logs_dir = Self::next_path(&mut args, "--logs")?;
                }
                "--ticks" => {
                    let raw = Self::next_value(&mut args, "--ticks")?;
                    parsed.ticks = raw
                        .trim()
                        .parse()
                        .map_err(|_| format!("Invalid value for --ticks: '{raw}'"))?;
                }
                _ => return Err(format!("Unknown argument: {arg}")),
            }
        }
        Ok(parsed)
    }

    fn next_value<I>(args: &mut I, flag: &str) -> Result<String, String>
    where
        I: Iterator<Item = String>,
    {
        args.next()
            .ok_or_else(|| format!("Missing value for {flag}"))
    }

    fn next_path<I>(args: &mut I, flag: &str) -> Result<PathBuf, String>
    where
        I: Iterator<Item = String>,
    {
        Self::next_value(args, flag).map(PathBuf::from)
    }

    fn defaults() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            data_path: PathBuf::from("schedule.json"),
            logs_dir: PathBuf::from("logs"),
            ticks: 0,
        }
    }
}
