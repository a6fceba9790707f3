// crates/server/src/config.rs
//! Command-line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gainz_observability::{LogConfig, LogFormat};

use crate::auth::MIN_SECRET_LEN;

pub const DEFAULT_PORT: u16 = 47900;

#[derive(Debug, Clone, Parser)]
#[command(name = "gainz-server", version, about = "Habit and progress stats API")]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "GAINZ_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, env = "GAINZ_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// SQLite database file. Defaults to `<cache dir>/gainz/gainz.db`.
    #[arg(long, env = "GAINZ_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// HS256 secret used to sign and verify bearer tokens.
    #[arg(long, env = "GAINZ_JWT_SECRET", hide_env_values = true, value_parser = parse_secret)]
    pub jwt_secret: String,

    /// Log output format: pretty or json.
    #[arg(long, env = "GAINZ_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Also write daily-rolling JSON logs into this directory.
    #[arg(long, env = "GAINZ_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print a signed bearer token for a user.
    IssueToken {
        #[arg(long)]
        user_id: String,
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
    /// Create a user with a few weeks of demo habit history.
    SeedDemo {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "Demo User")]
        display_name: String,
        #[arg(long, default_value_t = 45)]
        days: u32,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            format: self.log_format,
            log_dir: self.log_dir.clone(),
            ..LogConfig::default()
        }
    }
}

fn parse_secret(value: &str) -> Result<String, String> {
    if value.len() < MIN_SECRET_LEN {
        return Err(format!("must be at least {MIN_SECRET_LEN} bytes"));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("gainz-server").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--jwt-secret", SECRET, "--port", "47900", "--host", "127.0.0.1"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.socket_addr().to_string(), "127.0.0.1:47900");
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(parse(&["--jwt-secret", "too-short"]).is_err());
    }

    #[test]
    fn test_issue_token_subcommand() {
        let cli = parse(&["--jwt-secret", SECRET, "issue-token", "--user-id", "u1"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::IssueToken {
                user_id: "u1".to_string(),
                ttl_hours: 24
            }
        );
    }

    #[test]
    fn test_log_format_flag() {
        let cli = parse(&["--jwt-secret", SECRET, "--log-format", "json", "--log-dir", "/tmp/gainz-logs"])
            .unwrap();
        let config = cli.log_config();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/gainz-logs")));
        assert!(parse(&["--jwt-secret", SECRET, "--log-format", "xml"]).is_err());
    }
}
