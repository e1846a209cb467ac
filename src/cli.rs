//! Command-line interface

use clap::{ArgAction, Parser};
use webroot::config::Overrides;

/// Serve static files from one or more root directories.
#[derive(Parser, Debug)]
#[command(name = "webroot", version, about, disable_help_flag = true)]
pub struct Cli {
    /// Address to bind to
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not log individual requests
    #[arg(short, long)]
    pub quiet: bool,

    /// Root directory to serve (repeatable, searched in order)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dirs: Vec<String>,

    /// Send CORS headers for ORIGIN; without a value any origin is allowed
    #[arg(
        long,
        value_name = "ORIGIN",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "*"
    )]
    pub cors: Option<String>,

    /// Plugin option (repeatable)
    #[arg(short = 'X', value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub plugin_options: Vec<(String, String)>,

    /// Config file (default: webroot.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    pub fn into_overrides(self) -> Overrides {
        Overrides {
            config_file: self.config,
            host: self.host,
            port: self.port,
            quiet: self.quiet,
            dirs: self.dirs,
            cors: self.cors,
            plugin_options: self.plugin_options,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("webroot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-h", "127.0.0.1", "-p", "9000", "-q", "-d", "a", "-d", "b"]);
        assert_eq!(cli.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(cli.port, Some(9000));
        assert!(cli.quiet);
        assert_eq!(cli.dirs, ["a", "b"]);
        assert!(cli.cors.is_none());
    }

    #[test]
    fn test_cors_forms() {
        assert_eq!(parse(&["--cors"]).cors.as_deref(), Some("*"));
        assert_eq!(
            parse(&["--cors=https://example.com"]).cors.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_plugin_options() {
        let overrides = parse(&["-X", "markdown.extensions=false", "-X", "a=b=c"]).into_overrides();
        assert_eq!(
            overrides.plugin_options,
            [
                ("markdown.extensions".to_string(), "false".to_string()),
                ("a".to_string(), "b=c".to_string())
            ]
        );
        assert!(Cli::try_parse_from(["webroot", "-X", "novalue"]).is_err());
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["webroot", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
