use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sml_types::Domain;

#[derive(Parser)]
#[command(
    name = "sml-share",
    about = "Share server for the SOSML online interpreter",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Print the identifier a payload would be stored under
    Hash(HashArgs),
    /// List an example tree the way `/api/list/` does
    List(ListArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address, overriding the configuration and `PORT`
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// URL prefix, overriding the configuration and `BASEPAGE`
    #[arg(long)]
    pub base_path: Option<String>,
}

#[derive(Args)]
pub struct HashArgs {
    /// File to hash, or `-` for stdin
    pub input: String,
    #[arg(long, default_value = "code")]
    pub domain: DomainArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum DomainArg {
    Code,
    Wish,
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Code => Domain::Code,
            DomainArg::Wish => Domain::Wish,
        }
    }
}

#[derive(Args)]
pub struct ListArgs {
    /// Root of the example tree
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["sml-share", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.config.is_none());
            assert!(args.bind.is_none());
            assert!(args.base_path.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "sml-share", "serve", "-c", "sml.toml", "--bind", "127.0.0.1:8000", "--base-path", "/sosml",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("sml.toml")));
            assert_eq!(args.bind, Some("127.0.0.1:8000".parse().unwrap()));
            assert_eq!(args.base_path.as_deref(), Some("/sosml"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_bad_bind() {
        assert!(Cli::try_parse_from(["sml-share", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn parse_hash() {
        let cli = Cli::try_parse_from(["sml-share", "hash", "-", "--domain", "wish"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.input, "-");
            assert_eq!(args.domain, DomainArg::Wish);
            assert_eq!(Domain::from(args.domain), Domain::Wish);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_list() {
        let cli = Cli::try_parse_from(["sml-share", "list", "code"]).unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.dir, PathBuf::from("code"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verbose_json() {
        let cli = Cli::try_parse_from(["sml-share", "config", "-v", "--format", "json"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
