use std::io::Read;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use sml_catalog::ExampleCatalog;
use sml_crypto::ContentHasher;
use sml_server::{ServerConfig, ShareServer};
use sml_types::{Domain, ShareId};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Hash(args) => cmd_hash(args, cli.format),
        Command::List(args) => cmd_list(args, cli.format).await,
        Command::Config(args) => cmd_config(args, cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    ServerConfig::load(path).context("failed to load configuration")
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(base_path) = args.base_path {
        config.base_path = base_path;
    }
    let features = config.features;
    println!(
        "{} sml-share on {}",
        "▶".green().bold(),
        config.bind_addr.to_string().bold()
    );
    for (name, on) in [
        ("sharing", features.serve_sharing),
        ("examples", features.serve_examples),
        ("wish examples", features.serve_wish_examples),
        ("frontend", features.serve_frontend),
    ] {
        let state = if on { "on".green() } else { "off".dimmed() };
        println!("  {name}: {state}");
    }
    ShareServer::new(config).serve().await?;
    Ok(())
}

/// Hash a file, or stdin for `-`.
fn hash_input(input: &str) -> anyhow::Result<(ShareId, usize)> {
    let mut data = Vec::new();
    if input == "-" {
        std::io::stdin()
            .read_to_end(&mut data)
            .context("failed to read stdin")?;
    } else {
        data = std::fs::read(input).with_context(|| format!("failed to read {input}"))?;
    }
    Ok((ContentHasher::hash(&data), data.len()))
}

fn cmd_hash(args: HashArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (id, len) = hash_input(&args.input)?;
    let domain = Domain::from(args.domain);
    let file_name = format!("{id}{}", domain.extension());
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "hash": id, "domain": domain, "bytes": len, "file": file_name })
        ),
        OutputFormat::Text => {
            println!("{}", id.to_string().yellow());
            println!("  {} bytes, stored as {}", len, file_name.cyan());
        }
    }
    Ok(())
}

async fn list_tree(dir: &Path) -> anyhow::Result<Vec<String>> {
    let catalog = ExampleCatalog::new(dir, "", true);
    let listing = catalog
        .list()
        .await
        .with_context(|| format!("failed to list {}", dir.display()))?;
    Ok(listing.served().unwrap_or_default())
}

async fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let codes = list_tree(&args.dir).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "codes": codes })),
        OutputFormat::Text if codes.is_empty() => println!("No examples."),
        OutputFormat::Text => {
            for code in &codes {
                println!("  {code}");
            }
            println!("{} {} examples", "✓".green(), codes.len().to_string().bold());
        }
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", config.to_toml()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_file_matches_server_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.sml");
        std::fs::write(&path, "val x = 1;").unwrap();
        let (id, len) = hash_input(path.to_str().unwrap()).unwrap();
        assert_eq!(id, ContentHasher::hash(b"val x = 1;"));
        assert_eq!(len, 10);
    }

    #[test]
    fn hash_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.sml");
        assert!(hash_input(missing.to_str().unwrap()).is_err());
    }

    #[tokio::test]
    async fn list_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lists")).unwrap();
        std::fs::write(dir.path().join("lists/map.sml"), "").unwrap();
        std::fs::write(dir.path().join("hello.sml"), "").unwrap();
        let codes = list_tree(dir.path()).await.unwrap();
        assert_eq!(codes, vec!["hello.sml".to_string(), "lists/map.sml".to_string()]);
    }

    #[tokio::test]
    async fn list_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_tree(&dir.path().join("nope")).await.is_err());
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sml.toml");
        std::fs::write(&path, "[features]\nserve_frontend = false\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!(!config.features.serve_frontend);
    }
}
