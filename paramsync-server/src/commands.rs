use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use paramsync_core::modules::config as core_config;
use paramsync_core::sync::codec;
use paramsync_core::{
    AdmissionFilter, FileStore, MemoryStore, ParamStore, SyncEngine, SystemClock, UdpMulticast,
};
use paramsync_types::{ParamValue, SyncConfig};

use crate::cli::{ConfigCommands, Overrides};

pub fn config_path(overrides: &Overrides) -> PathBuf {
    overrides.config.clone().unwrap_or_else(core_config::default_config_path)
}

/// One-line note on where the configuration was read from.
///
/// Loading runs before the subscriber exists, so this is logged afterwards.
pub fn describe_config_source(path: &Path) -> String {
    if path.exists() {
        format!("Loaded config from {}", path.display())
    } else {
        format!("No config at {}, using defaults", path.display())
    }
}

/// Config file contents with command-line values layered on top.
pub fn effective_config(overrides: &Overrides) -> Result<SyncConfig> {
    let mut config = core_config::load_config(&config_path(overrides))?;
    apply_overrides(&mut config, overrides);
    Ok(config)
}

fn apply_overrides(config: &mut SyncConfig, overrides: &Overrides) {
    if let Some(store) = &overrides.store {
        config.store_path = Some(store.clone());
    }
    if let Some(rate) = overrides.rate {
        config.tick_rate = rate;
    }
    if let Some(lifetime) = overrides.max_lifetime {
        config.max_lifetime = lifetime;
    }
    if !overrides.allow.is_empty() {
        config.allow_list = overrides.allow.clone();
    }
    if !overrides.deny.is_empty() {
        config.deny_list = overrides.deny.clone();
    }
    config.use_alternate_timer |= overrides.alternate_timer;
    config.verbose |= overrides.verbose;
}

pub async fn handle_run(config: SyncConfig) -> Result<()> {
    config.validate()?;

    let store: Arc<dyn ParamStore> = match &config.store_path {
        Some(path) => Arc::new(
            FileStore::open(path).with_context(|| format!("opening store {}", path.display()))?,
        ),
        None => {
            warn!("No store_path configured, parameters are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    let channel = Arc::new(UdpMulticast::open(&config.transport)?);
    info!("Multicast channel on {}", channel.group());

    let engine = SyncEngine::from_config(&config, store, channel, Arc::new(SystemClock::new()))?;
    match config.lifetime() {
        Some(lifetime) => info!("Broadcasting for {:?}, then listen-only", lifetime),
        None => info!("Broadcasting until stopped"),
    }

    tokio::select! {
        result = engine.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C, shutting down"),
    }
    Ok(())
}

pub fn handle_config_command(
    cmd: ConfigCommands,
    config: &SyncConfig,
    overrides: &Overrides,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => show_config(config, json),
        ConfigCommands::Init { force } => init_config(&config_path(overrides), config, force),
    }
}

fn show_config(config: &SyncConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("{}", "Sync Configuration:".cyan().bold());
    println!("  Rate: {} Hz", config.tick_rate);
    match config.lifetime() {
        Some(lifetime) => println!("  Lifetime: {:?}", lifetime),
        None => println!("  Lifetime: unbounded"),
    }
    println!(
        "  Timer: {}",
        if config.use_alternate_timer { "plain sleep" } else { "rate limiter" }
    );
    println!("  Allow: {}", format_list(&config.allow_list));
    println!("  Deny: {}", format_list(&config.deny_list));
    match &config.store_path {
        Some(path) => println!("  Store: {}", path.display()),
        None => println!("  Store: in-memory"),
    }
    println!(
        "  Channel: {}:{} via {}",
        config.transport.multicast_group, config.transport.port, config.transport.interface
    );
    if let Err(e) = check_config(config) {
        println!("  {} {}", "✗".red(), e);
    }
    Ok(())
}

fn check_config(config: &SyncConfig) -> Result<()> {
    config.validate()?;
    AdmissionFilter::from_config(config)?;
    Ok(())
}

fn init_config(path: &Path, config: &SyncConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    core_config::save_config(path, config)?;
    println!("{} Config written to {}", "✓".green(), path.display());
    Ok(())
}

pub fn handle_check(config: &SyncConfig, keys: &[String]) -> Result<()> {
    let filter = AdmissionFilter::from_config(config)?;
    for key in keys {
        if filter.admitted(key) {
            let reason = if filter.is_denied(key) { " (allow overrides deny)" } else { "" };
            println!("{} {}{}", "✓".green(), key, reason.dimmed());
        } else {
            println!("{} {} {}", "✗".red(), key, "(denied)".dimmed());
        }
    }
    Ok(())
}

pub fn handle_encode(input: &str) -> Result<()> {
    let json: serde_json::Value = serde_json::from_str(input).context("value is not valid JSON")?;
    let value = ParamValue::from_json(json)?;
    println!("{}", codec::encode(&value)?);
    Ok(())
}

fn format_list(patterns: &[String]) -> String {
    if patterns.is_empty() {
        "(none)".to_string()
    } else {
        patterns.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"whitelist": ["/keep"], "rate": 2.0, "death_timer": 10}"#)
            .unwrap();
        let overrides = Overrides {
            config: Some(path),
            rate: Some(5.0),
            deny: vec!["*".to_string()],
            verbose: true,
            ..Overrides::default()
        };

        let config = effective_config(&overrides).unwrap();

        assert_eq!(config.tick_rate, 5.0);
        assert_eq!(config.max_lifetime, 10.0);
        assert_eq!(config.allow_list, vec!["/keep".to_string()]);
        assert_eq!(config.deny_list, vec!["*".to_string()]);
        assert!(config.verbose);
    }

    #[test]
    fn test_config_source_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let missing = describe_config_source(&path);
        assert!(missing.starts_with("No config at"), "{}", missing);
        assert!(missing.contains(&path.display().to_string()));

        std::fs::write(&path, "{}").unwrap();
        let found = describe_config_source(&path);
        assert!(found.starts_with("Loaded config from"), "{}", found);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = SyncConfig::default();

        init_config(&path, &config, false).unwrap();
        assert!(init_config(&path, &config, false).is_err());
        init_config(&path, &config, true).unwrap();
    }

    #[test]
    fn test_check_config_reports_bad_pattern() {
        let config = SyncConfig { deny_list: vec!["[".to_string()], ..SyncConfig::default() };
        assert!(check_config(&config).is_err());
        assert!(check_config(&SyncConfig::default()).is_ok());
    }

    #[test]
    fn test_encode_rejects_null() {
        assert!(handle_encode("[1, null]").is_err());
        assert!(handle_encode("{\"a\": [1, 2.5, \"x\"]}").is_ok());
    }
}
