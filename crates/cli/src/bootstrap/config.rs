use ingress_dns_domain::{CliOverrides, Config, EnvOverrides};
use tracing::info;

/// Load the file, apply `DNS_PORT`/`INGRESS_IP`/`FALLBACK_DNS`, then the
/// command line, and validate the result.
pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let env_overrides = EnvOverrides::from_env()?;
    let config = Config::load(path, env_overrides, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

pub fn log_config_summary(config: &Config) {
    info!(
        listen = %config.server.listen_address(),
        tcp = config.server.tcp_enabled,
        inventory = config.inventory.source.as_str(),
        wildcard_match = config.dns.wildcard_match.as_str(),
        fallback = if config.dns.fallback_enabled {
            config.dns.fallback_server.as_str()
        } else {
            "disabled"
        },
        answer_ttl = config.dns.answer_ttl,
        "Configuration loaded"
    );
}
