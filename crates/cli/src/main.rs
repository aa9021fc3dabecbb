use clap::Parser;
use ingress_dns_domain::CliOverrides;
use std::net::Ipv4Addr;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "ingress-dns")]
#[command(version)]
#[command(about = "DNS server answering for Kubernetes ingress hostnames")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Address returned for every matched hostname
    #[arg(long, value_name = "IPV4")]
    ingress_ip: Option<Ipv4Addr>,

    /// Upstream resolver for unmatched names (host:port)
    #[arg(long, value_name = "ADDR")]
    fallback: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Serve a fixed hostname instead of listing ingresses; repeatable
    #[arg(long = "static-host", value_name = "HOST")]
    static_hosts: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind,
        ingress_ip: cli.ingress_ip,
        fallback_server: cli.fallback,
        log_level: cli.log_level,
        static_hosts: cli.static_hosts,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config)?;

    info!("Starting Ingress DNS v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config)?;

    let listen = config.server.listen_address();
    let tcp_timeout = config.server.tcp_enabled.then(|| {
        std::time::Duration::from_secs(config.server.tcp_timeout)
    });

    tokio::select! {
        result = server::start_dns_server(listen, dns_services.handler, tcp_timeout) => {
            if let Err(e) = result {
                error!(error = %e, "DNS server error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
