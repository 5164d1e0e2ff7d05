use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tstore_common::{init_tracing, set_global_config_manager, ConfigManager, ConfigSource};
use tstore_gateway::{GatewayBootstrap, GatewayConfig};

/// tstore 网关降级服务 / tstore gateway fallback service
#[derive(Parser, Debug)]
#[command(name = "tstore-gateway", version, about = "tstore 网关降级服务 / gateway fallback service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动网关服务器 / Start the gateway server
    Server {
        /// 覆盖 server.host / Override server.host
        #[arg(long)]
        host: Option<String>,
        /// 覆盖 server.port / Override server.port
        #[arg(short, long)]
        port: Option<u16>,
        /// 覆盖 server.workers / Override server.workers
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// 打印版本信息 / Print version information
    Version,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Server {
            host,
            port,
            workers,
        } => {
            // 命令行参数作为最高优先级的覆盖源 / CLI flags become the highest-priority override source
            let mut overrides = Vec::new();
            if let Some(host) = host {
                overrides.push(("server.host".to_string(), host));
            }
            if let Some(port) = port {
                overrides.push(("server.port".to_string(), port.to_string()));
            }
            if let Some(workers) = workers {
                overrides.push(("server.workers".to_string(), workers.to_string()));
            }

            let manager = ConfigManager::with_sources(vec![ConfigSource::Overrides(overrides)])
                .context("加载配置失败 / failed to load configuration")?;
            let manager = set_global_config_manager(manager)?;
            init_tracing()?;
            manager.log_sources_info();

            let config = GatewayConfig::from_config(&manager)?;
            GatewayBootstrap::new(config).run().await?;
        }
        Command::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
