use anyhow::Context;
use catmash::domain::config::ApiConfig;
use catmash::kernel::config::{load_config, validate};
use catmash_server::{Server, init_logger};

/// Usage: `catmash-server [config-file]`
#[catmash_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1);
    let cfg: ApiConfig =
        load_config(path.as_deref()).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;

    validate(&cfg).context("Critical: Configuration is incomplete")?;

    Server::builder().config(cfg).build().await?.run().await
}
