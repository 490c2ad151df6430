use simple_error::SimpleResult;
use std::sync::Arc;
use tokio::io::BufReader;
use xyzrank::{config::Config, get_tools, stdio, util};

#[tokio::main]
async fn main() -> SimpleResult<()> {
    let _log = util::init_log()?;
    let config = Config::from_env()?;
    log::info!("serving xyzrank tools for {}", config.homepage);

    let tools = Arc::new(get_tools(&config));
    stdio::run(tools, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    log::info!("stdin closed, exiting");
    Ok(())
}
