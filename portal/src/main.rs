use std::sync::Arc;

use careconnect::{seed::mock_hospitals, Registry};
use config::PortalConfig;
use console_input::{console_input_thread, process_console_input, ConsoleResponse};
use context::{AppContext, AppContextRef};
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod console_input;
mod context;
mod debounce;
mod geolocation;
mod storage;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = PortalConfig::load_or_default();
    let registry = Registry::from_hospitals(mock_hospitals());

    let (debounce_to_main, mut main_from_debounce) = tokio::sync::mpsc::channel(100);
    let mut context = AppContext::new(config, registry, debounce_to_main);
    if let Err(e) = context.load() {
        error!("could not restore session: {e}");
    }
    let context_ref: AppContextRef = Arc::new(RwLock::new(context));

    info!("CareConnect portal started");
    println!("{}", context_ref.read().await.render());

    let mut console_receiver = console_input_thread();
    loop {
        tokio::select! {
            line = console_receiver.recv() => {
                let Some(line) = line else { break };
                match process_console_input(line.trim(), &context_ref).await {
                    Ok(ConsoleResponse::Reply(reply)) => println!("{reply}"),
                    Ok(ConsoleResponse::Render) => println!("{}", context_ref.read().await.render()),
                    Ok(ConsoleResponse::Quit) => break,
                    Ok(ConsoleResponse::Nothing) => {}
                    Err(e) => println!("error: {e}"),
                }
            }
            Some(hospital) = main_from_debounce.recv() => {
                let mut context = context_ref.write().await;
                context.commit(hospital);
                println!("{}", context.render());
            }
        }
    }
    info!("CareConnect portal stopped");
}
