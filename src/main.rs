use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use study_materials::console::{self, Command};
use study_materials::gateway::{
    CatalogGateway, GatewayConfig, HttpGateway, MemoryGateway, StaticCredentials,
};
use study_materials::services::FetchDispatcher;
use study_materials::view::Listing;
use study_materials::{Applied, Navigator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "study_materials=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = GatewayConfig::new_from_env()?;

    let gateway: Arc<dyn CatalogGateway> = match &config.fixture {
        Some(path) => Arc::new(MemoryGateway::from_json_file(path)?),
        None => {
            info!("using catalog API at {}", config.api_url);
            Arc::new(HttpGateway::new(&config)?)
        }
    };
    let credentials = Arc::new(StaticCredentials::new(config.api_token.clone()));

    let mut navigator = Navigator::new(gateway, credentials);
    let (dispatcher, mut outcomes) = FetchDispatcher::new(navigator.fetch_service());

    dispatcher.dispatch(navigator.start());
    println!("{}", console::render(&navigator.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(outcome) = outcomes.recv() => {
                if navigator.apply(outcome) == Applied::Applied {
                    println!("{}", console::render(&navigator.view()));
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{} (type 'help')", e);
                        continue;
                    }
                };

                match command {
                    Command::Quit => break,
                    Command::Help => {
                        println!("{}", console::HELP);
                        continue;
                    }
                    Command::Back => {
                        if !navigator.back() {
                            println!("already at the top");
                            continue;
                        }
                    }
                    Command::Search(query) => navigator.set_query(query),
                    Command::ClearSearch => navigator.clear_query(),
                    Command::Reload => {
                        dispatcher.dispatch(navigator.reload());
                    }
                    Command::Open(position) => {
                        let material = {
                            let view = navigator.view();
                            match &view.listing {
                                Listing::Materials { materials, .. } => {
                                    Some(materials.get(position - 1).map(|m| m.content.clone()))
                                }
                                _ => None,
                            }
                        };
                        if let Some(content) = material {
                            match content {
                                Some(content) => println!("open {}", content),
                                None => println!("no item at position {}", position),
                            }
                            continue;
                        }
                        match navigator.open(position - 1) {
                            Ok(request) => {
                                dispatcher.dispatch_opt(request);
                            }
                            Err(e) => {
                                warn!("cannot open {}: {}", position, e);
                                println!("{}", e);
                                continue;
                            }
                        }
                    }
                }

                println!("{}", console::render(&navigator.view()));
            }
        }
    }

    info!("session closed");
    Ok(())
}
