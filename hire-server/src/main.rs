use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hire_server::domain::{KnownLocations, LocationKey};
use hire_server::hire::HireClient;
use hire_server::web::{AppState, WebConfig, create_router};
use hire_server::workflow::{DEFAULT_USER_AUTH, WorkflowClient, WorkflowConfig};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get credentials from environment
    let user_auth = std::env::var("HIRE_USER_AUTH").unwrap_or_else(|_| {
        warn!("HIRE_USER_AUTH not set, using the built-in captured value");
        DEFAULT_USER_AUTH.to_string()
    });

    let mut workflow_config = WorkflowConfig::new(user_auth);
    if let Ok(base_url) = std::env::var("HIRE_BASE_URL") {
        workflow_config = workflow_config.with_base_url(base_url);
    }
    if std::env::var("HIRE_INSECURE_TLS").is_ok_and(|v| v == "1" || v == "true") {
        warn!("TLS certificate verification disabled");
        workflow_config = workflow_config.with_accept_invalid_certs(true);
    }
    let workflow = WorkflowClient::new(workflow_config)?;

    // Known locations: built-in table unless a file is given
    let locations = match std::env::var("HIRE_LOCATIONS_FILE") {
        Ok(path) => {
            let locations = KnownLocations::load(&path)?;
            info!(path = %path, count = locations.len(), "loaded known locations");
            locations
        }
        Err(_) => KnownLocations::defaults(),
    };

    let prime_from = match std::env::var("HIRE_PRIME_LOCATION") {
        Ok(key) if key.is_empty() || key == "none" => None,
        Ok(key) => Some(key.parse::<LocationKey>()?),
        Err(_) => WebConfig::default().prime_from,
    };
    let web_config = WebConfig::default().with_prime_from(prime_from);

    let hire = HireClient::new(workflow).with_locations(locations);
    let state = AppState::new(hire, web_config);

    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
    let app = create_router(state, static_dir);

    let addr: SocketAddr = std::env::var("HIRE_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;
    info!("cycle hire listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
