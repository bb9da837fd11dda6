use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::{error, info};

use ninety_nine_server::{config::ServerConfig, create_application, telemetry, worker};

#[tokio::main]
async fn main() {
    telemetry::init();

    aide::gen::on_error(|error| {
        error!("{error}");
    });
    aide::gen::extract_schemas(true);

    let config = ServerConfig::from_env();
    let (handle, _worker) = worker::spawn_game_worker(config.room.clone());
    let app = create_application(handle);

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), config.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    let local_addr = listener.local_addr().unwrap_or(addr);
    info!("listening on {}", local_addr);
    info!("Docs are accessible at {}", docs_url(local_addr));

    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
        std::process::exit(1);
    }
}

fn docs_url(listener: SocketAddr) -> String {
    match listener {
        SocketAddr::V4(addr) if addr.ip().is_unspecified() => {
            format!("http://localhost:{}/docs", addr.port())
        }
        addr => format!("http://{}/docs", addr),
    }
}
