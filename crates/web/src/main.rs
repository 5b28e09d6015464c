use std::sync::Arc;

use attendance_api::client::{AttendanceApiConfig, AttendanceClient};
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = WebConfig::from_env();

    // attendance backend
    let api_config = AttendanceApiConfig::from_env()
        .expect("expected ATTENDANCE_API_URL in env.");
    log::info!("using attendance backend at {}", api_config.base_url);
    let client =
        AttendanceClient::new(api_config).expect("could not build attendance client.");

    // web server
    let state = WebState::new(Arc::new(client), config.zone);
    if let Err(why) = start_web_server(state, &config.bind_address).await {
        log::error!("web server stopped: {}", why);
    }
}
