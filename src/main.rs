use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use commute_planner::config::{LoggingSettings, Settings};
use commute_planner::core::{CarpoolMatcher, CommutePlanner, KMeans, CARPOOL_CLUSTERS};
use commute_planner::models::Roster;
use commute_planner::routes::{self, AppState};
use commute_planner::services::{NominatimClient, StaticWeatherProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// RUST_LOG wins, then LOG_LEVEL / LOG_FORMAT, then the `[logging]` config section
fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!("Starting commute planner...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io_error(format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    let roster = Roster::load(&settings.roster.path).map_err(|e| {
        error!("Failed to load roster from {}: {}", settings.roster.path, e);
        io_error(format!("Roster error: {}", e))
    })?;

    info!("Loaded roster of {} commuters from {}", roster.len(), settings.roster.path);

    let geocoder = NominatimClient::new(
        settings.geocoder.endpoint.clone(),
        settings.geocoder.user_agent.clone(),
        Duration::from_secs(settings.geocoder.timeout_secs),
    )
    .map_err(|e| {
        error!("Failed to create geocoding client: {}", e);
        io_error(format!("Geocoder error: {}", e))
    })?;

    info!("Geocoder initialized ({})", settings.geocoder.endpoint);

    let weather = StaticWeatherProvider::new(settings.weather.snapshot());

    let kmeans = KMeans::new(CARPOOL_CLUSTERS)
        .with_seed(settings.matching.seed)
        .with_n_init(settings.matching.n_init)
        .with_max_iterations(settings.matching.max_iterations);
    let matcher = CarpoolMatcher::new(kmeans);

    info!("Carpool matcher initialized: {:?}", matcher.kmeans());

    let planner = CommutePlanner::new(
        Arc::new(geocoder),
        Arc::new(weather),
        Arc::new(roster),
        matcher,
    )
    .with_fallback_weather(settings.weather.fallback());

    let app_state = AppState {
        planner: Arc::new(planner),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
