use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use vg_shared::config::AppConfig;

use vg_core::services::ratelimit::RateLimiters;
use vg_core::services::registration::{RegistrationService, RegistrationServiceConfig};
use vg_core::services::selection::ConfiguredSelectionStrategy;
use vg_core::services::sender::{LastDigitsVerificationCodeSender, SenderRegistry, VerificationCodeSender};

use vg_infra::cache::RedisClient;
use vg_infra::ratelimit::redis_rate_limiters;
use vg_infra::sender::create_senders;
use vg_infra::store::InMemorySessionStore;

use vg_api::app::create_app;
use vg_api::routes::registration::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!("Starting VeriGate in {} mode", config.environment);

    // The in-memory store is the reference implementation; a wide-column
    // backend would slot in behind the same contract
    let store = Arc::new(InMemorySessionStore::new());
    let _sweeper = store.spawn_sweeper(Duration::from_secs(config.session.sweep_interval_seconds));

    // Profile wiring: development runs self-contained with the last-digits
    // sender and no rate limiting; production wires the configured
    // providers and Redis-backed limiters
    let (senders, rate_limiters, sender_config) = if config.environment.is_development() {
        info!("Development profile: last-digits sender, all-allow rate limiters");

        let senders: Vec<Arc<dyn VerificationCodeSender>> =
            vec![Arc::new(LastDigitsVerificationCodeSender::new())];

        let mut sender_config = config.sender.clone();
        sender_config.default_sender = "last-digits".to_string();

        (senders, RateLimiters::allow_all(), sender_config)
    } else {
        let senders = create_senders(&config.sender).map_err(io_error)?;

        let rate_limiters = match RedisClient::connect(&config.cache).await {
            Ok(client) => redis_rate_limiters(&client, &config.rate_limit),
            Err(err) => {
                warn!("Redis unavailable ({}), falling back to in-process rate limiters", err);
                RateLimiters::fixed_delay(&config.rate_limit)
            }
        };

        (senders, rate_limiters, config.sender.clone())
    };

    let registry = Arc::new(SenderRegistry::new(senders).map_err(io_error)?);
    info!("Registered senders: {:?}", registry.names());

    let strategy = Arc::new(ConfiguredSelectionStrategy::new(registry.clone(), &sender_config));

    let registration_service = Arc::new(RegistrationService::new(
        store,
        registry,
        strategy,
        rate_limiters,
        RegistrationServiceConfig::from(&config.session),
    ));

    let app_state = web::Data::new(AppState { registration_service });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)?
        .run()
        .await
}

fn io_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
