use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use leave_desk::config::Config;
use leave_desk::db::{ensure_schema, init_db};
use leave_desk::docs::ApiDoc;
use leave_desk::leave::LeaveService;
use leave_desk::routes;
use leave_desk::store::{LeaveStore, MemoryStore, MySqlStore};
use leave_desk::utils::sample_feed::SampleFeed;

#[get("/")]
async fn index() -> impl Responder {
    "Leave Desk"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store: Arc<dyn LeaveStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = init_db(url).await?;
            ensure_schema(&pool).await?;
            info!("Using MySQL leave store");
            Arc::new(MySqlStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, leave requests are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let service = Data::new(LeaveService::new(store));
    let feed = Data::new(SampleFeed::new(config.metrics_period, config.metrics_points));
    feed.start().await;

    // one limiter shared by every worker
    let limiter = Arc::new(routes::build_limiter(config.rate_submit_per_min)?);
    let server_addr = config.server_addr.clone();
    let app_feed = feed.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .app_data(app_feed.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config, limiter.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    feed.stop().await;
    info!("Server stopped");
    Ok(())
}
