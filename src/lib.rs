use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod db;
pub mod document;
pub mod quote;
pub mod store;

pub use crate::db::AppState;

use crate::config::AppConfig;
use crate::store::UserStore;

/// Origins allowed when `CORS_ORIGINS` is not set.
const DEV_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:8080",
];

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
    InternalError::from_response(err, response).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Mount every `/api` route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .configure(auth::handlers::config)
            .configure(quote::handlers::config),
    );
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Whether an admin account exists. Warns when none does or the store
/// cannot answer.
async fn admin_present(users: &dyn UserStore) -> bool {
    match users.count_admins().await {
        Ok(0) => {
            log::warn!("No admin account exists; set ADMIN_EMAIL and ADMIN_PASSWORD to create one");
            false
        }
        Ok(_) => true,
        Err(e) => {
            log::warn!("Could not count admin accounts: {}", e);
            false
        }
    }
}

/// Load configuration, open the stores, create the schema and seed the
/// first admin.
async fn bootstrap() -> anyhow::Result<(AppConfig, AppState)> {
    let config = AppConfig::from_env().context("invalid configuration")?;

    let state = AppState::from_config(&config).await.context(
        "failed to connect to database, check DATABASE_URL and that the database is running",
    )?;

    match &config.admin_seed {
        Some(seed) => {
            auth::seed_admin(state.users.as_ref(), seed)
                .await
                .context("failed to seed admin account")?;
        }
        None => {
            admin_present(state.users.as_ref()).await;
        }
    }

    let missing = config.static_pages.missing_pages();
    if !missing.is_empty() {
        for (index, path) in &missing {
            log::warn!("Static page {} missing at {}", index, path.display());
        }
        log::warn!("PDF generation will fail until the static pages are in place");
    }

    Ok((config, state))
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::auth::handlers::login,
            crate::auth::handlers::logout,
            crate::auth::handlers::me,
            crate::auth::handlers::list_users,
            crate::auth::handlers::create_user,
            crate::quote::handlers::list_quotes,
            crate::quote::handlers::create_quote,
            crate::quote::handlers::get_quote,
            crate::quote::handlers::delete_quote,
            crate::quote::handlers::get_template,
            crate::quote::handlers::preview_quote,
            crate::quote::handlers::draft_pdf,
            crate::quote::handlers::quote_pdf
        ),
        components(
            schemas(
                auth::model::LoginRequest,
                auth::model::LoginResponse,
                auth::model::SessionUser,
                auth::model::CreateUserRequest,
                auth::model::UserInfo,
                auth::model::CurrentUser,
                auth::model::Role,
                quote::model::Quotation,
                quote::model::StoredQuotation,
                quote::model::QuoteDetails,
                quote::model::ClientDetails,
                quote::model::CompanyDetails,
                quote::model::ColumnHeaders,
                quote::model::LineItem,
                quote::model::TaxConfiguration,
                quote::model::TaxKind,
                quote::model::TotalDetails,
                quote::model::QuoteListResponse,
                quote::model::QuoteResponse,
                quote::model::Pagination,
                quote::model::MessageResponse,
                quote::model::PreviewRequest,
                quote::model::PreviewResponse,
                quote::draft::FieldUpdate,
                quote::totals::Totals,
                ErrorResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "Authentication", description = "Staff login and user management."),
            (name = "Quotations", description = "Quotation drafts, records and PDF proposals.")
        ),
        servers(
            (url = "http://127.0.0.1:8080", description = "Localhost")
        )
    )]
    struct ApiDoc;

    let (config, state) = match bootstrap().await {
        Ok(ready) => ready,
        Err(e) => {
            log::error!("Startup failed: {:#}", e);
            std::process::exit(1);
        }
    };
    let app_state = web::Data::new(state);

    let prometheus = PrometheusMetricsBuilder::new("quotation_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let origins: Vec<String> = if config.cors_origins.is_empty() {
        DEV_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        config.cors_origins.clone()
    };

    log::info!("Starting server at http://{}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
