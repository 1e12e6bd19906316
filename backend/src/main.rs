//! Backend entry-point: wires REST endpoints and session middleware.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::inbound::http;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::run_pending_migrations;
use backend::server::{build_state, AppConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(|err| std::io::Error::other(err.to_string()))?;

    run_pending_migrations(&config.database_url).map_err(std::io::Error::other)?;

    let key = load_session_key(&config);
    let key = match key {
        Ok(key) => key,
        Err(e) => return Err(e),
    };

    let state = web::Data::new(build_state(&config).await?);
    let cookie_secure = config.cookie_secure;
    let bind_addr = config.bind_addr;

    info!(addr = %bind_addr, "starting claims backend");
    HttpServer::new(move || build_app(state.clone(), key.clone(), cookie_secure))
        .bind(bind_addr)?
        .run()
        .await
}

fn load_session_key(config: &AppConfig) -> std::io::Result<Key> {
    match std::fs::read(&config.session_key_file) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = std::env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(
                    path = %config.session_key_file.display(),
                    error = %e,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    config.session_key_file.display()
                )))
            }
        }
    }
}

fn build_app(
    state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    let api = web::scope("/api/v1").wrap(session).configure(http::configure);

    App::new().app_data(state).service(api)
}
