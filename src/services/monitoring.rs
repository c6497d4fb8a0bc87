// Monitoring with Sentry integration
use tracing::info;

/// Installs a Sentry client when a DSN is configured.
///
/// The returned guard flushes pending events on drop, so it must live as
/// long as the server does.
pub fn init_sentry(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let Some(dsn) = dsn.filter(|d| !d.is_empty()) else {
        info!("Sentry DSN not configured");
        return None;
    };

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(
                std::env::var("ENVIRONMENT")
                    .unwrap_or_else(|_| "development".to_string())
                    .into(),
            ),
            ..Default::default()
        },
    ));

    info!("Sentry initialized successfully");
    Some(guard)
}
