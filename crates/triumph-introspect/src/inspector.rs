//! Service-level entry points over the crawler.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::{debug, info};
use triumph_core::{BusSessionPort, CrawlSettings, Service, ServiceDirectory, ServiceKind};

use crate::crawler::Crawler;
use crate::error::CrawlError;

/// Crawl `service_name` and return its complete object graph.
///
/// On any error no service is returned, so callers never see a partial tree.
pub fn inspect_service(
    session: &dyn BusSessionPort,
    service_name: &str,
    kind: ServiceKind,
    settings: &CrawlSettings,
) -> Result<Service, CrawlError> {
    crawl_into_service(Crawler::new(session, settings), service_name, kind)
}

/// Run [`inspect_service`] on tokio's blocking pool.
///
/// The crawl issues synchronous bus calls, so it must not run on an async
/// worker or a UI thread. Setting `cancel` stops the crawl at its next step.
pub async fn inspect_off_thread(
    session: Arc<dyn BusSessionPort>,
    service_name: String,
    kind: ServiceKind,
    settings: CrawlSettings,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<Service, CrawlError> {
    tokio::task::spawn_blocking(move || {
        let mut crawler = Crawler::new(session.as_ref(), &settings);
        if let Some(flag) = cancel {
            crawler = crawler.with_cancellation(flag);
        }
        crawl_into_service(crawler, &service_name, kind)
    })
    .await
    .map_err(|e| CrawlError::Worker(e.to_string()))?
}

/// Inspect a service and publish the result in `directory`.
///
/// The previous graph stays visible until the new one is complete. A failed
/// crawl leaves the directory untouched.
pub fn refresh_service(
    directory: &ServiceDirectory,
    session: &dyn BusSessionPort,
    service_name: &str,
    kind: ServiceKind,
    settings: &CrawlSettings,
) -> Result<Arc<Service>, CrawlError> {
    let service = Arc::new(inspect_service(session, service_name, kind, settings)?);
    if directory.publish(Arc::clone(&service)).is_some() {
        debug!(service = service_name, "Replaced previous object graph");
    }
    Ok(service)
}

fn crawl_into_service(
    mut crawler: Crawler<'_>,
    service_name: &str,
    kind: ServiceKind,
) -> Result<Service, CrawlError> {
    let objects = crawler.crawl()?;
    info!(
        service = service_name,
        objects = objects.len(),
        warnings = crawler.warnings().len(),
        "Service inspected"
    );
    let mut service = Service::new(service_name, kind);
    service.replace_objects(objects);
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triumph_core::NoopBusSession;

    #[test]
    fn test_noop_session_yields_root_object() {
        let service = inspect_service(
            &NoopBusSession,
            "org.example",
            ServiceKind::Local,
            &CrawlSettings::with_defaults(),
        )
        .unwrap();
        assert_eq!(service.name(), "org.example");
        assert_eq!(service.kind(), ServiceKind::Local);
        assert_eq!(service.objects().len(), 1);
        assert_eq!(service.objects()[0].service(), "org.example");
    }

    #[test]
    fn test_refresh_publishes() {
        let directory = ServiceDirectory::new();
        let settings = CrawlSettings::with_defaults();
        let first =
            refresh_service(&directory, &NoopBusSession, "a.b", ServiceKind::Remote, &settings)
                .unwrap();
        let second =
            refresh_service(&directory, &NoopBusSession, "a.b", ServiceKind::Remote, &settings)
                .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(directory.names(), vec!["a.b"]);
    }

    #[test]
    fn test_refresh_returns_its_own_graph() {
        let directory = ServiceDirectory::new();
        let settings = CrawlSettings::with_defaults();
        let mine =
            refresh_service(&directory, &NoopBusSession, "a.b", ServiceKind::Remote, &settings)
                .unwrap();
        // A later publish under the same name does not change what was returned.
        directory.publish(Service::new("a.b", ServiceKind::Local));
        assert_eq!(mine.kind(), ServiceKind::Remote);
        assert_eq!(mine.objects().len(), 1);
        assert_eq!(directory.get("a.b").unwrap().kind(), ServiceKind::Local);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_graph() {
        let directory = ServiceDirectory::new();
        let good = CrawlSettings::with_defaults();
        refresh_service(&directory, &NoopBusSession, "a.b", ServiceKind::Remote, &good).unwrap();

        let bad = CrawlSettings {
            max_depth: Some(0),
            ..CrawlSettings::with_defaults()
        };
        let err = refresh_service(&directory, &NoopBusSession, "a.b", ServiceKind::Remote, &bad)
            .unwrap_err();
        assert!(matches!(err, CrawlError::Settings(_)));
        assert_eq!(directory.get("a.b").unwrap().objects().len(), 1);
    }
}
