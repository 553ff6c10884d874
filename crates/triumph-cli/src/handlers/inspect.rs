//! Inspect command handler.
//!
//! Loads a capture, resolves crawl settings and crawls on the blocking
//! pool. Ctrl-C cancels the crawl at its next step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tracing::{info, warn};
use triumph_core::{BusSessionPort, ComponentFilter, Service, ServiceKind};
use triumph_introspect::inspect_off_thread;

use crate::bootstrap::{SettingsOverrides, resolve_settings};
use crate::capture::{Capture, CaptureSession};
use crate::commands::InspectArgs;
use crate::error::CliError;
use crate::presentation::service_lines;

/// Crawl the capture named by `args`.
pub async fn inspect(args: &InspectArgs) -> Result<Service, CliError> {
    let settings = resolve_settings(args.config.as_deref(), &SettingsOverrides::from(args))?;
    let capture = Capture::load(&args.capture)?;
    let service_name = args
        .service
        .clone()
        .unwrap_or_else(|| capture.service.clone());
    info!(service = %service_name, objects = capture.objects.len(), "Loaded capture");

    let session: Arc<dyn BusSessionPort> = Arc::new(CaptureSession::new(capture));
    let cancel = Arc::new(AtomicBool::new(false));
    let watcher = tokio::spawn({
        let cancel = Arc::clone(&cancel);
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling crawl");
                cancel.store(true, Ordering::Relaxed);
            }
        }
    });

    let result = inspect_off_thread(
        session,
        service_name,
        ServiceKind::Remote,
        settings,
        Some(cancel),
    )
    .await;
    watcher.abort();
    Ok(result?)
}

/// Filter used for the tree view.
#[must_use]
pub fn filter_for(args: &InspectArgs) -> ComponentFilter {
    let mut filter = ComponentFilter::new();
    if let Some(prefix) = &args.filter {
        filter.set_name(prefix);
    }
    filter
}

pub async fn execute(args: &InspectArgs) -> Result<()> {
    let service = inspect(args).await?;
    if args.json {
        let json = serde_json::to_string_pretty(&service).context("serializing service")?;
        println!("{json}");
        return Ok(());
    }
    for line in service_lines(&service, &filter_for(args)) {
        println!("{line}");
    }
    Ok(())
}
