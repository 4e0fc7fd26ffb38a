//! Mirror status operation

use crate::{load_items, OpsCtx, StatusReport, StatusRequest};
use pga_errors::Error;
use pga_events::{AppEvent, EventEmitter, FailureContext, StatusEvent};
use pga_guard::{verify_items, ArchiveProbe, Dispatcher};
use pga_store::FileSystem;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Check every selected siva file of the local mirror against the remote
/// source without downloading anything.
///
/// # Errors
///
/// Returns an error if the items cannot be loaded, or if verification tasks
/// die without reporting. Flagged files are not errors.
pub async fn status(ctx: &OpsCtx, request: StatusRequest) -> Result<StatusReport, Error> {
    ctx.emit_operation_started("status");

    match run(ctx, request).await {
        Ok(report) => {
            ctx.emit_operation_completed("status", true);
            Ok(report)
        }
        Err(e) => {
            ctx.emit_operation_failed("status", FailureContext::from_error(&e));
            Err(e)
        }
    }
}

async fn run(ctx: &OpsCtx, request: StatusRequest) -> Result<StatusReport, Error> {
    let start = Instant::now();
    let run_id = Uuid::new_v4().to_string();
    let destination = ctx.local.location();

    let items = load_items(ctx, request.source).await?;
    tracing::info!("Checking status for {}", items.len());

    ctx.emit_for_run(
        &run_id,
        AppEvent::Status(StatusEvent::RunStarted {
            run_id: run_id.clone(),
            items: items.len(),
            jobs: request.jobs.get(),
            destination: destination.clone(),
        }),
    );

    let probe = Arc::new(ArchiveProbe::new(
        Arc::clone(&ctx.local),
        Arc::clone(&ctx.remote),
    ));
    let dispatcher = Dispatcher::new(request.jobs, ctx.layout.clone(), probe);
    let tally = verify_items(&dispatcher, items, &run_id, ctx).await?;

    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!("{tally} in '{destination}'");

    ctx.emit_for_run(
        &run_id,
        AppEvent::Status(StatusEvent::RunCompleted {
            run_id: run_id.clone(),
            tally,
            destination: destination.clone(),
            duration_ms,
        }),
    );

    Ok(StatusReport {
        run_id,
        tally,
        destination,
        duration_ms,
    })
}
