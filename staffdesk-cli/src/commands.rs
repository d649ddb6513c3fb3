//! Subcommand implementations

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use staffdesk_core::resources::{
    AccountResource, HospitalResource, MembershipResource, ProfessionalResource,
    ProfileResource,
};
use staffdesk_core::types::PageError;
use staffdesk_core::{
    ControllerConfig, CoreError, EntityPageController, EntityResource, LoadOutcome,
};
use staffdesk_transport::Transport;

use crate::cli::{to_filters, DeleteArgs, ListArgs, ResourceArg};

/// Shared by every subcommand
pub struct Context {
    pub transport: Arc<dyn Transport>,
    pub config: ControllerConfig,
}

/// Instantiate the concrete resource behind `$arg` and call `$run` with it.
macro_rules! with_resource {
    ($arg:expr, $run:ident ( $($rest:expr),* )) => {
        match $arg {
            ResourceArg::Hospitals => $run(HospitalResource, $($rest),*).await,
            ResourceArg::Professionals => $run(ProfessionalResource, $($rest),*).await,
            ResourceArg::Memberships => $run(MembershipResource, $($rest),*).await,
            ResourceArg::Accounts => $run(AccountResource, $($rest),*).await,
            ResourceArg::Profiles => $run(ProfileResource, $($rest),*).await,
        }
    };
}

pub async fn list(ctx: &Context, args: &ListArgs) -> Result<ExitCode> {
    with_resource!(args.resource, list_page(ctx, args))
}

pub async fn delete(ctx: &Context, args: &DeleteArgs) -> Result<ExitCode> {
    with_resource!(args.resource, delete_records(ctx, args))
}

async fn list_page<R>(resource: R, ctx: &Context, args: &ListArgs) -> Result<ExitCode>
where
    R: EntityResource,
    R::Entity: Serialize,
{
    let config = ControllerConfig {
        page_size: args.page_size.unwrap_or(ctx.config.page_size),
        ..ctx.config
    };
    let page = EntityPageController::new(resource, Arc::clone(&ctx.transport), config)?;

    let mut outcome = page.set_filters(to_filters(&args.filters)).await;
    if args.page > 1 && outcome == LoadOutcome::Applied {
        outcome = page.go_to_page(args.page).await;
    }
    if let LoadOutcome::Failed(error) = outcome {
        report_error(&error);
        return Ok(ExitCode::FAILURE);
    }

    let view = page.snapshot().await;
    let mut out = std::io::stdout().lock();
    for item in &view.items {
        writeln!(out, "{}", serde_json::to_string(item)?)?;
    }
    eprintln!(
        "page {} of {} ({} records)",
        view.page_number(),
        view.page_count(),
        view.total
    );
    Ok(ExitCode::SUCCESS)
}

async fn delete_records<R>(resource: R, ctx: &Context, args: &DeleteArgs) -> Result<ExitCode>
where
    R: EntityResource,
{
    let page = EntityPageController::new(resource, Arc::clone(&ctx.transport), ctx.config)?;

    if args.all_matching {
        if let LoadOutcome::Failed(error) = page.set_filters(to_filters(&args.filters)).await {
            report_error(&error);
            return Ok(ExitCode::FAILURE);
        }
        page.toggle_all().await;
        if !page.snapshot().await.select_all {
            eprintln!("Nothing matches the filters; nothing deleted");
            return Ok(ExitCode::SUCCESS);
        }
    } else {
        for id in &args.ids {
            page.toggle(*id).await;
        }
    }

    let report = match page.delete_selected().await {
        Ok(report) => report,
        Err(CoreError::Transport(_)) => {
            if let Some(error) = page.snapshot().await.error {
                report_error(&error);
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string(&report)?);
    if report.is_complete() {
        eprintln!("Deleted {} records", report.deleted_count());
        Ok(ExitCode::SUCCESS)
    } else {
        if let Some(error) = page.snapshot().await.error {
            report_error(&error);
        }
        Ok(ExitCode::FAILURE)
    }
}

fn report_error(error: &PageError) {
    tracing::debug!(operation = ?error.operation, kind = ?error.kind, "operation failed");
    eprintln!("error: {}", error.message);
    if error.is_session_expired() {
        eprintln!("hint: sign in again and export a fresh token in STAFFDESK_TOKEN");
    }
}
