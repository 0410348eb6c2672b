use anyhow::{Result, anyhow, bail};
use clap::Args;
use serde::Serialize;

use campaign_form::{
    Filters, RequestStats, RequestSummary, Status, StatusChange,
    dashboard::{ALL_BRANDS, ALL_STATUSES},
};

use crate::cmd::i18n::{tr, trf};
use crate::cmd::{Context, EmailArg, emit_json};

#[derive(Args, Debug, Clone)]
pub struct RequestsArgs {
    #[arg(long, value_name = "BRAND", default_value = ALL_BRANDS)]
    pub brand: String,
    #[arg(long, value_name = "STATUS", default_value = ALL_STATUSES)]
    pub status: String,
    /// Part of the request number, any case.
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub search: String,
}

#[derive(Args, Debug, Clone)]
pub struct SetStatusArgs {
    #[command(flatten)]
    pub email: EmailArg,
    /// Request id or request number.
    #[arg(long, value_name = "REQUEST")]
    pub request: String,
    #[arg(long, value_name = "STATUS")]
    pub status: String,
}

#[derive(Serialize)]
struct RequestsOutput<'a> {
    stats: &'a RequestStats,
    requests: Vec<&'a RequestSummary>,
}

pub async fn run_requests(ctx: &Context, args: RequestsArgs) -> Result<()> {
    let client = ctx.client()?;
    let requests = client.team_requests().await?;
    let filters = Filters {
        brand: args.brand,
        status: args.status,
        search: args.search,
    };
    let stats = RequestStats::collect(&requests);
    let shown = filters.apply(&requests);

    if ctx.json {
        return emit_json(&RequestsOutput {
            stats: &stats,
            requests: shown,
        });
    }

    println!(
        "{}",
        trf(
            "cli.requests.stats",
            &[
                &stats.total.to_string(),
                &stats.requested().to_string(),
                &stats.in_progress().to_string(),
                &stats.published().to_string(),
            ]
        )
    );
    if shown.is_empty() {
        println!("{}", tr("cli.requests.none"));
        return Ok(());
    }
    for request in &shown {
        println!(
            "  {:<16} {:<10} {:<12} {:<24} {}",
            request.number,
            request.requested_on(),
            request.brand_name,
            request.user_name,
            request.status
        );
    }
    println!(
        "{}",
        trf(
            "cli.requests.showing",
            &[&shown.len().to_string(), &stats.total.to_string()]
        )
    );
    Ok(())
}

pub async fn run_statuses(ctx: &Context) -> Result<()> {
    let statuses = ctx.client()?.statuses().await?;
    if ctx.json {
        return emit_json(&statuses);
    }
    println!("{}", tr("cli.statuses.header"));
    for status in &statuses {
        println!("  {}", status.name);
    }
    Ok(())
}

pub async fn run_set_status(ctx: &Context, args: SetStatusArgs) -> Result<()> {
    let client = ctx.client()?;
    let user = ctx.login(&client, &args.email).await?;
    let requests = client.team_requests().await?;
    let statuses = client.statuses().await?;

    let request = find_request(&requests, &args.request)
        .ok_or_else(|| anyhow!(trf("cli.status.unknown_request", &[&args.request])))?;
    let status = find_status(&statuses, &args.status)?;
    let change = StatusChange::new(request, &status.name, &user)?;

    client
        .update_status(&change)
        .await
        .map_err(|err| anyhow!(trf("cli.status.update_failed", &[&err.to_string()])))?;

    if ctx.json {
        return emit_json(&change);
    }
    println!("{}", tr("cli.status.updated"));
    Ok(())
}

fn find_request<'a>(requests: &'a [RequestSummary], key: &str) -> Option<&'a RequestSummary> {
    let key = key.trim();
    requests
        .iter()
        .find(|request| request.id == key || request.number.eq_ignore_ascii_case(key))
}

fn find_status<'a>(statuses: &'a [Status], name: &str) -> Result<&'a Status> {
    if let Some(status) = statuses
        .iter()
        .find(|status| status.name.to_lowercase() == name.trim().to_lowercase())
    {
        return Ok(status);
    }
    let known = statuses
        .iter()
        .map(|status| status.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    bail!(trf("cli.status.unknown_status", &[name, &known]))
}
