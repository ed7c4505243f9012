use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    ChartRow, CompoundFrequency, ContributionFrequency, DEFAULT_TICK_COUNT, InvalidDomainError,
    Projection, ProjectionInput, YearSnapshot, axis_ticks, chart_rows, format_compact,
    format_currency, project,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCompoundFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl From<CliCompoundFrequency> for CompoundFrequency {
    fn from(value: CliCompoundFrequency) -> Self {
        match value {
            CliCompoundFrequency::Annually => CompoundFrequency::Annually,
            CliCompoundFrequency::SemiAnnually => CompoundFrequency::SemiAnnually,
            CliCompoundFrequency::Quarterly => CompoundFrequency::Quarterly,
            CliCompoundFrequency::Monthly => CompoundFrequency::Monthly,
            CliCompoundFrequency::Daily => CompoundFrequency::Daily,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliContributionFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Weekly,
}

impl From<CliContributionFrequency> for ContributionFrequency {
    fn from(value: CliContributionFrequency) -> Self {
        match value {
            CliContributionFrequency::Annually => ContributionFrequency::Annually,
            CliContributionFrequency::SemiAnnually => ContributionFrequency::SemiAnnually,
            CliContributionFrequency::Quarterly => ContributionFrequency::Quarterly,
            CliContributionFrequency::Monthly => ContributionFrequency::Monthly,
            CliContributionFrequency::Weekly => ContributionFrequency::Weekly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn parse_compound_frequency(raw: &str) -> Result<u32, String> {
    if let Ok(preset) = CliCompoundFrequency::from_str(raw, true) {
        return Ok(CompoundFrequency::from(preset).per_year());
    }
    raw.parse::<u32>()
        .map_err(|_| format!("expected a preset or a count per year, got '{raw}'"))
}

fn parse_contribution_frequency(raw: &str) -> Result<u32, String> {
    if let Ok(preset) = CliContributionFrequency::from_str(raw, true) {
        return Ok(ContributionFrequency::from(preset).per_year());
    }
    raw.parse::<u32>()
        .map_err(|_| format!("expected a preset or a count per year, got '{raw}'"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    principal: Option<f64>,
    rate: Option<f64>,
    #[serde(alias = "time")]
    years: Option<u32>,
    compound: Option<u32>,
    contribution: Option<f64>,
    contribution_frequency: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest projection with recurring contributions"
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 1000.0,
        allow_negative_numbers = true,
        help = "Initial principal amount"
    )]
    principal: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        allow_negative_numbers = true,
        help = "Annual interest rate in percent, e.g. 7"
    )]
    rate: f64,
    #[arg(long, default_value_t = 20, help = "Number of whole years to project")]
    years: u32,
    #[arg(
        long = "compound",
        default_value = "annually",
        value_parser = parse_compound_frequency,
        help = "Compounding frequency: annually, semi-annually, quarterly, monthly, daily, or a count per year"
    )]
    compounds_per_year: u32,
    #[arg(
        long,
        default_value_t = 100.0,
        allow_negative_numbers = true,
        help = "Amount added at each contribution"
    )]
    contribution: f64,
    #[arg(
        long = "contribution-frequency",
        default_value = "monthly",
        value_parser = parse_contribution_frequency,
        help = "Contribution frequency: annually, semi-annually, quarterly, monthly, weekly, or a count per year"
    )]
    contributions_per_year: u32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    final_balance: f64,
    total_contributions: f64,
    total_interest: f64,
    years: Vec<YearSnapshot>,
    chart: Vec<ChartRow>,
    y_axis_ticks: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error(transparent)]
    InvalidInput(#[from] InvalidDomainError),
    #[error("failed to serialize projection: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn build_inputs(cli: &Cli) -> Result<ProjectionInput, InvalidDomainError> {
    ProjectionInput::new(
        cli.principal,
        cli.rate,
        cli.years,
        cli.compounds_per_year,
        cli.contribution,
        cli.contributions_per_year,
    )
}

pub fn run_cli(raw_args: &[String]) -> Result<String, CliError> {
    let cli = Cli::try_parse_from(raw_args)?;
    let inputs = build_inputs(&cli)?;
    tracing::debug!(?inputs, "running projection");

    let projection = project(&inputs);
    match cli.format {
        OutputFormat::Table => Ok(render_table(&projection)),
        OutputFormat::Json => {
            let response = build_project_response(&projection);
            Ok(serde_json::to_string_pretty(&response)?)
        }
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "compound interest API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => project_handler_impl(payload),
        Err(rejection) => bad_payload_response(&rejection.body_text()),
    }
}

async fn project_post_handler(payload: Result<Json<ProjectPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => project_handler_impl(payload),
        Err(rejection) => bad_payload_response(&rejection.body_text()),
    }
}

fn bad_payload_response(msg: &str) -> Response {
    tracing::warn!(error = %msg, "rejected malformed projection payload");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = match api_request_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(err) => {
            tracing::warn!(%err, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };
    tracing::debug!(?inputs, "running projection");

    let projection = project(&inputs);
    json_response(StatusCode::OK, build_project_response(&projection))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ProjectionInput, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ProjectionInput, InvalidDomainError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.rate {
        cli.rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.compound {
        cli.compounds_per_year = v;
    }
    if let Some(v) = payload.contribution {
        cli.contribution = v;
    }
    if let Some(v) = payload.contribution_frequency {
        cli.contributions_per_year = v;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        principal: 1_000.0,
        rate: 7.0,
        years: 20,
        compounds_per_year: CompoundFrequency::Annually.per_year(),
        contribution: 100.0,
        contributions_per_year: ContributionFrequency::Monthly.per_year(),
        format: OutputFormat::Json,
    }
}

fn build_project_response(projection: &Projection) -> ProjectResponse {
    let chart = chart_rows(projection);
    let max_total = chart.iter().map(|row| row.total).fold(0.0, f64::max);
    ProjectResponse {
        final_balance: projection.final_balance,
        total_contributions: projection.total_contributions(),
        total_interest: projection.total_interest(),
        years: projection.snapshots.clone(),
        chart,
        y_axis_ticks: axis_ticks(max_total, DEFAULT_TICK_COUNT),
    }
}

fn render_table(projection: &Projection) -> String {
    const HEADERS: [&str; 6] = [
        "Year",
        "Starting Balance",
        "Yearly Contribution",
        "Yearly Interest",
        "Total Interest",
        "End Balance",
    ];

    let rows: Vec<[String; 6]> = projection
        .snapshots
        .iter()
        .map(|s| {
            [
                s.year.to_string(),
                format_currency(s.starting_balance),
                format_currency(s.yearly_contribution),
                format_currency(s.yearly_interest),
                format_currency(s.cumulative_interest),
                format_currency(s.ending_balance),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:>w$}"))
        .collect();
    let _ = writeln!(out, "{}", header_line.join("  "));
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:>w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  "));
    }

    let max_total = projection
        .snapshots
        .iter()
        .map(|s| s.ending_balance.round())
        .fold(0.0, f64::max);
    let scale: Vec<String> = axis_ticks(max_total, DEFAULT_TICK_COUNT)
        .into_iter()
        .map(format_compact)
        .collect();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Final Amount: {}",
        format_currency(projection.final_balance)
    );
    let _ = writeln!(
        out,
        "Total Contributions: {}",
        format_currency(projection.total_contributions())
    );
    let _ = writeln!(
        out,
        "Total Interest Earned: {}",
        format_currency(projection.total_interest())
    );
    let _ = writeln!(out, "Chart scale: {}", scale.join(" | "));
    out
}
