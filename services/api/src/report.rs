use crate::infra::build_services;
use clap::Args;
use serde::Serialize;
use site_scout::config::AppConfig;
use site_scout::error::AppError;
use site_scout::telemetry;
use site_scout::workflows::property::domain::PropertyQuery;
use site_scout::workflows::property::PropertyReport;
use site_scout::workflows::site_selection::{ScoreReport, WeightVector};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Candidate city, e.g. "Austin, TX" (repeatable)
    #[arg(long = "city", required = true)]
    pub(crate) cities: Vec<String>,
    /// Weight override as metric=value, e.g. competition=2.5 (repeatable)
    #[arg(long = "weight")]
    pub(crate) weights: Vec<String>,
    /// Portfolio CSV to join against the candidate cities
    #[arg(long)]
    pub(crate) portfolio: Option<PathBuf>,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PropertyArgs {
    /// Street address, e.g. "1600 Amphitheatre Parkway"
    #[arg(long)]
    pub(crate) address: String,
    #[arg(long)]
    pub(crate) city: String,
    #[arg(long)]
    pub(crate) state: String,
    #[arg(long)]
    pub(crate) zip: String,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        cities,
        weights,
        portfolio,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    if portfolio.is_some() {
        config.collector.portfolio_csv = portfolio;
    }
    telemetry::init(&config.telemetry)?;

    let weights = WeightVector::default().with_overrides(&weights)?;
    let services = build_services(&config)?;
    let report = services.site_selection.score(&cities, weights).await?;

    if json {
        print_json(&report)
    } else {
        print!("{}", render_score_report(&report));
        Ok(())
    }
}

pub(crate) async fn run_property_lookup(args: PropertyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let query = PropertyQuery {
        address: args.address,
        city: args.city,
        state: args.state,
        zip_code: args.zip,
    };
    let services = build_services(&config)?;
    let report = services.property.lookup(&query).await?;

    if args.json {
        print_json(&report)
    } else {
        print!("{}", render_property_report(&report));
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn render_score_report(report: &ScoreReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Site ranking ({} cities, evaluated {})",
        report.ranked.len(),
        report.evaluated_at.format("%Y-%m-%d %H:%M UTC")
    );

    if report.ranked.is_empty() {
        let _ = writeln!(out, "\nNo cities could be scored.");
    } else {
        let _ = writeln!(
            out,
            "\n{:>4}  {:<28} {:>8} {:>12} {:>8} {:>11} {:>8} {:>14}",
            "Rank", "City", "Score", "Population", "Growth", "Competitors", "Transit", "Avg price"
        );
        for (index, scored) in report.ranked.iter().enumerate() {
            let record = &scored.record;
            let _ = writeln!(
                out,
                "{:>4}  {:<28} {:>8.3} {:>12} {:>7.2}% {:>11} {:>8} {:>14}",
                index + 1,
                record.query,
                scored.score,
                record
                    .population
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "n/a".to_string()),
                record.growth * 100.0,
                record.competitors,
                record.transit,
                record
                    .avg_commercial_price
                    .map(|price| format!("${price:.0}"))
                    .unwrap_or_else(|| "n/a".to_string()),
            );
        }
    }

    let warnings = report.warnings();
    if !warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings");
        for warning in warnings {
            let _ = writeln!(out, "- {warning}");
        }
    }

    out
}

pub(crate) fn render_property_report(report: &PropertyReport) -> String {
    let mut out = String::new();
    let property = &report.property;
    let _ = writeln!(out, "Property: {}", property.address);
    let _ = writeln!(
        out,
        "Location: {:.5}, {:.5}",
        property.location.latitude, property.location.longitude
    );
    if let Some(kind) = &property.property_type {
        let _ = writeln!(out, "Type: {kind}");
    }

    let owner = &report.owner;
    let _ = writeln!(out, "\nOwner: {}", owner.owner_name);
    let _ = writeln!(out, "Domain guess: {}", owner.domain);
    let _ = writeln!(
        out,
        "Contact: {}",
        owner.email.as_deref().unwrap_or("none found")
    );

    if report.nearby.is_empty() {
        let _ = writeln!(out, "\nNearby commercial properties: none");
    } else {
        let _ = writeln!(out, "\nNearby commercial properties");
        for nearby in &report.nearby {
            let _ = writeln!(
                out,
                "- {} ({:.5}, {:.5})",
                nearby.address, nearby.location.latitude, nearby.location.longitude
            );
        }
    }

    out
}
