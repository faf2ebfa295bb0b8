//! Heatbill report generator
//!
//! Reads a batch of account periods and writes the billing report.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heatbill_core::generator::{GenerateError, ReportBatch, ReportGenerator, RunSummary};
use heatbill_core::report::{HeatingRosters, InstallDateMemo};
use heatbill_core::sink::{CsvReportSink, ReportTarget, SinkError};
use heatbill_core::tariff::TariffSchedule;
use heatbill_shared::{AppConfig, AppError};

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load();
    let default_filter = config
        .as_ref()
        .map_or_else(|_| "heatbill=info".to_string(), |config| config.log.filter.clone());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = config
        .map_err(AppError::from)
        .map_err(anyhow::Error::from)
        .and_then(|config| run(&config));

    match result {
        Ok(summary) => {
            info!(%summary, "Report written");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let app_error = err.downcast_ref::<AppError>();
            let code = app_error.map_or(1, AppError::exit_code);
            error!(
                error_code = app_error.map_or("INTERNAL_ERROR", AppError::error_code),
                "{err:#}"
            );
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(config: &AppConfig) -> anyhow::Result<RunSummary> {
    let tariff = if config.tariffs.is_empty() {
        TariffSchedule::builtin()
    } else {
        TariffSchedule::from_entries(&config.tariffs)
            .map_err(|err| AppError::Config(err.to_string()))?
    };

    let raw = std::fs::read_to_string(&config.input.batch)
        .map_err(|err| AppError::Input(err.to_string()))
        .with_context(|| format!("reading batch {}", config.input.batch.display()))?;
    let mut batch: ReportBatch = serde_json::from_str(&raw)
        .map_err(|err| AppError::Input(err.to_string()))
        .with_context(|| format!("parsing batch {}", config.input.batch.display()))?;
    if let Some(path) = &config.input.buildings {
        batch.buildings = Some(read_buildings(path)?);
    }
    info!(
        periods = batch.periods.len(),
        accounts = batch.ledgers.len(),
        "Batch loaded"
    );

    let buildings = batch.building_roster();
    let meters = batch.area_meter_roster();
    let averages = batch.heating_average_roster();
    let ledgers = batch.account_ledgers();

    let target: ReportTarget = config
        .report
        .target
        .parse()
        .map_err(|err: SinkError| AppError::Config(err.to_string()))?;
    let mut sink = CsvReportSink::create(&config.report.template, &target)
        .map_err(|err| AppError::Sink(err.to_string()))?;

    let mut generator = ReportGenerator::new(
        &tariff,
        HeatingRosters {
            area_meters: &meters,
            averages: &averages,
        },
        &ledgers,
        InstallDateMemo::new(config.memo.default_install_date.clone()),
    );
    if let Some(buildings) = &buildings {
        generator = generator.with_buildings(buildings);
    }
    let summary = generator
        .run(batch.periods, &mut sink)
        .map_err(|err| match err {
            GenerateError::Sink(err) => AppError::Sink(err.to_string()),
            err @ GenerateError::Row { .. } => AppError::Report(err.to_string()),
        })?;

    info!(destination = %sink.destination().display(), "Report saved");
    Ok(summary)
}

fn read_buildings(path: &Path) -> anyhow::Result<BTreeMap<i32, Vec<String>>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| AppError::Input(err.to_string()))
        .with_context(|| format!("reading buildings {}", path.display()))?;
    let buildings = serde_json::from_str(&raw)
        .map_err(|err| AppError::Input(err.to_string()))
        .with_context(|| format!("parsing buildings {}", path.display()))?;
    Ok(buildings)
}
