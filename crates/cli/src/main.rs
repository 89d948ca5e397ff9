//! `tagihan-import <file.csv>`: import a delimited invoice file into an
//! in-memory store and print the result as JSON.
//!
//! Settings come from the `TAGIHAN_*` environment variables (see `config`).
//! Exits with status 1 when any record failed.

mod config;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;

use tagihan_import::{ImportSource, import_invoices};
use tagihan_infra::InMemoryUnitOfWork;

use crate::config::CliConfig;

fn main() -> anyhow::Result<ExitCode> {
    tagihan_observability::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: tagihan-import <file.csv>")?;
    let config = CliConfig::from_env();

    let data = std::fs::read(&path).with_context(|| format!("failed to read {path}"))?;
    let file_name = Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());

    let mut uow = InMemoryUnitOfWork::new();
    let result = import_invoices(
        &mut uow,
        ImportSource::delimited_text(file_name, data),
        config.user_id,
        &config.options,
    );

    tracing::info!(
        invoices = uow.invoices().len(),
        companies = uow.companies().len(),
        workers = uow.workers().len(),
        jobs = uow.jobs().len(),
        "store contents after import"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("failed to serialize import result")?
    );

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
