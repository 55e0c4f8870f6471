//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function returning a
//! serializable report; the binary prints it.

pub mod build;
pub mod convert;
pub mod summary;

use crate::error::Result;
use aop_core::tables::{write_all_tables, TableFormat};
use aop_core::{AopNetwork, ExchangeFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Load a network from an exchange JSON file
pub fn read_network(path: &Path) -> Result<AopNetwork> {
    let text = std::fs::read_to_string(path)?;
    let exchange = ExchangeFormat::from_json_str(&text)?;
    info!(path = %path.display(), elements = exchange.elements.len(), "Read exchange document");
    Ok(AopNetwork::from_exchange_format(&exchange.elements))
}

/// Write a network as pretty-printed exchange JSON
pub fn write_network(network: &AopNetwork, path: &Path, include_styles: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let exchange = network.to_exchange_format(include_styles);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &exchange)?;
    writer.flush()?;

    info!(path = %path.display(), "Wrote exchange document");
    Ok(())
}

/// Write every non-empty table; `format` is `csv` or `tsv`
pub fn write_tables(network: &AopNetwork, dir: &Path, format: &str) -> Result<Vec<PathBuf>> {
    let format: TableFormat = format.parse()?;
    let written = write_all_tables(network, dir, format)?;
    info!(dir = %dir.display(), tables = written.len(), "Wrote tables");
    Ok(written)
}
