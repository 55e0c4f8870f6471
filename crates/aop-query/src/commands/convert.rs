//! Offline conversion of exchange JSON into tables

use crate::commands::{read_network, write_network, write_tables};
use crate::error::Result;
use aop_core::NetworkSummary;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct ConvertReport {
    pub input: PathBuf,
    pub summary: NetworkSummary,
    pub tables: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

pub fn run(
    input: &Path,
    tables_dir: Option<&Path>,
    table_format: &str,
    output: Option<&Path>,
) -> Result<ConvertReport> {
    let network = read_network(input)?;

    let tables = match tables_dir {
        Some(dir) => write_tables(&network, dir, table_format)?,
        None => Vec::new(),
    };
    if let Some(path) = output {
        write_network(&network, path, true)?;
    }

    Ok(ConvertReport {
        input: input.to_path_buf(),
        summary: network.summary(),
        tables,
        output: output.map(Path::to_path_buf),
    })
}
