//! Network statistics of an exchange JSON file

use crate::commands::read_network;
use crate::error::Result;
use aop_core::NetworkSummary;
use std::path::Path;

pub fn run(input: &Path) -> Result<NetworkSummary> {
    let network = read_network(input)?;
    Ok(network.summary())
}
