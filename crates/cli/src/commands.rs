//! Command definitions and their reports.
//!
//! Every command prints one pretty JSON document on stdout. The report
//! builders are plain functions over a ring or a snapshot so they can be
//! tested without touching the filesystem.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use cellring::{
    Cell, CellId, CellRegistry, CellShare, HashAlgorithm, HashRing, Partitioner, Reassignment,
    RingConfig, RingEntry, SharedRing,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::registry::JsonFileRegistry;
use crate::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "cellring",
    version,
    about = "Route client ids to cells with a consistent hash ring"
)]
pub struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Cell snapshot file (overrides `[registry] path`).
    #[arg(short = 'f', long, global = true)]
    pub cells: Option<PathBuf>,

    /// Virtual nodes per unit of weight (overrides `[ring] virtual_nodes`).
    #[arg(long, global = true)]
    pub virtual_nodes: Option<u32>,

    /// Hash algorithm: blake3 or xxh3 (overrides `[ring] hash`).
    #[arg(long, global = true)]
    pub hash: Option<HashAlgorithm>,

    /// Domain cells are served under (overrides `[routing] custom_domain`).
    #[arg(long, global = true)]
    pub custom_domain: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show which cell each client id is routed to.
    Route {
        #[arg(required = true)]
        client_ids: Vec<String>,
    },
    /// Show virtual node distribution and ring positions.
    Ring {
        /// Only list the first N ring positions.
        #[arg(long)]
        entries: Option<usize>,
    },
    /// List the registry's cells.
    Cells,
    /// Show how many sample clients move if a cell is deactivated.
    Diff {
        /// Cell to deactivate.
        #[arg(long)]
        deactivate: String,
        /// Number of synthetic client ids to place.
        #[arg(long, default_value_t = 1000)]
        samples: usize,
    },
    /// Periodically reload the registry and log client reassignments.
    Watch {
        /// Refresh interval in seconds.
        #[arg(long, default_value_t = 10)]
        interval: u64,
        client_ids: Vec<String>,
    },
}

impl Cli {
    /// Merge command-line overrides into the file configuration.
    pub fn resolve_config(&self) -> anyhow::Result<CliConfig> {
        let mut config = CliConfig::load(self.config.as_deref())?;
        if let Some(path) = &self.cells {
            config.registry.path = path.clone();
        }
        if let Some(virtual_nodes) = self.virtual_nodes {
            config.ring.virtual_nodes = virtual_nodes;
        }
        if let Some(hash) = self.hash {
            config.ring.hash = hash;
        }
        if let Some(domain) = &self.custom_domain {
            config.routing.custom_domain = domain.clone();
        }
        Ok(config)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.resolve_config()?;
        telemetry::init(&config.log.level);

        let registry = JsonFileRegistry::new(&config.registry.path);
        let scan = || {
            registry
                .scan()
                .with_context(|| format!("loading cells from {}", registry.path().display()))
        };

        match self.command {
            Command::Route { client_ids } => {
                let ring = build_ring(&config.ring, &scan()?);
                let reports = client_ids
                    .iter()
                    .map(|id| route_report(&ring, id, &config.routing.custom_domain))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                print_json(&reports)
            }
            Command::Ring { entries } => {
                let ring = build_ring(&config.ring, &scan()?);
                print_json(&ring_report(&ring, entries))
            }
            Command::Cells => print_json(&cells_report(scan()?)),
            Command::Diff {
                deactivate,
                samples,
            } => {
                let report = diff_report(&config.ring, &scan()?, &deactivate.into(), samples)?;
                print_json(&report)
            }
            Command::Watch {
                interval,
                client_ids,
            } => {
                watch(
                    &registry,
                    config.ring,
                    Duration::from_secs(interval.max(1)),
                    &client_ids,
                )
                .await
            }
        }
    }
}

fn build_ring(config: &RingConfig, cells: &[Cell]) -> HashRing {
    let mut ring = HashRing::with_config(config);
    ring.rebuild_from_cells(cells);
    info!(
        cells = ring.cell_count(),
        positions = ring.len(),
        hash = ring.algorithm().name(),
        "built ring"
    );
    ring
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Public URL of a cell.
pub fn cell_url(cell_id: &CellId, custom_domain: &str) -> String {
    if custom_domain.is_empty() {
        format!("https://{cell_id}.example.com")
    } else {
        format!("https://cell-{cell_id}.{custom_domain}")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedTo {
    pub cell_id: CellId,
    pub region: String,
    pub availability_zone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
    pub client_id: String,
    pub routed_to: RoutedTo,
    /// Hash of the client id.
    pub hash_value: u32,
    /// Virtual node position that owns the client.
    pub position: u32,
    pub url: String,
}

/// Placement of one client. Fails when no cell is active.
pub fn route_report(
    ring: &HashRing,
    client_id: &str,
    custom_domain: &str,
) -> anyhow::Result<RouteReport> {
    let Some(placement) = ring.route(client_id) else {
        bail!("no active cells available");
    };
    let cell = placement.cell;
    Ok(RouteReport {
        client_id: client_id.to_string(),
        routed_to: RoutedTo {
            cell_id: cell.cell_id.clone(),
            region: cell.region.clone(),
            availability_zone: cell.availability_zone.clone(),
        },
        hash_value: placement.client_hash.value(),
        position: placement.position.value(),
        url: cell_url(&cell.cell_id, custom_domain),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingReport<'a> {
    pub distribution: Vec<CellShare>,
    pub total_virtual_nodes: usize,
    pub ring: Vec<RingEntry<'a>>,
    pub truncated: bool,
}

pub fn ring_report(ring: &HashRing, entries: Option<usize>) -> RingReport<'_> {
    let limit = entries.unwrap_or(usize::MAX);
    RingReport {
        distribution: ring.distribution_report(),
        total_virtual_nodes: ring.len(),
        ring: ring.visualization().take(limit).collect(),
        truncated: limit < ring.len(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellsReport {
    pub cells: Vec<Cell>,
    pub count: usize,
    pub active_count: usize,
}

pub fn cells_report(mut cells: Vec<Cell>) -> CellsReport {
    cells.sort_by(|a, b| a.cell_id.cmp(&b.cell_id));
    CellsReport {
        count: cells.len(),
        active_count: cells.iter().filter(|c| c.active).count(),
        cells,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub deactivated: CellId,
    pub samples: usize,
    pub moved: usize,
    pub fraction: f64,
    pub reassignments: Vec<Reassignment>,
}

/// Sample client ids `client-000000..`, deactivate `cell_id` and report
/// which samples change cell.
pub fn diff_report(
    config: &RingConfig,
    cells: &[Cell],
    cell_id: &CellId,
    samples: usize,
) -> anyhow::Result<DiffReport> {
    if !cells.iter().any(|c| &c.cell_id == cell_id) {
        bail!("unknown cell {cell_id}");
    }

    let after: Vec<Cell> = cells
        .iter()
        .map(|c| {
            if &c.cell_id == cell_id {
                c.clone().with_active(false)
            } else {
                c.clone()
            }
        })
        .collect();

    let old = build_ring(config, cells);
    let new = build_ring(config, &after);
    let keys = (0..samples).map(|i| format!("client-{i:06}"));
    let reassignments = HashRing::diff(&old, &new, keys);

    Ok(DiffReport {
        deactivated: cell_id.clone(),
        samples,
        moved: reassignments.len(),
        fraction: if samples == 0 {
            0.0
        } else {
            reassignments.len() as f64 / samples as f64
        },
        reassignments,
    })
}

/// Reload the registry every `interval` until Ctrl-C, publishing each ring
/// through a [`SharedRing`] and logging watched clients that change cell.
pub async fn watch<R>(
    registry: &R,
    config: RingConfig,
    interval: Duration,
    client_ids: &[String],
) -> anyhow::Result<()>
where
    R: CellRegistry + ?Sized,
    R::Error: std::fmt::Display,
{
    let shared = SharedRing::new(config);
    let mut ticker = tokio::time::interval(interval);
    info!(interval_secs = interval.as_secs(), clients = client_ids.len(), "watching registry");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let previous = shared.load();
                match shared.refresh_from(registry) {
                    Ok(current) => {
                        for moved in HashRing::diff(&previous, &current, client_ids) {
                            info!(
                                client = %moved.client_key,
                                from = moved.from.as_ref().map_or("-", CellId::as_str),
                                to = moved.to.as_ref().map_or("-", CellId::as_str),
                                "client reassigned"
                            );
                        }
                        if current.is_empty() {
                            warn!("no active cells available");
                        }
                    }
                    Err(e) => warn!(error = %e, "registry scan failed, keeping previous ring"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellring::RingBuilder;

    fn snapshot() -> Vec<Cell> {
        vec![
            Cell::new("cell-2", "us-east-1", "us-east-1b"),
            Cell::new("cell-1", "us-east-1", "us-east-1a"),
            Cell::new("cell-3", "eu-west-1", "eu-west-1a").with_active(false),
        ]
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "cellring",
            "--hash",
            "xxh3",
            "--virtual-nodes",
            "32",
            "-f",
            "snapshot.json",
            "route",
            "client-1",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.ring.hash, HashAlgorithm::Xxh3);
        assert_eq!(config.ring.virtual_nodes, 32);
        assert_eq!(config.registry.path, PathBuf::from("snapshot.json"));
        assert!(matches!(cli.command, Command::Route { ref client_ids } if client_ids == &["client-1"]));
    }

    #[test]
    fn test_route_requires_client_id() {
        assert!(Cli::try_parse_from(["cellring", "route"]).is_err());
    }

    #[test]
    fn test_cell_url() {
        let id = CellId::from("7");
        assert_eq!(cell_url(&id, ""), "https://7.example.com");
        assert_eq!(cell_url(&id, "cells.example.org"), "https://cell-7.cells.example.org");
    }

    #[test]
    fn test_route_report() {
        let ring = RingBuilder::new().add_cells(snapshot()).build();
        let report = route_report(&ring, "client-1", "example.org").unwrap();
        assert_ne!(report.routed_to.cell_id.as_str(), "cell-3");
        assert_eq!(report.hash_value, ring.hash("client-1").value());
        assert!(report.url.starts_with("https://cell-cell-"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["clientId"], "client-1");
        assert!(json["routedTo"]["availabilityZone"].is_string());
    }

    #[test]
    fn test_route_report_without_cells_fails() {
        let ring = HashRing::new();
        let err = route_report(&ring, "client-1", "").unwrap_err();
        assert_eq!(err.to_string(), "no active cells available");
    }

    #[test]
    fn test_ring_report_truncates() {
        let ring = RingBuilder::new().with_virtual_nodes(10).add_cells(snapshot()).build();
        let full = ring_report(&ring, None);
        assert_eq!(full.total_virtual_nodes, 20);
        assert_eq!(full.ring.len(), 20);
        assert!(!full.truncated);
        assert_eq!(full.distribution.len(), 2);

        let short = ring_report(&ring, Some(5));
        assert_eq!(short.ring.len(), 5);
        assert!(short.truncated);
    }

    #[test]
    fn test_cells_report_sorted_with_counts() {
        let report = cells_report(snapshot());
        let ids: Vec<&str> = report.cells.iter().map(|c| c.cell_id.as_str()).collect();
        assert_eq!(ids, vec!["cell-1", "cell-2", "cell-3"]);
        assert_eq!(report.count, 3);
        assert_eq!(report.active_count, 2);
    }

    #[test]
    fn test_diff_report() {
        let cells = vec![
            Cell::new("a", "r", "z"),
            Cell::new("b", "r", "z"),
            Cell::new("c", "r", "z"),
        ];
        let report = diff_report(&RingConfig::default(), &cells, &"b".into(), 3000).unwrap();
        assert!(report.moved > 0);
        assert!(report.fraction < 0.6);
        assert!(report
            .reassignments
            .iter()
            .all(|r| r.from.as_ref().map(CellId::as_str) == Some("b")));

        assert!(diff_report(&RingConfig::default(), &cells, &"zz".into(), 10).is_err());
    }
}
