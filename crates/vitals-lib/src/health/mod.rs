//! Host health reporting
//!
//! Produces a point-in-time health report: resource metrics gathered from
//! the host, per-resource threshold statuses, and an overall UP/DOWN verdict.
//! Reports are recomputed on every call; nothing is cached between requests.

pub mod format;
pub mod probe;

pub use format::{format_bytes, format_load_average, format_percent, format_uptime};
pub use probe::{CpuInfo, DiskInfo, MemoryInfo, OsInfo, ProbeError, RuntimeInfo};

use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Service identifier carried in every health payload
pub const SERVICE_NAME: &str = "vitals";

/// Memory usage at or above this percentage marks the memory resource critical
pub(crate) const MEMORY_THRESHOLD_PERCENT: f64 = 90.0;
/// Disk usage at or above this percentage marks the disk resource critical
pub(crate) const DISK_THRESHOLD_PERCENT: f64 = 95.0;

/// Threshold status of a single resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Usage is below the resource's threshold
    Healthy,
    /// Usage has reached the resource's threshold
    Critical,
}

/// Overall service verdict derived from the resource statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Up,
    Down,
}

impl ServiceStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, ServiceStatus::Up)
    }
}

/// The `system` block of a health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemReport {
    pub memory: MemoryInfo,
    pub runtime: RuntimeInfo,
    pub os: OsInfo,
    pub cpu: CpuInfo,
    pub disk: DiskInfo,
}

/// A complete health report as served at `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub service: String,
    pub timestamp: String,
    pub status: ServiceStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    fn from_system(system: SystemReport) -> Self {
        let status = overall_status(&system.memory, &system.disk);
        let message = if status.is_up() {
            "Service is running successfully"
        } else {
            "Service is experiencing issues"
        };

        Self {
            service: SERVICE_NAME.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            status,
            message: message.to_string(),
            system: Some(system),
            error: None,
        }
    }

    fn from_probe_error(err: ProbeError) -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            status: ServiceStatus::Down,
            message: "Health check failed".to_string(),
            system: None,
            error: Some(err.to_string()),
        }
    }
}

/// Derive the overall verdict from the memory and disk statuses.
///
/// UP requires both resources healthy; a disk block without a status (zero
/// total space) can never count as healthy.
pub fn overall_status(memory: &MemoryInfo, disk: &DiskInfo) -> ServiceStatus {
    let memory_healthy = memory.status == ResourceStatus::Healthy;
    let disk_healthy = disk.status == Some(ResourceStatus::Healthy);

    if memory_healthy && disk_healthy {
        ServiceStatus::Up
    } else {
        ServiceStatus::Down
    }
}

/// Produces health reports on demand.
///
/// Holds only the process start instant; every `report()` call is a fresh
/// read of host state, so a single reporter is safe to share across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    started: Instant,
}

impl Default for HealthReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthReporter {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since the reporter was constructed
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Produce a fresh health report.
    ///
    /// Never fails to the caller: a probe error is converted into a DOWN
    /// report carrying the error text, with the `system` block omitted.
    pub fn report(&self) -> HealthReport {
        match self.try_report() {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(error = %err, "Health probe failed");
                HealthReport::from_probe_error(err)
            }
        }
    }

    fn try_report(&self) -> Result<HealthReport, ProbeError> {
        let system = SystemReport {
            memory: probe::memory_info()?,
            runtime: probe::runtime_info(self.uptime()),
            os: probe::os_info(),
            cpu: probe::cpu_info(),
            disk: probe::disk_info()?,
        };

        Ok(HealthReport::from_system(system))
    }
}
