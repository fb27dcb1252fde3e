//! Point-in-time metric probes
//!
//! Each probe reads one category of host or process state and builds the
//! typed block that ends up under `system` in the health report. Probes that
//! touch the host are split from pure `from_raw` constructors so threshold
//! and formatting logic stays testable without the host.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sysinfo::{Disks, System};
use thiserror::Error;

use super::format::{format_bytes, format_load_average, format_percent, format_uptime};
use super::{ResourceStatus, DISK_THRESHOLD_PERCENT, MEMORY_THRESHOLD_PERCENT};

/// A host read that could not produce a usable figure
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("memory statistics unavailable")]
    MemoryUnavailable,
    #[error("no filesystem found for disk statistics")]
    NoFilesystem,
}

/// Memory block of the health report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub max: String,
    pub total: String,
    pub free: String,
    pub used: String,
    pub usage_percent: String,
    pub status: ResourceStatus,
}

impl MemoryInfo {
    /// Build the block from raw byte figures. `total` must be non-zero.
    pub fn from_raw(max: u64, total: u64, free: u64) -> Self {
        let used = total.saturating_sub(free);
        let usage_percent = used as f64 * 100.0 / total as f64;
        let status = if usage_percent < MEMORY_THRESHOLD_PERCENT {
            ResourceStatus::Healthy
        } else {
            ResourceStatus::Critical
        };

        Self {
            max: format_bytes(max),
            total: format_bytes(total),
            free: format_bytes(free),
            used: format_bytes(used),
            usage_percent: format_percent(usage_percent),
            status,
        }
    }
}

/// Runtime block of the health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub uptime: String,
}

/// OS block of the health report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    pub name: String,
    pub version: String,
    pub architecture: String,
    pub system_load_average: String,
}

/// CPU block of the health report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub available_processors: usize,
}

/// Disk block of the health report
///
/// `usage_percent` and `status` are absent when the filesystem reports zero
/// total space, which in turn keeps the overall status from reaching UP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    pub total: String,
    pub free: String,
    pub usable: String,
    pub used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResourceStatus>,
}

impl DiskInfo {
    /// Build the block from raw byte figures
    pub fn from_raw(total: u64, free: u64, usable: u64) -> Self {
        let used = total.saturating_sub(free);
        let (usage_percent, status) = if total > 0 {
            let percent = used as f64 * 100.0 / total as f64;
            let status = if percent < DISK_THRESHOLD_PERCENT {
                ResourceStatus::Healthy
            } else {
                ResourceStatus::Critical
            };
            (Some(format_percent(percent)), Some(status))
        } else {
            (None, None)
        };

        Self {
            total: format_bytes(total),
            free: format_bytes(free),
            usable: format_bytes(usable),
            used: format_bytes(used),
            usage_percent,
            status,
        }
    }
}

/// Read physical memory figures from the host.
///
/// `max` and `total` both report total physical memory (a Rust process has
/// no separate heap cap); `free` is the available figure.
pub fn memory_info() -> Result<MemoryInfo, ProbeError> {
    let mut sys = System::new();
    sys.refresh_memory();

    let total = sys.total_memory();
    if total == 0 {
        return Err(ProbeError::MemoryUnavailable);
    }

    Ok(MemoryInfo::from_raw(total, total, sys.available_memory()))
}

/// Describe the execution runtime and format the process uptime
pub fn runtime_info(uptime: Duration) -> RuntimeInfo {
    RuntimeInfo {
        name: "rust".to_string(),
        vendor: "rust-lang.org".to_string(),
        version: env!("CARGO_PKG_RUST_VERSION").to_string(),
        uptime: format_uptime(uptime.as_millis() as u64),
    }
}

/// Read OS identity and the one-minute load average
pub fn os_info() -> OsInfo {
    OsInfo {
        name: System::name().unwrap_or_else(|| "unknown".to_string()),
        version: System::os_version().unwrap_or_else(|| "unknown".to_string()),
        architecture: std::env::consts::ARCH.to_string(),
        system_load_average: format_load_average(System::load_average().one),
    }
}

/// Count logical processors available to this process
pub fn cpu_info() -> CpuInfo {
    CpuInfo {
        available_processors: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
    }
}

/// Read space figures for the root filesystem.
///
/// Falls back to the first listed disk when no mount point is exactly `/`
/// (non-Unix hosts). sysinfo exposes a single availability figure, so the
/// `free` and `usable` fields carry the same value.
pub fn disk_info() -> Result<DiskInfo, ProbeError> {
    let disks = Disks::new_with_refreshed_list();
    let root = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.list().first())
        .ok_or(ProbeError::NoFilesystem)?;

    let total = root.total_space();
    let available = root.available_space();

    Ok(DiskInfo::from_raw(total, available, available))
}
