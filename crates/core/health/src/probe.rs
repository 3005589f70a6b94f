use std::{path::Path, sync::Arc};

use sysinfo::{Disks, System};

/// Capacity of a mounted filesystem, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub available: u64,
}

impl DiskUsage {
    /// Fraction of the filesystem in use, `None` if it reports no capacity
    pub fn used_fraction(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.total.saturating_sub(self.available) as f64 / self.total as f64)
        }
    }
}

/// Source of process and host metrics
pub trait ResourceProbe: Send + Sync {
    /// Bytes allocated on the heap by this process
    fn heap_used(&self) -> Option<u64>;

    /// Resident set size of this process
    fn resident_set(&self) -> Option<u64>;

    /// Usage of the filesystem holding `path`
    fn disk_usage(&self, path: &Path) -> Option<DiskUsage>;
}

/// Reads metrics from the running system
///
/// Nothing is cached, every call takes a fresh reading.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl ResourceProbe for SystemProbe {
    fn heap_used(&self) -> Option<u64> {
        crate::allocated_bytes()
    }

    fn resident_set(&self) -> Option<u64> {
        let pid = sysinfo::get_current_pid().ok()?;

        let mut system = System::new();
        system.refresh_process(pid);
        system.process(pid).map(|process| process.memory())
    }

    fn disk_usage(&self, path: &Path) -> Option<DiskUsage> {
        let disks = Disks::new_with_refreshed_list();

        select_mount(
            disks.list().iter().map(|disk| {
                (
                    disk.mount_point(),
                    DiskUsage {
                        total: disk.total_space(),
                        available: disk.available_space(),
                    },
                )
            }),
            path,
        )
    }
}

/// Take a reading on the blocking thread pool
///
/// A reading that panics is reported as unavailable.
pub(crate) async fn read_blocking<T, F>(probe: &Arc<dyn ResourceProbe>, read: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn ResourceProbe) -> Option<T> + Send + 'static,
{
    let probe = probe.clone();
    match tokio::task::spawn_blocking(move || read(probe.as_ref())).await {
        Ok(reading) => reading,
        Err(err) => {
            tracing::warn!("Resource reading failed: {err}");
            None
        }
    }
}

/// Pick the mount with the longest mount point containing `path`
fn select_mount<'a>(
    mounts: impl Iterator<Item = (&'a Path, DiskUsage)>,
    path: &Path,
) -> Option<DiskUsage> {
    mounts
        .filter(|(mount_point, _)| path.starts_with(mount_point))
        .max_by_key(|(mount_point, _)| mount_point.components().count())
        .map(|(_, usage)| usage)
}
