use crate::model::{clamp_percent, DiskStats, DiskStatus, DiskUsage};
use std::path::{Path, PathBuf};
use sysinfo::Disks;

pub struct DiskCollector {
    disks: Disks,
    paths: Vec<String>,
}

impl DiskCollector {
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            disks: Disks::new_with_refreshed_list(),
            paths,
        }
    }

    /// Report usage for every configured path, in configuration order.
    pub fn collect(&mut self) -> Vec<DiskUsage> {
        self.disks.refresh();

        self.paths
            .iter()
            .map(|path| DiskUsage {
                path: path.clone(),
                status: self.status_for(path),
            })
            .collect()
    }

    fn status_for(&self, path: &str) -> DiskStatus {
        let target = Path::new(path);
        if !target.exists() {
            return DiskStatus::Unavailable("path not found".to_string());
        }
        let resolved = target
            .canonicalize()
            .unwrap_or_else(|_| target.to_path_buf());

        let mounts: Vec<PathBuf> = self
            .disks
            .list()
            .iter()
            .map(|disk| disk.mount_point().to_path_buf())
            .collect();

        let Some(index) = best_mount(&resolved, &mounts) else {
            return DiskStatus::Unavailable("no mounted disk for path".to_string());
        };

        let disk = &self.disks.list()[index];
        let total = disk.total_space();
        let free = disk.available_space();
        DiskStatus::Mounted(disk_stats(total, free))
    }
}

/// Index of the mount point that contains `path` most specifically.
pub fn best_mount(path: &Path, mounts: &[PathBuf]) -> Option<usize> {
    mounts
        .iter()
        .enumerate()
        .filter(|(_, mount)| path.starts_with(mount))
        .max_by_key(|(_, mount)| mount.components().count())
        .map(|(index, _)| index)
}

pub fn disk_stats(total: u64, free: u64) -> DiskStats {
    let used = total.saturating_sub(free);
    let percent = if total == 0 {
        0.0
    } else {
        clamp_percent((used as f64 / total as f64 * 100.0) as f32)
    };

    DiskStats {
        total,
        used,
        free,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_mount_wins() {
        let mounts = vec![
            PathBuf::from("/"),
            PathBuf::from("/home"),
            PathBuf::from("/home/user/data"),
        ];
        assert_eq!(best_mount(Path::new("/home/user/data/x"), &mounts), Some(2));
        assert_eq!(best_mount(Path::new("/home/user"), &mounts), Some(1));
        assert_eq!(best_mount(Path::new("/var/log"), &mounts), Some(0));
    }

    #[test]
    fn prefix_matches_whole_components_only() {
        let mounts = vec![PathBuf::from("/home")];
        assert_eq!(best_mount(Path::new("/homework"), &mounts), None);
    }

    #[test]
    fn stats_from_total_and_free() {
        let stats = disk_stats(200, 50);
        assert_eq!(stats.used, 150);
        assert_eq!(stats.percent, 75.0);

        let empty = disk_stats(0, 0);
        assert_eq!(empty.percent, 0.0);
    }

    #[test]
    fn missing_path_is_unavailable() {
        let mut collector = DiskCollector::new(vec!["/definitely/not/a/real/path".to_string()]);
        let usage = collector.collect();
        assert_eq!(usage.len(), 1);
        assert!(matches!(usage[0].status, DiskStatus::Unavailable(_)));
    }
}
