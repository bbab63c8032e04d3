use crate::types::{AssetRecord, EstateTotals};
use crate::util::is_rhel_like;
use std::collections::BTreeMap;

const MIB_PER_GIB: f64 = 1024.0;
const MIB_PER_TIB: f64 = 1_048_576.0;

/// Reduce normalized records to estate-wide totals. An empty slice yields all zeros.
pub fn aggregate(records: &[AssetRecord]) -> EstateTotals {
    let mut vcpu = 0u64;
    let mut ram_mib = 0.0;
    let mut disk_mib = 0.0;
    let mut rhel = 0usize;
    for r in records {
        vcpu += u64::from(r.vcpu_count);
        ram_mib += r.memory_mib;
        disk_mib += r.disk_mib();
        if is_rhel_like(&r.os_label) {
            rhel += 1;
        }
    }
    EstateTotals {
        vm_count: records.len() as f64,
        total_vcpu: vcpu as f64,
        total_ram_gib: ram_mib / MIB_PER_GIB,
        total_storage_tib: disk_mib / MIB_PER_TIB,
        rhel_like_count: rhel as f64,
    }
}

/// Coarse guest OS families used for the estate breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OsCategory {
    RhelLike,
    Windows,
    OtherLinux,
    Other,
}

impl OsCategory {
    pub fn classify(os_label: &str) -> OsCategory {
        if is_rhel_like(os_label) {
            return OsCategory::RhelLike;
        }
        let lower = os_label.to_lowercase();
        if lower.contains("windows") {
            OsCategory::Windows
        } else if ["linux", "centos", "ubuntu", "debian", "suse", "rocky", "alma"]
            .iter()
            .any(|k| lower.contains(k))
        {
            OsCategory::OtherLinux
        } else {
            OsCategory::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OsCategory::RhelLike => "RHEL-like",
            OsCategory::Windows => "Windows",
            OsCategory::OtherLinux => "Other Linux",
            OsCategory::Other => "Other",
        }
    }
}

/// Per-category record counts, in category order.
pub fn os_category_counts(records: &[AssetRecord]) -> BTreeMap<OsCategory, usize> {
    let mut counts: BTreeMap<OsCategory, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(OsCategory::classify(&r.os_label)).or_default() += 1;
    }
    counts
}
