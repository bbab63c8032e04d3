use crate::error::Result;
use crate::schema::{clean_header, resolve_columns, ColumnMap};
use crate::types::{AssetRecord, CanonicalField};
use crate::util::{is_coerced, normalize_quantity};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    /// Numeric cells replaced with zero during normalization.
    pub coerced_cells: usize,
    pub columns: ColumnMap,
}

pub fn load_inventory<P: AsRef<Path>>(path: P) -> Result<(Vec<AssetRecord>, LoadReport)> {
    let path = path.as_ref();
    log::info!("loading inventory from {}", path.display());
    let file = std::fs::File::open(path)?;
    load_inventory_from_reader(file)
}

pub fn load_inventory_from_reader<R: Read>(input: R) -> Result<(Vec<AssetRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| clean_header(h).to_string())
        .collect();
    let columns = resolve_columns(&headers)?;

    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut coerced_cells = 0usize;
    let mut records: Vec<AssetRecord> = Vec::new();

    for result in rdr.records() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping unreadable row {}: {}", total_rows, e);
                skipped_rows += 1;
                continue;
            }
        };
        let (record, coerced) = normalize_row(&row, &columns);
        if coerced > 0 {
            log::debug!("row {} ('{}'): {} cell(s) coerced to zero", total_rows, record.name, coerced);
        }
        coerced_cells += coerced;
        records.push(record);
    }

    if coerced_cells > 0 {
        log::warn!("{} numeric cell(s) could not be parsed and were treated as zero", coerced_cells);
    }
    log::info!("loaded {} of {} inventory rows", records.len(), total_rows);

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        skipped_rows,
        coerced_cells,
        columns,
    };
    Ok((records, report))
}

/// Build one record from a raw row; returns it with the number of coerced cells.
fn normalize_row(row: &StringRecord, columns: &ColumnMap) -> (AssetRecord, usize) {
    let cell = |field: CanonicalField| columns.index(field).map(|idx| row.get(idx).unwrap_or(""));
    let mut coerced = 0usize;
    let mut quantity = |raw: &str, required: bool| -> f64 {
        if is_coerced(raw, required) {
            coerced += 1;
        }
        normalize_quantity(raw)
    };

    let cpus_raw = cell(CanonicalField::Cpus).unwrap_or("");
    let vcpu_count = quantity(cpus_raw, true).round().min(u32::MAX as f64) as u32;
    let memory_mib = quantity(cell(CanonicalField::Memory).unwrap_or(""), true);
    let disk_capacity_mib = match cell(CanonicalField::Disk) {
        Some(raw) if !raw.trim().is_empty() => Some(quantity(raw, false)),
        _ => None,
    };

    let record = AssetRecord {
        name: cell(CanonicalField::Vm).unwrap_or("").trim().to_string(),
        vcpu_count,
        memory_mib,
        os_label: cell(CanonicalField::Os).unwrap_or("").trim().to_string(),
        disk_capacity_mib,
    };
    (record, coerced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    const VINFO: &str = "\
VM,Powerstate,CPUs,Memory,OS according to the configuration file,Total disk capacity MiB
VM-PROD-1000,poweredOn,8,\"16,384\",Red Hat Enterprise Linux 8 (64-bit),\"102,400\"
VM-DEV-1001,poweredOn,4,\"8,192\",CentOS 7 (64-bit),
VM-DB-1002,poweredOff,abc,\"4,096\",Microsoft Windows Server 2019 (64-bit),51200
";

    #[test]
    fn loads_and_normalizes_rows() {
        let (records, report) = load_inventory_from_reader(VINFO.as_bytes()).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded_rows, 3);
        assert_eq!(report.skipped_rows, 0);
        assert_eq!(report.coerced_cells, 1);

        assert_eq!(records[0].name, "VM-PROD-1000");
        assert_eq!(records[0].vcpu_count, 8);
        assert_eq!(records[0].memory_mib, 16384.0);
        assert_eq!(records[0].disk_capacity_mib, Some(102400.0));
        assert_eq!(records[1].disk_capacity_mib, None);
        assert_eq!(records[2].vcpu_count, 0);
        assert_eq!(records[2].disk_mib(), 51200.0);
    }

    #[test]
    fn short_rows_are_padded_with_blanks() {
        let csv = "VM,CPUs,Memory,OS\nvm-a,2\n";
        let (records, report) = load_inventory_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].memory_mib, 0.0);
        assert_eq!(records[0].os_label, "");
        // Blank Memory is a required value gone missing.
        assert_eq!(report.coerced_cells, 1);
    }

    #[test]
    fn header_only_file_is_an_empty_estate() {
        let csv = "VM,CPUs,Memory,OS\n";
        let (records, report) = load_inventory_from_reader(csv.as_bytes()).unwrap();
        assert!(records.is_empty());
        assert_eq!(report.total_rows, 0);
    }

    #[test]
    fn unresolvable_header_fails_the_load() {
        let csv = "Name,Cores,RAM\nvm-a,2,1024\n";
        let err = load_inventory_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::MissingColumn { .. }));
    }
}
