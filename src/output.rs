use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    log::debug!("wrote {} row(s) to {}", rows.len(), path.as_ref().display());
    Ok(())
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path.as_ref(), s)?;
    log::debug!("wrote {}", path.as_ref().display());
    Ok(())
}

/// Markdown rendering of `rows`, or a placeholder when there are none.
pub fn render_table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn print_table<T>(title: &str, rows: &[T])
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    println!("{}\n", render_table(rows));
}
