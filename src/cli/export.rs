use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::cli::{load_session, status_line, FilterArgs};
use crate::error::Result;
use crate::export::{export_filename, to_delimited_text, to_summary_report, write_export};
use crate::settings::{load_settings, shellexpand_path};

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn default_path(export_dir: &str, prefix: &str, ext: &str) -> PathBuf {
    PathBuf::from(shellexpand_path(export_dir)).join(export_filename(prefix, today(), ext))
}

pub fn csv(file: &Path, output: Option<PathBuf>, filters: &FilterArgs) -> Result<()> {
    let session = load_session(file, filters)?;
    println!("{}", status_line(&session));
    let text = to_delimited_text(session.active())?;
    let settings = load_settings();
    let path = output
        .unwrap_or_else(|| default_path(&settings.export_dir, &settings.csv_prefix, "csv"));
    let written = write_export(&path, &text)?;
    println!(
        "Exported {} records to {}",
        session.active().len(),
        written.display()
    );
    Ok(())
}

pub fn report(file: &Path, output: Option<PathBuf>, filters: &FilterArgs) -> Result<()> {
    let session = load_session(file, filters)?;
    println!("{}", status_line(&session));
    let text = to_summary_report(session.active(), today())?;
    let settings = load_settings();
    let path = output
        .unwrap_or_else(|| default_path(&settings.export_dir, &settings.report_prefix, "txt"));
    let written = write_export(&path, &text)?;
    println!("Summary report written to {}", written.display());
    Ok(())
}
