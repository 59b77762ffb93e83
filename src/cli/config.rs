use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(
    export_dir: Option<String>,
    csv_prefix: Option<String>,
    report_prefix: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();
    let changed = export_dir.is_some() || csv_prefix.is_some() || report_prefix.is_some();

    if let Some(dir) = export_dir {
        settings.export_dir = shellexpand_path(&dir);
    }
    if let Some(prefix) = csv_prefix {
        settings.csv_prefix = prefix;
    }
    if let Some(prefix) = report_prefix {
        settings.report_prefix = prefix;
    }

    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    println!("Export dir:     {}", settings.export_dir);
    println!("CSV prefix:     {}", settings.csv_prefix);
    println!("Report prefix:  {}", settings.report_prefix);
    Ok(())
}
