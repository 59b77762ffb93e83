use clap::Parser;

use creditlens::cli::{self, Cli, Commands, ExportCommands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summary { file, filters } => cli::report::summary(&file, &filters),
        Commands::Breakdown {
            file,
            by,
            top,
            filters,
        } => cli::report::breakdown(&file, by, top, &filters),
        Commands::Trends { file, filters } => cli::report::trends(&file, &filters),
        Commands::Values { file } => cli::report::values(&file),
        Commands::Export { command } => match command {
            ExportCommands::Csv {
                file,
                output,
                filters,
            } => cli::export::csv(&file, output, &filters),
            ExportCommands::Report {
                file,
                output,
                filters,
            } => cli::export::report(&file, output, &filters),
        },
        Commands::Config {
            export_dir,
            csv_prefix,
            report_prefix,
        } => cli::config::run(export_dir, csv_prefix, report_prefix),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
