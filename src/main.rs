//! # Immigration Star-Schema ETL
//!
//! Ponto de entrada: carrega a configuração TOML, executa as cinco etapas e
//! resume as verificações de qualidade.

use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use immigration_etl::{Config, run_from_config};

#[derive(Debug, Parser)]
#[command(version, about = "Gera o modelo estrela de imigração em Parquet")]
struct Cli {
    /// Arquivo de configuração TOML.
    #[arg(default_value = "pipeline.toml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let global_timer = Instant::now();

    info!("--- INICIANDO ETL PIPELINE ---");

    let config = match Config::load_from_file(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!(
                "Erro na carga de configuração '{}': {}",
                cli.config.display(),
                e
            );
            process::exit(1);
        }
    };

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let reports = run_from_config(&config, &pb)?;

    let failed = reports.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        warn!("{} tabela(s) sem registros", failed);
    }

    info!("==========================================");
    info!("Modelo estrela gravado em {}", config.output.base_path.display());
    info!("Tempo de execução: {:.2?}", global_timer.elapsed());
    info!("==========================================");

    Ok(())
}
