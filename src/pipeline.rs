//! # Orquestração das Etapas
//!
//! ## Visão Geral
//! O pipeline é um grafo de etapas nomeadas com dependências declaradas. O
//! agendador calcula uma ordem topológica (empates resolvidos pela ordem de
//! declaração) e executa cada etapa uma única vez, seguida da verificação de
//! qualidade da tabela produzida.
//!
//! ## Princípios
//! - **Injeção explícita**: cada etapa recebe o [`PipelineContext`]; não há sessão global.
//! - **Fail-Fast**: a primeira etapa com erro aborta a execução.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::time::Instant;

use indicatif::ProgressBar;
use log::{debug, info};
use polars::prelude::DataFrame;

use crate::errors::{PipelineError, Result};
use crate::models::Config;
use crate::quality::{QualityReport, data_quality_check};
use crate::storage::{TableStore, read_source};
use crate::tables::{
    ARRIVALS_TABLE, COUNTRY_TABLE, DEMOGRAPHICS_TABLE, FACT_TABLE, VISA_TYPE_TABLE,
    build_arrivals_dimension, build_country_dimension, build_demographics_dimension,
    build_immigration_fact, build_visa_type_dimension,
};
use crate::temperature::{MeanByCountry, TemperatureAggregator};

/// Nome do resumo de qualidade gravado na raiz do data lake.
pub const QUALITY_REPORT_FILE: &str = "quality_report.json";

/// Datasets brutos de uma execução.
pub struct Sources {
    pub immigration: DataFrame,
    pub temperature: DataFrame,
    pub demographics: DataFrame,
    pub country_codes: DataFrame,
}

impl Sources {
    pub fn load(config: &Config) -> Result<Self> {
        let input = &config.input;
        Ok(Self {
            immigration: read_source(&input.resolve(&input.immigration), &input.immigration)?,
            temperature: read_source(&input.resolve(&input.temperature), &input.temperature)?,
            demographics: read_source(&input.resolve(&input.demographics), &input.demographics)?,
            country_codes: read_source(
                &input.resolve(&input.country_codes),
                &input.country_codes,
            )?,
        })
    }
}

/// Tudo o que uma etapa pode consultar.
pub struct PipelineContext {
    pub sources: Sources,
    pub store: TableStore,
    pub aggregator: Box<dyn TemperatureAggregator>,
}

type StageFn = Box<dyn Fn(&PipelineContext) -> Result<DataFrame>>;

/// Etapa nomeada; o nome é também o da tabela verificada ao final.
pub struct Stage {
    name: &'static str,
    depends_on: Vec<&'static str>,
    run: StageFn,
}

#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declara uma etapa e suas dependências.
    pub fn stage<F>(mut self, name: &'static str, depends_on: &[&'static str], run: F) -> Self
    where
        F: Fn(&PipelineContext) -> Result<DataFrame> + 'static,
    {
        self.stages.push(Stage {
            name,
            depends_on: depends_on.to_vec(),
            run: Box::new(run),
        });
        self
    }

    /// Ordem topológica das etapas.
    ///
    /// # Erros
    /// `PipelineError::Dag` para nome repetido, dependência desconhecida ou ciclo.
    pub fn execution_order(&self) -> Result<Vec<&'static str>> {
        let mut declared = HashSet::new();
        for stage in &self.stages {
            if !declared.insert(stage.name) {
                return Err(PipelineError::Dag(format!(
                    "etapa '{}' declarada mais de uma vez",
                    stage.name
                )));
            }
        }

        for stage in &self.stages {
            if let Some(missing) = stage.depends_on.iter().find(|d| !declared.contains(*d)) {
                return Err(PipelineError::Dag(format!(
                    "etapa '{}' depende de '{}', que não existe",
                    stage.name, missing
                )));
            }
        }

        let mut done: HashSet<&'static str> = HashSet::new();
        let mut order = Vec::with_capacity(self.stages.len());

        while order.len() < self.stages.len() {
            let next = self.stages.iter().find(|stage| {
                !done.contains(stage.name) && stage.depends_on.iter().all(|d| done.contains(d))
            });

            match next {
                Some(stage) => {
                    done.insert(stage.name);
                    order.push(stage.name);
                }
                None => {
                    let pending: Vec<&str> = self
                        .stages
                        .iter()
                        .map(|s| s.name)
                        .filter(|name| !done.contains(name))
                        .collect();
                    return Err(PipelineError::Dag(format!(
                        "ciclo entre as etapas: {}",
                        pending.join(", ")
                    )));
                }
            }
        }

        Ok(order)
    }

    /// Executa todas as etapas em ordem topológica.
    ///
    /// Retorna os relatórios de qualidade na ordem de execução.
    pub fn run(&self, ctx: &PipelineContext, progress: &ProgressBar) -> Result<Vec<QualityReport>> {
        let order = self.execution_order()?;
        debug!("Ordem de execução: {:?}", order);

        progress.set_length(order.len() as u64);
        let mut reports = Vec::with_capacity(order.len());

        for name in order {
            let Some(stage) = self.stages.iter().find(|s| s.name == name) else {
                continue;
            };

            progress.set_message(name);
            let step_timer = Instant::now();

            let df = (stage.run)(ctx)?;
            reports.push(data_quality_check(&df, name));

            info!("Etapa {} concluída ({:.2?})", name, step_timer.elapsed());
            progress.inc(1);
        }

        progress.finish_with_message("Modelo estrela gravado");
        Ok(reports)
    }
}

/// As cinco etapas do modelo estrela.
///
/// A fato relê `visatype` do data lake, por isso depende dessa etapa.
pub fn star_schema() -> Pipeline {
    Pipeline::new()
        .stage(VISA_TYPE_TABLE, &[], |ctx| {
            build_visa_type_dimension(&ctx.sources.immigration, &ctx.store)
        })
        .stage(FACT_TABLE, &[VISA_TYPE_TABLE], |ctx| {
            build_immigration_fact(&ctx.sources.immigration, &ctx.store)
        })
        .stage(ARRIVALS_TABLE, &[], |ctx| {
            build_arrivals_dimension(&ctx.sources.immigration, &ctx.store)
        })
        .stage(DEMOGRAPHICS_TABLE, &[], |ctx| {
            build_demographics_dimension(&ctx.sources.demographics, &ctx.store)
        })
        .stage(COUNTRY_TABLE, &[], |ctx| {
            build_country_dimension(
                &ctx.sources.immigration,
                &ctx.sources.country_codes,
                &ctx.sources.temperature,
                ctx.aggregator.as_ref(),
                &ctx.store,
            )
        })
}

/// Executa o modelo estrela completo e grava o resumo de qualidade.
pub fn run_star_schema(ctx: &PipelineContext, progress: &ProgressBar) -> Result<Vec<QualityReport>> {
    let reports = star_schema().run(ctx, progress)?;
    write_quality_report(&ctx.store, &reports)?;
    Ok(reports)
}

/// Carrega as origens descritas na configuração e executa o pipeline.
pub fn run_from_config(config: &Config, progress: &ProgressBar) -> Result<Vec<QualityReport>> {
    let load_timer = Instant::now();
    let sources = Sources::load(config)?;
    info!(
        "Origens carregadas ({:.2?}): {} registros de imigração",
        load_timer.elapsed(),
        sources.immigration.height()
    );

    let ctx = PipelineContext {
        sources,
        store: TableStore::new(&config.output.base_path),
        aggregator: Box::new(MeanByCountry::from(&config.temperature)),
    };

    run_star_schema(&ctx, progress)
}

fn write_quality_report(store: &TableStore, reports: &[QualityReport]) -> Result<()> {
    fs::create_dir_all(store.root())?;
    let file = File::create(store.root().join(QUALITY_REPORT_FILE))?;
    serde_json::to_writer_pretty(BufWriter::new(file), reports)?;
    Ok(())
}
