//! # Immigration Star-Schema ETL
//!
//! ## Visão Geral
//! Transforma registros brutos de imigração, temperatura, demografia e códigos
//! de país em um modelo estrela (uma tabela fato e quatro dimensões) gravado
//! em Parquet, usando Polars como engine.
//!
//! ## Princípios de Engenharia
//! - **Etapas explícitas**: a ordem de execução vem de um grafo de dependências.
//! - **Chaves reprodutíveis**: ids substitutos derivam de uma ordem fixa.
//! - **Overwrite**: cada execução reescreve todas as tabelas.

pub mod dates;
pub mod errors;
mod impl_errors;
pub mod models;
pub mod pipeline;
pub mod quality;
pub mod storage;
pub mod tables;
pub mod temperature;

pub use errors::{PipelineError, Result};
pub use models::Config;
pub use pipeline::{Pipeline, PipelineContext, Sources, run_from_config, run_star_schema, star_schema};
pub use quality::{QualityReport, data_quality_check};
pub use storage::TableStore;
