//! # Definição de Erros do Pipeline
//!
//! Este módulo centraliza as falhas possíveis durante a carga, transformação
//! e escrita das tabelas do modelo estrela.
//!
//! # Error Handling Strategy
//! - **Tipagem:** Enum para tratamento exaustivo.
//! - **Extensibilidade:** Marcado como `non_exhaustive` para permitir evolução sem quebra de contrato.
//! - As implementações de traits ficam em `impl_errors`.

/// Enumeração central de falhas do pipeline.
#[derive(Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// Falhas no sistema de arquivos (permissão, disco cheio, arquivo inexistente).
    Io(std::io::Error),

    /// Falha ao serializar o relatório de qualidade.
    Json(serde_json::Error),

    /// Erros originados na engine (leitura, join, escrita Parquet).
    Polars(polars::error::PolarsError),

    /// Arquivo de configuração ausente, malformado ou inconsistente.
    Config(String),

    /// Violações de formato nos dados de entrada (ex: coluna obrigatória ausente).
    Schema(String),

    /// Grafo de etapas inválido (dependência desconhecida, nome repetido, ciclo).
    Dag(String),
}

/// Atalho usado por todos os módulos da crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
