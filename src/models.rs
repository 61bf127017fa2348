//! Configuração do Pipeline
//!
//! ## Visão Geral
//! Este módulo define as estruturas de dados para a configuração do pipeline ETL:
//! onde estão os quatro arquivos de origem, como lê-los e para onde vão as
//! tabelas do modelo estrela.
//!
//! ## Boas Práticas
//! - **Encapsulamento**: Validações de integridade ocorrem no momento da carga.
//! - **Padrões**: A seção `[temperature]` é opcional e assume os nomes de coluna
//!   do dataset público de temperaturas.

use crate::errors::{PipelineError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensões de arquivo que o leitor de origens sabe interpretar.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["parquet", "csv", "json"];

/// Configuração completa de uma execução.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,

    #[serde(default)]
    pub temperature: TemperatureConfig,
}

/// Localização dos datasets brutos.
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Diretório base ao qual os caminhos de cada origem são relativos.
    pub base_path: PathBuf,

    pub immigration: SourceSpec,
    pub temperature: SourceSpec,
    pub demographics: SourceSpec,
    pub country_codes: SourceSpec,
}

/// Um arquivo de origem.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceSpec {
    pub path: String,

    /// Separador de campos para CSV. Ignorado nos demais formatos.
    #[serde(default)]
    pub separator: Option<char>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Raiz do data lake; cada tabela vira um subdiretório.
    pub base_path: PathBuf,
}

/// Nomes das colunas usadas pelo agregador de temperatura padrão.
#[derive(Debug, Deserialize, Clone)]
pub struct TemperatureConfig {
    #[serde(default = "default_country_column")]
    pub country_column: String,

    #[serde(default = "default_value_column")]
    pub value_column: String,
}

fn default_country_column() -> String {
    "Country".to_string()
}

fn default_value_column() -> String {
    "AverageTemperature".to_string()
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            country_column: default_country_column(),
            value_column: default_value_column(),
        }
    }
}

impl SourceSpec {
    /// Extensão em minúsculas, usada para escolher o leitor.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Separador CSV como byte; vírgula quando não informado.
    pub fn separator_byte(&self) -> u8 {
        self.separator.map_or(b',', |c| c as u8)
    }
}

impl InputConfig {
    /// Resolve o caminho físico de uma origem a partir do `base_path`.
    pub fn resolve(&self, source: &SourceSpec) -> PathBuf {
        self.base_path.join(source.path.trim_start_matches('/'))
    }

    fn sources(&self) -> [(&'static str, &SourceSpec); 4] {
        [
            ("immigration", &self.immigration),
            ("temperature", &self.temperature),
            ("demographics", &self.demographics),
            ("country_codes", &self.country_codes),
        ]
    }
}

impl Config {
    /// Carrega e valida o arquivo de configuração TOML.
    ///
    /// # Erros
    /// Retorna `PipelineError::Io` se o arquivo não for encontrado ou
    /// `PipelineError::Config` se a estrutura for inválida.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Interpreta e valida uma configuração já lida.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("Erro no TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validação pós-carga (Fail-Fast).
    fn validate(&self) -> Result<()> {
        if self.input.base_path.as_os_str().is_empty() {
            return Err(PipelineError::Config("input.base_path vazio".to_string()));
        }
        if self.output.base_path.as_os_str().is_empty() {
            return Err(PipelineError::Config("output.base_path vazio".to_string()));
        }

        for (name, source) in self.input.sources() {
            if source.path.is_empty() {
                return Err(PipelineError::Config(format!("'{}' sem path", name)));
            }

            match source.extension() {
                Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => {}
                _ => {
                    return Err(PipelineError::Config(format!(
                        "'{}' com formato não suportado: {}",
                        name, source.path
                    )));
                }
            }

            if let Some(sep) = source.separator
                && !sep.is_ascii()
            {
                return Err(PipelineError::Config(format!(
                    "'{}' com separador não ASCII: {:?}",
                    name, sep
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [input]
        base_path = "data/raw"

        [input.immigration]
        path = "immigration.parquet"

        [input.temperature]
        path = "GlobalLandTemperaturesByCity.csv"

        [input.demographics]
        path = "us-cities-demographics.csv"
        separator = ";"

        [input.country_codes]
        path = "/i94res.csv"

        [output]
        base_path = "data/lake"
    "#;

    #[test]
    fn loads_sample_with_defaults() {
        let config = Config::from_toml(SAMPLE).unwrap();

        assert_eq!(config.input.demographics.separator_byte(), b';');
        assert_eq!(config.input.immigration.separator_byte(), b',');
        assert_eq!(config.temperature.country_column, "Country");
        assert_eq!(config.temperature.value_column, "AverageTemperature");
        assert_eq!(
            config.input.resolve(&config.input.country_codes),
            PathBuf::from("data/raw/i94res.csv")
        );
    }

    #[test]
    fn rejects_unknown_format() {
        let broken = SAMPLE.replace("immigration.parquet", "immigration.sas7bdat");
        let err = Config::from_toml(&broken).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn rejects_non_ascii_separator() {
        let broken = SAMPLE.replace("separator = \";\"", "separator = \"§\"");
        assert!(Config::from_toml(&broken).is_err());
    }

    #[test]
    fn rejects_missing_section() {
        let broken = SAMPLE.replace("[output]\n        base_path = \"data/lake\"", "");
        assert!(matches!(
            Config::from_toml(&broken),
            Err(PipelineError::Config(_))
        ));
    }
}
