use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// YAML file listing the facility source tables in priority order.
    pub sources_path: PathBuf,
    /// Optional area classifier table; without it every query is unclassified.
    pub areas_path: Option<PathBuf>,
    /// Optional address lookup table used to turn addresses into coordinates.
    pub gazetteer_path: Option<PathBuf>,
    pub default_k: usize,
    pub min_separation_miles: f64,
}
