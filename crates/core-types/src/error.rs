use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown database backend '{0}' (expected sqlite, mysql, postgres or mssql)")]
    UnknownBackend(String),
}
