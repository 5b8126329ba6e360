use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Too many waypoints: {given} destinations given, at most {max} allowed")]
    TooManyWaypoints { given: usize, max: usize },
    #[error("No route connects the given points")]
    NoFeasibleRoute,
    #[error("No nearby points found for snapping")]
    NoPointsFound,
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Whether the error was caused by the caller's request rather than
    /// by the graph or the process.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::TooManyWaypoints { .. }
        )
    }
}
