/// Result type for fallible engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the placement engine and board ingestion
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No start cell can reach any end cell on the base grid
    #[error("grid has no route from start to end")]
    NoRoute,
    /// Base grids may only carry fixed tiles; kinds 3 and 4 belong to the engine
    #[error("base grid already contains a placed tile at ({row}, {col})")]
    PlacedTileInBase { row: usize, col: usize },
    #[error("invalid cell code: {0}")]
    InvalidCellCode(i64),
    #[error("unknown cell character: {0:?}")]
    UnknownCellChar(char),
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid has no cells")]
    EmptyGrid,
    #[error("tower at x={x}, y={y} does not fit on the board")]
    TowerOutOfBounds { x: i64, y: i64 },
    #[error("{0} area has no coordinates")]
    EmptyArea(&'static str),
    #[error("claps ({claps}) exceed towers ({towers})")]
    ClapsExceedTowers { towers: usize, claps: usize },
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),
}
