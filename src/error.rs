use thiserror::Error;

/// Failure taxonomy of the evaluation pipeline.
///
/// Configuration errors surface before any store access; lookup and data
/// errors abort the run with the offending descriptor attached.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The typed descriptor resolved to nothing in the live catalog.
    #[error("no ranking table named '{name}' in the catalog")]
    NoSuchTable { name: String },

    /// More than one catalog entry matched; never picked silently.
    #[error("table name '{name}' is ambiguous in the catalog: {matches:?}")]
    AmbiguousTable { name: String, matches: Vec<String> },

    /// Schema drift between this pipeline and the upstream tables.
    #[error("table '{table}' is missing expected column '{column}'")]
    ColumnMismatch { table: String, column: String },

    /// The player key triple must be a de facto primary key of each input.
    #[error("duplicate player key (id {player_id}) in table '{table}'")]
    DuplicatePlayer { table: String, player_id: i64 },

    #[error("partition index {part} outside 1..={partitions}")]
    PartitionOutOfRange { part: u32, partitions: u32 },

    #[error("a partition scope needs at least 2 partitions, got {partitions}")]
    TooFewPartitions { partitions: u32 },

    #[error("multi-season pooling cannot be combined with season partitioning")]
    MultipleWithPartitions,

    #[error("playoff tables are not partitioned; max_partitions must be 1")]
    PlayoffsWithPartitions,

    #[error("column lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}
