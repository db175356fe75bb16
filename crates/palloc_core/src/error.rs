//! Error taxonomy shared by the core library and the CLI front-end.
//!
//! Four buckets, matching how failures are actually handled: bad input never
//! reaches the simulator, solver failures are a modeling bug (the formulation
//! always admits the trivial all-unassigned solution), invariant violations are
//! a core bug, and I/O failures are the environment's fault.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PallocError {
    #[error("invalid input: {0}")]
    Input(String),

    #[error(
        "solver returned status {status:?} for a batch of {request_count} requests; the \
         all-unassigned solution is always feasible, so this points at a modeling bug"
    )]
    Solver {
        status: String,
        request_count: usize,
    },

    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type PallocResult<T> = Result<T, PallocError>;
