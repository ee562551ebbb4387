//! # Leakcut Oracle
//!
//! Turns one leak set into one Tamarin run and a verdict.
//!
//! ## Evaluation
//!
//! ```text
//! LeakSet
//!     │
//!     ├──> ArtifactWriter
//!     │      ├─ leaks/<Stem>.spthy (rule fragments, catalog order)
//!     │      └─ main.spthy: #include + theory name rewritten
//!     │
//!     ├──> VerifierRunner (child process, timeout, partial output kept)
//!     │
//!     ├──> AuditTrail (results/stdout|stderr/<lemma>/<Stem>.*)
//!     │
//!     └──> VerdictParser ──> Falsified | Verified | Inconclusive
//! ```
//!
//! Inconclusive results (timeout, missing prover, unreadable output, artifact failure)
//! are logged, recorded on the oracle and answered as "not falsified".

mod artifact;
mod audit;
mod catalog;
mod config;
mod error;
mod oracle;
mod runner;
mod verdict;

pub use artifact::{Artifact, ArtifactWriter};
pub use audit::AuditTrail;
pub use catalog::{LeakCatalog, LeakRule};
pub use config::{PathsConfig, ProverConfig};
pub use error::{OracleError, Result};
pub use oracle::{InconclusiveEvaluation, OracleStats, TamarinOracle};
pub use runner::{ProverRun, RunStatus, VerifierRunner};
pub use verdict::{Verdict, VerdictParser};
