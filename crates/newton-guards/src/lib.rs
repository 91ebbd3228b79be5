pub mod cases;
pub mod driver;
pub mod error;
pub mod params;
pub mod problem;
pub mod record;

pub use cases::{builtin_cases, find_case, Case, RunSeed};
pub use driver::{run, GuardedRun, RunState};
pub use error::{GuardError, GuardEvent};
pub use params::{ParamError, RunParams, DEFAULT_MAX_ITER};
pub use problem::{Evaluation, ProblemSpec, ScalarProblem, MAX_POWER};
pub use record::{IterationRecord, ReportSet, RunReport};
