pub mod histogram;
pub mod result;
pub mod runner;

pub use self::histogram::Histogram;
pub use self::result::{AggregateResult, ExhaustiveResult, ResultDocument};
pub use self::runner::{
    ExhaustiveOptimizer, NullSink, OptimizationOptions, ProgressSink, StopSignal,
};
