//! Seatplan Solver Engine
//!
//! This crate turns a seating problem into an assignment:
//! - Group distributor for cold starts and import previews
//! - Local search optimizer (moves, acceptors, termination conditions)
//! - Multi-seed fan-out over rayon
//! - Background jobs with cancellation and progress streaming
//! - One-slot snapshot for "Reset" after an optimizer run

pub mod acceptor;
pub mod budget;
pub mod builder;
pub mod distributor;
pub mod manager;
pub mod moves;
pub mod optimizer;
pub mod parallel;
pub mod scope;
pub mod snapshot;
pub mod stats;
pub mod termination;

pub use acceptor::{
    Acceptor, HillClimbingAcceptor, LateAcceptanceAcceptor, SimulatedAnnealingAcceptor,
};
pub use budget::OptimizationBudget;
pub use builder::AcceptorBuilder;
pub use distributor::{
    distribute, distribute_tables, distribute_with_capacities, Distribution,
    DistributionStrategy, ParseStrategyError,
};
pub use manager::{OptimizationHandle, SolverManager, SolverStatus};
pub use moves::{MoveSelector, SeatMove};
pub use optimizer::{optimize, BestSolutionEvent, OptimizationResult, Optimizer};
pub use parallel::optimize_parallel;
pub use scope::SolverScope;
pub use snapshot::{SeatingSession, SnapshotHandle, SnapshotManager};
pub use stats::{OptimizationStatistics, SolverStats};
pub use termination::{
    ExternalTermination, OrTermination, StepCountTermination, Termination, TerminationReason,
    TimeTermination, UnimprovedStepCountTermination,
};
