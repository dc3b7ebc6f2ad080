mod problem;
mod radiation;
mod simplex;
mod solution;

pub use problem::{
    Constraint, LinearExpression, Model, ModelError, Objective, Relation, Sense, VarId, Variable,
};
pub use radiation::{BeamModel, radiation_therapy};
pub use simplex::{PivotRule, SolveError, Solver, solve};
pub use solution::{ConstraintViolation, Solution, SolutionStatus};
