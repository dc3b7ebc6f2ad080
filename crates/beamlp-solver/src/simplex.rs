use thiserror::Error;

use crate::problem::{LinearExpression, Model, ModelError, Relation, Sense};
use crate::solution::Solution;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Solver tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
}

/// Rule for choosing the entering column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotRule {
    /// Lowest-index improving column. Never cycles.
    #[default]
    Bland,
    /// Largest reduced cost, ties to the lowest index
    Dantzig,
}

/// Simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots across both phases before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    pivot_rule: PivotRule,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            pivot_rule: PivotRule::Bland,
        }
    }
}

/// Solve `model` with default solver settings
pub fn solve(model: &Model) -> Result<Solution, SolveError> {
    Solver::new().solve(model)
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_pivot_rule(mut self, rule: PivotRule) -> Self {
        self.pivot_rule = rule;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn pivot_rule(&self) -> PivotRule {
        self.pivot_rule
    }

    /// Solve the LP problem using the two-phase simplex method.
    ///
    /// Malformed models and unusable settings are rejected with a
    /// [`SolveError`]. Infeasible, unbounded and iteration-limited outcomes
    /// are reported through the solution status.
    pub fn solve(&self, model: &Model) -> Result<Solution, SolveError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolveError::InvalidTolerance(self.tolerance));
        }
        model.validate()?;

        let standard = StandardForm::build(model);
        let mut tableau = Tableau::build(&standard);
        let mut iterations = 0;

        tracing::debug!(
            component = "solver",
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            rows = tableau.n_rows,
            columns = tableau.n_cols,
            artificials = tableau.n_artificial,
            pivot_rule = ?self.pivot_rule,
            "Built initial tableau"
        );

        // Phase 1: Find initial basic feasible solution
        if tableau.n_artificial > 0 {
            match self.phase1(&mut tableau, &mut iterations) {
                SimplexResult::Optimal => {}
                SimplexResult::Infeasible | SimplexResult::Unbounded => {
                    return Ok(self.finish(Solution::infeasible(iterations)));
                }
                SimplexResult::IterationLimit => {
                    return Ok(self.finish(Solution::iteration_limit(iterations)));
                }
            }
        }

        // Phase 2: Optimize
        let solution = match self.phase2(&mut tableau, &mut iterations) {
            SimplexResult::Optimal => self.extract_solution(&tableau, &standard, model, iterations),
            SimplexResult::Unbounded => Solution::unbounded(model.objective().sense, iterations),
            SimplexResult::Infeasible => Solution::infeasible(iterations),
            SimplexResult::IterationLimit => Solution::iteration_limit(iterations),
        };

        Ok(self.finish(solution))
    }

    fn finish(&self, solution: Solution) -> Solution {
        tracing::debug!(
            component = "solver",
            status = %solution.status,
            objective = solution.objective_value,
            iterations = solution.iterations,
            "Solve finished"
        );
        solution
    }

    fn phase1(&self, tableau: &mut Tableau, iterations: &mut usize) -> SimplexResult {
        // Auxiliary objective: maximize -sum(artificials)
        let obj_row = tableau.n_rows;
        let art_start = tableau.artificial_start();
        let orig_obj = std::mem::replace(&mut tableau.data[obj_row], vec![0.0; tableau.n_cols]);

        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[obj_row][j] = -1.0;
        }

        // Price out the basic artificials
        for i in 0..tableau.n_rows {
            if tableau.basic_vars[i] >= art_start {
                for j in 0..tableau.n_cols {
                    tableau.data[obj_row][j] += tableau.data[i][j];
                }
            }
        }

        let entering_limit = tableau.rhs_col();
        match self.iterate(tableau, entering_limit, iterations, "phase1") {
            SimplexResult::Optimal => {}
            // The auxiliary objective is bounded by zero, so this only
            // happens through numerical breakdown
            SimplexResult::Unbounded | SimplexResult::Infeasible => return SimplexResult::Infeasible,
            SimplexResult::IterationLimit => return SimplexResult::IterationLimit,
        }

        let rhs_col = tableau.rhs_col();
        let infeasibility: f64 = (0..tableau.n_rows)
            .filter(|&i| tableau.basic_vars[i] >= art_start)
            .map(|i| tableau.data[i][rhs_col])
            .sum();

        tracing::debug!(
            component = "solver",
            phase = "phase1",
            infeasibility,
            iterations = *iterations,
            "Phase 1 finished"
        );

        if infeasibility > self.tolerance {
            return SimplexResult::Infeasible;
        }

        self.drive_out_artificials(tableau);

        // Restore original objective and price out the new basis
        tableau.data[obj_row] = orig_obj;
        for i in 0..tableau.n_rows {
            let ratio = tableau.data[obj_row][tableau.basic_vars[i]];
            if ratio != 0.0 {
                for j in 0..tableau.n_cols {
                    tableau.data[obj_row][j] -= ratio * tableau.data[i][j];
                }
            }
        }

        SimplexResult::Optimal
    }

    /// Replace artificials still basic at zero level with a real column.
    /// Rows with no usable column are redundant and stay inert.
    fn drive_out_artificials(&self, tableau: &mut Tableau) {
        let art_start = tableau.artificial_start();
        for i in 0..tableau.n_rows {
            if tableau.basic_vars[i] < art_start {
                continue;
            }
            if let Some(col) = (0..art_start).find(|&j| tableau.data[i][j].abs() > self.tolerance) {
                tableau.pivot(i, col);
            }
        }
    }

    fn phase2(&self, tableau: &mut Tableau, iterations: &mut usize) -> SimplexResult {
        // Artificial columns never re-enter
        let entering_limit = tableau.artificial_start();
        let result = self.iterate(tableau, entering_limit, iterations, "phase2");
        tracing::debug!(
            component = "solver",
            phase = "phase2",
            result = ?result,
            iterations = *iterations,
            "Phase 2 finished"
        );
        result
    }

    fn iterate(
        &self,
        tableau: &mut Tableau,
        entering_limit: usize,
        iterations: &mut usize,
        phase: &'static str,
    ) -> SimplexResult {
        loop {
            let Some(pivot_col) = self.find_pivot_column(tableau, entering_limit) else {
                return SimplexResult::Optimal;
            };
            let Some(pivot_row) = self.find_pivot_row(tableau, pivot_col) else {
                return SimplexResult::Unbounded;
            };
            if *iterations >= self.max_iterations {
                return SimplexResult::IterationLimit;
            }
            tracing::trace!(
                phase,
                iteration = *iterations,
                entering = pivot_col,
                leaving = tableau.basic_vars[pivot_row],
                "pivot"
            );
            tableau.pivot(pivot_row, pivot_col);
            *iterations += 1;
        }
    }

    /// Pick a column whose reduced cost can improve the objective
    fn find_pivot_column(&self, tableau: &Tableau, entering_limit: usize) -> Option<usize> {
        let obj = &tableau.data[tableau.n_rows];

        match self.pivot_rule {
            PivotRule::Bland => (0..entering_limit).find(|&j| obj[j] > self.tolerance),
            PivotRule::Dantzig => {
                let mut max_val = self.tolerance;
                let mut max_col = None;
                for (j, &val) in obj.iter().enumerate().take(entering_limit) {
                    if val > max_val {
                        max_val = val;
                        max_col = Some(j);
                    }
                }
                max_col
            }
        }
    }

    /// Minimum ratio test, ties broken by the lowest basic column index
    fn find_pivot_row(&self, tableau: &Tableau, col: usize) -> Option<usize> {
        let rhs_col = tableau.rhs_col();
        let mut best: Option<(usize, f64)> = None;

        for i in 0..tableau.n_rows {
            let val = tableau.data[i][col];
            if val <= self.tolerance {
                continue;
            }
            let ratio = tableau.data[i][rhs_col] / val;
            best = match best {
                None => Some((i, ratio)),
                Some((row, min_ratio)) => {
                    let tie = (ratio - min_ratio).abs() <= self.tolerance;
                    if (!tie && ratio < min_ratio) || (tie && tableau.basic_vars[i] < tableau.basic_vars[row]) {
                        Some((i, ratio))
                    } else {
                        Some((row, min_ratio))
                    }
                }
            };
        }

        best.map(|(row, _)| row)
    }

    fn extract_solution(&self, tableau: &Tableau, standard: &StandardForm, model: &Model, iterations: usize) -> Solution {
        let rhs_col = tableau.rhs_col();

        let mut columns = vec![0.0; standard.columns.len()];
        for (i, &basic) in tableau.basic_vars.iter().enumerate() {
            if basic < columns.len() {
                columns[basic] = tableau.data[i][rhs_col].max(0.0);
            }
        }

        let values = standard.recover(&columns);
        let objective_value = model.evaluate(&model.objective().expression, &values);

        Solution::optimal(values, objective_value, iterations)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimplexResult {
    Optimal,
    Unbounded,
    Infeasible,
    IterationLimit,
}

/// A non-negative column standing in for part of a model variable
struct Column {
    var: usize,
    sign: f64,
}

struct Row {
    coefficients: Vec<f64>,
    relation: Relation,
    rhs: f64,
}

/// The model rewritten over non-negative columns.
///
/// Each variable becomes `offset + sum(sign * column)`: shifted by a finite
/// lower bound, mirrored from a finite upper bound, or split when free.
/// Finite upper bounds on shifted variables become extra `<=` rows.
struct StandardForm {
    columns: Vec<Column>,
    var_columns: Vec<Vec<usize>>,
    offsets: Vec<f64>,
    rows: Vec<Row>,
    /// Costs in the maximize convention
    costs: Vec<f64>,
}

impl StandardForm {
    fn build(model: &Model) -> Self {
        let n_vars = model.num_variables();
        let mut form = StandardForm {
            columns: Vec::with_capacity(n_vars),
            var_columns: Vec::with_capacity(n_vars),
            offsets: Vec::with_capacity(n_vars),
            rows: Vec::new(),
            costs: Vec::new(),
        };
        let mut bound_rows = Vec::new();

        for (var, v) in model.variables().iter().enumerate() {
            let mut cols = Vec::with_capacity(2);
            if v.lower.is_finite() {
                form.offsets.push(v.lower);
                cols.push(form.push_column(var, 1.0));
                if v.upper.is_finite() {
                    bound_rows.push((cols[0], v.upper - v.lower));
                }
            } else if v.upper.is_finite() {
                form.offsets.push(v.upper);
                cols.push(form.push_column(var, -1.0));
            } else {
                form.offsets.push(0.0);
                cols.push(form.push_column(var, 1.0));
                cols.push(form.push_column(var, -1.0));
            }
            form.var_columns.push(cols);
        }

        for c in model.constraints() {
            let (coefficients, constant) = form.expand(&c.expression);
            form.rows.push(Row {
                coefficients,
                relation: c.relation,
                rhs: c.rhs - constant,
            });
        }

        for (col, cap) in bound_rows {
            let mut coefficients = vec![0.0; form.columns.len()];
            coefficients[col] = 1.0;
            form.rows.push(Row {
                coefficients,
                relation: Relation::Le,
                rhs: cap,
            });
        }

        // Simplex maximizes, so minimization negates the costs
        let (costs, _) = form.expand(&model.objective().expression);
        form.costs = match model.objective().sense {
            Sense::Minimize => costs.into_iter().map(|c| -c).collect(),
            Sense::Maximize => costs,
        };

        form
    }

    fn push_column(&mut self, var: usize, sign: f64) -> usize {
        self.columns.push(Column { var, sign });
        self.columns.len() - 1
    }

    /// Column coefficients of `expr` and the constant contributed by offsets
    fn expand(&self, expr: &LinearExpression) -> (Vec<f64>, f64) {
        let mut coefficients = vec![0.0; self.columns.len()];
        let mut constant = 0.0;
        for (var, coef) in expr.terms() {
            let var = var.index();
            constant += coef * self.offsets[var];
            for &col in &self.var_columns[var] {
                coefficients[col] += coef * self.columns[col].sign;
            }
        }
        (coefficients, constant)
    }

    /// Map column values back to model variable values
    fn recover(&self, column_values: &[f64]) -> Vec<f64> {
        let mut values = self.offsets.clone();
        for (col, column) in self.columns.iter().enumerate() {
            values[column.var] += column.sign * column_values[col];
        }
        values
    }
}

/// Dense simplex tableau. Rows `0..n_rows` are constraints, row `n_rows` is
/// the objective; the last column holds the right-hand side.
///
/// Column order: structural, slack/surplus, artificial, rhs.
struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_rows: usize,
    n_cols: usize,
    n_structural: usize,
    n_slack: usize,
    n_artificial: usize,
}

impl Tableau {
    fn build(standard: &StandardForm) -> Self {
        let n_structural = standard.columns.len();
        let n_rows = standard.rows.len();

        // Normalize each row to a non-negative right-hand side
        let rows: Vec<(f64, Relation)> = standard
            .rows
            .iter()
            .map(|row| {
                if row.rhs < 0.0 {
                    (-1.0, row.relation.flipped())
                } else {
                    (1.0, row.relation)
                }
            })
            .collect();

        // Count slack and artificial variables needed
        let mut n_slack = 0;
        let mut n_artificial = 0;
        for &(_, relation) in &rows {
            match relation {
                Relation::Le => n_slack += 1,
                Relation::Ge => {
                    n_slack += 1; // surplus
                    n_artificial += 1;
                }
                Relation::Eq => n_artificial += 1,
            }
        }

        let n_cols = n_structural + n_slack + n_artificial + 1; // +1 for RHS
        let mut tableau = Tableau {
            data: vec![vec![0.0; n_cols]; n_rows + 1],
            basic_vars: vec![0; n_rows],
            n_rows,
            n_cols,
            n_structural,
            n_slack,
            n_artificial,
        };

        let mut slack_idx = n_structural;
        let mut artificial_idx = n_structural + n_slack;

        for (i, (row, &(sign, relation))) in standard.rows.iter().zip(&rows).enumerate() {
            for (j, &coef) in row.coefficients.iter().enumerate() {
                tableau.data[i][j] = sign * coef;
            }
            tableau.data[i][n_cols - 1] = sign * row.rhs;

            match relation {
                Relation::Le => {
                    tableau.data[i][slack_idx] = 1.0;
                    tableau.basic_vars[i] = slack_idx;
                    slack_idx += 1;
                }
                Relation::Ge => {
                    tableau.data[i][slack_idx] = -1.0; // surplus
                    slack_idx += 1;
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
                Relation::Eq => {
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
            }
        }

        tableau.data[n_rows][..n_structural].copy_from_slice(&standard.costs);

        tableau
    }

    fn artificial_start(&self) -> usize {
        self.n_structural + self.n_slack
    }

    fn rhs_col(&self) -> usize {
        self.n_cols - 1
    }

    fn pivot(&mut self, row: usize, col: usize) {
        self.basic_vars[row] = col;

        // Scale pivot row
        let pivot_val = self.data[row][col];
        for j in 0..self.n_cols {
            self.data[row][j] /= pivot_val;
        }

        // Eliminate column in other rows
        let pivot_row = self.data[row].clone();
        for (i, data_row) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = data_row[col];
            if factor != 0.0 {
                for (value, &p) in data_row.iter_mut().zip(&pivot_row) {
                    *value -= factor * p;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{LinearExpression, Model, Relation};
    use crate::solution::SolutionStatus;

    fn assert_close(actual: f64, expected: f64, what: &str) {
        assert!((actual - expected).abs() < 1e-6, "{} = {} (expected {})", what, actual, expected);
    }

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=11
        let mut model = Model::new();
        let x = model.add_variable("x");
        let y = model.add_variable("y");
        model.maximize(3.0 * x + 2.0 * y);
        model.add_named_constraint("sum", x + y, Relation::Le, 4.0);
        model.add_named_constraint("x_max", x.into(), Relation::Le, 3.0);
        model.add_named_constraint("y_max", y.into(), Relation::Le, 3.0);

        let solution = Solver::new().solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_close(solution.values[0], 3.0, "x");
        assert_close(solution.values[1], 1.0, "y");
        assert_close(solution.objective_value, 11.0, "obj");
        assert!(model.violations(&solution.values, 1e-6).is_empty());
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let mut model = Model::new();
        let x = model.add_variable("x");
        let y = model.add_variable("y");
        model.minimize(2.0 * x + 3.0 * y);
        model.add_named_constraint("sum", x + y, Relation::Ge, 4.0);
        model.add_named_constraint("x_max", x.into(), Relation::Le, 3.0);
        model.add_named_constraint("y_max", y.into(), Relation::Le, 3.0);

        let solution = Solver::new().solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_close(solution.values[0], 3.0, "x");
        assert_close(solution.values[1], 1.0, "y");
        assert_close(solution.objective_value, 9.0, "obj");
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 1
        let mut model = Model::new();
        let x = model.add_variable("x");
        model.minimize(x.into());
        model.add_named_constraint("lower", x.into(), Relation::Ge, 5.0);
        model.add_named_constraint("upper", x.into(), Relation::Le, 1.0);

        let solution = Solver::new().solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.values.is_empty());
        assert_eq!(solution.objective_value, f64::INFINITY);
    }

    #[test]
    fn test_unbounded() {
        let mut model = Model::new();
        let x = model.add_variable("x");
        model.maximize(x.into());

        let solution = solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert!(solution.values.is_empty());
        assert_eq!(solution.objective_value, f64::INFINITY);
    }

    #[test]
    fn test_unbounded_minimization_after_phase1() {
        // Minimize -x - y subject to x - y = 1
        let mut model = Model::new();
        let x = model.add_variable("x");
        let y = model.add_variable("y");
        model.minimize(-(x + y));
        model.add_constraint(LinearExpression::from(x) - y, Relation::Eq, 1.0);

        let solution = solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert_eq!(solution.objective_value, f64::NEG_INFINITY);
    }

    #[test]
    fn test_negative_rhs_is_normalized() {
        // Minimize x + y subject to -x - y <= -3, i.e. x + y >= 3
        let mut model = Model::new();
        let x = model.add_variable("x");
        let y = model.add_variable("y");
        model.minimize(x + y);
        model.add_constraint(-(x + y), Relation::Le, -3.0);
        model.add_constraint(x.into(), Relation::Le, 1.0);

        let solution = solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_close(solution.objective_value, 3.0, "obj");
        assert!(model.violations(&solution.values, 1e-6).is_empty());
    }

    #[test]
    fn test_variable_bounds() {
        // Maximize x + y with x in [1, 4], y <= 2 (no lower bound), x + y <= 10
        let mut model = Model::new();
        let x = model.add_bounded_variable("x", 1.0, 4.0);
        let y = model.add_bounded_variable("y", f64::NEG_INFINITY, 2.0);
        model.maximize(x + y);
        model.add_constraint(x + y, Relation::Le, 10.0);

        let solution = solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_close(solution.values[0], 4.0, "x");
        assert_close(solution.values[1], 2.0, "y");
        assert_close(solution.objective_value, 6.0, "obj");
    }

    #[test]
    fn test_free_variable() {
        // Minimize x with x free and x >= -3
        let mut model = Model::new();
        let x = model.add_bounded_variable("x", f64::NEG_INFINITY, f64::INFINITY);
        model.minimize(x.into());
        model.add_constraint(x.into(), Relation::Ge, -3.0);

        let solution = solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_close(solution.values[0], -3.0, "x");
        assert_close(solution.objective_value, -3.0, "obj");
    }

    #[test]
    fn test_fixed_variable_and_redundant_equality() {
        // y fixed at 2, two copies of x + y = 5
        let mut model = Model::new();
        let x = model.add_variable("x");
        let y = model.add_bounded_variable("y", 2.0, 2.0);
        model.minimize(x + y);
        model.add_constraint(x + y, Relation::Eq, 5.0);
        model.add_constraint(2.0 * x + 2.0 * y, Relation::Eq, 10.0);

        let solution = solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_close(solution.values[0], 3.0, "x");
        assert_close(solution.values[1], 2.0, "y");
        assert!(model.violations(&solution.values, 1e-6).is_empty());
    }

    #[test]
    fn test_empty_model() {
        let model = Model::new();
        let solution = solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!(solution.values.is_empty());
        assert_eq!(solution.objective_value, 0.0);
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_validation_happens_before_solving() {
        let mut model = Model::new();
        model.add_bounded_variable("x", 3.0, 1.0);

        assert!(matches!(
            solve(&model),
            Err(SolveError::Model(ModelError::InvertedBounds { .. }))
        ));
    }

    #[test]
    fn test_rejects_unusable_tolerance() {
        let mut model = Model::new();
        let x = model.add_variable("x");
        model.minimize(x.into());
        model.add_constraint(x.into(), Relation::Ge, 5.0);
        model.add_constraint(x.into(), Relation::Le, 1.0);

        for tol in [f64::NAN, f64::INFINITY, 0.0, -1.0] {
            let result = Solver::new().with_tolerance(tol).solve(&model);
            assert!(
                matches!(result, Err(SolveError::InvalidTolerance(_))),
                "tolerance {} gave {:?}",
                tol,
                result
            );
        }

        let err = Solver::new().with_tolerance(-1.0).solve(&model).unwrap_err();
        assert_eq!(err.to_string(), "Solver tolerance must be positive and finite, got -1");

        let solution = Solver::new().with_tolerance(1e-7).solve(&model).unwrap();
        assert_eq!(solution.status, SolutionStatus::Infeasible);
    }

    #[test]
    fn test_bland_terminates_on_beale_cycling_example() {
        // Beale's example cycles under the textbook largest-coefficient rule.
        // Optimal: x4=1/25, x6=1, objective -1/20
        let mut model = Model::new();
        let x4 = model.add_variable("x4");
        let x5 = model.add_variable("x5");
        let x6 = model.add_variable("x6");
        let x7 = model.add_variable("x7");
        model.minimize(-0.75 * x4 + 150.0 * x5 - 0.02 * x6 + 6.0 * x7);
        model.add_constraint(0.25 * x4 - 60.0 * x5 - 0.04 * x6 + 9.0 * x7, Relation::Le, 0.0);
        model.add_constraint(0.5 * x4 - 90.0 * x5 - 0.02 * x6 + 3.0 * x7, Relation::Le, 0.0);
        model.add_constraint(x6.into(), Relation::Le, 1.0);

        let solution = Solver::new().with_pivot_rule(PivotRule::Bland).solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_close(solution.objective_value, -0.05, "obj");
        assert_close(solution.values[2], 1.0, "x6");
        assert!(model.violations(&solution.values, 1e-6).is_empty());
    }

    #[test]
    fn test_dantzig_rule_agrees() {
        let mut model = Model::new();
        let x = model.add_variable("x");
        let y = model.add_variable("y");
        model.maximize(3.0 * x + 2.0 * y);
        model.add_constraint(x + y, Relation::Le, 4.0);
        model.add_constraint(x + 3.0 * y, Relation::Le, 6.0);
        model.add_constraint(x.into(), Relation::Le, 3.0);

        let bland = Solver::new().solve(&model).unwrap();
        let dantzig = Solver::new().with_pivot_rule(PivotRule::Dantzig).solve(&model).unwrap();

        assert_eq!(dantzig.status, SolutionStatus::Optimal);
        assert_close(dantzig.objective_value, bland.objective_value, "obj");
        assert_close(dantzig.objective_value, 11.0, "obj");
    }

    #[test]
    fn test_iteration_limit() {
        let mut model = Model::new();
        let x = model.add_variable("x");
        let y = model.add_variable("y");
        model.minimize(x + y);
        model.add_constraint(x.into(), Relation::Ge, 1.0);
        model.add_constraint(y.into(), Relation::Ge, 1.0);

        let solution = Solver::new().with_max_iterations(1).solve(&model).unwrap();

        assert_eq!(solution.status, SolutionStatus::IterationLimit);
        assert_eq!(solution.iterations, 1);
        assert!(solution.values.is_empty());
        assert!(solution.objective_value.is_nan());

        let solution = Solver::new().solve(&model).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_close(solution.objective_value, 2.0, "obj");
    }
}
