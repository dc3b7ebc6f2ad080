use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use thiserror::Error;

use crate::solution::ConstraintViolation;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{context} references undeclared variable #{index}")]
    UndeclaredVariable { context: String, index: usize },
    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),
    #[error("Variable {name} has lower bound {lower} above upper bound {upper}")]
    InvertedBounds { name: String, lower: f64, upper: f64 },
    #[error("Variable {name} has invalid bounds [{lower}, {upper}]")]
    InvalidBound { name: String, lower: f64, upper: f64 },
    #[error("{context} has non-finite coefficient {value}")]
    NonFiniteCoefficient { context: String, value: f64 },
    #[error("Constraint {constraint} has non-finite right-hand side {value}")]
    NonFiniteRhs { constraint: String, value: f64 },
}

/// Handle to a variable declared in a [`Model`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name, unique within a model
    pub name: String,
    /// Lower bound, may be negative infinity
    pub lower: f64,
    /// Upper bound, may be positive infinity
    pub upper: f64,
}

/// Sum of coefficient * variable terms, one coefficient per variable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    terms: BTreeMap<VarId, f64>,
}

impl LinearExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`LinearExpression::add_term`]
    pub fn term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// Add `coefficient * var`, summing with any existing term for `var`
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        *self.terms.entry(var).or_insert(0.0) += coefficient;
    }

    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(&var, &coef)| (var, coef))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn scale(mut self, factor: f64) -> Self {
        for coef in self.terms.values_mut() {
            *coef *= factor;
        }
        self
    }
}

impl From<VarId> for LinearExpression {
    fn from(var: VarId) -> Self {
        LinearExpression::new().term(var, 1.0)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpression {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpression::new();
        for (var, coef) in iter {
            expr.add_term(var, coef);
        }
        expr
    }
}

impl Add for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, other: Self) -> Self::Output {
        for (var, coef) in other.terms {
            self.add_term(var, coef);
        }
        self
    }
}

impl Add<VarId> for LinearExpression {
    type Output = LinearExpression;

    fn add(self, var: VarId) -> Self::Output {
        self.term(var, 1.0)
    }
}

impl Add for VarId {
    type Output = LinearExpression;

    fn add(self, other: Self) -> Self::Output {
        LinearExpression::from(self) + other
    }
}

impl Add<LinearExpression> for VarId {
    type Output = LinearExpression;

    fn add(self, expr: LinearExpression) -> Self::Output {
        expr.term(self, 1.0)
    }
}

impl Sub for VarId {
    type Output = LinearExpression;

    fn sub(self, other: Self) -> Self::Output {
        LinearExpression::from(self) - other
    }
}

impl Sub<LinearExpression> for VarId {
    type Output = LinearExpression;

    fn sub(self, expr: LinearExpression) -> Self::Output {
        LinearExpression::from(self) - expr
    }
}

impl Neg for VarId {
    type Output = LinearExpression;

    fn neg(self) -> Self::Output {
        LinearExpression::new().term(self, -1.0)
    }
}

impl Mul<f64> for VarId {
    type Output = LinearExpression;

    fn mul(self, factor: f64) -> Self::Output {
        LinearExpression::new().term(self, factor)
    }
}

impl Sub for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, other: Self) -> Self::Output {
        self + other.scale(-1.0)
    }
}

impl Sub<VarId> for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, var: VarId) -> Self::Output {
        self.term(var, -1.0)
    }
}

impl Neg for LinearExpression {
    type Output = LinearExpression;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

impl Mul<VarId> for f64 {
    type Output = LinearExpression;

    fn mul(self, var: VarId) -> Self::Output {
        LinearExpression::new().term(var, self)
    }
}

impl Mul<LinearExpression> for f64 {
    type Output = LinearExpression;

    fn mul(self, expr: LinearExpression) -> Self::Output {
        expr.scale(self)
    }
}

impl Mul<f64> for LinearExpression {
    type Output = LinearExpression;

    fn mul(self, factor: f64) -> Self::Output {
        self.scale(factor)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

impl Relation {
    /// The relation obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "=",
        };
        f.write_str(symbol)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Left-hand side
    pub expression: LinearExpression,
    /// Comparison operator
    pub relation: Relation,
    /// Right-hand side value
    pub rhs: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objective {
    pub expression: LinearExpression,
    pub sense: Sense,
}

/// A linear program: variables with bounds, constraints, and one objective
#[derive(Debug, Clone, Default)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Objective,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a non-negative variable
    pub fn add_variable(&mut self, name: impl Into<String>) -> VarId {
        self.add_bounded_variable(name, 0.0, f64::INFINITY)
    }

    /// Declare a variable with explicit bounds. Bounds are checked by
    /// [`Model::validate`], not here.
    pub fn add_bounded_variable(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            name: name.into(),
            lower,
            upper,
        });
        id
    }

    /// Add a constraint named `c<index>`, returning its index
    pub fn add_constraint(&mut self, expression: LinearExpression, relation: Relation, rhs: f64) -> usize {
        let name = format!("c{}", self.constraints.len());
        self.add_named_constraint(name, expression, relation, rhs)
    }

    pub fn add_named_constraint(
        &mut self,
        name: impl Into<String>,
        expression: LinearExpression,
        relation: Relation,
        rhs: f64,
    ) -> usize {
        self.constraints.push(Constraint {
            name: name.into(),
            expression,
            relation,
            rhs,
        });
        self.constraints.len() - 1
    }

    pub fn set_objective(&mut self, expression: LinearExpression, sense: Sense) {
        self.objective = Objective { expression, sense };
    }

    pub fn minimize(&mut self, expression: LinearExpression) {
        self.set_objective(expression, Sense::Minimize);
    }

    pub fn maximize(&mut self, expression: LinearExpression) {
        self.set_objective(expression, Sense::Maximize);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    pub fn find_variable(&self, name: &str) -> Option<VarId> {
        self.variables.iter().position(|v| v.name == name).map(VarId)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check the model is well formed before handing it to a solver
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut names = HashSet::new();
        for v in &self.variables {
            if !names.insert(v.name.as_str()) {
                return Err(ModelError::DuplicateVariable(v.name.clone()));
            }
            if v.lower.is_nan() || v.upper.is_nan() || v.lower == f64::INFINITY || v.upper == f64::NEG_INFINITY {
                return Err(ModelError::InvalidBound {
                    name: v.name.clone(),
                    lower: v.lower,
                    upper: v.upper,
                });
            }
            if v.lower > v.upper {
                return Err(ModelError::InvertedBounds {
                    name: v.name.clone(),
                    lower: v.lower,
                    upper: v.upper,
                });
            }
        }

        self.validate_expression(&self.objective.expression, || "objective".to_string())?;

        for c in &self.constraints {
            self.validate_expression(&c.expression, || format!("constraint {}", c.name))?;
            if !c.rhs.is_finite() {
                return Err(ModelError::NonFiniteRhs {
                    constraint: c.name.clone(),
                    value: c.rhs,
                });
            }
        }

        Ok(())
    }

    fn validate_expression(
        &self,
        expr: &LinearExpression,
        context: impl Fn() -> String,
    ) -> Result<(), ModelError> {
        for (var, coef) in expr.terms() {
            if var.0 >= self.variables.len() {
                return Err(ModelError::UndeclaredVariable {
                    context: context(),
                    index: var.0,
                });
            }
            if !coef.is_finite() {
                return Err(ModelError::NonFiniteCoefficient {
                    context: context(),
                    value: coef,
                });
            }
        }
        Ok(())
    }

    /// Value of `expr` at `values` (indexed by variable); missing entries count as zero
    pub fn evaluate(&self, expr: &LinearExpression, values: &[f64]) -> f64 {
        expr.terms()
            .map(|(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
            .sum()
    }

    /// Constraints and variable bounds broken by `values`, worst first
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for c in &self.constraints {
            let lhs = self.evaluate(&c.expression, values);

            let violation = match c.relation {
                Relation::Le if lhs > c.rhs + tolerance => {
                    let amt = lhs - c.rhs;
                    Some((amt, format!("{} exceeds maximum of {:.4} by {:.4}", c.name, c.rhs, amt)))
                }
                Relation::Ge if lhs < c.rhs - tolerance => {
                    let amt = c.rhs - lhs;
                    Some((amt, format!("{} is below minimum of {:.4} by {:.4}", c.name, c.rhs, amt)))
                }
                Relation::Eq if (lhs - c.rhs).abs() > tolerance => Some((
                    (lhs - c.rhs).abs(),
                    format!("{} requires exactly {:.4} but got {:.4}", c.name, c.rhs, lhs),
                )),
                _ => None,
            };

            if let Some((violation_amount, description)) = violation {
                violations.push(ConstraintViolation {
                    constraint: c.name.clone(),
                    required: c.rhs,
                    actual: lhs,
                    violation_amount,
                    description,
                });
            }
        }

        for (j, v) in self.variables.iter().enumerate() {
            let value = values.get(j).copied().unwrap_or(0.0);
            if value < v.lower - tolerance {
                violations.push(ConstraintViolation {
                    constraint: format!("{} lower bound", v.name),
                    required: v.lower,
                    actual: value,
                    violation_amount: v.lower - value,
                    description: format!("{} is below its lower bound of {:.4}", v.name, v.lower),
                });
            } else if value > v.upper + tolerance {
                violations.push(ConstraintViolation {
                    constraint: format!("{} upper bound", v.name),
                    required: v.upper,
                    actual: value,
                    violation_amount: value - v.upper,
                    description: format!("{} is above its upper bound of {:.4}", v.name, v.upper),
                });
            }
        }

        violations.sort_by(|a, b| b.violation_amount.total_cmp(&a.violation_amount));
        violations
    }
}
