//! JSON model files.
//!
//! ```json
//! {
//!   "sense": "minimize",
//!   "variables": [{ "name": "x1" }, { "name": "x2", "upper": 10 }],
//!   "objective": { "x1": 0.4, "x2": 0.5 },
//!   "constraints": [
//!     { "name": "tumor_region", "terms": { "x1": 0.5, "x2": 0.5 }, "relation": "=", "rhs": 6 }
//!   ]
//! }
//! ```
//!
//! A missing `lower` bound means 0 and `null` means unbounded below. A
//! missing `upper` bound means unbounded above.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use beamlp_solver::{LinearExpression, Model, Relation, Sense, VarId};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown variable '{variable}' in {context}")]
    UnknownVariable { variable: String, context: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
    #[serde(default)]
    pub sense: Sense,
    pub variables: Vec<VariableSpec>,
    #[serde(default)]
    pub objective: BTreeMap<String, f64>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableSpec {
    pub name: String,
    #[serde(default = "default_lower")]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

fn default_lower() -> Option<f64> {
    Some(0.0)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub terms: BTreeMap<String, f64>,
    pub relation: Relation,
    pub rhs: f64,
}

impl ModelFile {
    pub fn parse(source: &str) -> Result<Self, ModelFileError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ModelFileError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Build a solver model, resolving variable names
    pub fn to_model(&self) -> Result<Model, ModelFileError> {
        let mut model = Model::new();
        let mut ids: HashMap<&str, VarId> = HashMap::new();

        for v in &self.variables {
            let lower = v.lower.unwrap_or(f64::NEG_INFINITY);
            let upper = v.upper.unwrap_or(f64::INFINITY);
            let id = model.add_bounded_variable(v.name.clone(), lower, upper);
            ids.entry(v.name.as_str()).or_insert(id);
        }

        let objective = expression(&ids, &self.objective, || "objective".to_string())?;
        model.set_objective(objective, self.sense);

        for (i, c) in self.constraints.iter().enumerate() {
            let name = c.name.clone().unwrap_or_else(|| format!("c{}", i));
            let expr = expression(&ids, &c.terms, || format!("constraint {}", name))?;
            model.add_named_constraint(name, expr, c.relation, c.rhs);
        }

        tracing::debug!(
            component = "model_file",
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            sense = ?self.sense,
            "Loaded model"
        );

        Ok(model)
    }
}

fn expression(
    ids: &HashMap<&str, VarId>,
    terms: &BTreeMap<String, f64>,
    context: impl Fn() -> String,
) -> Result<LinearExpression, ModelFileError> {
    terms
        .iter()
        .map(|(name, &coef)| match ids.get(name.as_str()) {
            Some(&id) => Ok((id, coef)),
            None => Err(ModelFileError::UnknownVariable {
                variable: name.clone(),
                context: context(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamlp_solver::{Solver, SolutionStatus};

    const RADIATION: &str = r#"
        {
            "sense": "minimize",
            "variables": [{ "name": "x1" }, { "name": "x2" }],
            "objective": { "x1": 0.4, "x2": 0.5 },
            "constraints": [
                { "name": "critical_tissue", "terms": { "x1": 0.3, "x2": 0.1 }, "relation": "<=", "rhs": 2.7 },
                { "name": "tumor_region", "terms": { "x1": 0.5, "x2": 0.5 }, "relation": "=", "rhs": 6 },
                { "name": "tumor_center", "terms": { "x1": 0.6, "x2": 0.4 }, "relation": ">=", "rhs": 6 }
            ]
        }
    "#;

    #[test]
    fn test_load_and_solve() {
        let model = ModelFile::parse(RADIATION).unwrap().to_model().unwrap();

        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.num_constraints(), 3);
        assert_eq!(model.constraints()[1].relation, Relation::Eq);

        let solution = Solver::new().solve(&model).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 7.5).abs() < 1e-6);
        assert!((solution.values[1] - 4.5).abs() < 1e-6);
        assert!((solution.objective_value - 5.25).abs() < 1e-6);
    }

    #[test]
    fn test_bound_defaults() {
        let source = r#"
            {
                "sense": "maximize",
                "variables": [
                    { "name": "a" },
                    { "name": "b", "lower": null, "upper": 3 },
                    { "name": "c", "lower": -1 }
                ],
                "constraints": [{ "terms": { "a": 1 }, "relation": "<=", "rhs": 1 }]
            }
        "#;
        let model = ModelFile::parse(source).unwrap().to_model().unwrap();

        let vars = model.variables();
        assert_eq!((vars[0].lower, vars[0].upper), (0.0, f64::INFINITY));
        assert_eq!((vars[1].lower, vars[1].upper), (f64::NEG_INFINITY, 3.0));
        assert_eq!((vars[2].lower, vars[2].upper), (-1.0, f64::INFINITY));
        assert_eq!(model.objective().sense, Sense::Maximize);
        assert!(model.objective().expression.is_empty());
        assert_eq!(model.constraints()[0].name, "c0");
    }

    #[test]
    fn test_unknown_variable() {
        let source = r#"
            {
                "variables": [{ "name": "x" }],
                "constraints": [{ "name": "cap", "terms": { "y": 1 }, "relation": "<=", "rhs": 1 }]
            }
        "#;
        let err = ModelFile::parse(source).unwrap().to_model().unwrap_err();

        assert_eq!(err.to_string(), "Unknown variable 'y' in constraint cap");
    }

    #[test]
    fn test_rejects_bad_relation_and_unknown_fields() {
        let bad_relation = r#"
            {
                "variables": [{ "name": "x" }],
                "constraints": [{ "terms": { "x": 1 }, "relation": "<", "rhs": 1 }]
            }
        "#;
        assert!(matches!(ModelFile::parse(bad_relation), Err(ModelFileError::Parse(_))));

        let unknown_field = r#"{ "variables": [], "solver": "cbc" }"#;
        assert!(matches!(ModelFile::parse(unknown_field), Err(ModelFileError::Parse(_))));
    }
}
