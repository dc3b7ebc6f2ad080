//! Radiation therapy beam intensity model.
//!
//! Two beams cross a tumor. Each unit of intensity delivers a known dose to
//! healthy anatomy, to critical tissue, and to the tumor. The plan minimizes
//! the dose absorbed by healthy anatomy while keeping critical tissue under
//! its limit and delivering the prescribed tumor dose.

use crate::problem::{Model, Relation, VarId};

/// The beam model with handles to its two intensity variables
#[derive(Debug, Clone)]
pub struct BeamModel {
    pub model: Model,
    /// Intensity of beam 1
    pub x1: VarId,
    /// Intensity of beam 2
    pub x2: VarId,
}

pub fn radiation_therapy() -> BeamModel {
    let mut model = Model::new();
    let x1 = model.add_variable("x1");
    let x2 = model.add_variable("x2");

    // Healthy anatomy
    model.minimize(0.4 * x1 + 0.5 * x2);

    model.add_named_constraint("critical_tissue", 0.3 * x1 + 0.1 * x2, Relation::Le, 2.7);
    model.add_named_constraint("tumor_region", 0.5 * x1 + 0.5 * x2, Relation::Eq, 6.0);
    model.add_named_constraint("tumor_center", 0.6 * x1 + 0.4 * x2, Relation::Ge, 6.0);

    BeamModel { model, x1, x2 }
}
