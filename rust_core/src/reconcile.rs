//! Field-by-field comparison of a reference row against its matched entity.

use crate::models::{Entity, Position, ReferenceRow};
use crate::stat_categories::{FieldPair, StatCategories};
use serde::{Deserialize, Serialize};

/// Difference for one configured field. `difference` is reference minus computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDifference {
    pub field: String,
    pub computed_field: String,
    pub reference: Option<f64>,
    pub computed: Option<f64>,
    pub difference: Option<f64>,
}

impl FieldDifference {
    /// A value present on only one side, or a gap larger than `tolerance`.
    pub fn is_discrepancy(&self, tolerance: f64) -> bool {
        match (self.reference, self.computed) {
            (Some(r), Some(c)) => (r - c).abs() > tolerance,
            (None, None) => false,
            _ => true,
        }
    }
}

/// Position whose category table applies: the row's own hint, else the entity's.
pub fn comparison_position(row: &ReferenceRow, entity: &Entity) -> Position {
    row.position().unwrap_or(entity.position)
}

/// Compare every field of `fields` between the reference row and the entity.
pub fn compute_differences(
    row: &ReferenceRow,
    entity: &Entity,
    fields: &[FieldPair],
) -> Vec<FieldDifference> {
    fields
        .iter()
        .map(|pair| {
            let reference = row.stats.get(&pair.reference).copied();
            let computed = entity.stat(&pair.computed);
            let difference = match (reference, computed) {
                (Some(r), Some(c)) => Some(r - c),
                _ => None,
            };
            FieldDifference {
                field: pair.reference.clone(),
                computed_field: pair.computed.clone(),
                reference,
                computed,
                difference,
            }
        })
        .collect()
}

/// [`compute_differences`] with the table picked by [`comparison_position`].
pub fn reconcile_row(
    row: &ReferenceRow,
    entity: &Entity,
    categories: &StatCategories,
) -> Vec<FieldDifference> {
    let position = comparison_position(row, entity);
    compute_differences(row, entity, categories.fields_for(position))
}
