use crate::catalog::{operators_for, EquipmentType, Field, FIELDS};
use crate::commands::{CmdResult, FieldListing};
use crate::error::Result;

/// Fields a rule can target, with their operators. Without an equipment type,
/// every top-level field of the catalog; composite sub-fields are listed
/// through their parent.
pub fn run(equipment: Option<EquipmentType>) -> Result<CmdResult> {
    let fields: Vec<Field> = match equipment {
        Some(eq) => eq.fields().to_vec(),
        None => FIELDS
            .iter()
            .filter(|d| !is_sub_field(d.field))
            .map(|d| d.field)
            .collect(),
    };

    let listings = fields
        .into_iter()
        .map(|field| FieldListing {
            field,
            operators: operators_for(field),
        })
        .collect();
    Ok(CmdResult::default().with_fields(listings))
}

fn is_sub_field(field: Field) -> bool {
    FIELDS
        .iter()
        .filter_map(|d| d.children)
        .any(|children| children.contains(&field))
}
