//! Builders for production runs used across tests

use crate::model::{
    DetailId, EmployeeOutputEntry, MaterialUsageEntry, ProductionRun, ProductionStatus,
};
use crate::numeric::{normalize_decimal, Weight};

/// Parse a kilogram literal such as `"4.5"`; blank reads as zero
pub fn kg(text: &str) -> Weight {
    normalize_decimal(text, Weight::ZERO)
}

/// An in-progress run with the given material weights and
/// `(detail id, output weight)` pairs
pub fn run_with(materials: &[&str], outputs: &[(u64, &str)]) -> ProductionRun {
    ProductionRun {
        id: 1,
        code: "PRD-001".to_string(),
        status: ProductionStatus::InProgress,
        product_name: Some("Keripik Singkong".to_string()),
        started_on: None,
        due_on: None,
        recorded_stock: 0,
        materials: materials
            .iter()
            .enumerate()
            .map(|(i, weight)| MaterialUsageEntry {
                material_id: Some(i as u64 + 1),
                name: Some(format!("Bahan {}", i + 1)),
                weight: kg(weight),
            })
            .collect(),
        outputs: outputs
            .iter()
            .map(|(id, weight)| EmployeeOutputEntry {
                id: DetailId(*id),
                employee: format!("Karyawan {}", id),
                output_weight: kg(weight),
            })
            .collect(),
    }
}
