//! Production run records as the completion workflow sees them

use crate::numeric::Weight;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one employee's detail row on a run (`id_dproduksi`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailId(pub u64);

impl fmt::Display for DetailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a production run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionStatus {
    NotStarted,
    InProgress,
    Overdue,
    Completed,
}

impl ProductionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "belum_dimulai",
            Self::InProgress => "dalam_proses",
            Self::Overdue => "terlambat",
            Self::Completed => "selesai",
        }
    }

    /// Parse a backend status label
    ///
    /// Case, spaces and dashes are ignored, and both the Indonesian labels and
    /// their English equivalents are accepted.
    pub fn from_str(value: &str) -> Option<Self> {
        let key = value.trim().to_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "belum_dimulai" | "belum_mulai" | "not_started" | "pending" => Some(Self::NotStarted),
            "dalam_proses" | "sedang_diproses" | "diproses" | "proses" | "in_progress" => {
                Some(Self::InProgress)
            }
            "terlambat" | "overdue" => Some(Self::Overdue),
            "selesai" | "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
        }
    }
}

/// One raw-material allocation consumed by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialUsageEntry {
    pub material_id: Option<u64>,
    pub name: Option<String>,
    pub weight: Weight,
}

/// One employee's contribution to a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeOutputEntry {
    pub id: DetailId,
    pub employee: String,
    pub output_weight: Weight,
}

/// A production run, read-only to the completion workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionRun {
    pub id: u64,
    pub code: String,
    pub status: ProductionStatus,
    pub product_name: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub due_on: Option<NaiveDate>,
    /// Finished pieces recorded by an earlier completion (`stok_manual`)
    pub recorded_stock: u32,
    pub materials: Vec<MaterialUsageEntry>,
    pub outputs: Vec<EmployeeOutputEntry>,
}

impl ProductionRun {
    /// Sum of all material weights consumed by the run
    pub fn material_input_total(&self) -> Weight {
        self.materials.iter().map(|m| m.weight).sum()
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProductionStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str_accepts_label_variants() {
        assert_eq!(ProductionStatus::from_str("Selesai"), Some(ProductionStatus::Completed));
        assert_eq!(ProductionStatus::from_str("Dalam Proses"), Some(ProductionStatus::InProgress));
        assert_eq!(ProductionStatus::from_str("belum-dimulai"), Some(ProductionStatus::NotStarted));
        assert_eq!(ProductionStatus::from_str("OVERDUE"), Some(ProductionStatus::Overdue));
        assert_eq!(ProductionStatus::from_str("archived"), None);
    }

    #[test]
    fn test_status_round_trips_through_as_str() {
        for status in [
            ProductionStatus::NotStarted,
            ProductionStatus::InProgress,
            ProductionStatus::Overdue,
            ProductionStatus::Completed,
        ] {
            assert_eq!(ProductionStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_material_input_total() {
        let run = ProductionRun {
            id: 1,
            code: "PRD-001".to_string(),
            status: ProductionStatus::InProgress,
            product_name: None,
            started_on: None,
            due_on: None,
            recorded_stock: 0,
            materials: vec![
                MaterialUsageEntry {
                    material_id: Some(1),
                    name: None,
                    weight: Weight::from_grams(6_250),
                },
                MaterialUsageEntry {
                    material_id: Some(2),
                    name: None,
                    weight: Weight::from_grams(3_750),
                },
            ],
            outputs: Vec::new(),
        };

        assert_eq!(run.material_input_total(), Weight::from_grams(10_000));
        assert!(!run.is_completed());
    }
}
