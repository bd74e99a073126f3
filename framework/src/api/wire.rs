//! JSON shapes exchanged with the produksi endpoints
//!
//! Response records are decoded leniently where the backend is known to vary
//! (wrapped or bare records, numeric strings for decimals, names under
//! different relations) and strictly where a wrong guess would corrupt the
//! draft (status, ids, weights).

use crate::error::ApiError;
use crate::model::{
    resolve_display_name, DetailId, EmployeeOutputEntry, MaterialUsageEntry, ProductionRun,
    ProductionStatus,
};
use crate::numeric::Weight;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Either `{ "data": {...} }` or the record itself
pub(crate) fn unwrap_envelope(body: serde_json::Value) -> serde_json::Value {
    match body {
        serde_json::Value::Object(mut map) if map.get("data").is_some_and(|d| d.is_object()) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

/// Any related record that may carry a display name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub nama: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub nama_barang: Option<String>,
}

/// `user` on a detail row: an eager-loaded object or a bare name
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Record(NamedRef),
    Name(String),
}

impl UserRef {
    /// `nama`, then `name`, then `username`, then a bare string
    fn display_name(&self) -> Option<String> {
        match self {
            Self::Record(user) => resolve_display_name([
                user.nama.as_deref(),
                user.name.as_deref(),
                user.username.as_deref(),
            ]),
            Self::Name(name) => resolve_display_name([Some(name.as_str())]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailProduksiRecord {
    pub id_dproduksi: DetailId,
    #[serde(default)]
    pub berat_hasil: Option<Weight>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub id_user: Option<u64>,
}

impl DetailProduksiRecord {
    fn into_entry(self) -> EmployeeOutputEntry {
        let employee = self
            .user
            .as_ref()
            .and_then(UserRef::display_name)
            .unwrap_or_else(|| match self.id_user {
                Some(id) => format!("Karyawan #{}", id),
                None => format!("Karyawan (detail {})", self.id_dproduksi),
            });

        EmployeeOutputEntry {
            id: self.id_dproduksi,
            employee,
            output_weight: self.berat_hasil.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailBahanRecord {
    pub berat: Weight,
    #[serde(default, alias = "id_barang")]
    pub id_bahan: Option<u64>,
    #[serde(default)]
    pub bahan: Option<NamedRef>,
    #[serde(default)]
    pub barang: Option<NamedRef>,
    #[serde(default)]
    pub nama_barang: Option<String>,
}

impl DetailBahanRecord {
    /// `barang.nama_barang`, `bahan.nama_barang`, flat `nama_barang`, `bahan.nama`
    fn into_entry(self) -> MaterialUsageEntry {
        let name = resolve_display_name([
            self.barang.as_ref().and_then(|b| b.nama_barang.as_deref()),
            self.bahan.as_ref().and_then(|b| b.nama_barang.as_deref()),
            self.nama_barang.as_deref(),
            self.bahan.as_ref().and_then(|b| b.nama.as_deref()),
        ]);
        let material_id = self
            .id_bahan
            .or_else(|| self.barang.as_ref().and_then(|b| b.id))
            .or_else(|| self.bahan.as_ref().and_then(|b| b.id));

        MaterialUsageEntry {
            material_id,
            name,
            weight: self.berat,
        }
    }
}

/// `GET /produksi/{id}` record
#[derive(Debug, Clone, Deserialize)]
pub struct RunRecord {
    #[serde(default, alias = "id_produksi")]
    pub id: Option<u64>,
    #[serde(default)]
    pub kode_produksi: Option<String>,
    pub status: String,
    #[serde(default)]
    pub stok_manual: Option<u32>,
    #[serde(default)]
    pub barang: Option<NamedRef>,
    #[serde(default)]
    pub produk: Option<NamedRef>,
    #[serde(default)]
    pub nama_barang: Option<String>,
    #[serde(default)]
    pub tanggal_mulai: Option<String>,
    #[serde(default)]
    pub tanggal_selesai: Option<String>,
    #[serde(rename = "detailProduksi", alias = "detail_produksi", default)]
    pub detail_produksi: Vec<DetailProduksiRecord>,
    #[serde(rename = "detailBahan", alias = "detail_bahan", default)]
    pub detail_bahan: Vec<DetailBahanRecord>,
}

/// Dates arrive as `YYYY-MM-DD` or as a timestamp starting with one
fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(text) = value.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| ApiError::decode(format!("{} '{}': {}", field, text, e)))
}

impl RunRecord {
    /// Convert into the domain record; `requested_id` fills in a missing id
    pub fn into_run(self, requested_id: u64) -> Result<ProductionRun, ApiError> {
        let status = ProductionStatus::from_str(&self.status).ok_or_else(|| {
            ApiError::decode(format!("unknown production status '{}'", self.status))
        })?;

        let id = self.id.unwrap_or(requested_id);
        if id != requested_id {
            return Err(ApiError::decode(format!(
                "requested production {} but received {}",
                requested_id, id
            )));
        }

        let product_name = resolve_display_name([
            self.barang.as_ref().and_then(|b| b.nama_barang.as_deref()),
            self.produk.as_ref().and_then(|p| p.nama_barang.as_deref()),
            self.nama_barang.as_deref(),
            self.produk.as_ref().and_then(|p| p.nama.as_deref()),
        ]);

        Ok(ProductionRun {
            id,
            code: self
                .kode_produksi
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| format!("#{}", id)),
            status,
            product_name,
            started_on: parse_date("tanggal_mulai", self.tanggal_mulai.as_deref())?,
            due_on: parse_date("tanggal_selesai", self.tanggal_selesai.as_deref())?,
            recorded_stock: self.stok_manual.unwrap_or(0),
            materials: self
                .detail_bahan
                .into_iter()
                .map(DetailBahanRecord::into_entry)
                .collect(),
            outputs: self
                .detail_produksi
                .into_iter()
                .map(DetailProduksiRecord::into_entry)
                .collect(),
        })
    }
}

/// One `{id_dproduksi, berat_hasil}` pair of a write request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputWeightPayload {
    pub id_dproduksi: DetailId,
    pub berat_hasil: Weight,
}

/// `PUT /produksi/{id}/berat-hasil`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct FinalizeRequest {
    #[validate(length(min = 1, message = "at least one employee output is required"))]
    pub detail_produksi: Vec<OutputWeightPayload>,
    #[validate(range(min = 1, message = "finished stock must be at least 1"))]
    pub stok_manual: u32,
    pub selesaikan_produksi: bool,
}

impl FinalizeRequest {
    /// Path relative to the API base URL
    pub fn path(run_id: u64) -> String {
        format!("/produksi/{}/berat-hasil", run_id)
    }
}

/// `PUT /produksi/{id}/edit-completed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CorrectionRequest {
    #[validate(length(min = 1, message = "at least one employee output is required"))]
    pub detail_produksi: Vec<OutputWeightPayload>,
    #[validate(range(min = 1, message = "finished stock must be at least 1"))]
    pub stok_manual: u32,
}

impl CorrectionRequest {
    /// Path relative to the API base URL
    pub fn path(run_id: u64) -> String {
        format!("/produksi/{}/edit-completed", run_id)
    }
}

/// A write request together with the endpoint it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionRequest {
    Finalize(FinalizeRequest),
    Correct(CorrectionRequest),
}

impl CompletionRequest {
    /// Field checks applied just before the request is sent
    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            Self::Finalize(body) => body.validate(),
            Self::Correct(body) => body.validate(),
        }
    }
}

/// Success envelope of the write endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure body: `{message}` plus, on a 422, `errors`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}
