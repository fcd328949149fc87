use std::collections::HashMap;

use serde::Serialize;

/// 图片字段名
pub const IMAGE_FIELD: &str = "foto_evidence";

/// 图片大小上限 16 MiB
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

/// 表格列顺序
pub const COLUMNS: [&str; 17] = [
    "kode_sa",
    "nama",
    "no_telp",
    "witel",
    "telda",
    "tanggal",
    "kategori",
    "tenant",
    "kegiatan",
    "layanan",
    "tarif",
    "nama_pic",
    "jabatan_pic",
    "telepon_pic",
    "paket_deal",
    "deal_bundling",
    IMAGE_FIELD,
];

const EMPTY_CELL: &str = "-";

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub row: Vec<String>,
    pub status: bool,
}

fn cell(fields: &HashMap<String, String>, column: &str) -> String {
    fields
        .get(column)
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// 按列顺序生成一行，缺失或空值填 `-`
pub fn build_row(fields: &HashMap<String, String>) -> Vec<String> {
    COLUMNS.iter().map(|column| cell(fields, column)).collect()
}

/// 上传文件名：`<kode_sa>_<tanggal>_<kegiatan>.jpg`
pub fn upload_name(fields: &HashMap<String, String>) -> String {
    format!(
        "{}_{}_{}.jpg",
        cell(fields, "kode_sa"),
        cell(fields, "tanggal"),
        cell(fields, "kegiatan")
    )
}
