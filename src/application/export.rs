// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::error::BatchError;
use crate::config::settings::ExportSettings;
use crate::domain::models::{GroupedRecord, IndexDocument};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// 分组记录的JSON导出器
#[derive(Debug, Clone)]
pub struct RecordExporter {
    output_dir: PathBuf,
    pretty: bool,
    document_max_chars: usize,
}

impl RecordExporter {
    pub fn new(output_dir: impl Into<PathBuf>, settings: &ExportSettings) -> Self {
        Self {
            output_dir: output_dir.into(),
            pretty: settings.pretty,
            document_max_chars: settings.document_max_chars,
        }
    }

    /// 输入文件对应的记录文件：`<output_dir>/<stem>.json`
    pub fn records_path(&self, input: &Path) -> PathBuf {
        self.output_dir.join(format!("{}.json", file_stem(input)))
    }

    /// 输入文件对应的索引文档文件：`<output_dir>/<stem>.documents.json`
    pub fn documents_path(&self, input: &Path) -> PathBuf {
        self.output_dir.join(format!("{}.documents.json", file_stem(input)))
    }

    /// 以 records 形式写出分组记录，返回写入路径
    pub async fn write_records(&self, input: &Path, records: &[GroupedRecord]) -> Result<PathBuf, BatchError> {
        let path = self.records_path(input);
        self.write_json(&path, records).await?;
        info!("Saved {} records to {}", records.len(), path.display());
        Ok(path)
    }

    /// 扁平化为索引文档后写出，返回写入路径
    pub async fn write_documents(&self, input: &Path, records: &[GroupedRecord]) -> Result<PathBuf, BatchError> {
        let documents: Vec<IndexDocument> = records
            .iter()
            .map(|record| record.to_index_document(self.document_max_chars))
            .collect();

        let path = self.documents_path(input);
        self.write_json(&path, &documents).await?;
        info!("Saved {} index documents to {}", documents.len(), path.display());
        Ok(path)
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), BatchError> {
        let body = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };

        let to_output_error = |source| BatchError::Output {
            path: path.to_path_buf(),
            source,
        };
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(to_output_error)?;
        tokio::fs::write(path, body).await.map_err(to_output_error)
    }
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}
