//! 翻訳の検証レポート生成モジュール

use std::io::{
    self,
    Write,
};
use std::path::PathBuf;

use serde::Serialize;

use crate::config::{
    Settings,
    validate_language_code,
};
use crate::domain::Domain;
use crate::error::JobError;
use crate::input::load_dataset;
use crate::ir::Dataset;
use crate::merge::Marker;

/// セクションとキーの組
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRef {
    pub section: String,
    pub key: String,
}

impl KeyRef {
    fn new(section: &str, key: &str) -> Self {
        Self { section: section.to_string(), key: key.to_string() }
    }
}

/// フォールバック言語からコピーされたまま未翻訳のキー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntranslatedKey {
    pub section: String,
    pub key: String,
    /// コピー元を示すマーカー
    pub marker: Marker,
}

/// 1 ドメイン分の検証結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainReport {
    pub domain: String,
    pub has_standalone: bool,
    /// 翻訳ファイルが存在したか
    pub target_present: bool,
    /// ベース言語にあり、翻訳にないキー
    pub missing: Vec<KeyRef>,
    /// まだマーカー付きのキー
    pub untranslated: Vec<UntranslatedKey>,
    /// 翻訳にあり、ベース言語にないキー
    pub obsolete: Vec<KeyRef>,
}

impl DomainReport {
    /// 翻訳が完了しているか
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.untranslated.is_empty() && self.obsolete.is_empty()
    }
}

/// ベース言語のデータと翻訳データを比較する
///
/// # Arguments
/// * `domain` - 対象ドメイン
/// * `base` - ベース言語のデータ
/// * `target` - 翻訳データ（ファイルがない場合は `None`）
///
/// # Returns
/// 不足・未翻訳・不要なキーをファイル内の順序で列挙したレポート
#[must_use]
pub fn compare(domain: &Domain, base: &Dataset, target: Option<&Dataset>) -> DomainReport {
    let empty = Dataset::new();
    let target_data = target.unwrap_or(&empty);

    let mut missing = Vec::new();
    for section in base.sections() {
        for key in section.keys() {
            if !target_data.has_option(section.name(), key) {
                missing.push(KeyRef::new(section.name(), key));
            }
        }
    }

    let mut untranslated = Vec::new();
    let mut obsolete = Vec::new();
    for section in target_data.sections() {
        for entry in section.entries() {
            if !base.has_option(section.name(), &entry.key) {
                obsolete.push(KeyRef::new(section.name(), &entry.key));
            } else if let Some(marker) = Marker::detect(&entry.value) {
                untranslated.push(UntranslatedKey {
                    section: section.name().to_string(),
                    key: entry.key.clone(),
                    marker,
                });
            }
        }
    }

    DomainReport {
        domain: domain.prefix.clone(),
        has_standalone: domain.has_standalone,
        target_present: target.is_some(),
        missing,
        untranslated,
        obsolete,
    }
}

/// 検証ジョブのパラメータ
#[derive(Debug, Clone)]
pub struct VerifyJob {
    /// 検証する言語
    pub target_language: String,
    /// 翻訳ファイルのディレクトリ
    pub directory: PathBuf,
}

impl VerifyJob {
    #[must_use]
    pub fn new(target_language: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self { target_language: target_language.into(), directory: directory.into() }
    }

    /// 全ドメインを検証する
    ///
    /// # Errors
    /// - 言語コードが不正
    /// - ベース言語のファイルがない、または読めない
    /// - 翻訳ファイルが読めない（存在しないのはエラーではない）
    pub fn run(&self, settings: &Settings) -> Result<Vec<DomainReport>, JobError> {
        validate_language_code("language", &self.target_language)?;

        settings.domains.iter().map(|domain| self.verify_domain(domain, settings)).collect()
    }

    /// 1 ドメインを検証する
    ///
    /// # Errors
    /// [`VerifyJob::run`] を参照
    pub fn verify_domain(
        &self,
        domain: &Domain,
        settings: &Settings,
    ) -> Result<DomainReport, JobError> {
        let base_path =
            self.directory.join(domain.file_name(&settings.base_language, &settings.file_extension));
        let base = load_dataset(&base_path)
            .map_err(|source| JobError::UnreadableBase { domain: domain.prefix.clone(), source })?
            .ok_or_else(|| JobError::MissingBase {
                domain: domain.prefix.clone(),
                path: base_path.clone(),
            })?;

        let target_path =
            self.directory.join(domain.file_name(&self.target_language, &settings.file_extension));
        let target = load_dataset(&target_path)
            .map_err(|source| JobError::UnreadableTarget { domain: domain.prefix.clone(), source })?;

        let report = compare(domain, &base, target.as_ref());
        tracing::debug!(
            domain = %domain.prefix,
            missing = report.missing.len(),
            untranslated = report.untranslated.len(),
            obsolete = report.obsolete.len(),
            "Verified domain"
        );
        Ok(report)
    }
}

/// レポートをテキスト形式で出力する
///
/// # Errors
/// 書き込みエラー
pub fn write_text_report<W: Write>(reports: &[DomainReport], out: &mut W) -> io::Result<()> {
    for report in reports {
        if !report.target_present {
            writeln!(out, "{}: no translation file", report.domain)?;
        } else if report.is_complete() {
            writeln!(out, "{}: complete", report.domain)?;
            continue;
        } else {
            writeln!(
                out,
                "{}: {} missing, {} untranslated, {} obsolete",
                report.domain,
                report.missing.len(),
                report.untranslated.len(),
                report.obsolete.len()
            )?;
        }

        for key in &report.missing {
            writeln!(out, "  missing       [{}] {}", key.section, key.key)?;
        }
        for key in &report.untranslated {
            writeln!(out, "  untranslated  [{}] {} ({})", key.section, key.key, key.marker)?;
        }
        for key in &report.obsolete {
            writeln!(out, "  obsolete      [{}] {}", key.section, key.key)?;
        }
    }
    Ok(())
}

/// レポートを JSON 形式で出力する
///
/// # Errors
/// シリアライズまたは書き込みエラー
pub fn write_json_report<W: Write>(reports: &[DomainReport], out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)
}
