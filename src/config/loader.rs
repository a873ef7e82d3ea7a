//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    Settings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".dat-i18n.json";

/// 翻訳ディレクトリから設定を読み込む
///
/// `.dat-i18n.json` ファイルを探して読み込む
///
/// # Arguments
/// * `directory` - 翻訳ファイルのあるディレクトリ
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_directory(directory: &Path) -> Result<Option<Settings>, ConfigError> {
    let config_path = directory.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: Settings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// 設定を読み込み、バリデーションする
///
/// 設定ファイルがない場合はデフォルト値を使う。
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
/// - バリデーションエラー
pub fn load_settings(directory: &Path) -> Result<Settings, ConfigError> {
    let settings = load_from_directory(directory)?.map_or_else(Settings::default, |settings| {
        tracing::debug!("Loaded directory settings: {:?}", settings);
        settings
    });

    // バリデーション
    settings.validate().map_err(ConfigError::ValidationErrors)?;

    Ok(settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_directory`: 設定ファイルが存在する場合
    #[rstest]
    fn test_load_from_directory_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"baseLanguage": "de_DE"}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let result = load_from_directory(temp_dir.path());

        assert!(result.is_ok());
        let settings = result.unwrap();
        assert!(settings.is_some());
        assert_eq!(settings.unwrap().base_language, "de_DE");
    }

    /// `load_from_directory`: 設定ファイルが存在しない場合
    #[rstest]
    fn test_load_from_directory_no_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_directory(temp_dir.path());

        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    /// `load_from_directory`: JSON パースエラー
    #[rstest]
    fn test_load_from_directory_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "invalid json").unwrap();

        let result = load_from_directory(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    /// `load_settings`: 設定ファイルがない場合はデフォルト値
    #[rstest]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let settings = load_settings(temp_dir.path()).unwrap();

        assert_eq!(settings.base_language, "en_US");
        assert_eq!(settings.domains.len(), 6);
    }

    /// `load_settings`: 無効な設定でエラー
    #[rstest]
    fn test_load_settings_invalid() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"domains": []}"#).unwrap();

        let result = load_settings(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ValidationErrors(errors)) if errors.len() == 1));
    }
}
