//! # コンパイラ設定
//!
//! 意味解決ステージの動作を切り替える設定です。
//! 埋め込み側のツールが TOML の断片として渡すことを想定しています。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 設定の読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("設定の解析に失敗しました: {0}")]
    Parse(#[from] toml::de::Error),
}

/// コンパイラ設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// 序数が省略されたメソッドの序数を導出する
    #[serde(default = "default_true")]
    pub derive_missing_ordinals: bool,

    /// 列挙型メンバーのリテラル値が基底型に収まるか検査する
    #[serde(default = "default_true")]
    pub validate_enum_values: bool,

    /// 詳細なログ出力
    #[serde(default)]
    pub verbose: bool,

    /// 統計情報の収集
    #[serde(default)]
    pub collect_stats: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            derive_missing_ordinals: true,
            validate_enum_values: true,
            verbose: false,
            collect_stats: false,
        }
    }
}

impl CompilerConfig {
    /// TOML 文字列から設定を読み込む（省略した項目は既定値）
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// 詳細出力を設定
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 統計情報の収集を設定
    pub fn with_stats(mut self, collect_stats: bool) -> Self {
        self.collect_stats = collect_stats;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert!(config.derive_missing_ordinals);
        assert!(config.validate_enum_values);
    }

    #[test]
    fn test_partial_toml() {
        let config = CompilerConfig::from_toml_str(
            r#"
            derive_missing_ordinals = false
            verbose = true
            "#,
        )
        .unwrap();

        assert!(!config.derive_missing_ordinals);
        assert!(config.validate_enum_values);
        assert!(config.verbose);
        assert!(!config.collect_stats);
    }

    #[test]
    fn test_invalid_toml() {
        let err = CompilerConfig::from_toml_str("verbose = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_builders() {
        let config = CompilerConfig::default().with_verbose(true).with_stats(true);
        assert!(config.verbose);
        assert!(config.collect_stats);
    }
}
