//! # エラー処理モジュール
//!
//! IDLコンパイラの意味解決ステージで発生するエラーを定義します。
//! すべてのエラーは閉じた種類の集合（[`ErrorKind`]）のいずれかに属し、
//! 原因となった宣言・メンバーのソース位置を保持します。
//! 位置情報の整形・表示は診断を担当する後段の責務です。

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// ソースコード内の位置情報
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    /// 行番号（1から始まる）
    pub line: usize,
    /// 列番号（1から始まる）
    pub column: usize,
    /// 位置のバイトオフセット
    pub offset: usize,
    /// 範囲の長さ（バイト単位）
    pub length: usize,
}

impl SourceLocation {
    /// 新しい位置情報を作成
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// 位置情報が有効かどうかを確認
    pub fn is_valid(&self) -> bool {
        self.line > 0 && self.column > 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "<不明な位置>")
        }
    }
}

/// エラーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// ファイル間でライブラリ名が一致しない
    LibraryNameMismatch,
    /// 同名の宣言が既に存在する
    DuplicateDeclaration,
    /// メソッドの序数が不正（ゼロ・解析不能・欠落）
    InvalidOrdinal,
    /// リクエストもレスポンスも持たないメソッド
    EmptyMethod,
    /// 値による埋め込みの循環
    CyclicDependency,
    /// 未定義の識別子
    UnknownIdentifier,
    /// 定数を型として参照した
    ConstIsNotAType,
    /// nullable な列挙型参照
    NullableEnum,
    /// `request<I>` の I がインターフェースではない
    InvalidRequestType,
    /// 配列の要素数が不正、または配列を含む集約のサイズがあふれる
    InvalidArraySize,
    /// vector / string の上限が不正
    InvalidBound,
    /// 列挙型の基底型が整数型ではない
    InvalidEnumSubtype,
    /// インターフェース内でメソッド名が重複
    DuplicateMethodName,
    /// インターフェース内で序数が重複
    DuplicateMethodOrdinal,
    /// 構造体・共用体・列挙型・メッセージ内でメンバー名が重複
    DuplicateMemberName,
    /// 列挙型メンバーの値が基底型に収まらない
    InvalidEnumValue,
    /// 内部エラー（不変条件の破れ）
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ErrorKind::LibraryNameMismatch => "ライブラリ名不一致",
            ErrorKind::DuplicateDeclaration => "宣言の重複",
            ErrorKind::InvalidOrdinal => "不正な序数",
            ErrorKind::EmptyMethod => "空のメソッド",
            ErrorKind::CyclicDependency => "循環依存",
            ErrorKind::UnknownIdentifier => "未定義の識別子",
            ErrorKind::ConstIsNotAType => "定数は型ではない",
            ErrorKind::NullableEnum => "nullable な列挙型",
            ErrorKind::InvalidRequestType => "不正なリクエスト型",
            ErrorKind::InvalidArraySize => "不正な配列サイズ",
            ErrorKind::InvalidBound => "不正な上限",
            ErrorKind::InvalidEnumSubtype => "不正な列挙型の基底型",
            ErrorKind::DuplicateMethodName => "メソッド名の重複",
            ErrorKind::DuplicateMethodOrdinal => "序数の重複",
            ErrorKind::DuplicateMemberName => "メンバー名の重複",
            ErrorKind::InvalidEnumValue => "不正な列挙値",
            ErrorKind::Internal => "内部エラー",
        };
        write!(f, "{}", message)
    }
}

/// コンパイラエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilerError {
    #[error("{location}: ライブラリ名 '{found}' は既に消費したライブラリ '{expected}' と一致しません")]
    LibraryNameMismatch {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error("{location}: '{name}' は既に宣言されています（最初の宣言: {previous}）")]
    DuplicateDeclaration {
        name: String,
        location: SourceLocation,
        previous: SourceLocation,
    },

    #[error("{location}: メソッド '{method}' の序数が不正です: {reason}")]
    InvalidOrdinal {
        method: String,
        reason: String,
        location: SourceLocation,
    },

    #[error("{location}: メソッド '{method}' はリクエストもレスポンスも持ちません")]
    EmptyMethod {
        method: String,
        location: SourceLocation,
    },

    #[error("{location}: 循環依存が検出されました: {}", .cycle.join(", "))]
    CyclicDependency {
        cycle: Vec<String>,
        location: SourceLocation,
    },

    #[error("{location}: 未定義の識別子 '{name}'")]
    UnknownIdentifier {
        name: String,
        location: SourceLocation,
    },

    #[error("{location}: 定数 '{name}' は型として使用できません")]
    ConstIsNotAType {
        name: String,
        location: SourceLocation,
    },

    #[error("{location}: 列挙型 '{name}' は nullable にできません")]
    NullableEnum {
        name: String,
        location: SourceLocation,
    },

    #[error("{location}: request<{name}> の '{name}' はインターフェースではありません")]
    InvalidRequestType {
        name: String,
        location: SourceLocation,
    },

    #[error("{location}: 配列の要素数 '{count}' は正の整数リテラルでなければなりません")]
    InvalidArraySize {
        count: String,
        location: SourceLocation,
    },

    #[error("{location}: '{owner}' のサイズが 64 ビットで表現できる範囲を超えています")]
    TypeShapeOverflow {
        owner: String,
        location: SourceLocation,
    },

    #[error("{location}: 上限 '{bound}' は正の整数リテラルでなければなりません")]
    InvalidBound {
        bound: String,
        location: SourceLocation,
    },

    #[error("{location}: 列挙型 '{name}' の基底型 '{subtype}' は整数型ではありません")]
    InvalidEnumSubtype {
        name: String,
        subtype: String,
        location: SourceLocation,
    },

    #[error("{location}: インターフェース '{interface}' でメソッド名 '{method}' が重複しています")]
    DuplicateMethodName {
        interface: String,
        method: String,
        location: SourceLocation,
    },

    #[error("{location}: インターフェース '{interface}' で序数 {ordinal} が重複しています")]
    DuplicateMethodOrdinal {
        interface: String,
        ordinal: u32,
        location: SourceLocation,
    },

    #[error("{location}: '{owner}' でメンバー名 '{member}' が重複しています")]
    DuplicateMemberName {
        owner: String,
        member: String,
        location: SourceLocation,
    },

    #[error("{location}: 列挙型 '{name}' のメンバー '{member}' の値 '{value}' は基底型に収まりません")]
    InvalidEnumValue {
        name: String,
        member: String,
        value: String,
        location: SourceLocation,
    },

    #[error("内部エラー: {0}")]
    Internal(String),
}

impl CompilerError {
    /// エラーの種類を取得
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompilerError::LibraryNameMismatch { .. } => ErrorKind::LibraryNameMismatch,
            CompilerError::DuplicateDeclaration { .. } => ErrorKind::DuplicateDeclaration,
            CompilerError::InvalidOrdinal { .. } => ErrorKind::InvalidOrdinal,
            CompilerError::EmptyMethod { .. } => ErrorKind::EmptyMethod,
            CompilerError::CyclicDependency { .. } => ErrorKind::CyclicDependency,
            CompilerError::UnknownIdentifier { .. } => ErrorKind::UnknownIdentifier,
            CompilerError::ConstIsNotAType { .. } => ErrorKind::ConstIsNotAType,
            CompilerError::NullableEnum { .. } => ErrorKind::NullableEnum,
            CompilerError::InvalidRequestType { .. } => ErrorKind::InvalidRequestType,
            CompilerError::InvalidArraySize { .. } | CompilerError::TypeShapeOverflow { .. } => {
                ErrorKind::InvalidArraySize
            }
            CompilerError::InvalidBound { .. } => ErrorKind::InvalidBound,
            CompilerError::InvalidEnumSubtype { .. } => ErrorKind::InvalidEnumSubtype,
            CompilerError::DuplicateMethodName { .. } => ErrorKind::DuplicateMethodName,
            CompilerError::DuplicateMethodOrdinal { .. } => ErrorKind::DuplicateMethodOrdinal,
            CompilerError::DuplicateMemberName { .. } => ErrorKind::DuplicateMemberName,
            CompilerError::InvalidEnumValue { .. } => ErrorKind::InvalidEnumValue,
            CompilerError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// エラーの位置を取得（内部エラーは位置を持たない）
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            CompilerError::LibraryNameMismatch { location, .. }
            | CompilerError::DuplicateDeclaration { location, .. }
            | CompilerError::InvalidOrdinal { location, .. }
            | CompilerError::EmptyMethod { location, .. }
            | CompilerError::CyclicDependency { location, .. }
            | CompilerError::UnknownIdentifier { location, .. }
            | CompilerError::ConstIsNotAType { location, .. }
            | CompilerError::NullableEnum { location, .. }
            | CompilerError::InvalidRequestType { location, .. }
            | CompilerError::InvalidArraySize { location, .. }
            | CompilerError::TypeShapeOverflow { location, .. }
            | CompilerError::InvalidBound { location, .. }
            | CompilerError::InvalidEnumSubtype { location, .. }
            | CompilerError::DuplicateMethodName { location, .. }
            | CompilerError::DuplicateMethodOrdinal { location, .. }
            | CompilerError::DuplicateMemberName { location, .. }
            | CompilerError::InvalidEnumValue { location, .. } => Some(*location),
            CompilerError::Internal(_) => None,
        }
    }
}

/// コンパイラの結果型
pub type Result<T> = std::result::Result<T, CompilerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_location() {
        let location = SourceLocation::new(3, 8, 40, 5);
        let error = CompilerError::UnknownIdentifier {
            name: "Missing".to_string(),
            location,
        };

        assert_eq!(error.kind(), ErrorKind::UnknownIdentifier);
        assert_eq!(error.location(), Some(location));
        assert!(error.to_string().starts_with("3:8:"));
        assert!(error.to_string().contains("Missing"));
    }

    #[test]
    fn test_internal_error_has_no_location() {
        let error = CompilerError::Internal("壊れた順序".to_string());
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert_eq!(error.location(), None);
    }

    #[test]
    fn test_overflow_is_an_array_size_error() {
        let location = SourceLocation::new(5, 1, 0, 1);
        let error = CompilerError::TypeShapeOverflow {
            owner: "Huge".to_string(),
            location,
        };
        assert_eq!(error.kind(), ErrorKind::InvalidArraySize);
        assert_eq!(error.location(), Some(location));
        assert!(error.to_string().contains("Huge"));
    }

    #[test]
    fn test_cycle_message_lists_members() {
        let error = CompilerError::CyclicDependency {
            cycle: vec!["A".to_string(), "B".to_string()],
            location: SourceLocation::default(),
        };
        assert!(error.to_string().contains("A, B"));
    }
}
