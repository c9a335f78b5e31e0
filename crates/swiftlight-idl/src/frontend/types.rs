//! # 組み込み型の分類
//!
//! 構文木と宣言モデルの両方で共有される、プリミティブ型・ハンドル型の
//! サブタイプと nullability の定義です。

use std::fmt;

use serde::Serialize;

/// プリミティブ型のサブタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveSubtype {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
    Status,
    Float32,
    Float64,
}

impl PrimitiveSubtype {
    /// 列挙型の基底型として使える整数型かどうか
    pub fn is_integer(&self) -> bool {
        match self {
            PrimitiveSubtype::Int8
            | PrimitiveSubtype::Int16
            | PrimitiveSubtype::Int32
            | PrimitiveSubtype::Int64
            | PrimitiveSubtype::Uint8
            | PrimitiveSubtype::Uint16
            | PrimitiveSubtype::Uint32
            | PrimitiveSubtype::Uint64 => true,
            PrimitiveSubtype::Bool
            | PrimitiveSubtype::Status
            | PrimitiveSubtype::Float32
            | PrimitiveSubtype::Float64 => false,
        }
    }

    /// 文字列表現の取得
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveSubtype::Int8 => "int8",
            PrimitiveSubtype::Int16 => "int16",
            PrimitiveSubtype::Int32 => "int32",
            PrimitiveSubtype::Int64 => "int64",
            PrimitiveSubtype::Uint8 => "uint8",
            PrimitiveSubtype::Uint16 => "uint16",
            PrimitiveSubtype::Uint32 => "uint32",
            PrimitiveSubtype::Uint64 => "uint64",
            PrimitiveSubtype::Bool => "bool",
            PrimitiveSubtype::Status => "status",
            PrimitiveSubtype::Float32 => "float32",
            PrimitiveSubtype::Float64 => "float64",
        }
    }
}

impl fmt::Display for PrimitiveSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ハンドル型のサブタイプ
///
/// レイアウトには影響しません（ハンドルは常に `(4, 4)`）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSubtype {
    #[default]
    Handle,
    Process,
    Thread,
    Vmo,
    Channel,
    Event,
    Port,
    Interrupt,
    Log,
    Socket,
    Resource,
    Eventpair,
    Job,
    Vmar,
    Fifo,
    Timer,
}

/// nullability（`?` 接尾辞の有無）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nullability {
    Nullable,
    #[default]
    Nonnullable,
}

impl Nullability {
    pub fn is_nullable(&self) -> bool {
        matches!(self, Nullability::Nullable)
    }
}
