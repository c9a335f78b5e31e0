//! # 宣言モデル
//!
//! ライブラリ単位で平坦化された宣言（定数・列挙型・インターフェース・構造体・共用体）
//! の所有表現です。形状（[`TypeShape`] / [`FieldShape`]）は解決前は `None` で、
//! レイアウト計算で一度だけ設定されます。

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::frontend::error::SourceLocation;
use crate::frontend::raw_ast::{self, Identifier};
use crate::frontend::types::PrimitiveSubtype;
use crate::typesystem::shape::{FieldShape, TypeShape};

/// 宣言ID（ライブラリ内の宣言を登録順に識別する）
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub struct DeclId(u32);

impl DeclId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// 宣言の名前
///
/// 同一性と順序はテキストのみで決まり、位置は診断用に保持します。
#[derive(Debug, Clone, Serialize)]
pub struct Name {
    name: String,
    location: SourceLocation,
}

impl Name {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

impl From<&Identifier> for Name {
    fn from(identifier: &Identifier) -> Self {
        Self::new(identifier.name.clone(), identifier.location)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 宣言の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclKind {
    Const,
    Enum,
    Interface,
    Struct,
    Union,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Const => write!(f, "定数"),
            DeclKind::Enum => write!(f, "列挙型"),
            DeclKind::Interface => write!(f, "インターフェース"),
            DeclKind::Struct => write!(f, "構造体"),
            DeclKind::Union => write!(f, "共用体"),
        }
    }
}

/// 定数宣言
#[derive(Debug, Clone, Serialize)]
pub struct Const {
    pub name: Name,
    pub type_ctor: raw_ast::Type,
    pub value: raw_ast::Constant,
}

/// 列挙型のメンバー（記憶域ではなく名前付き整数定数）
#[derive(Debug, Clone, Serialize)]
pub struct EnumMember {
    pub name: Identifier,
    pub value: raw_ast::Constant,
}

/// 列挙型宣言
#[derive(Debug, Clone, Serialize)]
pub struct Enum {
    pub name: Name,
    pub subtype: PrimitiveSubtype,
    pub members: Vec<EnumMember>,
    pub typeshape: Option<TypeShape>,
}

/// メソッドの序数
#[derive(Debug, Clone, Serialize)]
pub struct Ordinal {
    /// 明示的なリテラル（導出された序数では `None`）
    pub maybe_literal: Option<raw_ast::Literal>,
    value: u32,
}

impl Ordinal {
    pub fn new(maybe_literal: Option<raw_ast::Literal>, value: u32) -> Self {
        Self {
            maybe_literal,
            value,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

/// メッセージのパラメータ
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub type_ctor: raw_ast::Type,
    pub name: Identifier,
    pub fieldshape: Option<FieldShape>,
}

/// リクエストまたはレスポンスのメッセージ（構造体として配置される）
#[derive(Debug, Clone, Default, Serialize)]
pub struct Message {
    pub parameters: Vec<Parameter>,
    pub typeshape: Option<TypeShape>,
}

/// インターフェースのメソッド
#[derive(Debug, Clone, Serialize)]
pub struct Method {
    pub ordinal: Ordinal,
    pub name: Identifier,
    pub maybe_request: Option<Message>,
    pub maybe_response: Option<Message>,
}

/// インターフェース宣言
#[derive(Debug, Clone, Serialize)]
pub struct Interface {
    pub name: Name,
    pub methods: Vec<Method>,
}

/// 構造体のメンバー
#[derive(Debug, Clone, Serialize)]
pub struct StructMember {
    pub type_ctor: raw_ast::Type,
    pub name: Identifier,
    pub maybe_default_value: Option<raw_ast::Constant>,
    pub fieldshape: Option<FieldShape>,
}

/// 構造体宣言
#[derive(Debug, Clone, Serialize)]
pub struct Struct {
    pub name: Name,
    pub members: Vec<StructMember>,
    pub typeshape: Option<TypeShape>,
}

/// 共用体のメンバー
#[derive(Debug, Clone, Serialize)]
pub struct UnionMember {
    pub type_ctor: raw_ast::Type,
    pub name: Identifier,
    pub fieldshape: Option<FieldShape>,
}

/// 共用体宣言（タグ付き共用体として配置される）
#[derive(Debug, Clone, Serialize)]
pub struct Union {
    pub name: Name,
    pub members: Vec<UnionMember>,
    pub typeshape: Option<TypeShape>,
}

/// 宣言
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Decl {
    Const(Const),
    Enum(Enum),
    Interface(Interface),
    Struct(Struct),
    Union(Union),
}

impl Decl {
    pub fn name(&self) -> &Name {
        match self {
            Decl::Const(decl) => &decl.name,
            Decl::Enum(decl) => &decl.name,
            Decl::Interface(decl) => &decl.name,
            Decl::Struct(decl) => &decl.name,
            Decl::Union(decl) => &decl.name,
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            Decl::Const(_) => DeclKind::Const,
            Decl::Enum(_) => DeclKind::Enum,
            Decl::Interface(_) => DeclKind::Interface,
            Decl::Struct(_) => DeclKind::Struct,
            Decl::Union(_) => DeclKind::Union,
        }
    }

    /// 宣言自身の形状
    ///
    /// 定数とインターフェースは形状を持ちません（インターフェースの形状は
    /// メッセージごとに計算されます）。
    pub fn typeshape(&self) -> Option<TypeShape> {
        match self {
            Decl::Const(_) | Decl::Interface(_) => None,
            Decl::Enum(decl) => decl.typeshape,
            Decl::Struct(decl) => decl.typeshape,
            Decl::Union(decl) => decl.typeshape,
        }
    }
}
