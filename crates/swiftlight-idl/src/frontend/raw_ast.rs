//! # 生の構文木（Raw AST）
//!
//! パーサーが生成し、意味解決ステージに引き渡される構文木の定義です。
//! ソースファイル1つにつき1つの [`File`] が生成されます。
//! このステージは構文木を読み取り専用の入力として扱い、
//! [`crate::frontend::semantic::consumer`] が宣言モデルへ平坦化します。

use std::fmt;

use serde::Serialize;

use crate::frontend::error::SourceLocation;
use crate::frontend::types::{HandleSubtype, Nullability, PrimitiveSubtype};

/// 識別子（単一の名前とその位置）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub location: SourceLocation,
}

impl Identifier {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// ドット区切りの複合識別子（`fuchsia.io.Node` など）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundIdentifier {
    pub components: Vec<Identifier>,
}

impl CompoundIdentifier {
    pub fn new(components: Vec<Identifier>) -> Self {
        Self { components }
    }

    /// 単一要素の複合識別子を作成
    pub fn single(name: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(vec![Identifier::new(name, location)])
    }

    /// 先頭要素の位置（要素が無い場合は既定値）
    pub fn location(&self) -> SourceLocation {
        self.components
            .first()
            .map(|component| component.location)
            .unwrap_or_default()
    }

    /// ドット区切りの文字列表現
    pub fn dotted(&self) -> String {
        self.components
            .iter()
            .map(|component| component.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for CompoundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// リテラルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    String,
    Numeric,
    True,
    False,
    Default,
}

/// リテラル（ソース上のテキストをそのまま保持）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Literal {
    /// 数値リテラルを作成
    pub fn numeric(text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: LiteralKind::Numeric,
            text: text.into(),
            location,
        }
    }
}

/// 定数式（識別子参照またはリテラル）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Constant {
    Identifier(CompoundIdentifier),
    Literal(Literal),
}

impl Constant {
    pub fn location(&self) -> SourceLocation {
        match self {
            Constant::Identifier(identifier) => identifier.location(),
            Constant::Literal(literal) => literal.location,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Identifier(identifier) => write!(f, "{}", identifier),
            Constant::Literal(literal) => write!(f, "{}", literal.text),
        }
    }
}

/// 属性（`[OrdinalName = "Foo"]` など）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: Identifier,
    pub value: Option<String>,
}

/// 属性リスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeList {
    pub attributes: Vec<Attribute>,
}

impl AttributeList {
    /// 名前で属性値を検索
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.name == name)
            .and_then(|attribute| attribute.value.as_deref())
    }
}

/// 型の構文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Type {
    /// `array<T>:N`
    Array {
        element_type: Box<Type>,
        element_count: Constant,
        location: SourceLocation,
    },
    /// `vector<T>:N?`
    Vector {
        element_type: Box<Type>,
        maybe_element_count: Option<Constant>,
        nullability: Nullability,
        location: SourceLocation,
    },
    /// `string:N?`
    String {
        maybe_element_count: Option<Constant>,
        nullability: Nullability,
        location: SourceLocation,
    },
    /// `handle<subtype>?`
    Handle {
        subtype: HandleSubtype,
        nullability: Nullability,
        location: SourceLocation,
    },
    /// `request<I>?`
    Request {
        subtype: CompoundIdentifier,
        nullability: Nullability,
        location: SourceLocation,
    },
    /// `uint32` など
    Primitive {
        subtype: PrimitiveSubtype,
        location: SourceLocation,
    },
    /// 宣言への名前参照
    Identifier {
        identifier: CompoundIdentifier,
        nullability: Nullability,
        location: SourceLocation,
    },
}

impl Type {
    pub fn location(&self) -> SourceLocation {
        match self {
            Type::Array { location, .. }
            | Type::Vector { location, .. }
            | Type::String { location, .. }
            | Type::Handle { location, .. }
            | Type::Request { location, .. }
            | Type::Primitive { location, .. }
            | Type::Identifier { location, .. } => *location,
        }
    }
}

/// `using` 宣言（このステージでは解決しない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Using {
    pub using_path: CompoundIdentifier,
    pub maybe_alias: Option<Identifier>,
}

/// 定数宣言
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstDeclaration {
    pub attributes: AttributeList,
    pub type_ctor: Type,
    pub identifier: Identifier,
    pub constant: Constant,
}

/// 列挙型のメンバー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    pub identifier: Identifier,
    pub value: Constant,
}

/// 列挙型宣言
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDeclaration {
    pub attributes: AttributeList,
    pub identifier: Identifier,
    pub maybe_subtype: Option<PrimitiveSubtype>,
    pub members: Vec<EnumMember>,
}

/// メソッドのパラメータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub type_ctor: Type,
    pub identifier: Identifier,
}

/// パラメータリスト（リクエストまたはレスポンス）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterList {
    pub parameters: Vec<Parameter>,
}

/// インターフェースのメソッド
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceMethod {
    pub attributes: AttributeList,
    /// 明示的な序数（省略時は導出される）
    pub ordinal: Option<Literal>,
    pub identifier: Identifier,
    pub maybe_request: Option<ParameterList>,
    pub maybe_response: Option<ParameterList>,
}

/// インターフェース宣言
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDeclaration {
    pub attributes: AttributeList,
    pub identifier: Identifier,
    pub const_members: Vec<ConstDeclaration>,
    pub enum_members: Vec<EnumDeclaration>,
    pub method_members: Vec<InterfaceMethod>,
}

/// 構造体のメンバー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructMember {
    pub type_ctor: Type,
    pub identifier: Identifier,
    pub maybe_default_value: Option<Constant>,
}

/// 構造体宣言
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDeclaration {
    pub attributes: AttributeList,
    pub identifier: Identifier,
    pub const_members: Vec<ConstDeclaration>,
    pub enum_members: Vec<EnumDeclaration>,
    pub members: Vec<StructMember>,
}

/// 共用体のメンバー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionMember {
    pub type_ctor: Type,
    pub identifier: Identifier,
}

/// 共用体宣言
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionDeclaration {
    pub attributes: AttributeList,
    pub identifier: Identifier,
    pub members: Vec<UnionMember>,
}

/// ソースファイル1つ分の構文木
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub library_name: CompoundIdentifier,
    pub using_list: Vec<Using>,
    pub const_declaration_list: Vec<ConstDeclaration>,
    pub enum_declaration_list: Vec<EnumDeclaration>,
    pub interface_declaration_list: Vec<InterfaceDeclaration>,
    pub struct_declaration_list: Vec<StructDeclaration>,
    pub union_declaration_list: Vec<UnionDeclaration>,
}

impl File {
    /// 宣言を持たない空のファイルを作成
    pub fn new(library_name: CompoundIdentifier) -> Self {
        Self {
            library_name,
            using_list: Vec::new(),
            const_declaration_list: Vec::new(),
            enum_declaration_list: Vec::new(),
            interface_declaration_list: Vec::new(),
            struct_declaration_list: Vec::new(),
            union_declaration_list: Vec::new(),
        }
    }
}
