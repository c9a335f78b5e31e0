//! 統合テスト用の構文木ビルダー

#![allow(dead_code)]

use swiftlight_idl::frontend::error::SourceLocation;
use swiftlight_idl::frontend::raw_ast::{
    Attribute, AttributeList, CompoundIdentifier, ConstDeclaration, Constant, EnumDeclaration,
    EnumMember, File, Identifier, InterfaceDeclaration, InterfaceMethod, Literal, Parameter,
    ParameterList, StructDeclaration, StructMember, Type, UnionDeclaration, UnionMember,
};
use swiftlight_idl::frontend::semantic::decl::{Decl, Enum, Interface, Struct, Union};
use swiftlight_idl::frontend::types::{HandleSubtype, Nullability, PrimitiveSubtype};
use swiftlight_idl::{FieldShape, Library};

/// テスト用ロガーを初期化（複数回呼んでもよい）
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn loc() -> SourceLocation {
    SourceLocation::new(1, 1, 0, 1)
}

/// 指定行の位置
pub fn at(line: usize) -> SourceLocation {
    SourceLocation::new(line, 1, 0, 1)
}

pub fn ident(name: &str) -> Identifier {
    Identifier::new(name, loc())
}

/// ドット区切りの名前から複合識別子を作成
pub fn compound(dotted: &str) -> CompoundIdentifier {
    CompoundIdentifier::new(dotted.split('.').map(ident).collect())
}

pub fn number(text: &str) -> Constant {
    Constant::Literal(Literal::numeric(text, loc()))
}

// ---- 型 ----

pub fn prim(subtype: PrimitiveSubtype) -> Type {
    Type::Primitive {
        subtype,
        location: loc(),
    }
}

pub fn uint8() -> Type {
    prim(PrimitiveSubtype::Uint8)
}

pub fn uint16() -> Type {
    prim(PrimitiveSubtype::Uint16)
}

pub fn uint32() -> Type {
    prim(PrimitiveSubtype::Uint32)
}

pub fn uint64() -> Type {
    prim(PrimitiveSubtype::Uint64)
}

pub fn handle(subtype: HandleSubtype) -> Type {
    Type::Handle {
        subtype,
        nullability: Nullability::Nonnullable,
        location: loc(),
    }
}

pub fn array(element: Type, count: &str) -> Type {
    Type::Array {
        element_type: Box::new(element),
        element_count: number(count),
        location: loc(),
    }
}

pub fn vector(element: Type) -> Type {
    Type::Vector {
        element_type: Box::new(element),
        maybe_element_count: None,
        nullability: Nullability::Nonnullable,
        location: loc(),
    }
}

pub fn bounded_vector(element: Type, bound: &str) -> Type {
    Type::Vector {
        element_type: Box::new(element),
        maybe_element_count: Some(number(bound)),
        nullability: Nullability::Nonnullable,
        location: loc(),
    }
}

pub fn string() -> Type {
    Type::String {
        maybe_element_count: None,
        nullability: Nullability::Nonnullable,
        location: loc(),
    }
}

pub fn bounded_string(bound: &str) -> Type {
    Type::String {
        maybe_element_count: Some(number(bound)),
        nullability: Nullability::Nonnullable,
        location: loc(),
    }
}

pub fn request(name: &str) -> Type {
    Type::Request {
        subtype: compound(name),
        nullability: Nullability::Nonnullable,
        location: loc(),
    }
}

/// 宣言への値参照
pub fn named(name: &str) -> Type {
    Type::Identifier {
        identifier: compound(name),
        nullability: Nullability::Nonnullable,
        location: loc(),
    }
}

/// 宣言への nullable 参照
pub fn nullable(name: &str) -> Type {
    Type::Identifier {
        identifier: compound(name),
        nullability: Nullability::Nullable,
        location: loc(),
    }
}

// ---- 宣言 ----

pub fn const_decl(name: &str, type_ctor: Type, value: &str) -> ConstDeclaration {
    ConstDeclaration {
        attributes: AttributeList::default(),
        type_ctor,
        identifier: ident(name),
        constant: number(value),
    }
}

pub fn enum_decl(
    name: &str,
    subtype: Option<PrimitiveSubtype>,
    members: &[(&str, &str)],
) -> EnumDeclaration {
    EnumDeclaration {
        attributes: AttributeList::default(),
        identifier: ident(name),
        maybe_subtype: subtype,
        members: members
            .iter()
            .map(|(name, value)| EnumMember {
                identifier: ident(name),
                value: number(value),
            })
            .collect(),
    }
}

pub fn struct_decl(name: &str, members: Vec<(&str, Type)>) -> StructDeclaration {
    StructDeclaration {
        attributes: AttributeList::default(),
        identifier: ident(name),
        const_members: Vec::new(),
        enum_members: Vec::new(),
        members: members
            .into_iter()
            .map(|(name, type_ctor)| StructMember {
                type_ctor,
                identifier: ident(name),
                maybe_default_value: None,
            })
            .collect(),
    }
}

pub fn union_decl(name: &str, members: Vec<(&str, Type)>) -> UnionDeclaration {
    UnionDeclaration {
        attributes: AttributeList::default(),
        identifier: ident(name),
        members: members
            .into_iter()
            .map(|(name, type_ctor)| UnionMember {
                type_ctor,
                identifier: ident(name),
            })
            .collect(),
    }
}

pub fn params(parameters: Vec<(&str, Type)>) -> ParameterList {
    ParameterList {
        parameters: parameters
            .into_iter()
            .map(|(name, type_ctor)| Parameter {
                type_ctor,
                identifier: ident(name),
            })
            .collect(),
    }
}

/// メソッドを作成（`ordinal` が `None` なら導出される）
pub fn method(
    name: &str,
    ordinal: Option<&str>,
    request: Option<ParameterList>,
    response: Option<ParameterList>,
) -> InterfaceMethod {
    InterfaceMethod {
        attributes: AttributeList::default(),
        ordinal: ordinal.map(|text| Literal::numeric(text, loc())),
        identifier: ident(name),
        maybe_request: request,
        maybe_response: response,
    }
}

/// 属性を付ける
pub fn with_attribute(mut method: InterfaceMethod, name: &str, value: &str) -> InterfaceMethod {
    method.attributes.attributes.push(Attribute {
        name: ident(name),
        value: Some(value.to_string()),
    });
    method
}

pub fn interface_decl(name: &str, methods: Vec<InterfaceMethod>) -> InterfaceDeclaration {
    InterfaceDeclaration {
        attributes: AttributeList::default(),
        identifier: ident(name),
        const_members: Vec::new(),
        enum_members: Vec::new(),
        method_members: methods,
    }
}

/// ファイルビルダー
pub struct FileBuilder {
    file: File,
}

impl FileBuilder {
    pub fn new(library_name: &str) -> Self {
        Self {
            file: File::new(compound(library_name)),
        }
    }

    pub fn constant(mut self, decl: ConstDeclaration) -> Self {
        self.file.const_declaration_list.push(decl);
        self
    }

    pub fn enumeration(mut self, decl: EnumDeclaration) -> Self {
        self.file.enum_declaration_list.push(decl);
        self
    }

    pub fn interface(mut self, decl: InterfaceDeclaration) -> Self {
        self.file.interface_declaration_list.push(decl);
        self
    }

    pub fn structure(mut self, decl: StructDeclaration) -> Self {
        self.file.struct_declaration_list.push(decl);
        self
    }

    pub fn union(mut self, decl: UnionDeclaration) -> Self {
        self.file.union_declaration_list.push(decl);
        self
    }

    pub fn build(self) -> File {
        self.file
    }
}

// ---- 解決結果の取り出し ----

pub fn decl<'a>(library: &'a Library, name: &str) -> &'a Decl {
    let id = library
        .lookup(name)
        .unwrap_or_else(|| panic!("宣言 '{}' が見つかりません", name));
    library.decl(id)
}

pub fn struct_of<'a>(library: &'a Library, name: &str) -> &'a Struct {
    match decl(library, name) {
        Decl::Struct(decl) => decl,
        other => panic!("'{}' は構造体ではありません: {:?}", name, other.kind()),
    }
}

pub fn union_of<'a>(library: &'a Library, name: &str) -> &'a Union {
    match decl(library, name) {
        Decl::Union(decl) => decl,
        other => panic!("'{}' は共用体ではありません: {:?}", name, other.kind()),
    }
}

pub fn enum_of<'a>(library: &'a Library, name: &str) -> &'a Enum {
    match decl(library, name) {
        Decl::Enum(decl) => decl,
        other => panic!("'{}' は列挙型ではありません: {:?}", name, other.kind()),
    }
}

pub fn interface_of<'a>(library: &'a Library, name: &str) -> &'a Interface {
    match decl(library, name) {
        Decl::Interface(decl) => decl,
        other => panic!("'{}' はインターフェースではありません: {:?}", name, other.kind()),
    }
}

/// 構造体メンバーの配置
pub fn struct_fields(library: &Library, name: &str) -> Vec<FieldShape> {
    struct_of(library, name)
        .members
        .iter()
        .map(|member| member.fieldshape.expect("メンバーの形状が未設定"))
        .collect()
}

/// ライブラリ内のすべての配置（構造体・共用体・メッセージ）
pub fn all_fields(library: &Library) -> Vec<FieldShape> {
    let mut fields = Vec::new();
    for (_, decl) in library.declarations() {
        match decl {
            Decl::Struct(decl) => fields.extend(decl.members.iter().filter_map(|m| m.fieldshape)),
            Decl::Union(decl) => fields.extend(decl.members.iter().filter_map(|m| m.fieldshape)),
            Decl::Interface(decl) => {
                for method in &decl.methods {
                    for message in [&method.maybe_request, &method.maybe_response]
                        .into_iter()
                        .flatten()
                    {
                        fields.extend(message.parameters.iter().filter_map(|p| p.fieldshape));
                    }
                }
            }
            Decl::Const(_) | Decl::Enum(_) => {}
        }
    }
    fields
}
