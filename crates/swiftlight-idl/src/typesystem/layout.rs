//! # 宣言のレイアウト
//!
//! 1つの宣言について、メンバー名・序数の一意性を検査し、メンバーの型を解決して
//! 宣言自身の形状とメンバー配置を計算します。
//!
//! 計算（[`layout_decl`]）はライブラリを読み取り専用で参照し、結果の書き込み
//! （[`DeclLayout::apply`]）は別の段階で行います。

use crate::frontend::error::{CompilerError, Result, SourceLocation};
use crate::frontend::literal::parse_integer_constant;
use crate::frontend::raw_ast::{self, Identifier};
use crate::frontend::semantic::decl::{Const, Decl, Enum, Interface, Message, Struct, Union};
use crate::frontend::semantic::scope::Scope;
use crate::frontend::types::PrimitiveSubtype;
use crate::typesystem::resolver::TypeResolver;
use crate::typesystem::shape::{
    primitive_typeshape, struct_typeshape, union_typeshape, FieldShape, TypeShape,
};

/// メッセージ1つ分のレイアウト
pub type MessageLayout = (TypeShape, Vec<FieldShape>);

/// メソッドのリクエスト・レスポンスのレイアウト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLayout {
    pub request: Option<MessageLayout>,
    pub response: Option<MessageLayout>,
}

/// 宣言1つ分のレイアウト計算結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclLayout {
    Const,
    Enum(TypeShape),
    Interface(Vec<MethodLayout>),
    Struct(TypeShape, Vec<FieldShape>),
    Union(TypeShape, Vec<FieldShape>),
}

/// 宣言のレイアウトを計算する
pub fn layout_decl(resolver: &TypeResolver<'_>, decl: &Decl) -> Result<DeclLayout> {
    match decl {
        Decl::Const(decl) => layout_const(resolver, decl),
        Decl::Enum(decl) => layout_enum(resolver, decl),
        Decl::Interface(decl) => layout_interface(resolver, decl),
        Decl::Struct(decl) => layout_struct(resolver, decl),
        Decl::Union(decl) => layout_union(resolver, decl),
    }
}

/// 定数は型の検証のみ（値は評価しない）
fn layout_const(resolver: &TypeResolver<'_>, decl: &Const) -> Result<DeclLayout> {
    resolver.validate_type(&decl.type_ctor)?;
    Ok(DeclLayout::Const)
}

fn layout_enum(resolver: &TypeResolver<'_>, decl: &Enum) -> Result<DeclLayout> {
    if !decl.subtype.is_integer() {
        return Err(CompilerError::InvalidEnumSubtype {
            name: decl.name.to_string(),
            subtype: decl.subtype.to_string(),
            location: decl.name.location(),
        });
    }

    let mut scope = Scope::new();
    for member in &decl.members {
        check_member_name(&mut scope, decl.name.as_str(), &member.name)?;

        let validate = resolver.library().config().validate_enum_values;
        if validate && !enum_value_fits(decl.subtype, &member.value) {
            return Err(CompilerError::InvalidEnumValue {
                name: decl.name.to_string(),
                member: member.name.name.clone(),
                value: member.value.to_string(),
                location: member.value.location(),
            });
        }
    }

    Ok(DeclLayout::Enum(primitive_typeshape(decl.subtype)))
}

/// リテラル値が基底型の範囲に収まるか（識別子参照は評価しない）
fn enum_value_fits(subtype: PrimitiveSubtype, value: &raw_ast::Constant) -> bool {
    if let raw_ast::Constant::Identifier(_) = value {
        return true;
    }
    match subtype {
        PrimitiveSubtype::Int8 => parse_integer_constant::<i8>(value).is_some(),
        PrimitiveSubtype::Int16 => parse_integer_constant::<i16>(value).is_some(),
        PrimitiveSubtype::Int32 => parse_integer_constant::<i32>(value).is_some(),
        PrimitiveSubtype::Int64 => parse_integer_constant::<i64>(value).is_some(),
        PrimitiveSubtype::Uint8 => parse_integer_constant::<u8>(value).is_some(),
        PrimitiveSubtype::Uint16 => parse_integer_constant::<u16>(value).is_some(),
        PrimitiveSubtype::Uint32 => parse_integer_constant::<u32>(value).is_some(),
        PrimitiveSubtype::Uint64 => parse_integer_constant::<u64>(value).is_some(),
        PrimitiveSubtype::Bool
        | PrimitiveSubtype::Status
        | PrimitiveSubtype::Float32
        | PrimitiveSubtype::Float64 => false,
    }
}

fn layout_interface(resolver: &TypeResolver<'_>, decl: &Interface) -> Result<DeclLayout> {
    let mut name_scope = Scope::new();
    let mut ordinal_scope = Scope::new();
    let mut methods = Vec::with_capacity(decl.methods.len());

    for method in &decl.methods {
        name_scope
            .insert(method.name.name.as_str(), method.name.location)
            .map_err(|_| CompilerError::DuplicateMethodName {
                interface: decl.name.to_string(),
                method: method.name.name.clone(),
                location: method.name.location,
            })?;

        let ordinal = method.ordinal.value();
        let ordinal_location = method
            .ordinal
            .maybe_literal
            .as_ref()
            .map(|literal| literal.location)
            .unwrap_or(method.name.location);
        ordinal_scope
            .insert(ordinal, ordinal_location)
            .map_err(|_| CompilerError::DuplicateMethodOrdinal {
                interface: decl.name.to_string(),
                ordinal,
                location: ordinal_location,
            })?;

        let owner = format!("{}.{}", decl.name, method.name);
        let location = method.name.location;
        methods.push(MethodLayout {
            request: layout_message(resolver, &owner, location, method.maybe_request.as_ref())?,
            response: layout_message(resolver, &owner, location, method.maybe_response.as_ref())?,
        });
    }

    Ok(DeclLayout::Interface(methods))
}

/// メッセージは構造体と同じ規則で配置する
fn layout_message(
    resolver: &TypeResolver<'_>,
    owner: &str,
    location: SourceLocation,
    maybe_message: Option<&Message>,
) -> Result<Option<MessageLayout>> {
    let Some(message) = maybe_message else {
        return Ok(None);
    };

    let mut scope = Scope::new();
    let mut shapes = Vec::with_capacity(message.parameters.len());
    for parameter in &message.parameters {
        check_member_name(&mut scope, owner, &parameter.name)?;
        shapes.push(resolver.resolve_type(&parameter.type_ctor)?);
    }

    struct_typeshape(&shapes)
        .map(Some)
        .ok_or_else(|| overflow(owner, location))
}

fn layout_struct(resolver: &TypeResolver<'_>, decl: &Struct) -> Result<DeclLayout> {
    let mut scope = Scope::new();
    let mut shapes = Vec::with_capacity(decl.members.len());
    for member in &decl.members {
        check_member_name(&mut scope, decl.name.as_str(), &member.name)?;
        shapes.push(resolver.resolve_type(&member.type_ctor)?);
    }

    let (typeshape, fields) = struct_typeshape(&shapes)
        .ok_or_else(|| overflow(decl.name.as_str(), decl.name.location()))?;
    Ok(DeclLayout::Struct(typeshape, fields))
}

fn layout_union(resolver: &TypeResolver<'_>, decl: &Union) -> Result<DeclLayout> {
    let mut scope = Scope::new();
    let mut shapes = Vec::with_capacity(decl.members.len());
    for member in &decl.members {
        check_member_name(&mut scope, decl.name.as_str(), &member.name)?;
        shapes.push(resolver.resolve_type(&member.type_ctor)?);
    }

    let (typeshape, fields) = union_typeshape(&shapes)
        .ok_or_else(|| overflow(decl.name.as_str(), decl.name.location()))?;
    Ok(DeclLayout::Union(typeshape, fields))
}

fn overflow(owner: &str, location: SourceLocation) -> CompilerError {
    CompilerError::TypeShapeOverflow {
        owner: owner.to_string(),
        location,
    }
}

fn check_member_name<'a>(
    scope: &mut Scope<&'a str>,
    owner: &str,
    member: &'a Identifier,
) -> Result<()> {
    scope
        .insert(member.name.as_str(), member.location)
        .map_err(|_| CompilerError::DuplicateMemberName {
            owner: owner.to_string(),
            member: member.name.clone(),
            location: member.location,
        })
}

impl DeclLayout {
    /// 計算結果を宣言へ書き込む
    ///
    /// 宣言の種類やメンバー数が計算時と食い違う場合は Internal エラーです。
    pub fn apply(self, decl: &mut Decl) -> Result<()> {
        match (self, decl) {
            (DeclLayout::Const, Decl::Const(_)) => Ok(()),
            (DeclLayout::Enum(typeshape), Decl::Enum(decl)) => {
                decl.typeshape = Some(typeshape);
                Ok(())
            }
            (DeclLayout::Interface(methods), Decl::Interface(decl)) => {
                ensure_same_len(&decl.name.to_string(), methods.len(), decl.methods.len())?;
                for (layout, method) in methods.into_iter().zip(&mut decl.methods) {
                    apply_message(layout.request, method.maybe_request.as_mut())?;
                    apply_message(layout.response, method.maybe_response.as_mut())?;
                }
                Ok(())
            }
            (DeclLayout::Struct(typeshape, fields), Decl::Struct(decl)) => {
                ensure_same_len(decl.name.as_str(), fields.len(), decl.members.len())?;
                for (field, member) in fields.into_iter().zip(&mut decl.members) {
                    member.fieldshape = Some(field);
                }
                decl.typeshape = Some(typeshape);
                Ok(())
            }
            (DeclLayout::Union(typeshape, fields), Decl::Union(decl)) => {
                ensure_same_len(decl.name.as_str(), fields.len(), decl.members.len())?;
                for (field, member) in fields.into_iter().zip(&mut decl.members) {
                    member.fieldshape = Some(field);
                }
                decl.typeshape = Some(typeshape);
                Ok(())
            }
            (layout, decl) => Err(CompilerError::Internal(format!(
                "{} '{}' に種類の異なるレイアウト {:?} を適用しようとしました",
                decl.kind(),
                decl.name(),
                layout
            ))),
        }
    }
}

fn apply_message(layout: Option<MessageLayout>, message: Option<&mut Message>) -> Result<()> {
    match (layout, message) {
        (None, None) => Ok(()),
        (Some((typeshape, fields)), Some(message)) => {
            ensure_same_len("message", fields.len(), message.parameters.len())?;
            for (field, parameter) in fields.into_iter().zip(&mut message.parameters) {
                parameter.fieldshape = Some(field);
            }
            message.typeshape = Some(typeshape);
            Ok(())
        }
        _ => Err(CompilerError::Internal(
            "メッセージの有無がレイアウトと一致しません".to_string(),
        )),
    }
}

fn ensure_same_len(owner: &str, computed: usize, actual: usize) -> Result<()> {
    if computed != actual {
        return Err(CompilerError::Internal(format!(
            "'{}' のメンバー数が一致しません (計算 {}, 実際 {})",
            owner, computed, actual
        )));
    }
    Ok(())
}
