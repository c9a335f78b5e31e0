//! # 型解決
//!
//! 構文上の型参照を宣言モデルに照らして検証し、その形状を計算します。
//!
//! 値として埋め込まれる型（インライン）は、参照先の構造体・共用体・列挙型が
//! 解決済みであることを前提とします。依存グラフの順序がこれを保証します。
//! vector の要素型は別領域に置かれるため（アウトオブライン）、未定義の識別子などの
//! 検査だけを行い、参照先の形状は要求しません。

use crate::frontend::error::{CompilerError, Result};
use crate::frontend::literal::parse_integer_constant;
use crate::frontend::raw_ast::{self, CompoundIdentifier, Constant};
use crate::frontend::semantic::decl::{Decl, DeclId};
use crate::frontend::semantic::library::{Library, ResolutionState};
use crate::frontend::types::Nullability;
use crate::typesystem::shape::{
    array_typeshape, primitive_typeshape, string_typeshape, vector_typeshape, TypeShape,
    HANDLE_TYPESHAPE, POINTER_TYPESHAPE,
};

/// 型がどこに置かれるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// 外側の集約に値として埋め込まれる（形状が必要）
    Inline,
    /// 別領域に置かれる（検証のみ）
    OutOfLine,
}

/// 型リゾルバ
///
/// 解決中のライブラリを読み取り専用で参照します。
pub struct TypeResolver<'a> {
    library: &'a Library,
}

impl<'a> TypeResolver<'a> {
    pub fn new(library: &'a Library) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &'a Library {
        self.library
    }

    /// 型の形状を計算する
    pub fn resolve_type(&self, type_ctor: &raw_ast::Type) -> Result<TypeShape> {
        self.resolve(type_ctor, Placement::Inline)?.ok_or_else(|| {
            CompilerError::Internal(format!(
                "インライン型の形状が得られません ({})",
                type_ctor.location()
            ))
        })
    }

    /// 形状を求めずに型を検証する
    ///
    /// 定数の型のように、値として配置されない型に使います。
    pub fn validate_type(&self, type_ctor: &raw_ast::Type) -> Result<()> {
        self.resolve(type_ctor, Placement::OutOfLine)?;
        Ok(())
    }

    fn resolve(&self, type_ctor: &raw_ast::Type, placement: Placement) -> Result<Option<TypeShape>> {
        match type_ctor {
            raw_ast::Type::Primitive { subtype, .. } => Ok(Some(primitive_typeshape(*subtype))),

            raw_ast::Type::Handle { .. } => Ok(Some(HANDLE_TYPESHAPE)),

            raw_ast::Type::Array {
                element_type,
                element_count,
                ..
            } => {
                let element = self.resolve(element_type, placement)?;
                let count = positive_count(element_count).ok_or_else(|| {
                    CompilerError::InvalidArraySize {
                        count: element_count.to_string(),
                        location: element_count.location(),
                    }
                })?;
                match element {
                    Some(element) => array_typeshape(element, count)
                        .map(Some)
                        .ok_or_else(|| CompilerError::InvalidArraySize {
                            count: element_count.to_string(),
                            location: element_count.location(),
                        }),
                    None => Ok(None),
                }
            }

            raw_ast::Type::Vector {
                element_type,
                maybe_element_count,
                ..
            } => {
                self.resolve(element_type, Placement::OutOfLine)?;
                check_bound(maybe_element_count.as_ref())?;
                Ok(Some(vector_typeshape()))
            }

            raw_ast::Type::String {
                maybe_element_count,
                ..
            } => {
                check_bound(maybe_element_count.as_ref())?;
                Ok(Some(string_typeshape()))
            }

            raw_ast::Type::Request { subtype, .. } => {
                self.resolve_request(subtype)?;
                Ok(Some(HANDLE_TYPESHAPE))
            }

            raw_ast::Type::Identifier {
                identifier,
                nullability,
                ..
            } => self.resolve_identifier(identifier, *nullability, placement),
        }
    }

    fn resolve_request(&self, identifier: &CompoundIdentifier) -> Result<()> {
        let invalid = || CompilerError::InvalidRequestType {
            name: identifier.dotted(),
            location: identifier.location(),
        };
        let id = self.library.lookup_identifier(identifier).ok_or_else(invalid)?;
        match self.library.decl(id) {
            Decl::Interface(_) => Ok(()),
            _ => Err(invalid()),
        }
    }

    fn resolve_identifier(
        &self,
        identifier: &CompoundIdentifier,
        nullability: Nullability,
        placement: Placement,
    ) -> Result<Option<TypeShape>> {
        let id = self.library.lookup_identifier(identifier).ok_or_else(|| {
            CompilerError::UnknownIdentifier {
                name: identifier.dotted(),
                location: identifier.location(),
            }
        })?;

        match self.library.decl(id) {
            Decl::Const(_) => Err(CompilerError::ConstIsNotAType {
                name: identifier.dotted(),
                location: identifier.location(),
            }),
            Decl::Enum(_) if nullability.is_nullable() => Err(CompilerError::NullableEnum {
                name: identifier.dotted(),
                location: identifier.location(),
            }),
            Decl::Interface(_) => Ok(Some(HANDLE_TYPESHAPE)),
            Decl::Struct(_) | Decl::Union(_) if nullability.is_nullable() => {
                Ok(Some(POINTER_TYPESHAPE))
            }
            Decl::Enum(_) | Decl::Struct(_) | Decl::Union(_) => match placement {
                Placement::Inline => self.resolved_typeshape(id).map(Some),
                Placement::OutOfLine => Ok(None),
            },
        }
    }

    /// 解決済み宣言の形状
    fn resolved_typeshape(&self, id: DeclId) -> Result<TypeShape> {
        let decl = self.library.decl(id);
        let state = self.library.state(id);
        if state != ResolutionState::Resolved {
            return Err(CompilerError::Internal(format!(
                "{} '{}' は{}です",
                decl.kind(),
                decl.name(),
                state
            )));
        }
        decl.typeshape().ok_or_else(|| {
            CompilerError::Internal(format!("{} '{}' に形状がありません", decl.kind(), decl.name()))
        })
    }
}

/// 正の整数リテラルとして要素数を読む
fn positive_count(constant: &Constant) -> Option<u64> {
    parse_integer_constant::<u64>(constant).filter(|count| *count > 0)
}

/// vector・string の上限を検査する（省略可）
fn check_bound(maybe_bound: Option<&Constant>) -> Result<()> {
    match maybe_bound {
        Some(bound) if positive_count(bound).is_none() => Err(CompilerError::InvalidBound {
            bound: bound.to_string(),
            location: bound.location(),
        }),
        _ => Ok(()),
    }
}
