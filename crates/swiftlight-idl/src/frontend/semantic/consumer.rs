//! # 構文木の消費
//!
//! 生の構文木を走査して宣言モデルへ変換します。インターフェースや構造体の
//! 内側で宣言された定数・列挙型は、外側の宣言を登録する前にライブラリの
//! トップレベルへ引き出されます。
//!
//! 失敗した時点でそのファイルの消費は中断されます。それまでに登録された宣言は
//! 残るため、呼び出し側はエラー時にライブラリ全体を破棄しなければなりません。

use log::{debug, warn};

use crate::frontend::error::{CompilerError, Result};
use crate::frontend::literal::parse_integer_literal;
use crate::frontend::raw_ast;
use crate::frontend::semantic::decl::{
    Const, Decl, Enum, EnumMember, Interface, Message, Method, Name, Ordinal, Parameter, Struct,
    StructMember, Union, UnionMember,
};
use crate::frontend::semantic::library::Library;
use crate::frontend::semantic::ordinals;
use crate::frontend::types::PrimitiveSubtype;

/// 基底型が省略された列挙型の基底型
pub const DEFAULT_ENUM_SUBTYPE: PrimitiveSubtype = PrimitiveSubtype::Uint32;

impl Library {
    /// ソースファイル1つ分の構文木をライブラリへ取り込む
    pub fn consume_file(&mut self, file: raw_ast::File) -> Result<()> {
        let raw_ast::File {
            library_name,
            using_list,
            const_declaration_list,
            enum_declaration_list,
            interface_declaration_list,
            struct_declaration_list,
            union_declaration_list,
        } = file;

        // ライブラリ内のすべてのファイルはライブラリ名が一致しなければならない
        match self.library_identifier() {
            Some(current) => {
                if current.dotted() != library_name.dotted() {
                    return Err(CompilerError::LibraryNameMismatch {
                        expected: current.dotted(),
                        found: library_name.dotted(),
                        location: library_name.location(),
                    });
                }
            }
            None => {
                if library_name.components.is_empty() {
                    return Err(CompilerError::LibraryNameMismatch {
                        expected: String::new(),
                        found: String::new(),
                        location: library_name.location(),
                    });
                }
                self.set_library_identifier(library_name);
            }
        }

        debug!(
            "ライブラリ '{}' のファイルを消費 (using {} 件)",
            self.name().unwrap_or_default(),
            using_list.len()
        );

        for const_declaration in const_declaration_list {
            self.consume_const_declaration(const_declaration)?;
        }
        for enum_declaration in enum_declaration_list {
            self.consume_enum_declaration(enum_declaration)?;
        }
        for interface_declaration in interface_declaration_list {
            self.consume_interface_declaration(interface_declaration)?;
        }
        for struct_declaration in struct_declaration_list {
            self.consume_struct_declaration(struct_declaration)?;
        }
        for union_declaration in union_declaration_list {
            self.consume_union_declaration(union_declaration)?;
        }

        Ok(())
    }

    fn consume_const_declaration(&mut self, declaration: raw_ast::ConstDeclaration) -> Result<()> {
        let decl = Const {
            name: Name::from(&declaration.identifier),
            type_ctor: declaration.type_ctor,
            value: declaration.constant,
        };
        self.register_decl(Decl::Const(decl))?;
        Ok(())
    }

    fn consume_enum_declaration(&mut self, declaration: raw_ast::EnumDeclaration) -> Result<()> {
        let members = declaration
            .members
            .into_iter()
            .map(|member| EnumMember {
                name: member.identifier,
                value: member.value,
            })
            .collect();

        let decl = Enum {
            name: Name::from(&declaration.identifier),
            subtype: declaration.maybe_subtype.unwrap_or(DEFAULT_ENUM_SUBTYPE),
            members,
            typeshape: None,
        };
        self.register_decl(Decl::Enum(decl))?;
        Ok(())
    }

    fn consume_interface_declaration(
        &mut self,
        declaration: raw_ast::InterfaceDeclaration,
    ) -> Result<()> {
        let name = Name::from(&declaration.identifier);

        for const_member in declaration.const_members {
            self.consume_const_declaration(const_member)?;
        }
        for enum_member in declaration.enum_members {
            self.consume_enum_declaration(enum_member)?;
        }

        let mut methods = Vec::with_capacity(declaration.method_members.len());
        for method in declaration.method_members {
            methods.push(self.consume_method(name.as_str(), method)?);
        }

        self.register_decl(Decl::Interface(Interface { name, methods }))?;
        Ok(())
    }

    fn consume_method(
        &self,
        interface_name: &str,
        method: raw_ast::InterfaceMethod,
    ) -> Result<Method> {
        let ordinal = self.method_ordinal(interface_name, &method)?;

        if method.maybe_request.is_none() && method.maybe_response.is_none() {
            return Err(CompilerError::EmptyMethod {
                method: method.identifier.name,
                location: method.identifier.location,
            });
        }

        Ok(Method {
            ordinal,
            name: method.identifier,
            maybe_request: method.maybe_request.map(consume_parameter_list),
            maybe_response: method.maybe_response.map(consume_parameter_list),
        })
    }

    /// 明示的な序数を検証するか、省略されていれば導出する
    fn method_ordinal(
        &self,
        interface_name: &str,
        method: &raw_ast::InterfaceMethod,
    ) -> Result<Ordinal> {
        let invalid = |reason: &str| CompilerError::InvalidOrdinal {
            method: method.identifier.name.clone(),
            reason: reason.to_string(),
            location: method
                .ordinal
                .as_ref()
                .map(|literal| literal.location)
                .unwrap_or(method.identifier.location),
        };

        let ordinal = match &method.ordinal {
            Some(literal) => {
                let value = parse_integer_literal::<u32>(literal)
                    .ok_or_else(|| invalid("32ビット符号なし整数として解析できません"))?;
                Ordinal::new(Some(literal.clone()), value)
            }
            None => {
                if !self.config().derive_missing_ordinals {
                    return Err(invalid("序数が指定されていません"));
                }
                let library_name = self.name().unwrap_or_default();
                let value = ordinals::get_ordinal(&library_name, interface_name, method);
                if self.config().verbose {
                    warn!(
                        "{}.{}/{} の序数を導出しました: {:#010x}",
                        library_name, interface_name, method.identifier.name, value
                    );
                }
                Ordinal::new(None, value)
            }
        };

        if ordinal.value() == 0 {
            return Err(invalid("序数 0 は使用できません"));
        }
        Ok(ordinal)
    }

    fn consume_struct_declaration(&mut self, declaration: raw_ast::StructDeclaration) -> Result<()> {
        let name = Name::from(&declaration.identifier);

        for const_member in declaration.const_members {
            self.consume_const_declaration(const_member)?;
        }
        for enum_member in declaration.enum_members {
            self.consume_enum_declaration(enum_member)?;
        }

        let members = declaration
            .members
            .into_iter()
            .map(|member| StructMember {
                type_ctor: member.type_ctor,
                name: member.identifier,
                maybe_default_value: member.maybe_default_value,
                fieldshape: None,
            })
            .collect();

        self.register_decl(Decl::Struct(Struct {
            name,
            members,
            typeshape: None,
        }))?;
        Ok(())
    }

    fn consume_union_declaration(&mut self, declaration: raw_ast::UnionDeclaration) -> Result<()> {
        let members = declaration
            .members
            .into_iter()
            .map(|member| UnionMember {
                type_ctor: member.type_ctor,
                name: member.identifier,
                fieldshape: None,
            })
            .collect();

        self.register_decl(Decl::Union(Union {
            name: Name::from(&declaration.identifier),
            members,
            typeshape: None,
        }))?;
        Ok(())
    }
}

fn consume_parameter_list(list: raw_ast::ParameterList) -> Message {
    let parameters = list
        .parameters
        .into_iter()
        .map(|parameter| Parameter {
            type_ctor: parameter.type_ctor,
            name: parameter.identifier,
            fieldshape: None,
        })
        .collect();

    Message {
        parameters,
        typeshape: None,
    }
}
