//! # ライブラリ（宣言モデルの所有者）
//!
//! 1回のライブラリコンパイルで生成されるすべての宣言を所有し、
//! 名前による検索、依存順の解決、レイアウト計算の進行状態を管理します。
//!
//! 解決は全か無かです。[`Library::resolve`] は `self` を消費し、
//! 失敗した場合は宣言モデルごと破棄されるため、部分的に解決された
//! ライブラリが外部に見えることはありません。

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::config::CompilerConfig;
use crate::frontend::error::{CompilerError, Result};
use crate::frontend::raw_ast::{self, CompoundIdentifier};
use crate::frontend::semantic::decl::{Decl, DeclId, DeclKind};
use crate::frontend::semantic::dependency;
use crate::typesystem::layout;
use crate::typesystem::resolver::TypeResolver;

/// 宣言の解決状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResolutionState {
    /// 未解決
    Unresolved,
    /// メンバーのレイアウト中
    Resolving,
    /// 解決済み（形状が確定）
    Resolved,
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionState::Unresolved => write!(f, "未解決"),
            ResolutionState::Resolving => write!(f, "解決中"),
            ResolutionState::Resolved => write!(f, "解決済み"),
        }
    }
}

/// ライブラリ
#[derive(Debug, Serialize)]
pub struct Library {
    #[serde(skip)]
    config: CompilerConfig,

    /// ライブラリ名（最初に消費したファイルで確定）
    #[serde(rename = "name")]
    library_name: Option<CompoundIdentifier>,

    /// 宣言の本体（`DeclId` の順 = 登録順）
    declarations: Vec<Decl>,

    /// 宣言ごとの解決状態
    #[serde(skip)]
    states: Vec<ResolutionState>,

    /// 名前から宣言IDへのマップ
    #[serde(skip)]
    names: BTreeMap<String, DeclId>,

    /// 解決順（依存される宣言が先）
    declaration_order: Vec<DeclId>,
}

impl Library {
    /// 空のライブラリを作成
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            library_name: None,
            declarations: Vec::new(),
            states: Vec::new(),
            names: BTreeMap::new(),
            declaration_order: Vec::new(),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// ドット区切りのライブラリ名
    pub fn name(&self) -> Option<String> {
        self.library_name.as_ref().map(CompoundIdentifier::dotted)
    }

    pub(crate) fn library_identifier(&self) -> Option<&CompoundIdentifier> {
        self.library_name.as_ref()
    }

    pub(crate) fn set_library_identifier(&mut self, identifier: CompoundIdentifier) {
        self.library_name = Some(identifier);
    }

    /// 宣言を登録する
    ///
    /// 同名の宣言が既にあれば新しい宣言は破棄され、DuplicateDeclaration になります。
    pub fn register_decl(&mut self, decl: Decl) -> Result<DeclId> {
        let name = decl.name();
        if let Some(existing) = self.names.get(name.as_str()) {
            return Err(CompilerError::DuplicateDeclaration {
                name: name.as_str().to_string(),
                location: name.location(),
                previous: self.decl(*existing).name().location(),
            });
        }

        let raw = u32::try_from(self.declarations.len())
            .map_err(|_| CompilerError::Internal("宣言数が上限を超えました".to_string()))?;
        let id = DeclId::from_raw(raw);
        debug!("{} '{}' を登録 ({:?})", decl.kind(), name, id);

        self.names.insert(name.as_str().to_string(), id);
        self.declarations.push(decl);
        self.states.push(ResolutionState::Unresolved);
        Ok(id)
    }

    /// 宣言を取得
    ///
    /// `id` はこのライブラリが払い出したものでなければなりません。
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.declarations[id.index()]
    }

    pub(crate) fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.declarations[id.index()]
    }

    /// 登録順に (ID, 宣言) を列挙
    pub fn declarations(&self) -> impl Iterator<Item = (DeclId, &Decl)> + '_ {
        self.declarations
            .iter()
            .enumerate()
            .map(|(index, decl)| (DeclId::from_raw(index as u32), decl))
    }

    /// 指定した種類の宣言数
    pub fn count_of(&self, kind: DeclKind) -> usize {
        self.declarations
            .iter()
            .filter(|decl| decl.kind() == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// 単純名で宣言を検索
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.names.get(name).copied()
    }

    /// 型参照の識別子で宣言を検索
    ///
    /// 単一要素の識別子はそのまま検索します。複数要素の識別子は、先頭の要素が
    /// このライブラリ名と一致する場合に限り最後の要素で検索します。
    /// 他ライブラリのインポート解決は行いません。
    pub fn lookup_identifier(&self, identifier: &CompoundIdentifier) -> Option<DeclId> {
        let (last, prefix) = identifier.components.split_last()?;
        if !prefix.is_empty() {
            let library = self.library_name.as_ref()?;
            let matches = library.components.len() == prefix.len()
                && library
                    .components
                    .iter()
                    .zip(prefix)
                    .all(|(a, b)| a.name == b.name);
            if !matches {
                return None;
            }
        }
        self.lookup(&last.name)
    }

    /// 型が値として埋め込む宣言を取得
    ///
    /// 配列は要素型をたどります。vector・string・ハンドル・request・プリミティブ、
    /// および nullable な識別子参照は間接参照なので `None` です。
    pub fn lookup_type(&self, type_ctor: &raw_ast::Type) -> Option<DeclId> {
        let mut current = type_ctor;
        loop {
            match current {
                raw_ast::Type::String { .. }
                | raw_ast::Type::Handle { .. }
                | raw_ast::Type::Request { .. }
                | raw_ast::Type::Primitive { .. }
                | raw_ast::Type::Vector { .. } => return None,
                raw_ast::Type::Array { element_type, .. } => {
                    current = element_type;
                }
                raw_ast::Type::Identifier {
                    identifier,
                    nullability,
                    ..
                } => {
                    if nullability.is_nullable() {
                        return None;
                    }
                    return self.lookup_identifier(identifier);
                }
            }
        }
    }

    /// 宣言の解決状態
    pub fn state(&self, id: DeclId) -> ResolutionState {
        self.states[id.index()]
    }

    /// 解決順（[`Library::resolve`] の成功後に確定）
    pub fn declaration_order(&self) -> &[DeclId] {
        &self.declaration_order
    }

    /// すべての宣言が解決済みかどうか
    pub fn is_resolved(&self) -> bool {
        self.states
            .iter()
            .all(|state| *state == ResolutionState::Resolved)
    }

    /// ライブラリを解決する
    ///
    /// 依存順に宣言を並べ、その順にメンバーの型を解決してレイアウトを計算します。
    /// どこかで失敗した時点でライブラリ全体を破棄してエラーを返します。
    pub fn resolve(mut self) -> Result<Self> {
        for state in &mut self.states {
            *state = ResolutionState::Unresolved;
        }
        self.declaration_order.clear();

        let order = dependency::sort_declarations(&self)?;

        for &id in &order {
            self.states[id.index()] = ResolutionState::Resolving;

            let decl_layout = {
                let resolver = TypeResolver::new(&self);
                layout::layout_decl(&resolver, self.decl(id))?
            };
            decl_layout.apply(self.decl_mut(id))?;

            self.states[id.index()] = ResolutionState::Resolved;
            debug!(
                "{} '{}' を解決 (形状: {:?})",
                self.decl(id).kind(),
                self.decl(id).name(),
                self.decl(id).typeshape()
            );
        }

        self.declaration_order = order;
        Ok(self)
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}
