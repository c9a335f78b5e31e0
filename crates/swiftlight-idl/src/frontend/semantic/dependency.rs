//! # 宣言の依存グラフ
//!
//! 宣言間の依存関係を表現するためのグラフ構造と、依存関係の抽出、
//! Kahn のアルゴリズムによるトポロジカルソートおよび循環依存の検出を提供します。
//!
//! 辺 `from -> to` は「`from` が `to` を値として埋め込む」ことを表し、
//! `to` のレイアウトが `from` より先に確定していなければなりません。

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use log::trace;

use crate::frontend::error::{CompilerError, Result};
use crate::frontend::raw_ast;
use crate::frontend::semantic::decl::{Decl, DeclId, Message};
use crate::frontend::semantic::library::Library;

/// 宣言の依存グラフ
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// ノード（宣言ID）の集合
    nodes: BTreeSet<DeclId>,

    /// エッジ: 宣言から、それが依存する宣言へのマッピング
    edges: BTreeMap<DeclId, BTreeSet<DeclId>>,

    /// 逆エッジ: 宣言から、それに依存している宣言へのマッピング
    reverse_edges: BTreeMap<DeclId, BTreeSet<DeclId>>,
}

/// 循環を構成するノード
///
/// 循環に依存しているだけのノードは含みません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub members: Vec<DeclId>,
}

/// 空の依存セット（定数）
static EMPTY_DEPS: BTreeSet<DeclId> = BTreeSet::new();

impl DependencyGraph {
    /// 新しい依存グラフを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ライブラリの全宣言から依存グラフを構築
    pub fn build(library: &Library) -> Self {
        let mut graph = Self::new();
        for (id, _) in library.declarations() {
            graph.add_node(id);
        }
        for (id, _) in library.declarations() {
            for dep in decl_dependencies(library, id) {
                trace!(
                    "依存: '{}' -> '{}'",
                    library.decl(id).name(),
                    library.decl(dep).name()
                );
                graph.add_dependency(id, dep);
            }
        }
        graph
    }

    /// ノードを追加
    pub fn add_node(&mut self, id: DeclId) {
        self.nodes.insert(id);
        self.edges.entry(id).or_default();
        self.reverse_edges.entry(id).or_default();
    }

    /// 依存関係（エッジ）を追加
    ///
    /// `from` は `to` に依存する
    pub fn add_dependency(&mut self, from: DeclId, to: DeclId) {
        self.add_node(from);
        self.add_node(to);
        self.edges.entry(from).or_default().insert(to);
        self.reverse_edges.entry(to).or_default().insert(from);
    }

    /// 依存関係を取得
    pub fn get_dependencies(&self, id: DeclId) -> &BTreeSet<DeclId> {
        self.edges.get(&id).unwrap_or(&EMPTY_DEPS)
    }

    /// 逆依存関係を取得（この宣言に依存している宣言）
    pub fn get_dependents(&self, id: DeclId) -> &BTreeSet<DeclId> {
        self.reverse_edges.get(&id).unwrap_or(&EMPTY_DEPS)
    }

    /// ノードの数を取得
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// エッジの数を取得
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// トポロジカルソート（依存される側が先）
    ///
    /// 入次数（未出力の依存数）が0のノードのうち、IDが最小のものから出力します。
    /// 全ノードを出力できなかった場合は、残ったノードのうち自分自身に戻る経路を
    /// 持つものを [`Cycle`] として返します。
    pub fn topological_sort(&self) -> std::result::Result<Vec<DeclId>, Cycle> {
        let mut degrees: BTreeMap<DeclId, usize> = self
            .nodes
            .iter()
            .map(|id| (*id, self.get_dependencies(*id).len()))
            .collect();

        let mut ready: BinaryHeap<Reverse<DeclId>> = degrees
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| Reverse(*id))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id);

            for dependent in self.get_dependents(id) {
                if let Some(degree) = degrees.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(*dependent));
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let remaining: BTreeSet<DeclId> = degrees
                .into_iter()
                .filter(|(_, degree)| *degree > 0)
                .map(|(id, _)| id)
                .collect();
            let members = remaining
                .iter()
                .copied()
                .filter(|id| self.reaches(*id, *id, &remaining))
                .collect();
            return Err(Cycle { members });
        }

        Ok(order)
    }

    /// `within` 内の辺だけをたどって `from` から `to` へ到達できるか（1辺以上）
    fn reaches(&self, from: DeclId, to: DeclId, within: &BTreeSet<DeclId>) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<DeclId> = self.get_dependencies(from).iter().copied().collect();

        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if within.contains(&id) && visited.insert(id) {
                stack.extend(self.get_dependencies(id).iter().copied());
            }
        }
        false
    }
}

/// 宣言が値として埋め込む宣言の集合
///
/// 定数と列挙型は何も埋め込みません。インターフェースはリクエスト・レスポンスの
/// パラメータ型、構造体と共用体はメンバー型に依存します（配列は要素型をたどり、
/// vector・string・ハンドル・nullable 参照はたどりません）。
pub fn decl_dependencies(library: &Library, id: DeclId) -> BTreeSet<DeclId> {
    let mut edges = BTreeSet::new();
    let mut maybe_add_decl = |type_ctor: &raw_ast::Type| {
        if let Some(dep) = library.lookup_type(type_ctor) {
            edges.insert(dep);
        }
    };

    match library.decl(id) {
        Decl::Const(_) | Decl::Enum(_) => {}
        Decl::Interface(interface) => {
            for method in &interface.methods {
                let messages = [&method.maybe_request, &method.maybe_response];
                for message in messages.into_iter().flatten() {
                    let Message { parameters, .. } = message;
                    for parameter in parameters {
                        maybe_add_decl(&parameter.type_ctor);
                    }
                }
            }
        }
        Decl::Struct(decl) => {
            for member in &decl.members {
                maybe_add_decl(&member.type_ctor);
            }
        }
        Decl::Union(decl) => {
            for member in &decl.members {
                maybe_add_decl(&member.type_ctor);
            }
        }
    }

    edges
}

/// ライブラリの宣言を解決順に並べる
///
/// 循環がある場合は CyclicDependency でライブラリ全体の解決を中断します。
pub fn sort_declarations(library: &Library) -> Result<Vec<DeclId>> {
    let graph = DependencyGraph::build(library);

    graph.topological_sort().map_err(|cycle| {
        let location = cycle
            .members
            .first()
            .map(|id| library.decl(*id).name().location())
            .unwrap_or_default();
        CompilerError::CyclicDependency {
            cycle: cycle
                .members
                .iter()
                .map(|id| library.decl(*id).name().to_string())
                .collect(),
            location,
        }
    })
}
