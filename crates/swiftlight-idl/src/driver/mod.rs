//! # IDL コンパイラドライバー
//!
//! 1つのライブラリを構成する全ソースファイルの構文木を受け取り、
//! 消費（宣言モデルの構築）と解決（依存順のレイアウト計算）を順に実行します。
//!
//! 結果は全か無かです。どの段階で失敗しても、部分的に構築された
//! ライブラリは破棄され、最初のエラーだけが返ります。

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::CompilerConfig;
use crate::frontend::error::Result;
use crate::frontend::raw_ast;
use crate::frontend::semantic::decl::DeclKind;
use crate::frontend::semantic::library::Library;

/// コンパイル統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompilationStats {
    /// 処理したファイル数
    pub files_processed: usize,
    /// 定数宣言の数
    pub consts: usize,
    /// 列挙型宣言の数
    pub enums: usize,
    /// インターフェース宣言の数
    pub interfaces: usize,
    /// 構造体宣言の数
    pub structs: usize,
    /// 共用体宣言の数
    pub unions: usize,
    /// 構文木の消費にかかった時間
    pub consume_time: Duration,
    /// 依存順の解決にかかった時間
    pub resolve_time: Duration,
    /// 全体の時間
    pub elapsed: Duration,
}

impl CompilationStats {
    /// 宣言の総数
    pub fn total_declarations(&self) -> usize {
        self.consts + self.enums + self.interfaces + self.structs + self.unions
    }

    fn count_declarations(&mut self, library: &Library) {
        self.consts = library.count_of(DeclKind::Const);
        self.enums = library.count_of(DeclKind::Enum);
        self.interfaces = library.count_of(DeclKind::Interface);
        self.structs = library.count_of(DeclKind::Struct);
        self.unions = library.count_of(DeclKind::Union);
    }
}

/// コンパイラドライバー
#[derive(Debug, Default)]
pub struct Driver {
    config: CompilerConfig,
    stats: Option<CompilationStats>,
}

impl Driver {
    /// 新しいドライバーを作成
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            stats: None,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// 直近のコンパイルの統計（`collect_stats` が有効な場合のみ）
    pub fn stats(&self) -> Option<&CompilationStats> {
        self.stats.as_ref()
    }

    /// ライブラリをコンパイルする
    ///
    /// ファイルを与えられた順に消費し、その後ライブラリ全体を解決します。
    pub fn compile(&mut self, files: Vec<raw_ast::File>) -> Result<Library> {
        let start_time = Instant::now();
        self.stats = None;

        let mut library = Library::new(self.config.clone());
        let files_processed = files.len();
        for file in files {
            library.consume_file(file)?;
        }
        let consume_time = start_time.elapsed();

        let resolve_start = Instant::now();
        let library = library.resolve()?;
        let resolve_time = resolve_start.elapsed();

        let elapsed = start_time.elapsed();
        if self.config.verbose {
            log::info!(
                "ライブラリ '{}' のコンパイル完了: 宣言 {} 件, {:?}",
                library.name().unwrap_or_default(),
                library.len(),
                elapsed
            );
        }

        if self.config.collect_stats {
            let mut stats = CompilationStats {
                files_processed,
                consume_time,
                resolve_time,
                elapsed,
                ..Default::default()
            };
            stats.count_declarations(&library);
            if self.config.verbose {
                record_compilation_stats(&stats);
            }
            self.stats = Some(stats);
        }

        Ok(library)
    }
}

/// 統計情報をログに出力
fn record_compilation_stats(stats: &CompilationStats) {
    log::info!("コンパイル統計:");
    log::info!("  ファイル数: {}", stats.files_processed);
    log::info!(
        "  宣言数: {} (定数 {}, 列挙型 {}, インターフェース {}, 構造体 {}, 共用体 {})",
        stats.total_declarations(),
        stats.consts,
        stats.enums,
        stats.interfaces,
        stats.structs,
        stats.unions
    );
    log::info!("  消費時間: {:?}", stats.consume_time);
    log::info!("  解決時間: {:?}", stats.resolve_time);
    log::info!("  総時間: {:?}", stats.elapsed);
}

/// 既定の設定でライブラリをコンパイルする
pub fn compile(files: Vec<raw_ast::File>) -> Result<Library> {
    Driver::default().compile(files)
}
