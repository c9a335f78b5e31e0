// SwiftLight IDL Compiler Library
// インターフェース定義言語の意味解決ステージ

//! # SwiftLight IDL
//!
//! SwiftLight のインターフェース定義言語（IDL）コンパイラの意味解決ステージです。
//! パーサが生成した構文木を受け取り、宣言を1つのライブラリに平坦化し、
//! 依存関係の順に型を解決して、すべての構造体・共用体・メッセージについて
//! サイズ・アラインメント・メンバーオフセットを計算します。
//!
//! ## 処理の流れ
//! 1. 消費（[`frontend::semantic::consumer`]）
//! 2. 依存グラフとトポロジカルソート（[`frontend::semantic::dependency`]）
//! 3. 型解決（[`typesystem::resolver`]）
//! 4. レイアウト計算（[`typesystem::layout`]）
//!
//! ```
//! use swiftlight_idl::frontend::raw_ast::{CompoundIdentifier, File};
//! use swiftlight_idl::frontend::error::SourceLocation;
//!
//! let file = File::new(CompoundIdentifier::single("example", SourceLocation::default()));
//! let library = swiftlight_idl::compile_library(vec![file]).unwrap();
//! assert_eq!(library.name().as_deref(), Some("example"));
//! ```

pub mod config;
pub mod driver;
pub mod frontend;
pub mod typesystem;

// 再エクスポート
pub use self::config::{CompilerConfig, ConfigError};
pub use self::driver::{CompilationStats, Driver};
pub use self::frontend::error::{CompilerError, ErrorKind, Result, SourceLocation};
pub use self::frontend::semantic::{Decl, DeclId, DeclKind, Library};
pub use self::typesystem::{FieldShape, TypeShape};

/// コンパイラのバージョン
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 既定の設定で1つのライブラリを構成するファイル群をコンパイルする
pub fn compile_library(files: Vec<frontend::raw_ast::File>) -> Result<Library> {
    driver::compile(files)
}
