//! # 意味解析
//!
//! 構文木の消費、宣言モデル、依存関係の順序付けを扱います。

pub mod consumer;
pub mod decl;
pub mod dependency;
pub mod library;
pub mod ordinals;
pub mod scope;

pub use self::decl::{Decl, DeclId, DeclKind, Name};
pub use self::dependency::DependencyGraph;
pub use self::library::{Library, ResolutionState};
