//! # 型システム
//!
//! 型の形状、型参照の解決、宣言ごとのレイアウト計算を扱います。

pub mod layout;
pub mod resolver;
pub mod shape;

pub use self::layout::{layout_decl, DeclLayout};
pub use self::resolver::TypeResolver;
pub use self::shape::{FieldShape, TypeShape};
