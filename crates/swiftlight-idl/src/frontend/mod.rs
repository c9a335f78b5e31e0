//! # IDL フロントエンド
//!
//! パーサから受け取る構文木と、それを宣言モデルへ変換する意味解析です。

pub mod error;
pub mod literal;
pub mod raw_ast;
pub mod semantic;
pub mod types;
