//! # メソッド序数の導出
//!
//! 明示的な序数を持たないメソッドの序数を、ライブラリ名・インターフェース名・
//! メソッド名から決定的に導出します。
//!
//! 序数 = `sha256(library + "." + interface + "/" + method)` の先頭4バイトを
//! リトルエンディアンの `u32` として読み、最上位ビットを落とした値。
//! `OrdinalName` 属性があれば、その値をメソッド名の代わりに使います。

use sha2::{Digest, Sha256};

use crate::frontend::raw_ast::{AttributeList, InterfaceMethod};

/// 序数計算に使う名前を変更する属性
pub const ORDINAL_NAME_ATTRIBUTE: &str = "OrdinalName";

/// 序数計算に使うメソッド名を取得
pub fn get_ordinal_name<'a>(attributes: &'a AttributeList, method_name: &'a str) -> &'a str {
    attributes
        .get(ORDINAL_NAME_ATTRIBUTE)
        .unwrap_or(method_name)
}

/// 名前の組から序数を導出する
pub fn derive_ordinal(library_name: &str, interface_name: &str, method_name: &str) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(library_name.as_bytes());
    hasher.update(b".");
    hasher.update(interface_name.as_bytes());
    hasher.update(b"/");
    hasher.update(method_name.as_bytes());
    let digest = hasher.finalize();

    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]) & 0x7fff_ffff
}

/// メソッドの序数を導出する（明示的な序数は考慮しない）
pub fn get_ordinal(library_name: &str, interface_name: &str, method: &InterfaceMethod) -> u32 {
    let method_name = get_ordinal_name(&method.attributes, &method.identifier.name);
    derive_ordinal(library_name, interface_name, method_name)
}
