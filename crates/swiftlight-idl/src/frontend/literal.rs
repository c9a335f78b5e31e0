//! # リテラル解析
//!
//! 整数リテラルのテキストを数値へ変換します。
//! 定数式の評価は行いません（識別子で表された定数は解析できないものとして扱います）。

use crate::frontend::raw_ast::{Constant, Literal, LiteralKind};

/// 整数リテラルを解析する
///
/// 10進数、`0x` 16進数、`0b` 2進数と先頭の `-` を受け付けます。
/// 値が `T` の範囲に収まらない場合や数値リテラルでない場合は `None` を返します。
pub fn parse_integer_literal<T>(literal: &Literal) -> Option<T>
where
    T: TryFrom<i128>,
{
    if literal.kind != LiteralKind::Numeric {
        return None;
    }
    parse_integer_text(&literal.text)
}

/// 定数式を整数として解析する
///
/// リテラル以外（識別子参照）は `None` になります。
pub fn parse_integer_constant<T>(constant: &Constant) -> Option<T>
where
    T: TryFrom<i128>,
{
    match constant {
        Constant::Literal(literal) => parse_integer_literal(literal),
        Constant::Identifier(_) => None,
    }
}

fn parse_integer_text<T>(text: &str) -> Option<T>
where
    T: TryFrom<i128>,
{
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(binary) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, binary)
    } else {
        (10, digits)
    };

    // 符号は先頭の `-` のみ
    if digits.is_empty() || digits.starts_with(|c: char| c == '+' || c == '-') {
        return None;
    }

    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    T::try_from(value).ok()
}
