//! # スコープ
//!
//! メソッド名・序数・メンバー名などの一意性を検査するための小さな集合です。

use std::collections::BTreeMap;

use crate::frontend::error::SourceLocation;

/// 一意性検査用のスコープ
#[derive(Debug)]
pub struct Scope<T: Ord> {
    entries: BTreeMap<T, SourceLocation>,
}

impl<T: Ord> Scope<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// 値を登録する
    ///
    /// 既に登録済みなら最初の登録位置を `Err` で返します。
    pub fn insert(&mut self, value: T, location: SourceLocation) -> Result<(), SourceLocation> {
        match self.entries.get(&value) {
            Some(previous) => Err(*previous),
            None => {
                self.entries.insert(value, location);
                Ok(())
            }
        }
    }
}

impl<T: Ord> Default for Scope<T> {
    fn default() -> Self {
        Self::new()
    }
}
