//! シンボルテーブルとプロトタイプレジストリ

use crate::ast::Prototype;
use inkwell::values::PointerValue;
use std::collections::HashMap;

/// 現在生成中の関数のローカル変数スロット表
///
/// すべてのスロットは関数のエントリブロックに確保されたスタックスロット。
#[derive(Debug, Default)]
pub struct NamedValues<'ctx> {
    slots: HashMap<String, PointerValue<'ctx>>,
}

impl<'ctx> NamedValues<'ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 関数の切り替え時にすべての束縛を破棄
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// スロットを検索
    pub fn get(&self, name: &str) -> Option<PointerValue<'ctx>> {
        self.slots.get(name).copied()
    }

    /// 束縛を登録し、シャドーされた以前のスロットを返す
    pub fn define(&mut self, name: String, slot: PointerValue<'ctx>) -> Option<PointerValue<'ctx>> {
        self.slots.insert(name, slot)
    }

    /// スコープ脱出時に以前の束縛を復元する
    ///
    /// 以前の束縛が存在しなかった名前は表から取り除く。
    pub fn restore(&mut self, name: &str, previous: Option<PointerValue<'ctx>>) {
        match previous {
            Some(slot) => {
                self.slots.insert(name.to_string(), slot);
            }
            None => {
                self.slots.remove(name);
            }
        }
    }
}

/// 定義済み関数プロトタイプのレジストリ
///
/// モジュールをJITへ引き渡した後も既存の関数を呼び出せるように、
/// プロトタイプを保持して新しいモジュールへの再宣言に使います。
#[derive(Debug, Default)]
pub struct PrototypeRegistry {
    protos: HashMap<String, Prototype>,
}

impl PrototypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// プロトタイプを登録（同名の既存登録は置き換える）
    pub fn register(&mut self, proto: Prototype) {
        self.protos.insert(proto.name.clone(), proto);
    }

    /// プロトタイプを検索
    pub fn get(&self, name: &str) -> Option<&Prototype> {
        self.protos.get(name)
    }

    /// 登録を取り消す
    pub fn remove(&mut self, name: &str) {
        self.protos.remove(name);
    }
}
