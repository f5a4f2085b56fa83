//! var/in式のコード生成

use crate::ast::VarExpr;
use crate::error::KaleidoResult;
use inkwell::values::FloatValue;

use crate::codegen::code_generator::CodeGenerator;

impl<'ctx> CodeGenerator<'ctx> {
    /// var/in式をコンパイル
    ///
    /// 各束縛はエントリブロックのスタックスロットになり、本体の間だけ
    /// 有効になる。本体の評価後はシャドーした束縛を逆順に復元し、
    /// 宣言前の表と正確に同じ状態へ戻す。式全体の値は本体の値。
    pub fn compile_var_expr(&mut self, declaration: &VarExpr) -> KaleidoResult<FloatValue<'ctx>> {
        let function = self.current_function()?;

        let mut shadowed = Vec::with_capacity(declaration.bindings.len());
        for (name, init) in &declaration.bindings {
            let slot = self.create_entry_block_alloca(function, name)?;

            // 初期化式には宣言中の束縛自身はまだ見えない。
            // 同じvarの先行する束縛は見える
            let value = match init {
                Some(init) => self.compile_expr(init)?,
                None => self.const_f64(0.0),
            };
            self.builder.build_store(slot, value)?;

            shadowed.push((name.clone(), self.named_values.define(name.clone(), slot)));
        }

        let body_value = self.compile_expr(&declaration.body)?;

        for (name, previous) in shadowed.into_iter().rev() {
            self.named_values.restore(&name, previous);
        }

        Ok(body_value)
    }
}
