//! if式とfor式のコード生成

use crate::ast::{ForExpr, IfExpr};
use crate::error::{CodegenError, KaleidoResult};
use inkwell::values::FloatValue;

use crate::codegen::code_generator::CodeGenerator;

impl<'ctx> CodeGenerator<'ctx> {
    /// if/then/else式をコンパイル
    ///
    /// 値の合流はdouble型のphiノードで行う。アームの本体が入れ子の
    /// 制御フローで新しいブロックを作ることがあるため、phiの先行
    /// ブロックには分岐を出力し終えた時点の挿入ブロックを使う。
    pub fn compile_if_expr(&mut self, if_expr: &IfExpr) -> KaleidoResult<FloatValue<'ctx>> {
        let cond_value = self.compile_expr(&if_expr.cond)?;
        let cond = self.build_truthiness(cond_value, "ifcond")?;

        let function = self.current_function()?;
        let then_block = self.context.append_basic_block(function, "then");
        let else_block = self.context.append_basic_block(function, "else");
        let merge_block = self.context.append_basic_block(function, "ifcont");
        self.builder
            .build_conditional_branch(cond, then_block, else_block)?;

        // thenアーム
        self.builder.position_at_end(then_block);
        let then_value = self.compile_expr(&if_expr.then_expr)?;
        self.builder.build_unconditional_branch(merge_block)?;
        let then_end = self.current_block()?;

        // elseアーム
        self.builder.position_at_end(else_block);
        let else_value = match &if_expr.else_expr {
            Some(else_expr) => self.compile_expr(else_expr)?,
            None => {
                return Err(CodegenError::MissingElse { span: if_expr.span }.into());
            }
        };
        self.builder.build_unconditional_branch(merge_block)?;
        let else_end = self.current_block()?;

        // 合流点
        self.builder.position_at_end(merge_block);
        let phi = self.builder.build_phi(self.context.f64_type(), "iftmp")?;
        phi.add_incoming(&[(&then_value, then_end), (&else_value, else_end)]);
        Ok(phi.as_basic_value().into_float_value())
    }

    /// for式をコンパイル
    ///
    /// ループ変数はエントリブロックのスタックスロット。本体の後に
    /// ステップを加算してから終了条件を評価するので、条件は更新後の
    /// ループ変数を観測する。式全体の値は常に0.0。
    pub fn compile_for_expr(&mut self, for_expr: &ForExpr) -> KaleidoResult<FloatValue<'ctx>> {
        let function = self.current_function()?;
        let slot = self.create_entry_block_alloca(function, &for_expr.var_name)?;

        let start_value = self.compile_expr(&for_expr.start)?;
        self.builder.build_store(slot, start_value)?;

        let loop_block = self.context.append_basic_block(function, "loop");
        self.builder.build_unconditional_branch(loop_block)?;
        self.builder.position_at_end(loop_block);

        // ループ変数で外側の同名の束縛をシャドーする
        let shadowed = self.named_values.define(for_expr.var_name.clone(), slot);

        // 本体の値は捨てる
        self.compile_expr(&for_expr.body)?;

        let step_value = self.compile_expr(&for_expr.step)?;
        let current = self
            .builder
            .build_load(slot, &for_expr.var_name)?
            .into_float_value();
        let next = self
            .builder
            .build_float_add(current, step_value, "nextvar")?;
        self.builder.build_store(slot, next)?;

        let end_value = self.compile_expr(&for_expr.end)?;
        let end_cond = self.build_truthiness(end_value, "loopcond")?;

        let after_block = self.context.append_basic_block(function, "afterloop");
        self.builder
            .build_conditional_branch(end_cond, loop_block, after_block)?;
        self.builder.position_at_end(after_block);

        self.named_values.restore(&for_expr.var_name, shadowed);

        Ok(self.const_f64(0.0))
    }
}
