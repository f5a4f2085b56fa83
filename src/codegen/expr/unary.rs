//! 単項演算のコード生成

use crate::ast::UnaryExpr;
use crate::error::{CodegenError, KaleidoResult};
use inkwell::values::FloatValue;

use crate::codegen::code_generator::CodeGenerator;

impl<'ctx> CodeGenerator<'ctx> {
    /// 単項演算式をコンパイル
    ///
    /// `unary<opcode>`という名前のユーザー定義関数の呼び出しへ展開する。
    pub fn compile_unary_expr(&mut self, unary: &UnaryExpr) -> KaleidoResult<FloatValue<'ctx>> {
        let operand = self.compile_expr(&unary.operand)?;

        let name = format!("unary{}", unary.opcode);
        let callee = self
            .get_function(&name)
            .ok_or_else(|| CodegenError::UnknownOperator {
                name: name.clone(),
                span: unary.span,
            })?;

        let call_site = self.builder.build_call(callee, &[operand.into()], "unop")?;
        self.call_result_to_float(call_site)
    }
}
