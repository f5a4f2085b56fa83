//! 関数呼び出しのコード生成

use crate::ast::CallExpr;
use crate::error::{CodegenError, KaleidoResult};
use inkwell::values::{BasicMetadataValueEnum, FloatValue};

use crate::codegen::code_generator::CodeGenerator;

impl<'ctx> CodeGenerator<'ctx> {
    /// 関数呼び出し式をコンパイル
    pub fn compile_call_expr(&mut self, call: &CallExpr) -> KaleidoResult<FloatValue<'ctx>> {
        let callee = self
            .get_function(&call.callee)
            .ok_or_else(|| CodegenError::UnknownFunction {
                name: call.callee.clone(),
                span: call.span,
            })?;

        // 引数のIRを出力する前にアリティを検査する
        let expected = callee.count_params() as usize;
        if expected != call.args.len() {
            return Err(CodegenError::ArityMismatch {
                name: call.callee.clone(),
                expected,
                found: call.args.len(),
                span: call.span,
            }
            .into());
        }

        let mut args: Vec<BasicMetadataValueEnum> = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.compile_expr(arg)?.into());
        }

        let call_site = self.builder.build_call(callee, &args, "calltmp")?;
        self.call_result_to_float(call_site)
    }
}
