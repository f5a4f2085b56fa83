//! 数値リテラルと変数参照のコード生成

use crate::ast::{NumberExpr, VariableExpr};
use crate::error::{CodegenError, KaleidoResult};
use inkwell::values::FloatValue;

use crate::codegen::code_generator::CodeGenerator;

impl<'ctx> CodeGenerator<'ctx> {
    /// 数値リテラルをコンパイル
    pub fn compile_number(&self, number: &NumberExpr) -> KaleidoResult<FloatValue<'ctx>> {
        Ok(self.const_f64(number.value))
    }

    /// 変数参照をコンパイル
    ///
    /// 変数はスタックスロットに置かれているため、参照はロードになる。
    pub fn compile_variable(&mut self, variable: &VariableExpr) -> KaleidoResult<FloatValue<'ctx>> {
        let slot =
            self.named_values
                .get(&variable.name)
                .ok_or_else(|| CodegenError::UnknownVariable {
                    name: variable.name.clone(),
                    span: variable.span,
                })?;

        let value = self
            .builder
            .build_load(slot, &variable.name)?;
        Ok(value.into_float_value())
    }
}
