//! 二項演算と代入のコード生成

use crate::ast::{BinaryExpr, Expr};
use crate::error::{CodegenError, KaleidoResult};
use inkwell::values::FloatValue;
use inkwell::FloatPredicate;

use crate::codegen::code_generator::CodeGenerator;

impl<'ctx> CodeGenerator<'ctx> {
    /// 二項演算式をコンパイル
    ///
    /// 組み込み演算子は浮動小数点命令へ、それ以外は`binary<op>`という
    /// 名前のユーザー定義関数の呼び出しへ展開する。
    pub fn compile_binary_expr(&mut self, binary: &BinaryExpr) -> KaleidoResult<FloatValue<'ctx>> {
        // '='は代入として特別扱い
        if binary.op == '=' {
            return self.compile_assignment(binary);
        }

        let left = self.compile_expr(&binary.left)?;
        let right = self.compile_expr(&binary.right)?;

        match binary.op {
            '+' => Ok(self.builder.build_float_add(left, right, "addtmp")?),
            '-' => Ok(self.builder.build_float_sub(left, right, "subtmp")?),
            '*' => Ok(self.builder.build_float_mul(left, right, "multmp")?),
            '/' => Ok(self.builder.build_float_div(left, right, "divtmp")?),
            '<' => {
                let cmp = self.builder.build_float_compare(
                    FloatPredicate::ULT,
                    left,
                    right,
                    "cmptmp",
                )?;
                // i1の比較結果をdoubleの0.0/1.0へ拡張する
                Ok(self.builder.build_unsigned_int_to_float(
                    cmp,
                    self.context.f64_type(),
                    "booltmp",
                )?)
            }
            op => {
                let name = format!("binary{}", op);
                let callee =
                    self.get_function(&name)
                        .ok_or_else(|| CodegenError::UnknownOperator {
                            name: name.clone(),
                            span: binary.span,
                        })?;
                let call_site =
                    self.builder
                        .build_call(callee, &[left.into(), right.into()], "binop")?;
                self.call_result_to_float(call_site)
            }
        }
    }

    /// 代入式をコンパイル
    ///
    /// 左辺は変数でなければならない。式の値は格納した値になる。
    fn compile_assignment(&mut self, binary: &BinaryExpr) -> KaleidoResult<FloatValue<'ctx>> {
        let target = match binary.left.as_ref() {
            Expr::Variable(variable) => variable,
            _ => {
                return Err(CodegenError::InvalidAssignmentTarget { span: binary.span }.into());
            }
        };

        let value = self.compile_expr(&binary.right)?;

        let slot =
            self.named_values
                .get(&target.name)
                .ok_or_else(|| CodegenError::UnknownVariable {
                    name: target.name.clone(),
                    span: target.span,
                })?;
        self.builder.build_store(slot, value)?;

        Ok(value)
    }
}
