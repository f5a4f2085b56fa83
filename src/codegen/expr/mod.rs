//! 式のコード生成モジュール

mod basic;
mod binary;
mod call;
mod control;
mod unary;
mod var_decl;

use crate::ast::Expr;
use crate::error::KaleidoResult;
use inkwell::values::FloatValue;

use super::code_generator::CodeGenerator;

impl<'ctx> CodeGenerator<'ctx> {
    /// 式をコンパイル
    ///
    /// すべての式はdouble型のひとつの値を生成する。オペランドの
    /// コンパイルに失敗した場合は`?`でそのまま呼び出し元へ伝播する。
    pub fn compile_expr(&mut self, expr: &Expr) -> KaleidoResult<FloatValue<'ctx>> {
        match expr {
            Expr::Number(number) => self.compile_number(number),
            Expr::Variable(variable) => self.compile_variable(variable),
            Expr::Unary(unary) => self.compile_unary_expr(unary),
            Expr::Binary(binary) => self.compile_binary_expr(binary),
            Expr::Var(declaration) => self.compile_var_expr(declaration),
            Expr::Call(call) => self.compile_call_expr(call),
            Expr::If(if_expr) => self.compile_if_expr(if_expr),
            Expr::For(for_expr) => self.compile_for_expr(for_expr),
        }
    }
}
