//! コード生成テストの共通モジュール
//!
//! コード生成テストで使用する共通のヘルパー関数を定義する。

use inkwell::context::Context;
use kaleido::ast::Item;
use kaleido::codegen::CodeGenerator;
use kaleido::lexer::tokenize;
use kaleido::parser::Parser;

/// ソースをトップレベル項目列へ解析するヘルパー関数
pub fn parse_items(source: &str) -> Vec<Item> {
    let tokens = tokenize(source).expect("tokenize should succeed");
    let mut parser = Parser::new(tokens);
    parser.parse().expect("parse should succeed")
}

/// ソースを評価してトップレベル式の値を返すヘルパー関数
pub fn evaluate_source(source: &str) -> Vec<f64> {
    let context = Context::create();
    let mut codegen = CodeGenerator::new(&context).expect("JIT initialization should succeed");
    codegen.evaluate(&parse_items(source))
}

/// ソースをコンパイルしてLLVM IRのテキストを返すヘルパー関数
pub fn emit_ir(source: &str, debug: bool) -> String {
    let context = Context::create();
    let mut codegen = CodeGenerator::new(&context).expect("JIT initialization should succeed");
    codegen.emit_assembly(&parse_items(source), debug)
}

// サブモジュールの宣言
mod eval_test;
mod ir_test;
