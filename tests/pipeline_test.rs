//! コンパイルパイプラインの統合テスト
//!
//! ソース文字列・ファイルからJIT実行までの一連の流れと、
//! エラーの蓄積・REPL的な状態の引き継ぎを検証する。

use inkwell::context::Context;
use kaleido::compiler::CompilationPipeline;
use std::fs;
use tempfile::NamedTempFile;

#[test]
fn test_evaluate_source_string() {
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    let results = pipeline.evaluate("test", "def f(x) x * 2; f(21);");
    assert_eq!(results, vec![42.0]);
    assert!(!pipeline.state().has_errors());
}

#[test]
fn test_evaluate_file() {
    let file = NamedTempFile::new().expect("temp file");
    fs::write(file.path(), "def f(x) x * 2; f(21);").expect("write source");

    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    let results = pipeline.evaluate_file(file.path()).expect("evaluation should run");
    assert_eq!(results, vec![42.0]);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    assert!(pipeline.evaluate_file("/no/such/file.k").is_err());
}

#[test]
fn test_lexer_error_is_collected() {
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    let results = pipeline.evaluate("test", "def f(x) x @@@ [1];");
    assert!(results.is_empty());
    assert!(pipeline.state().has_errors());
}

#[test]
fn test_parse_error_is_collected() {
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    let results = pipeline.evaluate("test", "def f(");
    assert!(results.is_empty());
    assert!(pipeline.state().has_errors());
    assert_eq!(pipeline.state().error_count(), 1);
}

#[test]
fn test_clear_errors_resets_state() {
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    pipeline.evaluate("line1", "def f(");
    assert!(pipeline.state().has_errors());
    pipeline.clear_errors();
    assert!(!pipeline.state().has_errors());
}

#[test]
fn test_operator_table_persists_across_inputs() {
    // 前の入力で定義した演算子を後続の入力で使える
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    assert_eq!(pipeline.evaluate("line1", "def binary: 1 (a b) b;"), vec![]);
    assert_eq!(pipeline.evaluate("line2", "1 : 2 : 3;"), vec![3.0]);
    assert!(!pipeline.state().has_errors());
}

#[test]
fn test_jit_state_persists_across_inputs() {
    // 前の入力で定義した関数を後続の入力から呼び出せる
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    pipeline.evaluate("line1", "def twice(x) x + x;");
    assert_eq!(pipeline.evaluate("line2", "twice(5);"), vec![10.0]);
}

#[test]
fn test_emit_assembly_through_pipeline() {
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    let ir = pipeline
        .emit_assembly("test", "def f(x) x + 1;", false)
        .expect("emission should succeed");
    assert!(ir.contains("define double @f"));
}

#[test]
fn test_parse_source_returns_items() {
    let context = Context::create();
    let mut pipeline = CompilationPipeline::new(&context, false).expect("pipeline should start");
    let items = pipeline
        .parse_source("test", "def f(x) x; extern sin(x); 1;")
        .expect("parsing should succeed");
    assert_eq!(items.len(), 3);
}
