//! JIT実行によるエンドツーエンドの評価テスト

use super::*;

#[test]
fn test_number_roundtrip() {
    // 数値リテラルはそのままの値で返る
    assert_eq!(
        evaluate_source("def main() 2.5; main();"),
        vec![2.5]
    );
}

#[test]
fn test_square_plus_one() {
    assert_eq!(evaluate_source("def f(x) x*x + 1; f(3);"), vec![10.0]);
}

#[test]
fn test_arithmetic_operators() {
    assert_eq!(
        evaluate_source("1 + 2; 7 - 4; 6 * 7; 9 / 2;"),
        vec![3.0, 3.0, 42.0, 4.5]
    );
}

#[test]
fn test_comparison_yields_zero_or_one() {
    assert_eq!(evaluate_source("1 < 2; 2 < 1;"), vec![1.0, 0.0]);
}

#[test]
fn test_division_by_zero_follows_ieee754() {
    let results = evaluate_source("1 / 0; 0 / 0;");
    assert_eq!(results.len(), 2);
    assert!(results[0].is_infinite());
    assert!(results[1].is_nan());
}

#[test]
fn test_fibonacci() {
    let source = "def fib(n) if n < 2 then n else fib(n-1) + fib(n-2); fib(10);";
    assert_eq!(evaluate_source(source), vec![55.0]);
}

#[test]
fn test_extern_sin() {
    // ホスト（libm）のsinがJITから呼び出せる
    assert_eq!(evaluate_source("extern sin(x); sin(0);"), vec![0.0]);
}

#[test]
fn test_loop_sum_with_sequencing_operator() {
    let source = r#"
    def binary: 1 (a b) b;
    def sum(n) var s = 0 in (for i = 1, i < n+1, 1 in s = s + i) : s;
    sum(10);
    "#;
    assert_eq!(evaluate_source(source), vec![55.0]);
}

#[test]
fn test_user_defined_binary_operator() {
    let source = r#"
    def binary| 5 (a b) if a then 1 else if b then 1 else 0;
    1|0;
    0|0;
    "#;
    assert_eq!(evaluate_source(source), vec![1.0, 0.0]);
}

#[test]
fn test_user_defined_unary_operator() {
    let source = r#"
    def unary! (v) if v then 0 else 1;
    !0;
    !1;
    "#;
    assert_eq!(evaluate_source(source), vec![1.0, 0.0]);
}

#[test]
fn test_cross_module_function_calls() {
    // gはhより前のモジュールでJITへ渡っているが、再宣言により呼び出せる
    let source = "def g(x) x+1; def h(x) g(x)*2; h(4);";
    assert_eq!(evaluate_source(source), vec![10.0]);
}

#[test]
fn test_function_redefinition_across_modules() {
    let source = "def f(x) x; f(1); def f(x) x * 10; f(1);";
    assert_eq!(evaluate_source(source), vec![1.0, 10.0]);
}

#[test]
fn test_assignment_returns_stored_value() {
    // 代入式の値は格納した値になり、以降の読み出しも新しい値を見る
    assert_eq!(
        evaluate_source("def t() var x = 1 in (x = 7) + x; t();"),
        vec![14.0]
    );
}

#[test]
fn test_var_shadowing_restores_outer_binding() {
    assert_eq!(
        evaluate_source("def s() var x = 1 in (var x = 2 in x) + x; s();"),
        vec![3.0]
    );
}

#[test]
fn test_var_initializer_sees_earlier_bindings() {
    assert_eq!(
        evaluate_source("def t() var a = 2, b = a * 3 in b; t();"),
        vec![6.0]
    );
}

#[test]
fn test_var_without_initializer_defaults_to_zero() {
    assert_eq!(evaluate_source("def z() var x in x; z();"), vec![0.0]);
}

#[test]
fn test_for_loop_restores_induction_variable() {
    // ループ変数は引数のiをシャドーし、ループの後で元の束縛へ戻る
    assert_eq!(
        evaluate_source("def r(i) (for i = 0, i < 3, 1 in i) + i; r(9);"),
        vec![9.0]
    );
}

#[test]
fn test_for_expression_value_is_zero() {
    assert_eq!(
        evaluate_source("def l() for i = 0, i < 3 in i; l();"),
        vec![0.0]
    );
}

#[test]
fn test_for_end_condition_sees_updated_variable() {
    // ステップ加算は終了条件の評価より前に行われる
    let source = r#"
    def binary: 1 (a b) b;
    def c() var n = 0 in (for i = 0, i < 2 in n = n + 1) : n;
    c();
    "#;
    assert_eq!(evaluate_source(source), vec![2.0]);
}

#[test]
fn test_sequence_preserves_order() {
    assert_eq!(evaluate_source("1; 2; 3;"), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_empty_argument_list() {
    assert_eq!(evaluate_source("def zero() 42; zero();"), vec![42.0]);
}

#[test]
fn test_definitions_and_externs_contribute_no_results() {
    assert_eq!(evaluate_source("def f(x) x; extern sin(x);"), vec![]);
}

#[test]
fn test_unknown_variable_skips_expression() {
    assert_eq!(evaluate_source("nope;"), vec![]);
}

#[test]
fn test_unknown_function_skips_expression() {
    assert_eq!(evaluate_source("nope(1);"), vec![]);
}

#[test]
fn test_arity_mismatch_skips_expression() {
    // アリティ検査は引数のIR出力より前に行われ、式全体が失敗する
    assert_eq!(evaluate_source("def one(x) x; one(1, 2);"), vec![]);
}

#[test]
fn test_if_without_else_is_a_compile_error() {
    assert_eq!(evaluate_source("def b(x) if x then 1;"), vec![]);
}

#[test]
fn test_assignment_to_non_variable_is_a_compile_error() {
    assert_eq!(evaluate_source("def a(x) (x + 1) = 2;"), vec![]);
}

#[test]
fn test_failed_definition_does_not_stop_later_nodes() {
    // 失敗した定義は報告されるだけで、後続の項目は処理される
    let source = "def bad(x) if x then 1; def good(x) x + 1; good(1);";
    assert_eq!(evaluate_source(source), vec![2.0]);
}

#[test]
fn test_call_to_failed_definition_is_a_compile_error() {
    // コンパイルに失敗した関数は未定義として扱われる
    assert_eq!(evaluate_source("def b(x) if x then 1; b(1);"), vec![]);
}

#[test]
fn test_nested_control_flow() {
    let source = r#"
    def binary: 1 (a b) b;
    def count(n)
      var total = 0 in
      (for i = 0, i < n in
        if i < 3 then total = total + 1 else total = total + 10) : total;
    count(5);
    "#;
    // i = 0..4 のうち3回は+1、2回は+10
    assert_eq!(evaluate_source(source), vec![23.0]);
}
