//! 出力されるLLVM IRのテキスト検証

use super::*;

#[test]
fn test_emits_function_definition() {
    let ir = emit_ir("def f(x) x + 1;", false);
    assert!(
        ir.contains("define double @f(double %x)"),
        "definition should appear in the IR: {}",
        ir
    );
    assert!(ir.contains("ret double"), "IR should return a double: {}", ir);
}

#[test]
fn test_top_level_expression_is_an_anonymous_function() {
    let ir = emit_ir("1 + 2;", false);
    assert!(ir.contains("__anon_expr"), "IR should contain the wrapper: {}", ir);
}

#[test]
fn test_debug_mode_keeps_stack_slots() {
    // デバッグモードでは最適化パスが走らず、allocaとstoreが残る
    let ir = emit_ir("def id(x) x;", true);
    assert!(ir.contains("alloca double"), "raw IR should use a stack slot: {}", ir);
    assert!(ir.contains("store double"), "raw IR should spill the argument: {}", ir);
}

#[test]
fn test_optimization_promotes_stack_slots() {
    // mem2regがエントリブロックのallocaをSSAレジスタへ昇格する
    let ir = emit_ir("def id(x) x;", false);
    assert!(!ir.contains("alloca"), "stack slots should be promoted: {}", ir);
}

#[test]
fn test_comparison_lowers_to_unordered_less_than() {
    let ir = emit_ir("def lt(a b) a < b;", true);
    assert!(ir.contains("fcmp ult"), "comparison should be fcmp ult: {}", ir);
    assert!(ir.contains("uitofp"), "i1 should be widened to double: {}", ir);
}

#[test]
fn test_if_produces_phi_node() {
    let ir = emit_ir("def choose(c a b) if c then a else b;", true);
    assert!(ir.contains("phi double"), "merge should use a phi: {}", ir);
    assert!(ir.contains("then:"), "then block should exist: {}", ir);
    assert!(ir.contains("else:"), "else block should exist: {}", ir);
    assert!(ir.contains("ifcont:"), "merge block should exist: {}", ir);
}

#[test]
fn test_for_loop_blocks() {
    let ir = emit_ir("def count(n) for i = 0, i < n in 1;", true);
    assert!(ir.contains("loop:"), "loop block should exist: {}", ir);
    assert!(ir.contains("afterloop:"), "exit block should exist: {}", ir);
    assert!(ir.contains("nextvar"), "induction update should exist: {}", ir);
}

#[test]
fn test_extern_emits_declaration() {
    let ir = emit_ir("extern sin(x);", false);
    assert!(
        ir.contains("declare double @sin(double"),
        "extern should emit a declaration: {}",
        ir
    );
}

#[test]
fn test_call_emits_call_instruction() {
    let ir = emit_ir("def f(x) x; def g(y) f(y);", true);
    assert!(ir.contains("call double @f"), "call should reference f: {}", ir);
}

#[test]
fn test_user_defined_operator_function_name() {
    let ir = emit_ir("def binary| 5 (a b) a + b; def f(x y) x | y;", false);
    assert!(
        ir.contains("binary|"),
        "operator should lower to a call to binary|: {}",
        ir
    );
}

#[test]
fn test_unary_operator_lowered_to_call() {
    let ir = emit_ir("def unary! (v) if v then 0 else 1; def f(x) !x;", true);
    assert!(ir.contains("unary!"), "operator should lower to a call to unary!: {}", ir);
}

#[test]
fn test_failed_node_reports_error_in_output() {
    let ir = emit_ir("def bad(x) y;", false);
    assert!(ir.contains("Error during compilation\n"));
}

#[test]
fn test_error_does_not_stop_later_nodes() {
    let ir = emit_ir("def bad(x) y; def good(x) x;", false);
    assert!(ir.contains("Error during compilation\n"));
    assert!(ir.contains("define double @good"));
}

#[test]
fn test_var_emits_named_slots_in_debug_mode() {
    let ir = emit_ir("def t() var total = 1 in total;", true);
    assert!(ir.contains("%total = alloca double"), "binding should get a named slot: {}", ir);
}
