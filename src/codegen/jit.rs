//! JITドライバ
//!
//! トップレベル項目ごとにモジュールを完成させてMCJITへ引き渡し、
//! 無名関数のアドレスを解決して呼び出します。引き渡し後のモジュールで
//! 定義された関数は、プロトタイプレジストリ経由の再宣言によって
//! 後続のモジュールからも呼び出せます。

use crate::ast::{Function, Item, Prototype};
use crate::error::{CodegenError, KaleidoResult};

use super::code_generator::CodeGenerator;

/// JITが呼び出すトップレベル式のシグネチャ
type TopLevelFn = unsafe extern "C" fn() -> f64;

impl<'ctx> CodeGenerator<'ctx> {
    /// トップレベル項目列を順に評価し、トップレベル式の値を集めて返す
    ///
    /// コンパイルエラーは標準エラーへ報告され、失敗した項目は結果に
    /// 寄与しない。残りの項目の処理は継続する。
    pub fn evaluate(&mut self, items: &[Item]) -> Vec<f64> {
        self.evaluation_results.clear();
        for item in items {
            match item {
                Item::Function(function_ast) if function_ast.proto.is_anonymous() => {
                    self.jit_top_level_expression(function_ast)
                }
                Item::Function(function_ast) => self.jit_definition(function_ast),
                Item::Extern(proto) => self.jit_extern(proto),
            }
        }
        std::mem::take(&mut self.evaluation_results)
    }

    /// 無名関数をコンパイル・実行し、戻り値を蓄積する
    fn jit_top_level_expression(&mut self, function_ast: &Function) {
        // JITへ渡す無名関数には一意なシンボル名を与え、以前に評価した
        // 式と名前が衝突しないようにする
        let mut wrapper = function_ast.clone();
        wrapper.proto.name = self.next_anonymous_name();
        let symbol = wrapper.proto.name.clone();

        if let Err(e) = self.compile_function(&wrapper) {
            self.report_error(&e);
            return;
        }

        if let Err(e) = self.submit_module() {
            self.report_error(&e);
            return;
        }
        self.init_module();

        let value = match unsafe { self.jit.get_function::<TopLevelFn>(&symbol) } {
            Ok(compiled) => unsafe { compiled.call() },
            Err(_) => {
                self.report_error(&CodegenError::JitLookup { name: symbol }.into());
                return;
            }
        };
        self.evaluation_results.push(value);
    }

    /// 関数定義を新しいモジュールでコンパイルする
    ///
    /// それまでに完成していたモジュールを先にJITへ引き渡すことで、
    /// 定義済みの関数を後続のモジュールから呼び出せるようにする。
    fn jit_definition(&mut self, function_ast: &Function) {
        if let Err(e) = self.submit_module() {
            self.report_error(&e);
            return;
        }
        self.init_module();

        if let Err(e) = self.compile_function(function_ast) {
            self.report_error(&e);
        }
    }

    /// extern宣言を現在のモジュールへ出力し、プロトタイプを記録する
    fn jit_extern(&mut self, proto: &Prototype) {
        let function = self.declare_prototype(proto);
        self.function_protos.register(proto.clone());

        // 既知のホスト関数は名前とアドレスをJITへ対応付ける。それ以外の
        // externはプロセスのシンボルテーブル（libmのsinなど）で解決される
        if let Some(address) = crate::runtime::host_function_address(&proto.name) {
            self.jit.add_global_mapping(&function, address);
        }
    }

    /// 現在のモジュールの所有権をJITへ移す
    fn submit_module(&mut self) -> KaleidoResult<()> {
        self.jit.add_module(&self.module).map_err(|_| {
            CodegenError::Internal {
                message: "モジュールをJITへ追加できませんでした".to_string(),
            }
            .into()
        })
    }
}
