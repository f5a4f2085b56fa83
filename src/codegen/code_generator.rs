//! メインコード生成器

use crate::ast::{Function, Item, Prototype};
use crate::error::{CodegenError, KaleidoError, KaleidoResult};
use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::execution_engine::ExecutionEngine;
use inkwell::module::{Linkage, Module};
use inkwell::passes::PassBuilderOptions;
use inkwell::targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine};
use inkwell::types::BasicMetadataTypeEnum;
use inkwell::values::{
    AnyValue, CallSiteValue, FloatValue, FunctionValue, IntValue, PointerValue,
};
use inkwell::{FloatPredicate, OptimizationLevel};

use super::symbol_table::{NamedValues, PrototypeRegistry};

/// 関数の出力が完了するたびに適用する最適化パス列
const OPTIMIZATION_PASSES: &str = "mem2reg,instcombine,reassociate,gvn,simplifycfg";

/// メインコード生成器構造体
///
/// 現在のモジュール・IRビルダー・シンボルテーブルを所有し、
/// トップレベル項目ごとのコンパイルとJITへの引き渡しを行う。
pub struct CodeGenerator<'ctx> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>,
    pub builder: Builder<'ctx>,

    // 完成したモジュールの提出先となるMCJITエンジン
    pub(super) jit: ExecutionEngine<'ctx>,
    // 最適化パス実行用のターゲットマシン
    target_machine: TargetMachine,

    // シンボルテーブル
    pub(super) named_values: NamedValues<'ctx>,
    pub(super) function_protos: PrototypeRegistry,

    // トップレベル式の評価結果
    pub(super) evaluation_results: Vec<f64>,
    // これまでにJITへ渡した無名関数の数
    anonymous_count: u64,
    // trueの間は最適化パスを適用しない
    debug: bool,
}

impl<'ctx> CodeGenerator<'ctx> {
    pub fn new(context: &'ctx Context) -> KaleidoResult<Self> {
        Target::initialize_all(&InitializationConfig::default());

        // ブートストラップ用の空モジュールからMCJITエンジンを作成する
        let bootstrap = context.create_module("jit");
        let jit = bootstrap
            .create_jit_execution_engine(OptimizationLevel::Default)
            .map_err(|e| CodegenError::JitInit {
                message: e.to_string(),
            })?;

        let triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&triple).map_err(|e| CodegenError::JitInit {
            message: e.to_string(),
        })?;
        let target_machine = target
            .create_target_machine(
                &triple,
                "generic",
                "",
                OptimizationLevel::Default,
                RelocMode::Default,
                CodeModel::Default,
            )
            .ok_or_else(|| CodegenError::JitInit {
                message: "ターゲットマシンを作成できません".to_string(),
            })?;

        let mut generator = Self {
            context,
            module: context.create_module("jit"),
            builder: context.create_builder(),
            jit,
            target_machine,
            named_values: NamedValues::new(),
            function_protos: PrototypeRegistry::new(),
            evaluation_results: Vec::new(),
            anonymous_count: 0,
            debug: false,
        };
        generator.init_module();
        Ok(generator)
    }

    /// 現在のモジュールとビルダーを新しく作り直す
    ///
    /// JITへモジュールを引き渡した直後に呼び出される。データレイアウトは
    /// JITのターゲットに合わせる。
    pub(super) fn init_module(&mut self) {
        let module = self.context.create_module("jit");
        module.set_data_layout(&self.jit.get_target_data().get_data_layout());
        self.module = module;
        self.builder = self.context.create_builder();
    }

    /// 各トップレベル項目のIRを連結したテキストを返す
    ///
    /// `debug`が真の間は最適化パスを適用せず、出力されたままのIRを
    /// 観察できる。コンパイルに失敗した項目は
    /// "Error during compilation\n" として出力される。
    pub fn emit_assembly(&mut self, items: &[Item], debug: bool) -> String {
        self.debug = debug;
        let mut output = String::new();
        for item in items {
            match item {
                Item::Function(function_ast) => match self.compile_function(function_ast) {
                    Ok(function) => output.push_str(&function.print_to_string().to_string()),
                    Err(e) => {
                        self.report_error(&e);
                        output.push_str("Error during compilation\n");
                    }
                },
                Item::Extern(proto) => {
                    let function = self.declare_prototype(proto);
                    output.push_str(&function.print_to_string().to_string());
                }
            }
        }
        self.debug = false;
        output
    }

    /// 関数定義をコンパイルする
    ///
    /// プロトタイプをレジストリへ複製してから関数を解決するため、
    /// 同名の関数がJITへ引き渡し済みでも新しいモジュールに再宣言できる。
    pub fn compile_function(&mut self, function_ast: &Function) -> KaleidoResult<FunctionValue<'ctx>> {
        let proto = &function_ast.proto;

        // 本体より先に登録することで、再帰呼び出しが自分自身を解決できる。
        // 本体のコンパイルに失敗したら登録を巻き戻す。コンパイルされて
        // いない関数がレジストリに残ると、後続の呼び出しが解決不能な
        // シンボルとしてJITへ届いてしまう
        let previous_proto = self.function_protos.get(&proto.name).cloned();
        self.function_protos.register(proto.clone());

        // この定義の前から宣言が存在した場合、既に呼び出し側から参照されて
        // いる可能性があるため、失敗時でも関数を削除してはならない
        let preexisting = self.module.get_function(&proto.name).is_some();

        let function = match self.get_function(&proto.name) {
            Some(function) => function,
            None => {
                return Err(CodegenError::Internal {
                    message: format!("関数 {} を解決できません", proto.name),
                }
                .into())
            }
        };

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        // 引数をスタックスロットへ書き出し、束縛表を作り直す
        self.named_values.clear();
        for (index, param_name) in proto.params.iter().enumerate() {
            let param = function
                .get_nth_param(index as u32)
                .ok_or_else(|| CodegenError::Internal {
                    message: format!("引数 {} が見つかりません", index),
                })?
                .into_float_value();
            let slot = self.create_entry_block_alloca(function, param_name)?;
            self.builder.build_store(slot, param)?;
            self.named_values.define(param_name.clone(), slot);
        }

        let emitted = self
            .compile_expr(&function_ast.body)
            .and_then(|return_value| {
                self.builder.build_return(Some(&return_value))?;
                Ok(())
            });

        if let Err(e) = emitted {
            // 作りかけの本体を持つ関数を残すとモジュールが無効になる
            if !preexisting {
                unsafe { function.delete() };
            }
            self.roll_back_prototype(&proto.name, previous_proto);
            return Err(e);
        }

        if !function.verify(true) {
            function.print_to_stderr();
            if !preexisting {
                unsafe { function.delete() };
            }
            self.roll_back_prototype(&proto.name, previous_proto);
            return Err(CodegenError::VerificationFailed {
                name: proto.name.clone(),
            }
            .into());
        }

        self.run_optimization_passes()?;
        Ok(function)
    }

    /// JITシンボルとして一意な無名関数名を払い出す
    ///
    /// MCJITのシンボル検索は追加順にモジュールを見るため、同じ名前の
    /// 無名関数を繰り返し登録すると古い式が解決されてしまう。
    pub(super) fn next_anonymous_name(&mut self) -> String {
        let name = format!(
            "{}.{}",
            crate::ast::ANONYMOUS_FUNCTION_NAME,
            self.anonymous_count
        );
        self.anonymous_count += 1;
        name
    }

    /// 失敗した定義のプロトタイプ登録を取り消す
    fn roll_back_prototype(&mut self, name: &str, previous: Option<Prototype>) {
        match previous {
            Some(proto) => self.function_protos.register(proto),
            None => self.function_protos.remove(name),
        }
    }

    /// プロトタイプから関数宣言を生成する
    ///
    /// シグネチャは常に `(double, ...) -> double`。
    pub fn declare_prototype(&self, proto: &Prototype) -> FunctionValue<'ctx> {
        let f64_type = self.context.f64_type();
        let param_types: Vec<BasicMetadataTypeEnum> =
            proto.params.iter().map(|_| f64_type.into()).collect();
        let fn_type = f64_type.fn_type(&param_types, false);
        let function = self
            .module
            .add_function(&proto.name, fn_type, Some(Linkage::External));

        for (param, name) in function.get_param_iter().zip(&proto.params) {
            param.into_float_value().set_name(name);
        }

        function
    }

    /// 関数を名前で解決する
    ///
    /// 現在のモジュールに存在すればそれを返し、なければ登録済み
    /// プロトタイプから新しい宣言を生成する。どちらにもない場合はNone。
    pub fn get_function(&mut self, name: &str) -> Option<FunctionValue<'ctx>> {
        if let Some(function) = self.module.get_function(name) {
            return Some(function);
        }

        if let Some(proto) = self.function_protos.get(name).cloned() {
            return Some(self.declare_prototype(&proto));
        }

        None
    }

    /// 検証済みの関数へ最適化パスを適用する
    fn run_optimization_passes(&self) -> KaleidoResult<()> {
        if self.debug {
            return Ok(());
        }
        self.module
            .run_passes(
                OPTIMIZATION_PASSES,
                &self.target_machine,
                PassBuilderOptions::create(),
            )
            .map_err(|e| {
                CodegenError::Internal {
                    message: format!("最適化パスの実行に失敗しました: {}", e),
                }
                .into()
            })
    }

    // ==================== IRビルダーのヘルパー ====================

    /// double定数を生成
    pub(super) fn const_f64(&self, value: f64) -> FloatValue<'ctx> {
        self.context.f64_type().const_float(value)
    }

    /// 数値を真偽値へ変換（0.0との不等比較でi1を得る）
    pub(super) fn build_truthiness(
        &self,
        value: FloatValue<'ctx>,
        name: &str,
    ) -> KaleidoResult<IntValue<'ctx>> {
        Ok(self.builder.build_float_compare(
            FloatPredicate::ONE,
            value,
            self.const_f64(0.0),
            name,
        )?)
    }

    /// 関数のエントリブロックにスタックスロットを確保する
    ///
    /// mem2regで昇格できるよう、可変記憶は必ずエントリブロックの
    /// 先頭にまとめて置く。
    pub(super) fn create_entry_block_alloca(
        &self,
        function: FunctionValue<'ctx>,
        name: &str,
    ) -> KaleidoResult<PointerValue<'ctx>> {
        let builder = self.context.create_builder();

        let entry = function
            .get_first_basic_block()
            .ok_or_else(|| CodegenError::Internal {
                message: "関数にエントリブロックがありません".to_string(),
            })?;

        match entry.get_first_instruction() {
            Some(first_inst) => builder.position_before(&first_inst),
            None => builder.position_at_end(entry),
        }

        Ok(builder.build_alloca(self.context.f64_type(), name)?)
    }

    /// ビルダーの挿入位置が属する関数を取得
    pub(super) fn current_function(&self) -> KaleidoResult<FunctionValue<'ctx>> {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_parent())
            .ok_or_else(|| {
                CodegenError::Internal {
                    message: "挿入位置が関数の中にありません".to_string(),
                }
                .into()
            })
    }

    /// ビルダーの現在の挿入ブロックを取得
    pub(super) fn current_block(&self) -> KaleidoResult<BasicBlock<'ctx>> {
        self.builder.get_insert_block().ok_or_else(|| {
            CodegenError::Internal {
                message: "挿入ブロックがありません".to_string(),
            }
            .into()
        })
    }

    /// 呼び出し結果をdouble値として取り出す
    pub(super) fn call_result_to_float(
        &self,
        call_site: CallSiteValue<'ctx>,
    ) -> KaleidoResult<FloatValue<'ctx>> {
        call_site
            .try_as_basic_value()
            .left()
            .map(|value| value.into_float_value())
            .ok_or_else(|| {
                CodegenError::Internal {
                    message: "呼び出しが値を返しませんでした".to_string(),
                }
                .into()
            })
    }

    /// コンパイルエラーを標準エラーへ報告する
    pub(super) fn report_error(&self, error: &KaleidoError) {
        eprintln!("{}", error);
    }
}
