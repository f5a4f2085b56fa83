//! コンパイラのメイン処理モジュール
//!
//! このモジュールは、字句解析から構文解析・コード生成・JIT実行までの
//! パイプライン全体を管理し、複数のエラーを蓄積しながら処理を進める
//! 機能を提供します。

use crate::ast::Item;
use crate::codegen::CodeGenerator;
use crate::error::{ErrorCollector, KaleidoError, KaleidoResult};
use crate::lexer::{tokenize, TokenWithPosition};
use crate::parser::{OperatorTable, Parser};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use inkwell::context::Context;
use std::fs;
use std::path::Path;

/// コンパイル状態を管理する構造体
pub struct CompilationState {
    pub files: SimpleFiles<String, String>,
    pub error_collector: ErrorCollector,
}

impl CompilationState {
    /// 新しいコンパイル状態を作成
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            error_collector: ErrorCollector::new(),
        }
    }

    /// ソースを登録してファイルIDを返す
    ///
    /// REPLでは入力行ごとに新しいソースとして登録される。
    pub fn add_source(&mut self, name: &str, source: &str) -> usize {
        self.files.add(name.to_string(), source.to_string())
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: KaleidoError, file_id: usize) {
        self.error_collector.add_error(error, file_id);
    }

    /// 診断情報を標準エラーへ報告
    pub fn report_diagnostics(&self) -> KaleidoResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Always);
        let config = codespan_reporting::term::Config::default();

        for error in self.error_collector.errors() {
            let diagnostic = error.to_diagnostic();
            codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, &diagnostic)
                .map_err(|e| KaleidoError::Io(format!("診断の出力に失敗しました: {}", e)))?;
        }

        Ok(())
    }

    /// エラーがあるかチェック
    pub fn has_errors(&self) -> bool {
        self.error_collector.has_errors()
    }

    /// エラー数を取得
    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }
}

impl Default for CompilationState {
    fn default() -> Self {
        Self::new()
    }
}

/// コンパイルパイプライン
///
/// REPLで使えるように、JITの状態とユーザー定義演算子の優先順位
/// テーブルを入力をまたいで保持する。
pub struct CompilationPipeline<'ctx> {
    state: CompilationState,
    codegen: CodeGenerator<'ctx>,
    operators: OperatorTable,
    verbose: bool,
}

impl<'ctx> CompilationPipeline<'ctx> {
    /// 新しいコンパイルパイプラインを作成
    pub fn new(context: &'ctx Context, verbose: bool) -> KaleidoResult<Self> {
        Ok(Self {
            state: CompilationState::new(),
            codegen: CodeGenerator::new(context)?,
            operators: OperatorTable::default(),
            verbose,
        })
    }

    /// コンパイル状態への参照を取得
    pub fn state(&self) -> &CompilationState {
        &self.state
    }

    /// ソースを解析してトップレベル項目の列を返す
    ///
    /// 字句解析・構文解析のエラーはコレクターへ蓄積され、Noneを返す。
    pub fn parse_source(&mut self, name: &str, source: &str) -> Option<Vec<Item>> {
        let file_id = self.state.add_source(name, source);
        let tokens = self.tokenize_source(source, file_id)?;
        self.parse_tokens(tokens, file_id)
    }

    /// ソースを評価し、トップレベル式の値を順に返す
    pub fn evaluate(&mut self, name: &str, source: &str) -> Vec<f64> {
        match self.parse_source(name, source) {
            Some(items) => self.evaluate_items(&items),
            None => Vec::new(),
        }
    }

    /// 解析済みの項目列を評価する
    pub fn evaluate_items(&mut self, items: &[Item]) -> Vec<f64> {
        if self.verbose {
            println!("ステップ: コード生成とJIT実行を開始");
        }
        self.codegen.evaluate(items)
    }

    /// ソースをコンパイルしてLLVM IRのテキストを返す
    ///
    /// `debug`が真の場合は最適化パスを適用しない。
    pub fn emit_assembly(&mut self, name: &str, source: &str, debug: bool) -> Option<String> {
        let items = self.parse_source(name, source)?;
        if self.verbose {
            println!("ステップ: コード生成を開始");
        }
        Some(self.codegen.emit_assembly(&items, debug))
    }

    /// ファイルを読み込んで評価する
    pub fn evaluate_file<P: AsRef<Path>>(&mut self, path: P) -> KaleidoResult<Vec<f64>> {
        let name = path.as_ref().display().to_string();
        let source = fs::read_to_string(path.as_ref())
            .map_err(|e| KaleidoError::Io(format!("ソースファイルを読み込めません: {}", e)))?;
        Ok(self.evaluate(&name, &source))
    }

    /// エラーレポートを出力
    pub fn report_errors(&self) -> KaleidoResult<()> {
        self.state.report_diagnostics()?;

        if self.state.has_errors() {
            eprintln!(
                "\nコンパイルエラー: {} 個のエラーが見つかりました",
                self.state.error_count()
            );
        }

        Ok(())
    }

    /// 蓄積されたエラーをクリア（REPLの次の入力に備える）
    pub fn clear_errors(&mut self) {
        self.state.error_collector.clear();
    }

    /// レキシカル解析を実行
    fn tokenize_source(&mut self, source: &str, file_id: usize) -> Option<Vec<TokenWithPosition>> {
        if self.verbose {
            println!("ステップ: レキシカル解析を開始");
        }

        match tokenize(source) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                self.state.add_error(e, file_id);
                None
            }
        }
    }

    /// 構文解析を実行
    ///
    /// ユーザー定義演算子の優先順位はパーサーとの間で受け渡しされ、
    /// 後続の入力の解析に引き継がれる。
    fn parse_tokens(&mut self, tokens: Vec<TokenWithPosition>, file_id: usize) -> Option<Vec<Item>> {
        if self.verbose {
            println!("ステップ: 構文解析を開始");
        }

        let mut parser = Parser::with_operators(tokens, std::mem::take(&mut self.operators));
        let result = parser.parse();
        self.operators = parser.into_operators();

        match result {
            Ok(items) => Some(items),
            Err(e) => {
                self.state.add_error(e.into(), file_id);
                None
            }
        }
    }
}
