//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、Kaleidoコンパイラ全体で使用される統一的なエラー型と
//! エラー報告システムを提供します。

use crate::ast::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// Kaleidoコンパイラの統一エラー型
#[derive(Error, Debug, Clone)]
pub enum KaleidoError {
    /// レキサーエラー
    #[error("字句解析エラー: {0}")]
    Lexer(#[from] LexerError),

    /// パーサーエラー
    #[error("構文解析エラー: {0}")]
    Parser(#[from] ParserError),

    /// コード生成エラー
    #[error("コード生成エラー: {0}")]
    Codegen(#[from] CodegenError),

    /// ファイルI/Oエラー
    #[error("ファイル操作エラー: {0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

/// レキサーエラーの詳細
#[derive(Error, Debug, Clone)]
pub enum LexerError {
    #[error("認識できないトークン: '{token}'")]
    UnrecognizedToken { token: String, span: Span },
}

/// パーサーエラーの詳細
#[derive(Error, Debug, Clone)]
pub enum ParserError {
    #[error("予期しないトークン: {expected}を期待しましたが、{found}が見つかりました")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("予期しない入力の終了: {expected}を期待していました")]
    UnexpectedEof { expected: String, span: Span },

    #[error("不正な優先順位 {value}: 1..=100の範囲で指定してください")]
    InvalidPrecedence { value: i32, span: Span },

    #[error("演算子 {name} の引数の数が不正です: {expected}個が必要ですが、{found}個が宣言されています")]
    OperatorArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
}

/// コード生成エラーの詳細
#[derive(Error, Debug, Clone)]
pub enum CodegenError {
    #[error("未定義の変数: {name}")]
    UnknownVariable { name: String, span: Span },

    #[error("'='の左辺は変数でなければなりません")]
    InvalidAssignmentTarget { span: Span },

    #[error("未定義の関数: {name}")]
    UnknownFunction { name: String, span: Span },

    #[error("未定義の演算子関数: {name}")]
    UnknownOperator { name: String, span: Span },

    #[error("引数の数が一致しません: 関数 {name} は{expected}個を期待しますが、{found}個が渡されました")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("else節のないif式はサポートされていません")]
    MissingElse { span: Span },

    #[error("関数 {name} の検証に失敗しました")]
    VerificationFailed { name: String },

    #[error("JIT初期化エラー: {message}")]
    JitInit { message: String },

    #[error("JITシンボル解決エラー: {name}")]
    JitLookup { name: String },

    #[error("内部エラー: {message}")]
    Internal { message: String },
}

impl CodegenError {
    /// エラーに対応するソース位置（持たないバリアントもある）
    fn span(&self) -> Option<Span> {
        match self {
            CodegenError::UnknownVariable { span, .. }
            | CodegenError::InvalidAssignmentTarget { span }
            | CodegenError::UnknownFunction { span, .. }
            | CodegenError::UnknownOperator { span, .. }
            | CodegenError::ArityMismatch { span, .. }
            | CodegenError::MissingElse { span } => Some(*span),
            CodegenError::VerificationFailed { .. }
            | CodegenError::JitInit { .. }
            | CodegenError::JitLookup { .. }
            | CodegenError::Internal { .. } => None,
        }
    }
}

/// エラー情報とソースコードの位置情報を含むエラー
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: KaleidoError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: KaleidoError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let labels = match &self.error {
            KaleidoError::Lexer(LexerError::UnrecognizedToken { span, .. }) => {
                vec![Label::primary(self.file_id, span.start..span.end)
                    .with_message("ここに不正なトークンがあります")]
            }
            KaleidoError::Parser(e) => {
                let span = match e {
                    ParserError::UnexpectedToken { span, .. }
                    | ParserError::UnexpectedEof { span, .. }
                    | ParserError::InvalidPrecedence { span, .. }
                    | ParserError::OperatorArityMismatch { span, .. } => span,
                };
                vec![Label::primary(self.file_id, span.start..span.end)]
            }
            KaleidoError::Codegen(e) => match e.span() {
                Some(span) => vec![Label::primary(self.file_id, span.start..span.end)],
                None => vec![],
            },
            KaleidoError::Io(_) | KaleidoError::Other(_) => vec![],
        };

        Diagnostic::error()
            .with_message(self.error.to_string())
            .with_labels(labels)
    }
}

/// 複数のエラーを蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: KaleidoError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    /// エラーがあるかどうか
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// エラーの数
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// すべてのエラーを取得
    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }

    /// 最初のエラーを取得
    pub fn first_error(&self) -> Option<&DiagnosticError> {
        self.errors.first()
    }

    /// 蓄積されたエラーをクリア
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

/// Result型のエイリアス
pub type KaleidoResult<T> = Result<T, KaleidoError>;

impl From<inkwell::builder::BuilderError> for KaleidoError {
    fn from(e: inkwell::builder::BuilderError) -> Self {
        KaleidoError::Codegen(CodegenError::Internal {
            message: format!("LLVM builder error: {:?}", e),
        })
    }
}

impl From<std::io::Error> for KaleidoError {
    fn from(e: std::io::Error) -> Self {
        KaleidoError::Io(e.to_string())
    }
}
