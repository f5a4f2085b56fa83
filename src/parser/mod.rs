//! パーサーモジュール
//!
//! このモジュールはトークンを抽象構文木（AST）に解析する責任を持ちます。
//! 再帰下降構文解析を使用し、二項演算子は優先順位テーブル駆動の
//! 優先順位クライミングで解析します。
//!
//! ## ユーザー定義演算子
//!
//! Kaleido言語では`def binary<op> <prec> (a b)`の形式で二項演算子を、
//! `def unary<op> (a)`の形式で単項演算子を定義できます：
//!
//! ```kaleido
//! # 低優先順位の逐次実行演算子
//! def binary: 1 (a b) b;
//!
//! # 論理否定
//! def unary! (v) if v then 0 else 1;
//! ```
//!
//! 二項演算子の優先順位はプロトタイプの解析時に[`OperatorTable`]へ
//! 登録され、以降の式解析で参照されます。

mod expr_parser;
mod item_parser;
mod operators;
mod parser_impl;

// 公開API
pub use operators::OperatorTable;
pub use parser_impl::Parser;

use crate::error::ParserError;
pub type ParseResult<T> = Result<T, ParserError>;
