//! メインパーサー構造とユーティリティ

use crate::ast::Span;
use crate::error::ParserError;
use crate::lexer::{Token, TokenWithPosition};

use super::operators::OperatorTable;
use super::ParseResult;

/// Kaleidoパーサー
pub struct Parser {
    pub(super) tokens: Vec<TokenWithPosition>,
    pub(super) current: usize,
    pub(super) operators: OperatorTable,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPosition>) -> Self {
        Self::with_operators(tokens, OperatorTable::default())
    }

    /// 既存の優先順位テーブルを引き継いでパーサーを作成（REPL用）
    pub fn with_operators(tokens: Vec<TokenWithPosition>, operators: OperatorTable) -> Self {
        Self {
            tokens,
            current: 0,
            operators,
        }
    }

    /// 優先順位テーブルを取り出す
    ///
    /// ユーザー定義演算子の登録を後続の解析に引き継ぐために使います。
    pub fn into_operators(self) -> OperatorTable {
        self.operators
    }

    // ==================== ユーティリティメソッド ====================

    /// 現在のトークンを取得
    pub(super) fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|t| &t.token)
    }

    /// 現在のスパンを取得
    pub(super) fn current_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|t| t.span.clone().into())
            .unwrap_or_else(|| {
                // 入力終端では最後のトークンの終了位置を指す
                self.tokens
                    .last()
                    .map(|t| Span::new(t.span.end, t.span.end))
                    .unwrap_or_else(Span::dummy)
            })
    }

    /// 開始位置から直前のトークンの終了位置までのスパンを作成
    pub(super) fn span_from(&self, start: usize) -> Span {
        let end = if self.current > 0 {
            self.tokens
                .get(self.current - 1)
                .map(|t| t.span.end)
                .unwrap_or(start)
        } else {
            start
        };
        Span::new(start, end)
    }

    /// 次のトークンに進む
    pub(super) fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// 終端に到達したかチェック
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// 特定のトークンをチェック（進まない）
    pub(super) fn check(&self, token_type: &Token) -> bool {
        if let Some(token) = self.current_token() {
            std::mem::discriminant(token) == std::mem::discriminant(token_type)
        } else {
            false
        }
    }

    /// 特定のトークンなら消費してtrueを返す
    pub(super) fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 特定の演算子文字なら消費してtrueを返す
    ///
    /// `Op`トークンは文字を持つため、`check`の判別子比較では区別できない。
    pub(super) fn match_op(&mut self, op: char) -> bool {
        if let Some(Token::Op(found)) = self.current_token() {
            if *found == op {
                self.advance();
                return true;
            }
        }
        false
    }

    /// 特定のトークンを要求して消費する
    pub(super) fn expect(&mut self, token_type: &Token, expected: &str) -> ParseResult<()> {
        if self.match_token(token_type) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// 識別子を要求して消費する
    pub(super) fn expect_identifier(&mut self, expected: &str) -> ParseResult<String> {
        match self.current_token() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// 演算子文字を要求して消費する
    pub(super) fn expect_op_char(&mut self, expected: &str) -> ParseResult<char> {
        match self.current_token() {
            Some(Token::Op(op)) => {
                let op = *op;
                self.advance();
                Ok(op)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// 現在のトークンに対するエラーを構築する
    pub(super) fn unexpected(&self, expected: &str) -> ParserError {
        match self.current_token() {
            Some(token) => ParserError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
                span: self.current_span(),
            },
            None => ParserError::UnexpectedEof {
                expected: expected.to_string(),
                span: self.current_span(),
            },
        }
    }
}
