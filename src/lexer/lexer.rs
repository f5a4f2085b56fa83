//! レキサーのメイン実装

use logos::{Lexer as LogosLexer, Logos, Span};

use super::token::Token;
use crate::error::{KaleidoResult, LexerError};

/// 位置情報付きトークン
#[derive(Debug, Clone)]
pub struct TokenWithPosition {
    pub token: Token,
    pub span: Span,
}

/// Kaleido言語のレキサー
pub struct Lexer<'a> {
    inner: LogosLexer<'a, Token>,
}

impl<'a> Lexer<'a> {
    /// 新しいレキサーを作成
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: Token::lexer(input),
        }
    }

    /// 次のトークンを取得
    ///
    /// 認識できない文字はエラーとして報告されます。
    pub fn next_token(&mut self) -> Option<KaleidoResult<TokenWithPosition>> {
        let result = self.inner.next()?;
        let span = self.inner.span();

        match result {
            Ok(token) => Some(Ok(TokenWithPosition { token, span })),
            Err(_) => Some(Err(LexerError::UnrecognizedToken {
                token: self.inner.slice().to_owned(),
                span: span.into(),
            }
            .into())),
        }
    }

    /// すべてのトークンを収集
    pub fn collect_tokens(mut self) -> KaleidoResult<Vec<TokenWithPosition>> {
        let mut tokens = Vec::new();
        while let Some(result) = self.next_token() {
            tokens.push(result?);
        }
        Ok(tokens)
    }
}

/// ソースコードをトークン化
pub fn tokenize(input: &str) -> KaleidoResult<Vec<TokenWithPosition>> {
    Lexer::new(input).collect_tokens()
}

/// デバッグ用：トークンストリームを文字列として出力
pub fn format_tokens(tokens: &[TokenWithPosition]) -> String {
    tokens
        .iter()
        .map(|t| format!("{:?} @ {:?}", t.token, t.span))
        .collect::<Vec<_>>()
        .join("\n")
}
