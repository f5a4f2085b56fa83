//! トップレベル項目（定義・extern宣言・トップレベル式）の解析

use crate::ast::*;
use crate::lexer::Token;

use super::operators::DEFAULT_PRECEDENCE;
use super::{ParseResult, Parser};

impl Parser {
    /// 入力全体をトップレベル項目の列として解析
    pub fn parse(&mut self) -> ParseResult<Vec<Item>> {
        let mut items = Vec::new();
        while !self.is_at_end() {
            match self.current_token() {
                // トップレベルの区切り記号は読み飛ばす
                Some(Token::Semicolon) => self.advance(),
                Some(Token::Def) => items.push(Item::Function(self.parse_definition()?)),
                Some(Token::Extern) => items.push(Item::Extern(self.parse_extern()?)),
                _ => items.push(Item::Function(self.parse_top_level_expr()?)),
            }
        }
        Ok(items)
    }

    /// `def prototype body` を解析
    fn parse_definition(&mut self) -> ParseResult<Function> {
        let start = self.current_span().start;
        self.advance(); // 'def'
        let proto = self.parse_prototype()?;
        let body = self.parse_expression()?;
        let span = self.span_from(start);
        Ok(Function { proto, body, span })
    }

    /// `extern prototype` を解析
    fn parse_extern(&mut self) -> ParseResult<Prototype> {
        self.advance(); // 'extern'
        self.parse_prototype()
    }

    /// トップレベル式を引数なしの無名関数でラップする
    fn parse_top_level_expr(&mut self) -> ParseResult<Function> {
        let start = self.current_span().start;
        let body = self.parse_expression()?;
        let span = self.span_from(start);
        let proto = Prototype {
            name: ANONYMOUS_FUNCTION_NAME.to_string(),
            params: Vec::new(),
            is_operator: false,
            precedence: 0,
            span,
        };
        Ok(Function { proto, body, span })
    }

    /// プロトタイプを解析
    ///
    /// 通常の関数名のほか、`binary<op> <prec>`と`unary<op>`の演算子形式を
    /// 受け付けます。演算子名は`binary|`のように関数名へ符号化されます。
    fn parse_prototype(&mut self) -> ParseResult<Prototype> {
        let start = self.current_span().start;

        // (名前, 演算子のアリティ, 優先順位, 演算子文字)
        let (name, operator_arity, precedence, op_char) = match self.current_token() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                (name, 0, 0, None)
            }
            Some(Token::Unary) => {
                self.advance();
                let op = self.expect_op_char("単項演算子の文字")?;
                (format!("unary{}", op), 1, 0, None)
            }
            Some(Token::Binary) => {
                self.advance();
                let op = self.expect_op_char("二項演算子の文字")?;
                let precedence = match self.current_token() {
                    Some(Token::Number(value)) => {
                        let precedence = *value as i32;
                        if !(1..=100).contains(&precedence) {
                            return Err(crate::error::ParserError::InvalidPrecedence {
                                value: precedence,
                                span: self.current_span(),
                            });
                        }
                        self.advance();
                        precedence
                    }
                    _ => DEFAULT_PRECEDENCE,
                };
                (format!("binary{}", op), 2, precedence, Some(op))
            }
            _ => return Err(self.unexpected("関数名")),
        };

        self.expect(&Token::LParen, "'('")?;
        let mut params = Vec::new();
        while let Some(Token::Identifier(param)) = self.current_token() {
            params.push(param.clone());
            self.advance();
        }
        self.expect(&Token::RParen, "')'")?;

        if operator_arity != 0 && params.len() != operator_arity {
            return Err(crate::error::ParserError::OperatorArityMismatch {
                name,
                expected: operator_arity,
                found: params.len(),
                span: self.span_from(start),
            });
        }

        // 二項演算子はこの時点で優先順位テーブルに登録する
        if let Some(op) = op_char {
            self.operators.register(op, precedence);
        }

        Ok(Prototype {
            name,
            params,
            is_operator: operator_arity != 0,
            precedence,
            span: self.span_from(start),
        })
    }
}
