//! 式の解析

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser {
    /// 式を解析
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_unary_expr()?;
        self.parse_binop_rhs(0, lhs)
    }

    /// 現在のトークンが二項演算子ならその優先順位を返す
    ///
    /// 演算子でない場合と未登録の演算子の場合は-1を返し、
    /// 優先順位クライミングのループを打ち切らせます。
    fn current_op_precedence(&self) -> i32 {
        match self.current_token() {
            Some(Token::Op(op)) => self.operators.precedence_of(*op).unwrap_or(-1),
            _ => -1,
        }
    }

    /// 優先順位クライミングで二項演算の右辺列を解析
    fn parse_binop_rhs(&mut self, min_precedence: i32, mut lhs: Expr) -> ParseResult<Expr> {
        loop {
            let tok_precedence = self.current_op_precedence();
            if tok_precedence < min_precedence {
                return Ok(lhs);
            }

            let op = match self.current_token() {
                Some(Token::Op(op)) => *op,
                _ => return Ok(lhs),
            };
            self.advance();

            let mut rhs = self.parse_unary_expr()?;

            // 次の演算子の方が強く結合するなら、先に右辺へ吸収させる
            let next_precedence = self.current_op_precedence();
            if tok_precedence < next_precedence {
                rhs = self.parse_binop_rhs(tok_precedence + 1, rhs)?;
            }

            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary(BinaryExpr {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
                span,
            });
        }
    }

    /// 前置の演算子適用を解析
    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        if let Some(Token::Op(op)) = self.current_token() {
            let opcode = *op;
            let start = self.current_span().start;
            self.advance();
            let operand = self.parse_unary_expr()?;
            let span = Span::new(start, operand.span().end);
            return Ok(Expr::Unary(UnaryExpr {
                opcode,
                operand: Box::new(operand),
                span,
            }));
        }
        self.parse_primary()
    }

    /// 一次式を解析
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current_token() {
            Some(Token::Number(value)) => {
                let value = *value;
                let span = self.current_span();
                self.advance();
                Ok(Expr::Number(NumberExpr { value, span }))
            }
            Some(Token::LParen) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(expr)
            }
            Some(Token::Identifier(_)) => self.parse_identifier_expr(),
            Some(Token::If) => self.parse_if_expr(),
            Some(Token::For) => self.parse_for_expr(),
            Some(Token::Var) => self.parse_var_expr(),
            _ => Err(self.unexpected("式")),
        }
    }

    /// 変数参照または関数呼び出しを解析
    fn parse_identifier_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let name = self.expect_identifier("識別子")?;

        if !self.check(&Token::LParen) {
            return Ok(Expr::Variable(VariableExpr {
                name,
                span: self.span_from(start),
            }));
        }

        self.advance(); // '('
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "')'")?;

        Ok(Expr::Call(CallExpr {
            callee: name,
            args,
            span: self.span_from(start),
        }))
    }

    /// if/then/else式を解析
    fn parse_if_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        self.advance(); // 'if'
        let cond = self.parse_expression()?;
        self.expect(&Token::Then, "'then'")?;
        let then_expr = self.parse_expression()?;
        let else_expr = if self.match_token(&Token::Else) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(Expr::If(IfExpr {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr,
            span: self.span_from(start),
        }))
    }

    /// for式を解析
    ///
    /// ステップ式は省略可能で、省略時は1.0を補います。
    fn parse_for_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        self.advance(); // 'for'
        let var_name = self.expect_identifier("ループ変数名")?;
        if !self.match_op('=') {
            return Err(self.unexpected("'='"));
        }
        let start_expr = self.parse_expression()?;
        self.expect(&Token::Comma, "','")?;
        let end_expr = self.parse_expression()?;
        let step_expr = if self.match_token(&Token::Comma) {
            self.parse_expression()?
        } else {
            Expr::Number(NumberExpr {
                value: 1.0,
                span: self.current_span(),
            })
        };
        self.expect(&Token::In, "'in'")?;
        let body = self.parse_expression()?;

        Ok(Expr::For(ForExpr {
            var_name,
            start: Box::new(start_expr),
            end: Box::new(end_expr),
            step: Box::new(step_expr),
            body: Box::new(body),
            span: self.span_from(start),
        }))
    }

    /// var/in式を解析
    fn parse_var_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        self.advance(); // 'var'

        let mut bindings = Vec::new();
        loop {
            let name = self.expect_identifier("変数名")?;
            let init = if self.match_op('=') {
                Some(self.parse_expression()?)
            } else {
                None
            };
            bindings.push((name, init));
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.expect(&Token::In, "'in'")?;
        let body = self.parse_expression()?;

        Ok(Expr::Var(VarExpr {
            bindings,
            body: Box::new(body),
            span: self.span_from(start),
        }))
    }
}
