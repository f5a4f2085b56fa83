//! トークン定義

use logos::Logos;
use std::fmt;

/// Kaleido言語のトークン型
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")] // 空白文字をスキップ
#[logos(skip r"#[^\n]*")] // 行コメントをスキップ
pub enum Token {
    // キーワード
    #[token("def")]
    Def,
    #[token("extern")]
    Extern,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("var")]
    Var,
    #[token("binary")]
    Binary,
    #[token("unary")]
    Unary,

    // 識別子（キーワードの後に来る必要がある）
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_owned())]
    Identifier(String),

    // 数値リテラル（すべてf64）
    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // 区切り記号
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    // 演算子文字（ユーザー定義演算子も同じトークンになる）
    #[regex(r"[+\-*/<>=!|&:%^~?@$.]", |lex| lex.slice().chars().next())]
    Op(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Def => write!(f, "def"),
            Token::Extern => write!(f, "extern"),
            Token::If => write!(f, "if"),
            Token::Then => write!(f, "then"),
            Token::Else => write!(f, "else"),
            Token::For => write!(f, "for"),
            Token::In => write!(f, "in"),
            Token::Var => write!(f, "var"),
            Token::Binary => write!(f, "binary"),
            Token::Unary => write!(f, "unary"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Number(value) => write!(f, "{}", value),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Op(op) => write!(f, "{}", op),
        }
    }
}
