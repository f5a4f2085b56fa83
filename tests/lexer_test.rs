//! レキサーのテスト

use kaleido::lexer::{format_tokens, tokenize, Token};

/// トークン列だけを取り出すヘルパー関数
fn tokens_of(source: &str) -> Vec<Token> {
    tokenize(source)
        .expect("tokenize should succeed")
        .into_iter()
        .map(|t| t.token)
        .collect()
}

#[test]
fn test_keywords_and_identifiers() {
    let tokens = tokens_of("def extern if then else for in var binary unary foo");
    assert_eq!(
        tokens,
        vec![
            Token::Def,
            Token::Extern,
            Token::If,
            Token::Then,
            Token::Else,
            Token::For,
            Token::In,
            Token::Var,
            Token::Binary,
            Token::Unary,
            Token::Identifier("foo".to_string()),
        ]
    );
}

#[test]
fn test_keyword_prefix_is_an_identifier() {
    // キーワードで始まる識別子はキーワードとして切られない
    assert_eq!(
        tokens_of("define internal"),
        vec![
            Token::Identifier("define".to_string()),
            Token::Identifier("internal".to_string()),
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        tokens_of("42 3.14 1. .5"),
        vec![
            Token::Number(42.0),
            Token::Number(3.14),
            Token::Number(1.0),
            Token::Number(0.5),
        ]
    );
}

#[test]
fn test_operators_and_delimiters() {
    assert_eq!(
        tokens_of("(a + b) * c < d, e;"),
        vec![
            Token::LParen,
            Token::Identifier("a".to_string()),
            Token::Op('+'),
            Token::Identifier("b".to_string()),
            Token::RParen,
            Token::Op('*'),
            Token::Identifier("c".to_string()),
            Token::Op('<'),
            Token::Identifier("d".to_string()),
            Token::Comma,
            Token::Identifier("e".to_string()),
            Token::Semicolon,
        ]
    );
}

#[test]
fn test_user_defined_operator_characters() {
    assert_eq!(
        tokens_of("a | b : c ! d"),
        vec![
            Token::Identifier("a".to_string()),
            Token::Op('|'),
            Token::Identifier("b".to_string()),
            Token::Op(':'),
            Token::Identifier("c".to_string()),
            Token::Op('!'),
            Token::Identifier("d".to_string()),
        ]
    );
}

#[test]
fn test_comments_and_whitespace_are_skipped() {
    let tokens = tokens_of("# コメント行\ndef f # 末尾コメント\n  (x)");
    assert_eq!(
        tokens,
        vec![
            Token::Def,
            Token::Identifier("f".to_string()),
            Token::LParen,
            Token::Identifier("x".to_string()),
            Token::RParen,
        ]
    );
}

#[test]
fn test_unrecognized_character_is_an_error() {
    assert!(tokenize("def f[x]").is_err());
}

#[test]
fn test_format_tokens_includes_positions() {
    let tokens = tokenize("def").expect("tokenize should succeed");
    let formatted = format_tokens(&tokens);
    assert!(formatted.contains("Def"));
    assert!(formatted.contains("0..3"));
}
