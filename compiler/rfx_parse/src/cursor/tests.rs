use super::*;
use rfx_lexer::lex;

#[test]
fn test_advance_stops_at_eof() {
    let source = "a ;";
    let tokens = lex(source).unwrap();
    let mut cursor = Cursor::new(&tokens, source);
    assert_eq!(cursor.advance().kind, TokenKind::Ident);
    assert!(cursor.eat(TokenKind::Semicolon));
    assert!(cursor.is_at_end());
    cursor.advance();
    assert!(cursor.is_at_end());
    assert_eq!(cursor.previous_span(), Span::new(2, 3));
}

#[test]
fn test_expect_reports_found_token() {
    let source = "x";
    let tokens = lex(source).unwrap();
    let mut cursor = Cursor::new(&tokens, source);
    let err = cursor.expect(TokenKind::Semicolon).unwrap_err();
    assert_eq!(
        err,
        ParseError::Unexpected {
            expected: "';'",
            found: TokenKind::Ident,
            span: Span::new(0, 1)
        }
    );
}

#[test]
fn test_adjacent_tokens() {
    let source = "a >> b > > c";
    let tokens = lex(source).unwrap();
    let cursor = Cursor::new(&tokens, source);
    assert!(cursor.adjacent(1));
    assert!(!cursor.adjacent(4));
}
