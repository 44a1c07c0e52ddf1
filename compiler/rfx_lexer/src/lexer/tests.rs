use pretty_assertions::assert_eq;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source)
        .map(|list| list.as_slice().iter().map(|t| t.kind).collect())
        .unwrap_or_default()
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        kinds("public class Foo extends Bar"),
        vec![
            TokenKind::Modifier,
            TokenKind::Class,
            TokenKind::Ident,
            TokenKind::Extends,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("a /* block\n comment */ b // line\n c"),
        vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn test_numeric_literals() {
    assert_eq!(
        kinds("1 2L 3.0 4f 5d 0x1F .5"),
        vec![
            TokenKind::IntLit,
            TokenKind::LongLit,
            TokenKind::DoubleLit,
            TokenKind::FloatLit,
            TokenKind::DoubleLit,
            TokenKind::IntLit,
            TokenKind::DoubleLit,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_shift_is_two_gt_tokens() {
    assert_eq!(
        kinds("a >> b"),
        vec![
            TokenKind::Ident,
            TokenKind::Gt,
            TokenKind::Gt,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_spans_point_into_source() {
    let source = "c.close();";
    let list = lex(source).unwrap();
    let close = list.get(2);
    assert_eq!(close.kind, TokenKind::Ident);
    assert_eq!(&source[close.span.to_range()], "close");
    assert_eq!(list.get(100).kind, TokenKind::Eof);
}

#[test]
fn test_unexpected_character() {
    let err = lex("int a = #;").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedChar {
            ch: '#',
            span: Span::new(8, 9)
        }
    );
}
