use pretty_assertions::assert_eq;

use super::*;

const SRC: &str = "class A {\n    void f() {\n        a(); b();\n        c();\n    }\n}\n";

fn offset(needle: &str) -> u32 {
    u32::try_from(SRC.find(needle).unwrap()).unwrap()
}

#[test]
fn test_unit_detection() {
    assert_eq!(Layout::new(SRC).unit(), "    ");
    assert_eq!(Layout::new("class A {\n  int x;\n}\n").unit(), "  ");
    assert_eq!(Layout::new("class A {\n\tint x;\n}\n").unit(), "\t");
    assert_eq!(Layout::new("class A {}").unit(), "    ");
}

#[test]
fn test_line_queries() {
    let layout = Layout::new(SRC);
    let c = offset("c();");
    assert_eq!(layout.indent_at(c), "        ");
    assert!(layout.starts_line(c));
    assert!(layout.ends_line(c + 4));
    assert_eq!(layout.line_start(c), c - 8);
    assert_eq!(layout.line_end(c), c + 4);
}

#[test]
fn test_whole_lines() {
    let layout = Layout::new(SRC);
    let c = offset("c();");
    assert_eq!(
        layout.whole_lines(Span::new(c, c + 4)),
        Some(Span::new(c - 8, c + 5))
    );
    let a = offset("a();");
    assert_eq!(layout.whole_lines(Span::new(a, a + 4)), None);
    let b = offset("b();");
    assert_eq!(layout.whole_lines(Span::new(b, b + 4)), None);
}

#[test]
fn test_blank_skipping() {
    let layout = Layout::new(SRC);
    let a = offset("a();");
    assert_eq!(layout.skip_blanks(a + 4), a + 5);
    assert_eq!(layout.skip_blanks_back(a + 5), a + 4);
    assert_eq!(layout.skip_space_back(a), offset("{\n        a") + 1);
    assert_eq!(layout.find(0, '{'), Some(8));
    assert!(layout.has_newline(0, 12));
    assert!(!layout.has_newline(0, 8));
}

#[test]
fn test_reindent() {
    let text = "if (x) {\n        y();\n    }";
    assert_eq!(reindent(text, "    ", "  "), "if (x) {\n      y();\n  }");
    assert_eq!(reindent("single", "    ", ""), "single");
}
