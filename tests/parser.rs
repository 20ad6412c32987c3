use wdte::{
    ast::NodeKind,
    error::ParseError,
    interpreter::{
        grammar::NTerm,
        lexer::{Scanner, Token},
    },
    parse_fragment, parse_script,
};

fn tokens(source: &str) -> Vec<Token> {
    Scanner::new(source).collect()
}

fn assert_leaves_match(source: &str, fragment: bool) {
    let tree = if fragment {
        parse_fragment(source)
    } else {
        parse_script(source)
    }.unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"));

    let leaves: Vec<Token> = tree.leaves().cloned().collect();
    assert_eq!(leaves, tokens(source), "leaves differ for {source:?}");
}

#[test]
fn leaves_reproduce_the_token_stream() {
    let scripts = ["main => 1;",
                   "'math' => m; main => m.pi;",
                   "memo fib n => n { 0 => 0; 1 => 1; default => + (fib (- n 1)) (fib (- n 2)); };",
                   "main => [1; 2; [3]] -> at 1 : second -- print -| 'fallback';",
                   "f => (@ memo g x y => + x y; * x y);",
                   "main => (a; b;);",
                   "main => [];\n# trailing comment\n",
                   "main => (let [a b] => [1.5; -2]; (| let c => a).c);",
                   "main => m.(f 1) : [x y] -> (m).x;"];
    for source in scripts {
        assert_leaves_match(source, false);
    }

    let fragments = ["",
                     "5 -> + 2 -- * 3;",
                     "a.b.c d; e",
                     "x { == 1 => 'one'; }",
                     "let memo f n => n; let x => 3; f x",
                     "(|| a b) (| let y => 1)"];
    for source in fragments {
        assert_leaves_match(source, true);
    }
}

#[test]
fn root_is_the_start_symbol() {
    let tree = parse_script("main => 1;").unwrap();
    let root = tree.root().unwrap();
    assert!(matches!(tree.node(root).kind, NodeKind::NTerm { name: NTerm::Script, .. }));
    assert_eq!(tree.parent(root), None);

    for &child in tree.children(root) {
        assert_eq!(tree.parent(child), Some(root));
    }
}

#[test]
fn empty_inputs_parse() {
    assert!(parse_script("").is_ok());
    assert!(parse_script("   # nothing here").is_ok());
    assert!(parse_fragment("").is_ok());
}

#[test]
fn missing_expression_reports_its_position() {
    let err = parse_script("main =>\n  ;").unwrap_err();
    assert!(matches!(err, ParseError::NoRule { ref nterm, .. } if nterm == "expr"), "{err}");
    assert_eq!(err.position(), (2, 3));
}

#[test]
fn mismatched_terminal_is_reported() {
    let err = parse_script("main => 1").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }), "{err}");

    let err = parse_script("'math' m;").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { line: 1, column: 8, .. }), "{err}");
}

#[test]
fn unclosed_compound_hits_end_of_input() {
    let err = parse_script("main => (1; 2").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }), "{err}");
}

#[test]
fn trailing_tokens_after_a_fragment_are_rejected() {
    let err = parse_fragment("1 )").unwrap_err();
    assert!(matches!(err, ParseError::NoRule { .. } | ParseError::ExpectedEof { .. }), "{err}");
}

#[test]
fn unterminated_string_is_a_scan_error() {
    let err = parse_script("main => 'open;").unwrap_err();
    assert_eq!(err, ParseError::UnterminatedString { line: 1, column: 9 });

    let mut scanner = Scanner::new("x 'open");
    assert_eq!(scanner.by_ref().count(), 1);
    assert!(scanner.error().is_some());
}

#[test]
fn errors_render_their_position() {
    let err = parse_script("main => ;").unwrap_err();
    assert!(err.to_string().starts_with("1:9:"), "{err}");
}

#[test]
fn let_is_only_allowed_in_compounds() {
    let err = parse_script("main => let x => 1;").unwrap_err();
    assert!(matches!(err, ParseError::NoRule { ref nterm, .. } if nterm == "expr"), "{err}");
    assert!(parse_script("main => (let x => 1);").is_ok());
    assert!(parse_fragment("let [a b] => [1; 2]; a").is_ok());
}
