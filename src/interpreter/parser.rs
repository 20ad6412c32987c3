use tracing::trace;

use crate::{
    ast::{NodeId, NodeKind, ParseTree},
    error::ParseError,
    interpreter::{
        grammar::{Lookahead, NTerm, Symbol, lookup},
        lexer::{Scanner, Token},
    },
};

/// The result type used throughout the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// An entry of the parser's symbol stack.
#[derive(Debug, Clone, Copy)]
enum Entry {
    /// A symbol still to be matched or expanded.
    Symbol(Symbol),
    /// Marks the end of a non-terminal's expansion.
    Close,
}

/// Parses a script: a sequence of import and function declarations.
///
/// # Example
/// ```
/// use wdte::interpreter::parser::parse_script;
///
/// assert!(parse_script("'math' => m; main => m.pi;").is_ok());
/// assert!(parse_script("main => ;").is_err());
/// ```
pub fn parse_script(source: &str) -> ParseResult<ParseTree> {
    parse(Scanner::new(source), NTerm::Script)
}

/// Parses a fragment: a `;`-separated sequence of bare expressions.
pub fn parse_fragment(source: &str) -> ParseResult<ParseTree> {
    parse(Scanner::new(source), NTerm::Fragment)
}

/// Parses the tokens of `scanner`, starting from the non-terminal `start`.
///
/// The parser is driven by the grammar table and an explicit stack seeded
/// with the end-of-input marker and `start`. Each expanded non-terminal
/// pushes a closing marker below its rule so that the tree cursor can climb
/// back to the parent once the rule has been consumed.
///
/// # Errors
/// Returns the scanner's error if scanning fails, or a syntax error carrying
/// the position of the offending token.
pub fn parse(mut scanner: Scanner<'_>, start: NTerm) -> ParseResult<ParseTree> {
    let mut tree = ParseTree::default();
    let mut stack = vec![Entry::Symbol(Symbol::Eof), Entry::Symbol(Symbol::NTerm(start))];
    let mut cursor: Option<NodeId> = None;
    let mut lookahead = next_token(&mut scanner)?;

    while let Some(entry) = stack.pop() {
        let symbol = match entry {
            Entry::Close => {
                cursor = cursor.and_then(|id| tree.parent(id));
                continue;
            },
            Entry::Symbol(symbol) => symbol,
        };

        match symbol {
            Symbol::Eof => return finish(tree, lookahead),

            Symbol::Term(term) => {
                let Some(token) = lookahead.take() else {
                    let (line, column) = scanner.position();
                    return Err(ParseError::UnexpectedEof { expected: term.to_string(),
                                                           line,
                                                           column });
                };
                if !term.matches(&token) {
                    return Err(ParseError::UnexpectedToken { expected: term.to_string(),
                                                             found:    token.to_string(),
                                                             line:     token.line,
                                                             column:   token.column, });
                }

                tree.push(cursor, NodeKind::Term(token));
                lookahead = next_token(&mut scanner)?;
            },

            Symbol::NTerm(nterm) => {
                let Some(rule) = lookup(Lookahead::of(lookahead.as_ref()), nterm) else {
                    return Err(no_rule(nterm, lookahead.as_ref(), &scanner));
                };
                trace!(nterm = nterm.name(), ?rule, "expanding");

                stack.push(Entry::Close);
                stack.extend(rule.iter().rev().copied().map(Entry::Symbol));
                cursor = Some(tree.push(cursor,
                                        NodeKind::NTerm { name:     nterm,
                                                          children: Vec::new(), }));
            },

            Symbol::Epsilon => {
                tree.push(cursor, NodeKind::Epsilon);
            },
        }
    }

    finish(tree, lookahead)
}

/// Accepts the tree once the input is exhausted.
fn finish(tree: ParseTree, lookahead: Option<Token>) -> ParseResult<ParseTree> {
    match lookahead {
        None => Ok(tree),
        Some(token) => Err(ParseError::ExpectedEof { found:  token.to_string(),
                                                     line:   token.line,
                                                     column: token.column, }),
    }
}

/// Pulls the next token, turning a scanner failure into an error.
fn next_token(scanner: &mut Scanner<'_>) -> ParseResult<Option<Token>> {
    match scanner.next() {
        Some(token) => Ok(Some(token)),
        None => scanner.take_error().map_or(Ok(None), Err),
    }
}

/// Builds the error for a table miss.
fn no_rule(nterm: NTerm, lookahead: Option<&Token>, scanner: &Scanner<'_>) -> ParseError {
    match lookahead {
        Some(token) => ParseError::NoRule { nterm:  nterm.name().to_string(),
                                            found:  token.to_string(),
                                            line:   token.line,
                                            column: token.column, },
        None => {
            let (line, column) = scanner.position();
            ParseError::UnexpectedEof { expected: format!("<{nterm}>"),
                                        line,
                                        column }
        },
    }
}
