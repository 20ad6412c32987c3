use std::{collections::VecDeque, fmt};

use logos::{Lexer, Logos};

use crate::error::ParseError;

/// Raw lexemes recognized by the underlying `logos` lexer.
///
/// Words are split further by [`Scanner`], since symbols may be glued to
/// identifiers (`fib;`, `(@`, `m.pi`).
#[derive(Logos, Debug, PartialEq, Clone)]
enum Raw {
    /// Numeric literal tokens, such as `3`, `3.14` or `2.1e-10`.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,
    /// `'single quoted'` string literals.
    #[token("'", |lex| quoted(lex, '\''))]
    /// `"double quoted"` string literals.
    #[token("\"", |lex| quoted(lex, '"'))]
    Quoted(String),
    /// Runs of symbol and identifier characters.
    #[regex(r##"[^ \t\r\n\f'"0-9#][^ \t\r\n\f'"#]*"##)]
    Word,
    /// `# Comments.`
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,
    /// Whitespace.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,
}

/// Scans the body of a string literal whose opening quote was just matched.
///
/// Returns `None` if the input ends before the closing quote, which logos
/// surfaces as an error.
fn quoted(lex: &mut Lexer<Raw>, quote: char) -> Option<String> {
    let mut value = String::new();
    let mut chars = lex.remainder().char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '\n' => {},
                    other => value.push(other),
                }
            },
            c if c == quote => {
                lex.bump(i + c.len_utf8());
                return Some(value);
            },
            c => value.push(c),
        }
    }

    None
}

/// Keywords and symbols of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `=>`
    Arrow,
    /// `->`
    Chain,
    /// `--`
    IgnoredChain,
    /// `-|`
    ErrorChain,
    /// `(@`
    LambdaParen,
    /// `(|`
    CollectParen,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `memo`
    Memo,
    /// `let`
    Let,
}

/// Symbols in longest-first order, so that `->` wins over a lone `-`
/// identifier and `(@` wins over `(`.
const SYMBOLS: &[(&str, Keyword)] = &[("=>", Keyword::Arrow),
                                      ("->", Keyword::Chain),
                                      ("--", Keyword::IgnoredChain),
                                      ("-|", Keyword::ErrorChain),
                                      ("(@", Keyword::LambdaParen),
                                      ("(|", Keyword::CollectParen),
                                      ("(", Keyword::LParen),
                                      (")", Keyword::RParen),
                                      ("[", Keyword::LBracket),
                                      ("]", Keyword::RBracket),
                                      ("{", Keyword::LBrace),
                                      ("}", Keyword::RBrace),
                                      (";", Keyword::Semicolon),
                                      (":", Keyword::Colon),
                                      (".", Keyword::Dot)];

impl Keyword {
    /// Returns the source text of the keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrow => "=>",
            Self::Chain => "->",
            Self::IgnoredChain => "--",
            Self::ErrorChain => "-|",
            Self::LambdaParen => "(@",
            Self::CollectParen => "(|",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Memo => "memo",
            Self::Let => "let",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The class of a token, ignoring its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A numeric literal.
    Number,
    /// A string literal.
    String,
    /// An identifier.
    Identifier,
    /// A keyword or symbol.
    Keyword,
}

/// The value carried by a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// A numeric literal.
    Number(f64),
    /// A string literal, with escapes already resolved.
    String(String),
    /// An identifier.
    Identifier(String),
    /// A keyword or symbol.
    Keyword(Keyword),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Identifier(id) => f.write_str(id),
            Self::Keyword(k) => write!(f, "{k}"),
        }
    }
}

/// A lexical token together with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The line the token starts on.
    pub line:   usize,
    /// The column the token starts at, counted in characters.
    pub column: usize,
    /// What the token is.
    pub value:  TokenValue,
}

impl Token {
    /// Returns the class of this token.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self.value {
            TokenValue::Number(_) => Kind::Number,
            TokenValue::String(_) => Kind::String,
            TokenValue::Identifier(_) => Kind::Identifier,
            TokenValue::Keyword(_) => Kind::Keyword,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Tracks the line and column of a byte offset, moving forward only.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    offset: usize,
    line:   usize,
    column: usize,
}

impl Cursor {
    const fn start() -> Self {
        Self { offset: 0,
               line:   1,
               column: 1, }
    }

    fn advance_to(&mut self, source: &str, offset: usize) {
        for c in source[self.offset..offset].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = offset;
    }
}

/// A lazy stream of [`Token`]s over a source string.
///
/// Iteration stops at the end of input or at the first scan error. The two
/// cases are told apart through [`Scanner::error`].
///
/// # Example
/// ```
/// use wdte::interpreter::lexer::{Keyword, Scanner, TokenValue};
///
/// let tokens: Vec<_> = Scanner::new("fib 10;").map(|t| t.value).collect();
/// assert_eq!(tokens,
///            vec![TokenValue::Identifier("fib".into()),
///                 TokenValue::Number(10.0),
///                 TokenValue::Keyword(Keyword::Semicolon)]);
/// ```
pub struct Scanner<'src> {
    source:  &'src str,
    lexer:   Lexer<'src, Raw>,
    pending: VecDeque<Token>,
    cursor:  Cursor,
    error:   Option<ParseError>,
}

impl<'src> Scanner<'src> {
    /// Creates a scanner positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { source,
               lexer: Raw::lexer(source),
               pending: VecDeque::new(),
               cursor: Cursor::start(),
               error: None }
    }

    /// Returns a fresh scanner over the same source, positioned at the start.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self::new(self.source)
    }

    /// Returns the scan error that ended iteration, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Takes the scan error that ended iteration, if any.
    pub fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    /// Returns the `(line, column)` just past the last scanned lexeme.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        (self.cursor.line, self.cursor.column)
    }

    fn scan_next(&mut self) {
        let Some(raw) = self.lexer.next() else {
            return;
        };

        let span = self.lexer.span();
        self.cursor.advance_to(self.source, span.start);
        let (line, column) = (self.cursor.line, self.cursor.column);

        match raw {
            Ok(Raw::Number) => {
                let slice = self.lexer.slice();
                let value = slice.parse().unwrap_or(f64::NAN);
                self.pending.push_back(Token { line,
                                               column,
                                               value: TokenValue::Number(value) });
            },
            Ok(Raw::Quoted(s)) => self.pending.push_back(Token { line,
                                                                 column,
                                                                 value: TokenValue::String(s) }),
            Ok(Raw::Word) => split_word(self.lexer.slice(), line, column, &mut self.pending),
            Ok(Raw::Comment | Raw::Whitespace) => {},
            Err(()) => {
                self.error = Some(ParseError::UnterminatedString { line, column });
                return;
            },
        }

        self.cursor.advance_to(self.source, span.end);
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pending.is_empty() && self.error.is_none() {
            self.scan_next();
        }
        self.pending.pop_front()
    }
}

/// Splits a word into symbol, keyword, number and identifier tokens.
fn split_word(word: &str, line: usize, column: usize, out: &mut VecDeque<Token>) {
    let mut piece_start: Option<(usize, usize)> = None;
    let mut chars = word.char_indices().enumerate().peekable();

    while let Some((n, (i, _))) = chars.next() {
        let rest = &word[i..];

        // The decimal point of `[1.5` or `-1.5` stays inside the number.
        if let Some((_, start)) = piece_start
           && is_integer(&word[start..i])
           && rest.strip_prefix('.').is_some_and(|r| r.starts_with(|c: char| c.is_ascii_digit()))
        {
            continue;
        }

        let Some(&(symbol, keyword)) = SYMBOLS.iter().find(|(s, k)| {
                                                          rest.starts_with(s)
                                                          && !(*k == Keyword::CollectParen && rest.starts_with("(||"))
                                                      })
        else {
            piece_start.get_or_insert((n, i));
            continue;
        };

        if let Some((pn, pi)) = piece_start.take() {
            out.push_back(piece(&word[pi..i], line, column + pn));
        }
        out.push_back(Token { line,
                              column: column + n,
                              value: TokenValue::Keyword(keyword) });

        for _ in 1..symbol.chars().count() {
            chars.next();
        }
    }

    if let Some((pn, pi)) = piece_start {
        out.push_back(piece(&word[pi..], line, column + pn));
    }
}

/// Tests whether `text` is `-?digits`.
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Classifies a symbol-free piece of a word.
fn piece(text: &str, line: usize, column: usize) -> Token {
    let value = if text == Keyword::Memo.as_str() {
        TokenValue::Keyword(Keyword::Memo)
    } else if text == Keyword::Let.as_str() {
        TokenValue::Keyword(Keyword::Let)
    } else if let Some(n) = parse_number(text) {
        TokenValue::Number(n)
    } else {
        TokenValue::Identifier(text.to_string())
    };

    Token { line, column, value }
}

/// Parses `-?digits(.digits)?(e[+-]?digits)?`, rejecting anything else.
fn parse_number(text: &str) -> Option<f64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.starts_with(|c: char| c.is_ascii_digit())
       || !digits.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    text.parse().ok()
}
