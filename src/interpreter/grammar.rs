use std::fmt;

use crate::interpreter::lexer::{Keyword, Kind, Token, TokenValue};

/// The LL(1) lookup table.
///
/// Maps a lookahead terminal and the non-terminal on top of the parser stack
/// to the production rule that expands it. The table is plain data compiled
/// into the binary; there is no run-time construction step.
pub mod table;

pub use table::lookup;

/// A production rule: the ordered symbols a non-terminal expands to.
pub type Rule = &'static [Symbol];

/// A terminal of the grammar.
///
/// Literal tokens only match on their kind. Keyword terminals also require
/// the exact keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    /// Any identifier.
    Id,
    /// Any numeric literal.
    Number,
    /// Any string literal.
    String,
    /// One specific keyword or symbol.
    Keyword(Keyword),
}

impl Term {
    /// Returns the terminal a token matches.
    #[must_use]
    pub const fn of(token: &Token) -> Self {
        match token.value {
            TokenValue::Number(_) => Self::Number,
            TokenValue::String(_) => Self::String,
            TokenValue::Identifier(_) => Self::Id,
            TokenValue::Keyword(k) => Self::Keyword(k),
        }
    }

    /// Returns the token kind this terminal accepts.
    #[must_use]
    pub const fn kind(self) -> Kind {
        match self {
            Self::Id => Kind::Identifier,
            Self::Number => Kind::Number,
            Self::String => Kind::String,
            Self::Keyword(_) => Kind::Keyword,
        }
    }

    /// Tests whether `token` can be consumed by this terminal.
    #[must_use]
    pub fn matches(self, token: &Token) -> bool {
        Self::of(token) == self
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Keyword(k) => write!(f, "{:?}", k.as_str()),
        }
    }
}

/// The non-terminals of the grammar.
///
/// Each variant names the left-hand side of the productions listed in
/// [`table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NTerm {
    /// A whole script: a list of declarations.
    Script,
    /// The remaining declarations of a script.
    Decls,
    /// One declaration terminated by `;`.
    Decl,
    /// An import, `'path' => alias`.
    Import,
    /// A function declaration, `name params => body`.
    FuncDecl,
    /// The modifiers before a declared name.
    FuncMods,
    /// One modifier, such as `memo`.
    FuncMod,
    /// The parameter names of a declaration.
    ArgDecls,
    /// A fragment: expressions without declarations.
    Fragment,
    /// The remaining expressions of a fragment.
    FragExprs,
    /// The separator after a fragment expression.
    FragTail,
    /// An expression that may also be a `let`.
    CExpr,
    /// A `let` binding.
    LetExpr,
    /// What a `let` binds: a function declaration or a pattern.
    Assign,
    /// A name, or a bracketed list of names destructuring an array.
    Pattern,
    /// A full expression: application, switch, slot and chain.
    Expr,
    /// The arguments of an application.
    Args,
    /// An optional switch block.
    Switch,
    /// The cases of a switch block.
    Switches,
    /// An optional `: pattern` slot.
    Slot,
    /// An optional chain continuation.
    Chain,
    /// One operand: a literal, array, lambda or reference.
    Single,
    /// A name or compound followed by member accesses.
    Ref,
    /// The member accesses after a reference.
    Sub,
    /// One member: a name, or a compound evaluated inside the module.
    Member,
    /// An array literal.
    Array,
    /// The elements of an array literal.
    AExprs,
    /// The separator after an array element.
    ATail,
    /// A compound, `( ... )`, or a collector, `(| ... )`.
    Compound,
    /// The separator after a compound item.
    CTail,
    /// The remaining items of a compound.
    CMore,
    /// A lambda, `(@ name params => body)`.
    Lambda,
}

impl NTerm {
    /// Returns the grammar name of the non-terminal.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Decls => "decls",
            Self::Decl => "decl",
            Self::Import => "import",
            Self::FuncDecl => "funcdecl",
            Self::FuncMods => "funcmods",
            Self::FuncMod => "funcmod",
            Self::ArgDecls => "argdecls",
            Self::Fragment => "fragment",
            Self::FragExprs => "fexprs",
            Self::FragTail => "ftail",
            Self::CExpr => "cexpr",
            Self::LetExpr => "letexpr",
            Self::Assign => "assign",
            Self::Pattern => "pattern",
            Self::Expr => "expr",
            Self::Args => "args",
            Self::Switch => "switch",
            Self::Switches => "switches",
            Self::Slot => "slot",
            Self::Chain => "chain",
            Self::Single => "single",
            Self::Ref => "ref",
            Self::Sub => "sub",
            Self::Member => "member",
            Self::Array => "array",
            Self::AExprs => "aexprs",
            Self::ATail => "atail",
            Self::Compound => "compound",
            Self::CTail => "ctail",
            Self::CMore => "cmore",
            Self::Lambda => "lambda",
        }
    }
}

impl fmt::Display for NTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A grammar symbol, used both in rules and on the parser stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A terminal that must match the lookahead.
    Term(Term),
    /// A non-terminal to expand through the table.
    NTerm(NTerm),
    /// The empty expansion.
    Epsilon,
    /// The end of the input.
    Eof,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(t) => write!(f, "{t}"),
            Self::NTerm(nt) => write!(f, "<{nt}>"),
            Self::Epsilon => f.write_str("ε"),
            Self::Eof => f.write_str("Ω"),
        }
    }
}

/// What the parser sees next: a terminal, or the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookahead {
    /// The next token matches this terminal.
    Term(Term),
    /// No tokens remain.
    Eof,
}

impl Lookahead {
    /// Returns the lookahead for an optional next token.
    #[must_use]
    pub fn of(token: Option<&Token>) -> Self {
        token.map_or(Self::Eof, |t| Self::Term(Term::of(t)))
    }
}
