//! ```text
//! script    → decls
//! decls     → decl decls | ε
//! decl      → import ";" | funcdecl ";"
//! import    → string "=>" id
//! funcdecl  → funcmods id argdecls "=>" expr
//! funcmods  → funcmod funcmods | ε
//! funcmod   → "memo"
//! argdecls  → id argdecls | ε
//! fragment  → fexprs
//! fexprs    → cexpr ftail | ε
//! ftail     → ";" fexprs | ε
//! cexpr     → letexpr | expr
//! letexpr   → "let" assign
//! assign    → funcmods id argdecls "=>" expr | pattern "=>" expr
//! pattern   → id | "[" id argdecls "]"
//! expr      → single args switch slot chain
//! args      → single args | ε
//! switch    → "{" switches "}" | ε
//! switches  → expr "=>" expr ";" switches | ε
//! slot      → ":" pattern | ε
//! chain     → "->" expr | "--" expr | "-|" expr | ε
//! single    → number | string | array | lambda | ref
//! ref       → id sub | compound sub
//! sub       → "." member sub | ε
//! member    → id | compound
//! array     → "[" aexprs "]"
//! aexprs    → expr atail | ε
//! atail     → ";" aexprs | ε
//! compound  → "(" cexpr ctail ")" | "(|" cexpr ctail ")"
//! ctail     → ";" cmore | ε
//! cmore     → cexpr ctail | ε
//! lambda    → "(@" funcmods id argdecls "=>" cexpr ctail ")"
//! ```
//!
//! `assign` picks its pattern form on `[`. A plain name after `let` is a
//! declaration without parameters.

use super::{Lookahead, NTerm, Rule, Symbol, Term};
use crate::interpreter::lexer::Keyword;

/// Maps a terminal name used in the table to a [`Term`].
macro_rules! term {
    (id) => { Term::Id };
    (number) => { Term::Number };
    (string) => { Term::String };
    ("memo") => { Term::Keyword(Keyword::Memo) };
    ("let") => { Term::Keyword(Keyword::Let) };
    ("=>") => { Term::Keyword(Keyword::Arrow) };
    ("->") => { Term::Keyword(Keyword::Chain) };
    ("--") => { Term::Keyword(Keyword::IgnoredChain) };
    ("-|") => { Term::Keyword(Keyword::ErrorChain) };
    ("(@") => { Term::Keyword(Keyword::LambdaParen) };
    ("(|") => { Term::Keyword(Keyword::CollectParen) };
    ("(") => { Term::Keyword(Keyword::LParen) };
    (")") => { Term::Keyword(Keyword::RParen) };
    ("[") => { Term::Keyword(Keyword::LBracket) };
    ("]") => { Term::Keyword(Keyword::RBracket) };
    ("{") => { Term::Keyword(Keyword::LBrace) };
    ("}") => { Term::Keyword(Keyword::RBrace) };
    (";") => { Term::Keyword(Keyword::Semicolon) };
    (":") => { Term::Keyword(Keyword::Colon) };
    (".") => { Term::Keyword(Keyword::Dot) };
}

/// Maps a lookahead name used in the table to a [`Lookahead`] pattern.
macro_rules! lookahead {
    (EOF) => { Lookahead::Eof };
    ($t:tt) => { Lookahead::Term(term!($t)) };
}

/// Maps a rule symbol used in the table to a [`Symbol`].
macro_rules! symbol {
    (eps) => { Symbol::Epsilon };
    (id) => { Symbol::Term(term!(id)) };
    (number) => { Symbol::Term(term!(number)) };
    (string) => { Symbol::Term(term!(string)) };
    ($nt:ident) => { Symbol::NTerm(NTerm::$nt) };
    ($t:tt) => { Symbol::Term(term!($t)) };
}

/// Generates [`lookup`] from a list of `NTerm: [lookaheads] => [symbols]`
/// entries.
///
/// Every entry becomes one match arm, so two rules claiming the same
/// `(lookahead, non-terminal)` pair surface as an unreachable pattern at
/// compile time.
macro_rules! grammar_table {
    (
        $(
            $nt:ident: [$($la:tt)|+] => [$($sym:tt),+];
        )*
    ) => {
        /// Looks up the rule that expands `nterm` when `lookahead` is next.
        ///
        /// Returns `None` when no rule applies, which is always a syntax
        /// error in the input.
        ///
        /// # Example
        /// ```
        /// use wdte::interpreter::grammar::{lookup, Lookahead, NTerm, Symbol};
        ///
        /// let rule = lookup(Lookahead::Eof, NTerm::Decls).unwrap();
        /// assert_eq!(rule, &[Symbol::Epsilon]);
        /// assert!(lookup(Lookahead::Eof, NTerm::Expr).is_none());
        /// ```
        #[must_use]
        pub fn lookup(lookahead: Lookahead, nterm: NTerm) -> Option<Rule> {
            match (nterm, lookahead) {
                $(
                    (NTerm::$nt, $(lookahead!($la))|+) => Some(&[$(symbol!($sym)),+]),
                )*
                _ => None,
            }
        }
    };
}

grammar_table! {
    Script: [string | "memo" | id | EOF] => [Decls];

    Decls: [string | "memo" | id] => [Decl, Decls];
    Decls: [EOF] => [eps];

    Decl: [string] => [Import, ";"];
    Decl: ["memo" | id] => [FuncDecl, ";"];

    Import: [string] => [string, "=>", id];

    FuncDecl: ["memo" | id] => [FuncMods, id, ArgDecls, "=>", Expr];

    FuncMods: ["memo"] => [FuncMod, FuncMods];
    FuncMods: [id] => [eps];

    FuncMod: ["memo"] => ["memo"];

    ArgDecls: [id] => [id, ArgDecls];
    ArgDecls: ["=>" | "]"] => [eps];

    Fragment: [number | string | "[" | "(@" | "(" | "(|" | id | "let" | EOF] => [FragExprs];

    FragExprs: [number | string | "[" | "(@" | "(" | "(|" | id | "let"] => [CExpr, FragTail];
    FragExprs: [EOF] => [eps];

    FragTail: [";"] => [";", FragExprs];
    FragTail: [EOF] => [eps];

    CExpr: ["let"] => [LetExpr];
    CExpr: [number | string | "[" | "(@" | "(" | "(|" | id] => [Expr];

    LetExpr: ["let"] => ["let", Assign];

    Assign: ["memo" | id] => [FuncMods, id, ArgDecls, "=>", Expr];
    Assign: ["["] => [Pattern, "=>", Expr];

    Pattern: [id] => [id];
    Pattern: ["["] => ["[", id, ArgDecls, "]"];

    Expr: [number | string | "[" | "(@" | "(" | "(|" | id] => [Single, Args, Switch, Slot, Chain];

    Args: [number | string | "[" | "(@" | "(" | "(|" | id] => [Single, Args];
    Args: ["{" | ":" | "->" | "--" | "-|" | ";" | "=>" | ")" | "]" | EOF] => [eps];

    Switch: ["{"] => ["{", Switches, "}"];
    Switch: [":" | "->" | "--" | "-|" | ";" | "=>" | ")" | "]" | EOF] => [eps];

    Switches: [number | string | "[" | "(@" | "(" | "(|" | id] => [Expr, "=>", Expr, ";", Switches];
    Switches: ["}"] => [eps];

    Slot: [":"] => [":", Pattern];
    Slot: ["->" | "--" | "-|" | ";" | "=>" | ")" | "]" | EOF] => [eps];

    Chain: ["->"] => ["->", Expr];
    Chain: ["--"] => ["--", Expr];
    Chain: ["-|"] => ["-|", Expr];
    Chain: [";" | "=>" | ")" | "]" | EOF] => [eps];

    Single: [number] => [number];
    Single: [string] => [string];
    Single: ["["] => [Array];
    Single: ["(@"] => [Lambda];
    Single: ["(" | "(|" | id] => [Ref];

    Ref: [id] => [id, Sub];
    Ref: ["(" | "(|"] => [Compound, Sub];

    Sub: ["."] => [".", Member, Sub];
    Sub: [number | string | "[" | "(@" | "(" | "(|" | id | "{" | ":" | "->" | "--" | "-|" | ";"
          | "=>" | ")" | "]" | EOF] => [eps];

    Member: [id] => [id];
    Member: ["(" | "(|"] => [Compound];

    Array: ["["] => ["[", AExprs, "]"];

    AExprs: [number | string | "[" | "(@" | "(" | "(|" | id] => [Expr, ATail];
    AExprs: ["]"] => [eps];

    ATail: [";"] => [";", AExprs];
    ATail: ["]"] => [eps];

    Compound: ["("] => ["(", CExpr, CTail, ")"];
    Compound: ["(|"] => ["(|", CExpr, CTail, ")"];

    CTail: [";"] => [";", CMore];
    CTail: [")"] => [eps];

    CMore: [number | string | "[" | "(@" | "(" | "(|" | id | "let"] => [CExpr, CTail];
    CMore: [")"] => [eps];

    Lambda: ["(@"] => ["(@", FuncMods, id, ArgDecls, "=>", CExpr, CTail, ")"];
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[NTerm] = &[NTerm::Script,
                            NTerm::Decls,
                            NTerm::Decl,
                            NTerm::Import,
                            NTerm::FuncDecl,
                            NTerm::FuncMods,
                            NTerm::FuncMod,
                            NTerm::ArgDecls,
                            NTerm::Fragment,
                            NTerm::FragExprs,
                            NTerm::FragTail,
                            NTerm::CExpr,
                            NTerm::LetExpr,
                            NTerm::Assign,
                            NTerm::Pattern,
                            NTerm::Expr,
                            NTerm::Args,
                            NTerm::Switch,
                            NTerm::Switches,
                            NTerm::Slot,
                            NTerm::Chain,
                            NTerm::Single,
                            NTerm::Ref,
                            NTerm::Sub,
                            NTerm::Member,
                            NTerm::Array,
                            NTerm::AExprs,
                            NTerm::ATail,
                            NTerm::Compound,
                            NTerm::CTail,
                            NTerm::CMore,
                            NTerm::Lambda];

    fn lookaheads() -> Vec<Lookahead> {
        let mut all = vec![Lookahead::Eof,
                           Lookahead::Term(Term::Id),
                           Lookahead::Term(Term::Number),
                           Lookahead::Term(Term::String)];
        all.extend([Keyword::Arrow,
                    Keyword::Chain,
                    Keyword::IgnoredChain,
                    Keyword::ErrorChain,
                    Keyword::LambdaParen,
                    Keyword::CollectParen,
                    Keyword::LParen,
                    Keyword::RParen,
                    Keyword::LBracket,
                    Keyword::RBracket,
                    Keyword::LBrace,
                    Keyword::RBrace,
                    Keyword::Semicolon,
                    Keyword::Colon,
                    Keyword::Dot,
                    Keyword::Memo,
                    Keyword::Let].map(|k| Lookahead::Term(Term::Keyword(k))));
        all
    }

    #[test]
    fn every_nterm_has_a_rule() {
        for &nt in ALL {
            assert!(lookaheads().into_iter().any(|la| lookup(la, nt).is_some()),
                    "no rule for <{nt}>");
        }
    }

    #[test]
    fn epsilon_rules_stand_alone() {
        for &nt in ALL {
            for la in lookaheads() {
                if let Some(rule) = lookup(la, nt) {
                    assert!(!rule.is_empty());
                    assert!(rule.len() == 1 || !rule.contains(&Symbol::Epsilon),
                            "<{nt}> mixes ε into a longer rule");
                }
            }
        }
    }

    #[test]
    fn expression_starts_agree() {
        let starts = lookaheads().into_iter()
                                 .filter(|&la| lookup(la, NTerm::Expr).is_some())
                                 .collect::<Vec<_>>();
        for nt in [NTerm::Args,
                   NTerm::Switches,
                   NTerm::AExprs,
                   NTerm::CMore,
                   NTerm::FragExprs,
                   NTerm::CExpr]
        {
            for &la in &starts {
                let rule = lookup(la, nt).unwrap();
                assert_ne!(rule, &[Symbol::Epsilon], "<{nt}> must expand on {la:?}");
            }
        }
    }

    #[test]
    fn let_only_starts_compound_items() {
        let let_kw = Lookahead::Term(Term::Keyword(Keyword::Let));
        for nt in [NTerm::CExpr, NTerm::CMore, NTerm::FragExprs, NTerm::Fragment] {
            assert!(lookup(let_kw, nt).is_some(), "<{nt}> must accept let");
        }
        for nt in [NTerm::Expr, NTerm::Args, NTerm::AExprs, NTerm::Switches, NTerm::Decls] {
            assert!(lookup(let_kw, nt).is_none(), "<{nt}> must reject let");
        }
    }
}
