use std::sync::Arc;

use tracing::debug;

use crate::{
    ast::{NodeId, NodeKind, ParseTree},
    error::TranslateError,
    interpreter::{
        grammar::NTerm,
        import::Importer,
        lexer::{Keyword, Token, TokenValue},
        value::{
            func::{
                Application, Chain, ChainPiece, Func, Ident, Lambda, Let, Link, Member, MemberExpr, Pattern,
                Switch,
            },
            memo::Memo,
            module::Module,
        },
    },
};

/// Result type for translation steps.
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Translates the parse tree of a script into a module.
///
/// Import declarations are resolved through `importer` as they are met. When
/// a name is declared twice, the later declaration wins.
///
/// # Errors
/// - `TranslateError::Import` if the importer rejects an import.
/// - `TranslateError::Malformed` if the tree was not produced by
///   [`parse_script`](crate::interpreter::parser::parse_script).
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use wdte::interpreter::{
///     evaluator::prelude,
///     import::Registry,
///     parser::parse_script,
///     translator::translate,
///     value::{frame::Frame, func::Func},
/// };
///
/// let tree = parse_script("double x => * x 2;").unwrap();
/// let module = Arc::new(translate(&tree, &Registry::new()).unwrap());
///
/// let frame = Frame::new(prelude());
/// let six = module.call(&frame, "double", &[Func::from(3.0)]);
/// assert!(six.equals(&Func::from(6.0)));
/// ```
pub fn translate(tree: &ParseTree, importer: &dyn Importer) -> TranslateResult<Module> {
    let translator = Translator { tree };
    let root = tree.root().ok_or_else(|| malformed(NTerm::Script))?;
    let children = translator.expand(root, NTerm::Script)?;
    let [decls] = children else {
        return Err(malformed(NTerm::Script));
    };

    let mut module = Module::new();
    let mut current = *decls;
    loop {
        let children = translator.expand(current, NTerm::Decls)?;
        match children {
            [decl, rest] => {
                translator.decl(*decl, importer, &mut module)?;
                current = *rest;
            },
            _ if translator.is_epsilon(children) => break,
            _ => return Err(malformed(NTerm::Decls)),
        }
    }

    Ok(module)
}

/// Translates the parse tree of a fragment into a single function.
///
/// Several expressions become a compound evaluating them in order. An empty
/// fragment becomes an empty array.
///
/// # Errors
/// Returns `TranslateError::Malformed` if the tree was not produced by
/// [`parse_fragment`](crate::interpreter::parser::parse_fragment).
pub fn translate_fragment(tree: &ParseTree) -> TranslateResult<Func> {
    let translator = Translator { tree };
    let root = tree.root().ok_or_else(|| malformed(NTerm::Fragment))?;
    let [exprs] = translator.expand(root, NTerm::Fragment)? else {
        return Err(malformed(NTerm::Fragment));
    };

    let exprs = translator.frag_exprs(*exprs)?;
    Ok(match exprs.len() {
        0 => Func::from(Vec::new()),
        _ => compound(exprs),
    })
}

const fn malformed(nterm: NTerm) -> TranslateError {
    TranslateError::Malformed { nterm: nterm.name() }
}

/// Collapses a sequence of expressions into one.
///
/// A lone `let` keeps its compound so that its binding stays local to it.
fn compound(mut exprs: Vec<Func>) -> Func {
    if exprs.len() == 1
       && !matches!(exprs[0], Func::Let(_))
       && let Some(expr) = exprs.pop()
    {
        return expr;
    }
    Func::Compound(exprs.into())
}

struct Translator<'t> {
    tree: &'t ParseTree,
}

impl<'t> Translator<'t> {
    /// Returns the children of `id`, which must be an expansion of `nterm`.
    fn expand(&self, id: NodeId, nterm: NTerm) -> TranslateResult<&'t [NodeId]> {
        let tree = self.tree;
        match &tree.node(id).kind {
            NodeKind::NTerm { name, children } if *name == nterm => Ok(children),
            _ => Err(malformed(nterm)),
        }
    }

    fn is_epsilon(&self, children: &[NodeId]) -> bool {
        matches!(children, [only] if self.tree.node(*only).kind == NodeKind::Epsilon)
    }

    fn token(&self, id: NodeId, within: NTerm) -> TranslateResult<&'t Token> {
        let tree = self.tree;
        match &tree.node(id).kind {
            NodeKind::Term(token) => Ok(token),
            _ => Err(malformed(within)),
        }
    }

    fn ident(&self, id: NodeId, within: NTerm) -> TranslateResult<Ident> {
        match &self.token(id, within)?.value {
            TokenValue::Identifier(name) => Ok(name.as_str().into()),
            _ => Err(malformed(within)),
        }
    }

    fn keyword(&self, id: NodeId, within: NTerm) -> TranslateResult<Keyword> {
        match &self.token(id, within)?.value {
            TokenValue::Keyword(keyword) => Ok(*keyword),
            _ => Err(malformed(within)),
        }
    }

    fn decl(&self, id: NodeId, importer: &dyn Importer, module: &mut Module) -> TranslateResult<()> {
        let [inner, _semicolon] = self.expand(id, NTerm::Decl)? else {
            return Err(malformed(NTerm::Decl));
        };

        if let Ok(children) = self.expand(*inner, NTerm::Import) {
            return self.import(children, importer, module);
        }

        let (name, func) = self.func_decl(*inner)?;
        debug!(%name, "declared function");
        if module.insert(name.clone(), func).is_some() {
            debug!(%name, "replaced earlier declaration");
        }
        Ok(())
    }

    fn import(&self, children: &[NodeId], importer: &dyn Importer, module: &mut Module) -> TranslateResult<()> {
        let [path, _arrow, alias] = children else {
            return Err(malformed(NTerm::Import));
        };
        let TokenValue::String(path) = &self.token(*path, NTerm::Import)?.value else {
            return Err(malformed(NTerm::Import));
        };
        let alias = self.ident(*alias, NTerm::Import)?;

        debug!(%path, %alias, "importing module");
        let imported = importer.import(path)
                               .map_err(|source| TranslateError::Import { path: path.clone(),
                                                                          source })?;
        module.import(alias, imported);
        Ok(())
    }

    /// Translates a compound item, which may be a `let`.
    fn cexpr(&self, id: NodeId) -> TranslateResult<Func> {
        let [inner] = self.expand(id, NTerm::CExpr)? else {
            return Err(malformed(NTerm::CExpr));
        };
        match self.expand(*inner, NTerm::LetExpr) {
            Ok(children) => self.let_expr(children),
            Err(_) => self.expr(*inner),
        }
    }

    fn let_expr(&self, children: &[NodeId]) -> TranslateResult<Func> {
        let [_let, assign] = children else {
            return Err(malformed(NTerm::LetExpr));
        };

        let (pattern, expr) = match self.expand(*assign, NTerm::Assign)? {
            [mods, name, params, _arrow, body] => {
                let name = self.ident(*name, NTerm::Assign)?;
                let body = self.expr(*body)?;
                let expr = if self.arg_decls(*params)?.is_empty() {
                    // Without parameters the body is bound as a value, so it
                    // sees any earlier binding of its own name.
                    if self.func_mods(*mods)? {
                        Func::Memo(Arc::new(Memo::new(body, Arc::from([]))))
                    } else {
                        body
                    }
                } else {
                    self.lambda_parts(name.clone(), *mods, *params, body)?
                };
                (Pattern::Name(name), expr)
            },
            [pattern, _arrow, body] => (self.pattern(*pattern)?, self.expr(*body)?),
            _ => return Err(malformed(NTerm::Assign)),
        };

        Ok(Func::Let(Arc::new(Let { pattern, expr })))
    }

    fn pattern(&self, id: NodeId) -> TranslateResult<Pattern> {
        match self.expand(id, NTerm::Pattern)? {
            [name] => Ok(Pattern::Name(self.ident(*name, NTerm::Pattern)?)),
            [_open, first, rest, _close] => {
                let mut names = vec![self.ident(*first, NTerm::Pattern)?];
                names.extend(self.arg_decls(*rest)?);
                Ok(Pattern::Array(names.into()))
            },
            _ => Err(malformed(NTerm::Pattern)),
        }
    }

    fn func_decl(&self, id: NodeId) -> TranslateResult<(Ident, Func)> {
        let [mods, name, params, _arrow, body] = self.expand(id, NTerm::FuncDecl)? else {
            return Err(malformed(NTerm::FuncDecl));
        };

        let name = self.ident(*name, NTerm::FuncDecl)?;
        let lambda = self.lambda_parts(name.clone(), *mods, *params, self.expr(*body)?)?;
        Ok((name, lambda))
    }

    /// Builds a lambda, wrapping the body in a memo when `memo` is among the
    /// modifiers.
    fn lambda_parts(&self, name: Ident, mods: NodeId, params: NodeId, body: Func) -> TranslateResult<Func> {
        let memo = self.func_mods(mods)?;
        let params: Arc<[Ident]> = self.arg_decls(params)?.into();

        let body = if memo {
            Func::Memo(Arc::new(Memo::new(body, params.clone())))
        } else {
            body
        };

        Ok(Func::Lambda(Arc::new(Lambda { name,
                                          params,
                                          body })))
    }

    /// Returns whether the modifiers include `memo`.
    fn func_mods(&self, id: NodeId) -> TranslateResult<bool> {
        let mut memo = false;
        let mut current = id;
        loop {
            let children = self.expand(current, NTerm::FuncMods)?;
            match children {
                [modifier, rest] => {
                    let [keyword] = self.expand(*modifier, NTerm::FuncMod)? else {
                        return Err(malformed(NTerm::FuncMod));
                    };
                    memo |= self.keyword(*keyword, NTerm::FuncMod)? == Keyword::Memo;
                    current = *rest;
                },
                _ if self.is_epsilon(children) => return Ok(memo),
                _ => return Err(malformed(NTerm::FuncMods)),
            }
        }
    }

    fn arg_decls(&self, id: NodeId) -> TranslateResult<Vec<Ident>> {
        let mut params = Vec::new();
        let mut current = id;
        loop {
            let children = self.expand(current, NTerm::ArgDecls)?;
            match children {
                [param, rest] => {
                    params.push(self.ident(*param, NTerm::ArgDecls)?);
                    current = *rest;
                },
                _ if self.is_epsilon(children) => return Ok(params),
                _ => return Err(malformed(NTerm::ArgDecls)),
            }
        }
    }

    fn frag_exprs(&self, id: NodeId) -> TranslateResult<Vec<Func>> {
        let mut exprs = Vec::new();
        let mut current = id;
        loop {
            let children = self.expand(current, NTerm::FragExprs)?;
            let [expr, tail] = children else {
                if self.is_epsilon(children) {
                    return Ok(exprs);
                }
                return Err(malformed(NTerm::FragExprs));
            };
            exprs.push(self.cexpr(*expr)?);

            let tail = self.expand(*tail, NTerm::FragTail)?;
            match tail {
                [_semicolon, more] => current = *more,
                _ if self.is_epsilon(tail) => return Ok(exprs),
                _ => return Err(malformed(NTerm::FragTail)),
            }
        }
    }

    /// Translates an expression, flattening any chain it starts into a single
    /// [`Chain`].
    fn expr(&self, id: NodeId) -> TranslateResult<Func> {
        let mut pieces = Vec::new();
        self.chain_pieces(id, Link::Plain, &mut pieces)?;

        if let [piece] = pieces.as_slice()
           && piece.slot.is_none()
        {
            return Ok(piece.expr.clone());
        }
        Ok(Func::Chain(Arc::new(Chain { pieces })))
    }

    fn chain_pieces(&self, id: NodeId, link: Link, pieces: &mut Vec<ChainPiece>) -> TranslateResult<()> {
        let [single, args, switch, slot, chain] = self.expand(id, NTerm::Expr)? else {
            return Err(malformed(NTerm::Expr));
        };

        let func = self.single(*single)?;
        let args = self.args(*args)?;
        let mut expr = if args.is_empty() {
            func
        } else {
            Func::Application(Arc::new(Application { func, args }))
        };

        if let Some(cases) = self.switch(*switch)? {
            expr = Func::Switch(Arc::new(Switch { subject: expr,
                                                  cases }));
        }

        pieces.push(ChainPiece { expr,
                                 link,
                                 slot: self.slot(*slot)? });

        let children = self.expand(*chain, NTerm::Chain)?;
        match children {
            [op, next] => {
                let link = match self.keyword(*op, NTerm::Chain)? {
                    Keyword::Chain => Link::Plain,
                    Keyword::IgnoredChain => Link::Ignored,
                    Keyword::ErrorChain => Link::Recover,
                    _ => return Err(malformed(NTerm::Chain)),
                };
                self.chain_pieces(*next, link, pieces)
            },
            _ if self.is_epsilon(children) => Ok(()),
            _ => Err(malformed(NTerm::Chain)),
        }
    }

    fn args(&self, id: NodeId) -> TranslateResult<Vec<Func>> {
        let mut args = Vec::new();
        let mut current = id;
        loop {
            let children = self.expand(current, NTerm::Args)?;
            match children {
                [single, rest] => {
                    args.push(self.single(*single)?);
                    current = *rest;
                },
                _ if self.is_epsilon(children) => return Ok(args),
                _ => return Err(malformed(NTerm::Args)),
            }
        }
    }

    fn switch(&self, id: NodeId) -> TranslateResult<Option<Vec<(Func, Func)>>> {
        let children = self.expand(id, NTerm::Switch)?;
        let [_open, cases, _close] = children else {
            if self.is_epsilon(children) {
                return Ok(None);
            }
            return Err(malformed(NTerm::Switch));
        };

        let mut result = Vec::new();
        let mut current = *cases;
        loop {
            let children = self.expand(current, NTerm::Switches)?;
            match children {
                [lhs, _arrow, rhs, _semicolon, rest] => {
                    result.push((self.expr(*lhs)?, self.expr(*rhs)?));
                    current = *rest;
                },
                _ if self.is_epsilon(children) => return Ok(Some(result)),
                _ => return Err(malformed(NTerm::Switches)),
            }
        }
    }

    fn slot(&self, id: NodeId) -> TranslateResult<Option<Pattern>> {
        let children = self.expand(id, NTerm::Slot)?;
        match children {
            [_colon, pattern] => self.pattern(*pattern).map(Some),
            _ if self.is_epsilon(children) => Ok(None),
            _ => Err(malformed(NTerm::Slot)),
        }
    }

    fn single(&self, id: NodeId) -> TranslateResult<Func> {
        let [inner] = self.expand(id, NTerm::Single)? else {
            return Err(malformed(NTerm::Single));
        };

        match &self.tree.node(*inner).kind {
            NodeKind::Term(token) => match &token.value {
                TokenValue::Number(n) => Ok(Func::from(*n)),
                TokenValue::String(s) => Ok(Func::from(s.as_str())),
                _ => Err(malformed(NTerm::Single)),
            },
            NodeKind::NTerm { name: NTerm::Ref, .. } => self.reference(*inner),
            NodeKind::NTerm { name: NTerm::Array, .. } => self.array(*inner),
            NodeKind::NTerm { name: NTerm::Lambda, .. } => self.lambda(*inner),
            _ => Err(malformed(NTerm::Single)),
        }
    }

    fn reference(&self, id: NodeId) -> TranslateResult<Func> {
        let [head, sub] = self.expand(id, NTerm::Ref)? else {
            return Err(malformed(NTerm::Ref));
        };

        let mut func = match self.expand(*head, NTerm::Compound) {
            Ok(_) => self.compound(*head)?,
            Err(_) => Func::Var(self.ident(*head, NTerm::Ref)?),
        };
        let mut current = *sub;
        loop {
            let children = self.expand(current, NTerm::Sub)?;
            match children {
                [_dot, member, rest] => {
                    func = self.member(func, *member)?;
                    current = *rest;
                },
                _ if self.is_epsilon(children) => return Ok(func),
                _ => return Err(malformed(NTerm::Sub)),
            }
        }
    }

    /// Applies one member access to `base`: a name, or a compound evaluated
    /// with the module's members in scope.
    fn member(&self, base: Func, id: NodeId) -> TranslateResult<Func> {
        let [inner] = self.expand(id, NTerm::Member)? else {
            return Err(malformed(NTerm::Member));
        };

        if self.expand(*inner, NTerm::Compound).is_ok() {
            return Ok(Func::MemberExpr(Arc::new(MemberExpr { base,
                                                             expr: self.compound(*inner)? })));
        }
        Ok(Func::Member(Arc::new(Member { base,
                                          name: self.ident(*inner, NTerm::Member)? })))
    }

    fn array(&self, id: NodeId) -> TranslateResult<Func> {
        let [_open, exprs, _close] = self.expand(id, NTerm::Array)? else {
            return Err(malformed(NTerm::Array));
        };

        let mut items = Vec::new();
        let mut current = *exprs;
        loop {
            let children = self.expand(current, NTerm::AExprs)?;
            let [expr, tail] = children else {
                if self.is_epsilon(children) {
                    break;
                }
                return Err(malformed(NTerm::AExprs));
            };
            items.push(self.expr(*expr)?);

            let tail = self.expand(*tail, NTerm::ATail)?;
            match tail {
                [_semicolon, more] => current = *more,
                _ if self.is_epsilon(tail) => break,
                _ => return Err(malformed(NTerm::ATail)),
            }
        }

        Ok(Func::ArrayLiteral(items.into()))
    }

    fn compound(&self, id: NodeId) -> TranslateResult<Func> {
        let [open, first, tail, _close] = self.expand(id, NTerm::Compound)? else {
            return Err(malformed(NTerm::Compound));
        };

        let mut exprs = vec![self.cexpr(*first)?];
        self.compound_tail(*tail, &mut exprs)?;
        match self.keyword(*open, NTerm::Compound)? {
            Keyword::CollectParen => Ok(Func::Collector(exprs.into())),
            _ => Ok(compound(exprs)),
        }
    }

    fn compound_tail(&self, id: NodeId, exprs: &mut Vec<Func>) -> TranslateResult<()> {
        let mut current = id;
        loop {
            let children = self.expand(current, NTerm::CTail)?;
            let [_semicolon, more] = children else {
                if self.is_epsilon(children) {
                    return Ok(());
                }
                return Err(malformed(NTerm::CTail));
            };

            let more = self.expand(*more, NTerm::CMore)?;
            match more {
                [expr, tail] => {
                    exprs.push(self.cexpr(*expr)?);
                    current = *tail;
                },
                _ if self.is_epsilon(more) => return Ok(()),
                _ => return Err(malformed(NTerm::CMore)),
            }
        }
    }

    fn lambda(&self, id: NodeId) -> TranslateResult<Func> {
        let [_open, mods, name, params, _arrow, first, tail, _close] = self.expand(id, NTerm::Lambda)? else {
            return Err(malformed(NTerm::Lambda));
        };

        let mut exprs = vec![self.cexpr(*first)?];
        self.compound_tail(*tail, &mut exprs)?;

        self.lambda_parts(self.ident(*name, NTerm::Lambda)?, *mods, *params, compound(exprs))
    }
}
