use crate::location::{Location, Span};

use super::kind::{BinaryOperator, ExprKind, StmtKind, UnaryOperator};

/// Identity of a statement node. Unique for the lifetime of the process, so
/// independently built trees never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(usize);

impl StmtId {
    fn fresh() -> Self {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(1);
        StmtId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for StmtId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    id: StmtId,
    pub kind: StmtKind,
    pub location: Option<Location>,
    pub span: Option<Span>,
}

impl Stmt {
    pub fn new(kind: StmtKind, location: Option<Location>, span: Option<Span>) -> Self {
        Stmt { id: StmtId::fresh(), kind, location, span }
    }

    pub fn get_id(&self) -> StmtId {
        self.id
    }
    pub fn get_kind(&self) -> &StmtKind {
        &self.kind
    }
    pub fn get_location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
    pub fn get_span(&self) -> Option<&Span> {
        self.span.as_ref()
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    // Shorthands for building trees by hand (tests, embedders without a parser).

    pub fn block(statements: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Block { statements }, None, None)
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr { expr }, None, None)
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return { value }, None, None)
    }

    pub fn if_then(condition: Expr, then_branch: Stmt) -> Self {
        Self::new(
            StmtKind::If { condition, then_branch: Box::new(then_branch), else_branch: None },
            None,
            None,
        )
    }

    pub fn if_else(condition: Expr, then_branch: Stmt, else_branch: Stmt) -> Self {
        Self::new(
            StmtKind::If {
                condition,
                then_branch: Box::new(then_branch),
                else_branch: Some(Box::new(else_branch)),
            },
            None,
            None,
        )
    }

    pub fn while_loop(condition: Expr, body: Stmt) -> Self {
        Self::new(StmtKind::While { condition, body: Box::new(body) }, None, None)
    }

    /// An unlinked break; run the loop linker before lowering.
    pub fn brk() -> Self {
        Self::new(StmtKind::Break { enclosing_loop: None }, None, None)
    }

    pub fn break_to(enclosing_loop: StmtId) -> Self {
        Self::new(StmtKind::Break { enclosing_loop: Some(enclosing_loop) }, None, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: Option<Location>,
    pub span: Option<Span>,
}

impl Expr {
    pub fn new(kind: ExprKind, location: Option<Location>, span: Option<Span>) -> Self {
        Expr { kind, location, span }
    }

    pub fn get_kind(&self) -> &ExprKind {
        &self.kind
    }
    pub fn get_location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn int(value: i64) -> Self {
        Self::new(ExprKind::Integer { value }, None, None)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ExprKind::Bool { value }, None, None)
    }

    pub fn ident(name: &str) -> Self {
        Self::new(ExprKind::Identifier { name: name.to_string() }, None, None)
    }

    pub fn unary(op: UnaryOperator, expr: Expr) -> Self {
        Self::new(ExprKind::Unary { op, expr: Box::new(expr) }, None, None)
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Self::new(ExprKind::Binary { left: Box::new(left), op, right: Box::new(right) }, None, None)
    }

    pub fn assign(name: &str, value: Expr) -> Self {
        Self::new(ExprKind::Assign { name: name.to_string(), value: Box::new(value) }, None, None)
    }

    pub fn call(callee: &str, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call { callee: callee.to_string(), args }, None, None)
    }
}

/// A function definition: the unit one lowering pass works on.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Stmt,
    pub location: Option<Location>,
    pub span: Option<Span>,
}

impl Function {
    pub fn new(name: &str, params: &[&str], body: Stmt) -> Self {
        Function {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body,
            location: None,
            span: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Program {
    pub fn new(functions: Vec<Function>) -> Self {
        Program { functions }
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}
