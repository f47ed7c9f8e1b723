//! file: core/src/ast/kind.rs
//! description: statement and expression kinds plus operator enums.
//!
//! `StmtKind` is the closed set of statements the lowering engine accepts;
//! every consumer matches it exhaustively so a new statement kind cannot be
//! silently ignored.
//!
use super::node::{Expr, Stmt, StmtId};

/// Represents binary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,  // ==
    Ne,  // !=
    Lt,  // <
    Le,  // <=
    Gt,  // >
    Ge,  // >=
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
}

/// Represents unary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus, // -
    Not,   // !
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Block { statements: Vec<Stmt> },
    Expr { expr: Expr },
    Return { value: Option<Expr> },
    If { condition: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>> },
    While { condition: Expr, body: Box<Stmt> },
    /// `enclosing_loop` is the id of the `While` this break exits. It is
    /// filled in by `analyzers::link_enclosing_loops`, never during lowering.
    Break { enclosing_loop: Option<StmtId> },
}

impl StmtKind {
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Block { .. } => "block",
            StmtKind::Expr { .. } => "expression statement",
            StmtKind::Return { .. } => "return",
            StmtKind::If { .. } => "if",
            StmtKind::While { .. } => "while",
            StmtKind::Break { .. } => "break",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Integer { value: i64 },
    Bool { value: bool },
    Identifier { name: String },
    Unary { op: UnaryOperator, expr: Box<Expr> },
    Binary { left: Box<Expr>, op: BinaryOperator, right: Box<Expr> },
    Assign { name: String, value: Box<Expr> },
    Call { callee: String, args: Vec<Expr> },
}
