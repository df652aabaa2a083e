use std::fmt::Display;

use crate::{runtime::value::Value, Span};

use super::declarations::Declaration;

/// Identity of an AST node, unique within one parsed program.
///
/// Analysis results are stored against these ids rather than on the nodes, so a
/// parsed tree stays immutable.
pub type NodeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    IntegerDivide,
    Remainder,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::IntegerDivide => "//",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Power => "**",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOperator {
    /// Whether the operator writes its result back to the operand variable.
    pub fn is_update(&self) -> bool {
        matches!(
            self,
            UnaryOperator::PreIncrement
                | UnaryOperator::PreDecrement
                | UnaryOperator::PostIncrement
                | UnaryOperator::PostDecrement
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "not",
            UnaryOperator::PreIncrement | UnaryOperator::PostIncrement => "++",
            UnaryOperator::PreDecrement | UnaryOperator::PostDecrement => "--",
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone)]
pub struct Expression {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExpressionKind,
}

#[derive(Debug, Clone)]
pub enum ExpressionKind {
    Literal(Value),
    VariableRef {
        name: String,
    },
    Assignment {
        name: String,
        value: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
    IfElse {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Option<Box<Expression>>,
    },
    WhileLoop {
        condition: Box<Expression>,
        body: Box<Expression>,
    },
    /// `for (let iterator[:type] = start; condition; step) body`
    ForLoop {
        iterator: String,
        iterator_type: Option<String>,
        start: Box<Expression>,
        condition: Box<Expression>,
        step: Option<Box<Expression>>,
        body: Box<Expression>,
    },
    Switch {
        scrutinee: Box<Expression>,
        cases: Vec<SwitchCase>,
        default: Option<Box<Expression>>,
    },
    Break,
    Continue,
    Return(Option<Box<Expression>>),
    Print(Vec<Expression>),
    Sequence(Vec<Expression>),
    Declaration(Box<Declaration>),
    Empty,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub value: Expression,
    pub body: Expression,
}

impl Expression {
    pub fn new(id: NodeId, span: Span, kind: ExpressionKind) -> Self {
        Expression { id, span, kind }
    }

    /// Whether evaluation of this expression always ends in `return`, `break` or
    /// `continue`, making any value it would produce unobservable.
    pub fn always_exits(&self) -> bool {
        match &self.kind {
            ExpressionKind::Return(_) | ExpressionKind::Break | ExpressionKind::Continue => true,
            ExpressionKind::Sequence(expressions) => {
                expressions.iter().any(|expression| expression.always_exits())
            }
            ExpressionKind::IfElse {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => then_branch.always_exits() && else_branch.always_exits(),
            _ => false,
        }
    }
}

/// A parsed program: top-level declarations followed by the body of `main`.
#[derive(Debug, Clone)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub entry: Expression,
    pub span: Span,
}
