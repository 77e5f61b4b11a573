use super::tokenizer::{Token, TokenType as TT};

/// Root of every parse: the top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    If(IfStatement),
    For(ForStatement),
    While(WhileStatement),
    TryCatch(TryCatchStatement),
    Expression(Expression),
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::VariableDeclaration(_) => "VariableDeclaration",
            Self::FunctionDeclaration(_) => "FuncDeclaration",
            Self::If(_) => "IfStatement",
            Self::For(_) => "ForStatement",
            Self::While(_) => "WhileStatement",
            Self::TryCatch(_) => "TryCatchStatement",
            Self::Expression(expr) => expr.kind(),
        }
    }
}

impl From<Expression> for Statement {
    fn from(value: Expression) -> Self {
        Self::Expression(value)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Name {
    name: String,
}

impl Name {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name(\"{}\")", self.name)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<Token> for Name {
    fn from(value: Token) -> Self {
        debug_assert_eq!(value.typ, TT::IDENTIFIER);
        Self { name: value.lexeme }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub constant: bool,
    pub identifier: Name,
    /// Always present for constants.
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Name,
    pub parameters: Vec<Name>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub test: Expression,
    pub body: Vec<Statement>,
    /// `elif` chains are stored as a single nested `If` here.
    pub alternate: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: VariableDeclaration,
    pub test: Expression,
    pub update: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryCatchStatement {
    pub body: Vec<Statement>,
    pub handler: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Assignment(Box<(Expression, Expression)>), // (assignee, value)
    BinaryOperation(Operator, Box<(Expression, Expression)>),
    Call(Box<Expression>, Vec<Expression>),
    Member(Box<(Expression, Expression)>, bool), // ((object, property), computed)
    Name(Name),
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    Null,
    Array(Vec<Expression>),
    Object(Vec<Property>),
}

impl Expression {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Assignment(_) => "AssignmentExpr",
            Self::BinaryOperation(_, _) => "BinaryExpr",
            Self::Call(_, _) => "CallExpr",
            Self::Member(_, _) => "MemberExpr",
            Self::Name(_) => "Identifier",
            Self::Int(_) => "IntLiteral",
            Self::Float(_) => "FloatLiteral",
            Self::Bool(_) => "BoolLiteral",
            Self::String(_) => "StringLiteral",
            Self::Null => "NullLiteral",
            Self::Array(_) => "ArrayLiteral",
            Self::Object(_) => "ObjLiteral",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Name,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
}

impl Operator {
    pub(crate) fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            "*" => Some(Self::Times),
            "/" => Some(Self::Divide),
            "%" => Some(Self::Modulo),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
