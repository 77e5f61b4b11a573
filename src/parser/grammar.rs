// # ========================= START OF THE GRAMMAR =========================
//
// Rules are listed lowest precedence first. Every binary level parses its
// operands with the next level down and loops while the current token is one
// of its operators, so `+`/`-` and `*`/`/`/`%` associate to the left. `=`
// recurses into `expression` for its right-hand side and so associates to the
// right. Parsing is fail-fast: the first violation aborts the whole parse.

use super::ast::*;
use super::error::ParseError;
use super::locations::Locatable;
use super::tokenizer::{Token, TokenType as TT};
use once_cell::sync::Lazy;

static END_OF_INPUT: Lazy<Token> = Lazy::new(|| Token::new(TT::EOF, ""));

type ParseResult<T> = Result<T, ParseError>;

pub fn parse(tokens: &[Token]) -> ParseResult<Program> {
    Parser::new(tokens).program()
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn at(&self) -> &'a Token {
        self.tokens.get(self.position).unwrap_or(&*END_OF_INPUT)
    }

    fn previous(&self) -> &'a Token {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&*END_OF_INPUT)
    }

    fn check(&self, typ: TT) -> bool {
        self.at().typ == typ
    }

    fn not_eof(&self) -> bool {
        !self.check(TT::EOF)
    }

    fn eat(&mut self) -> &'a Token {
        let token = self.at();
        if token.typ != TT::EOF {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, typ: TT, message: &str) -> ParseResult<&'a Token> {
        let token = self.at();
        if token.typ == typ {
            return Ok(self.eat());
        }
        Err(unexpected(token, format!("{typ:?}"), message))
    }

    // program: statement* EOF
    fn program(mut self) -> ParseResult<Program> {
        let mut body = vec![];
        while self.not_eof() {
            body.push(self.statement()?);
        }
        Ok(Program { body })
    }

    // statement:
    //     | variable_declaration
    //     | if_statement
    //     | while_statement
    //     | for_statement
    //     | try_statement
    //     | function_declaration
    //     | expression [';']
    fn statement(&mut self) -> ParseResult<Statement> {
        match self.at().typ {
            TT::VAR | TT::CONST => self
                .variable_declaration()
                .map(Statement::VariableDeclaration),
            TT::IF => self.if_statement().map(Statement::If),
            TT::WHILE => self.while_statement().map(Statement::While),
            TT::FOR => self.for_statement().map(Statement::For),
            TT::TRY => self.try_statement().map(Statement::TryCatch),
            TT::FUNC => self
                .function_declaration()
                .map(Statement::FunctionDeclaration),
            _ => {
                let expr = self.expression()?;
                if self.check(TT::SEMICOLON) {
                    self.eat();
                }
                Ok(Statement::Expression(expr))
            }
        }
    }

    // variable_declaration:
    //     | ('var' | 'const') IDENTIFIER ';'
    //     | ('var' | 'const') IDENTIFIER '=' expression ';'
    fn variable_declaration(&mut self) -> ParseResult<VariableDeclaration> {
        let constant = self.eat().typ == TT::CONST;
        let identifier: Name = self
            .expect(
                TT::IDENTIFIER,
                "Expected identifier name following variable declaration keyword (var, const).",
            )?
            .clone()
            .into();

        let next = self.at();
        if constant && next.typ != TT::EQUALS {
            return Err(ParseError::UninitializedConstant {
                name: identifier.to_string(),
                span: next.span(),
            });
        }
        match next.typ {
            TT::SEMICOLON => {
                self.eat();
                Ok(VariableDeclaration {
                    constant: false,
                    identifier,
                    value: None,
                })
            }
            TT::EQUALS => {
                self.eat();
                let value = self.expression()?;
                self.expect(TT::SEMICOLON, "Expected ';' after variable initializer.")?;
                Ok(VariableDeclaration {
                    constant,
                    identifier,
                    value: Some(value),
                })
            }
            _ => Err(unexpected(
                next,
                "EQUALS or SEMICOLON".to_string(),
                "Unexpected token after variable declaration.",
            )),
        }
    }

    // block: '{' statement* '}'
    fn block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect(TT::OPENBRACE, "Expected '{' to open a block.")?;
        let mut body = vec![];
        while self.not_eof() && !self.check(TT::CLOSEBRACE) {
            body.push(self.statement()?);
        }
        self.expect(TT::CLOSEBRACE, "Expected '}' to close a block.")?;
        Ok(body)
    }

    // if_statement:
    //     | ('if' | 'elif') expression block ['elif' ... | 'else' block]
    fn if_statement(&mut self) -> ParseResult<IfStatement> {
        self.eat();
        let test = self.expression()?;
        let body = self.block()?;
        let alternate = match self.at().typ {
            TT::ELIF => Some(vec![Statement::If(self.if_statement()?)]),
            TT::ELSE => {
                self.eat();
                Some(self.block()?)
            }
            _ => None,
        };
        Ok(IfStatement {
            test,
            body,
            alternate,
        })
    }

    // while_statement: 'while' expression block
    fn while_statement(&mut self) -> ParseResult<WhileStatement> {
        self.eat();
        let test = self.expression()?;
        let body = self.block()?;
        Ok(WhileStatement { test, body })
    }

    // for_statement: 'for' '(' variable_declaration expression ';' assignment ')' block
    fn for_statement(&mut self) -> ParseResult<ForStatement> {
        self.eat();
        self.expect(TT::OPENPAREN, "Expected '(' after 'for'.")?;
        if !matches!(self.at().typ, TT::VAR | TT::CONST) {
            return Err(unexpected(
                self.at(),
                "VAR or CONST".to_string(),
                "A for loop must start with a variable declaration.",
            ));
        }
        let init = self.variable_declaration()?;
        let test = self.expression()?;
        self.expect(TT::SEMICOLON, "Expected ';' after for loop condition.")?;

        let update_start = self.at().span();
        let update = self.expression()?;
        if !matches!(update, Expression::Assignment(_)) {
            return Err(ParseError::InvalidSyntax {
                message: format!(
                    "For loop update must be an assignment, found {}",
                    update.kind()
                ),
                span: update_start.till(&self.previous().span()),
            });
        }
        self.expect(TT::CLOSEPAREN, "Expected ')' after for loop header.")?;
        let body = self.block()?;
        Ok(ForStatement {
            init,
            test,
            update,
            body,
        })
    }

    // try_statement: 'try' block 'catch' block
    fn try_statement(&mut self) -> ParseResult<TryCatchStatement> {
        self.eat();
        let body = self.block()?;
        self.expect(TT::CATCH, "Expected 'catch' after try block.")?;
        let handler = self.block()?;
        Ok(TryCatchStatement { body, handler })
    }

    // function_declaration: 'func' IDENTIFIER '(' [IDENTIFIER (',' IDENTIFIER)*] ')' block
    fn function_declaration(&mut self) -> ParseResult<FunctionDeclaration> {
        self.eat();
        let name: Name = self
            .expect(TT::IDENTIFIER, "Expected function name following 'func'.")?
            .clone()
            .into();
        self.expect(TT::OPENPAREN, "Expected '(' after function name.")?;
        let mut parameters = vec![];
        if !self.check(TT::CLOSEPAREN) {
            loop {
                let parameter = self.expect(TT::IDENTIFIER, "Expected parameter name.")?;
                parameters.push(Name::from(parameter.clone()));
                if !self.check(TT::COMMA) {
                    break;
                }
                self.eat();
            }
        }
        self.expect(TT::CLOSEPAREN, "Expected ')' after function parameters.")?;
        let body = self.block()?;
        Ok(FunctionDeclaration {
            name,
            parameters,
            body,
        })
    }

    // expression:
    //     | object_literal
    //     | array_literal
    //     | assignment
    fn expression(&mut self) -> ParseResult<Expression> {
        match self.at().typ {
            TT::OPENBRACE => self.object_literal(),
            TT::OPENBRACKET => self.array_literal(),
            _ => self.assignment(),
        }
    }

    // object_literal: '{' [property (',' property)* [',']] '}'
    // property: IDENTIFIER [':' expression]
    fn object_literal(&mut self) -> ParseResult<Expression> {
        self.eat();
        let mut properties = vec![];
        while self.not_eof() && !self.check(TT::CLOSEBRACE) {
            let key: Name = self
                .expect(TT::IDENTIFIER, "Expected object literal key.")?
                .clone()
                .into();

            // shorthand `{ key, ... }` and `{ key }`
            if self.check(TT::COMMA) {
                self.eat();
                properties.push(Property { key, value: None });
                continue;
            } else if self.check(TT::CLOSEBRACE) {
                properties.push(Property { key, value: None });
                continue;
            }

            self.expect(
                TT::COLON,
                "Missing colon following identifier in object literal.",
            )?;
            let value = self.expression()?;
            properties.push(Property {
                key,
                value: Some(value),
            });
            if !self.check(TT::CLOSEBRACE) {
                self.expect(
                    TT::COMMA,
                    "Expected comma or closing brace following previous property.",
                )?;
            }
        }
        self.expect(TT::CLOSEBRACE, "Object literal missing closing brace.")?;
        Ok(Expression::Object(properties))
    }

    // array_literal: '[' [expression (',' expression)* [',']] ']'
    fn array_literal(&mut self) -> ParseResult<Expression> {
        self.eat();
        let mut elements = vec![];
        while self.not_eof() && !self.check(TT::CLOSEBRACKET) {
            elements.push(self.expression()?);
            if !self.check(TT::CLOSEBRACKET) {
                self.expect(
                    TT::COMMA,
                    "Expected comma (\",\") or closing bracket (\"]\") after array element.",
                )?;
            }
        }
        self.expect(
            TT::CLOSEBRACKET,
            "Expected closing bracket (\"]\") at the end of array expression.",
        )?;
        Ok(Expression::Array(elements))
    }

    // assignment: additive ['=' expression]
    fn assignment(&mut self) -> ParseResult<Expression> {
        let assignee = self.additive()?;
        if self.check(TT::EQUALS) {
            self.eat();
            let value = self.expression()?;
            return Ok(Expression::Assignment(Box::new((assignee, value))));
        }
        Ok(assignee)
    }

    // additive: multiplicative (('+' | '-') multiplicative)*
    fn additive(&mut self) -> ParseResult<Expression> {
        let mut left = self.multiplicative()?;
        while let Some(op) = self.binary_operator(&[Operator::Plus, Operator::Minus]) {
            let right = self.multiplicative()?;
            left = Expression::BinaryOperation(op, Box::new((left, right)));
        }
        Ok(left)
    }

    // multiplicative: call_member (('*' | '/' | '%') call_member)*
    fn multiplicative(&mut self) -> ParseResult<Expression> {
        let mut left = self.call_member()?;
        while let Some(op) =
            self.binary_operator(&[Operator::Times, Operator::Divide, Operator::Modulo])
        {
            let right = self.call_member()?;
            left = Expression::BinaryOperation(op, Box::new((left, right)));
        }
        Ok(left)
    }

    fn binary_operator(&mut self, accepted: &[Operator]) -> Option<Operator> {
        let token = self.at();
        if token.typ != TT::BINARYOPERATOR {
            return None;
        }
        let op = Operator::from_symbol(&token.lexeme).filter(|op| accepted.contains(op))?;
        self.eat();
        Some(op)
    }

    // call_member:
    //     | primary ('.' IDENTIFIER | '[' expression ']' | '(' arguments ')')*
    fn call_member(&mut self) -> ParseResult<Expression> {
        let mut expr = self.primary()?;
        loop {
            match self.at().typ {
                TT::DOT => {
                    self.eat();
                    let property: Name = self
                        .expect(TT::IDENTIFIER, "Expected property name after '.'.")?
                        .clone()
                        .into();
                    expr = Expression::Member(Box::new((expr, Expression::Name(property))), false);
                }
                TT::OPENBRACKET => {
                    self.eat();
                    let property = self.expression()?;
                    self.expect(
                        TT::CLOSEBRACKET,
                        "Expected closing bracket after computed member access.",
                    )?;
                    expr = Expression::Member(Box::new((expr, property)), true);
                }
                TT::OPENPAREN => {
                    self.eat();
                    let arguments = self.arguments()?;
                    expr = Expression::Call(Box::new(expr), arguments);
                }
                _ => return Ok(expr),
            }
        }
    }

    // arguments: [expression (',' expression)*] ')'
    fn arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = vec![];
        if !self.check(TT::CLOSEPAREN) {
            loop {
                arguments.push(self.expression()?);
                if !self.check(TT::COMMA) {
                    break;
                }
                self.eat();
            }
        }
        self.expect(TT::CLOSEPAREN, "Expected closing parenthesis after call arguments.")?;
        Ok(arguments)
    }

    // primary:
    //     | IDENTIFIER
    //     | INT
    //     | FLOAT
    //     | BOOL
    //     | NULL
    //     | '(' expression ')'
    fn primary(&mut self) -> ParseResult<Expression> {
        let token = self.at();
        match token.typ {
            TT::IDENTIFIER => {
                self.eat();
                Ok(Expression::Name(token.clone().into()))
            }
            TT::INT => {
                self.eat();
                token
                    .lexeme
                    .parse::<i32>()
                    .map(Expression::Int)
                    .map_err(|_| invalid_literal(token))
            }
            TT::FLOAT => {
                self.eat();
                match token.lexeme.parse::<f32>() {
                    Ok(value) if value.is_finite() => Ok(Expression::Float(value)),
                    _ => Err(invalid_literal(token)),
                }
            }
            TT::BOOL => {
                self.eat();
                Ok(Expression::Bool(token.lexeme == "true"))
            }
            TT::NULL => {
                self.eat();
                Ok(Expression::Null)
            }
            TT::OPENPAREN => {
                self.eat();
                let value = self.expression()?;
                self.expect(
                    TT::CLOSEPAREN,
                    "Unexpected token found inside expression. Expected closing parenthesis.",
                )?;
                Ok(value)
            }
            _ => Err(unexpected(
                token,
                "an expression".to_string(),
                "Unexpected token.",
            )),
        }
    }
}

fn unexpected(token: &Token, expected: String, message: &str) -> ParseError {
    if token.typ == TT::EOF {
        ParseError::UnexpectedEndOfInput {
            message: message.to_string(),
            expected,
        }
    } else {
        ParseError::UnexpectedToken {
            message: message.to_string(),
            found: token.to_string(),
            expected,
            span: token.span(),
        }
    }
}

fn invalid_literal(token: &Token) -> ParseError {
    ParseError::InvalidLiteral {
        literal: token.lexeme.clone(),
        span: token.span(),
    }
}

