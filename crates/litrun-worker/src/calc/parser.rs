// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement and expression parsing for calc blocks.

use crate::engine::RaisedFault;

use super::lexer::Token;

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Double,
    Bool,
    Auto,
}

impl Type {
    fn from_keyword(word: &str) -> Option<Type> {
        match word {
            "int" | "long" => Some(Type::Int),
            "double" | "float" => Some(Type::Double),
            "bool" => Some(Type::Bool),
            "auto" => Some(Type::Auto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Var(String),
    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

/// Which stream a print statement writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// One `<<` operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Value(Expr),
    Endl,
    BoolAlpha(bool),
    Precision(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declare { ty: Type, name: String, init: Option<Expr> },
    Assign { name: String, op: Option<BinOp>, value: Expr },
    Print { stream: Stream, items: Vec<Item> },
    Throw { type_name: String, message: Expr },
    Exit(Expr),
    Expr(Expr),
}

fn syntax(message: impl Into<String>) -> RaisedFault {
    RaisedFault::Other(format!("error: {}", message.into()))
}

/// Recursive-descent parser over a token list.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse every statement in the block.
    pub fn parse_block(&mut self) -> Result<Vec<Stmt>, RaisedFault> {
        let mut stmts = Vec::new();
        while self.peek().is_some() {
            if self.eat(&Token::Semi) {
                continue;
            }
            stmts.push(self.statement()?);
        }
        Ok(stmts)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> Result<(), RaisedFault> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(syntax(format!("expected {}", what)))
        }
    }

    fn ident(&mut self) -> Result<String, RaisedFault> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name),
            _ => Err(syntax("expected identifier")),
        }
    }

    fn statement(&mut self) -> Result<Stmt, RaisedFault> {
        let stmt = match (self.peek(), self.peek_at(1)) {
            (Some(Token::Ident(word)), Some(Token::Ident(_))) if Type::from_keyword(word).is_some() => {
                self.declaration()?
            }
            (Some(Token::Ident(word)), Some(Token::Shl)) if word == "std::cout" || word == "std::cerr" => {
                self.print()?
            }
            (Some(Token::Ident(word)), _) if word == "throw" => self.throw()?,
            (Some(Token::Ident(word)), Some(Token::LParen)) if word == "std::exit" => {
                self.advance();
                self.advance();
                let code = self.expression()?;
                self.expect(&Token::RParen, "')'")?;
                Stmt::Exit(code)
            }
            (Some(Token::Ident(_)), Some(next)) if assign_op(next).is_some() => self.assignment()?,
            _ => Stmt::Expr(self.expression()?),
        };
        self.expect(&Token::Semi, "';' after statement")?;
        Ok(stmt)
    }

    fn declaration(&mut self) -> Result<Stmt, RaisedFault> {
        let keyword = self.ident()?;
        let ty = Type::from_keyword(&keyword).ok_or_else(|| syntax("expected type"))?;
        let name = self.ident()?;
        let init = if self.eat(&Token::Eq) {
            Some(self.expression()?)
        } else if self.eat(&Token::LParen) {
            let init = self.expression()?;
            self.expect(&Token::RParen, "')'")?;
            Some(init)
        } else {
            None
        };
        if ty == Type::Auto && init.is_none() {
            return Err(syntax(format!(
                "declaration of variable '{}' with deduced type 'auto' requires an initializer",
                name
            )));
        }
        Ok(Stmt::Declare { ty, name, init })
    }

    fn print(&mut self) -> Result<Stmt, RaisedFault> {
        let stream = match self.ident()?.as_str() {
            "std::cerr" => Stream::Err,
            _ => Stream::Out,
        };
        let mut items = Vec::new();
        while self.eat(&Token::Shl) {
            // `<<` binds tighter than comparisons, so operands are additive.
            let operand = self.additive()?;
            items.push(match operand {
                Expr::Var(name) if name == "std::endl" => Item::Endl,
                Expr::Var(name) if name == "std::boolalpha" => Item::BoolAlpha(true),
                Expr::Var(name) if name == "std::noboolalpha" => Item::BoolAlpha(false),
                Expr::Call(name, mut args) if name == "std::setprecision" && args.len() == 1 => {
                    Item::Precision(args.remove(0))
                }
                other => Item::Value(other),
            });
        }
        Ok(Stmt::Print { stream, items })
    }

    fn throw(&mut self) -> Result<Stmt, RaisedFault> {
        self.advance();
        let type_name = self.ident()?;
        self.expect(&Token::LParen, "'(' after exception type")?;
        let message = self.expression()?;
        self.expect(&Token::RParen, "')'")?;
        Ok(Stmt::Throw { type_name, message })
    }

    fn assignment(&mut self) -> Result<Stmt, RaisedFault> {
        let name = self.ident()?;
        let op = self.advance().and_then(|t| assign_op(&t)).flatten();
        let value = self.expression()?;
        Ok(Stmt::Assign { name, op, value })
    }

    pub fn expression(&mut self) -> Result<Expr, RaisedFault> {
        self.logical_or()
    }

    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr, RaisedFault>,
        ops: &[(Token, BinOp)],
    ) -> Result<Expr, RaisedFault> {
        let mut lhs = next(self)?;
        'outer: loop {
            for (token, op) in ops {
                if self.eat(token) {
                    let rhs = next(self)?;
                    lhs = Expr::Binary(*op, Box::new(lhs), Box::new(rhs));
                    continue 'outer;
                }
            }
            return Ok(lhs);
        }
    }

    fn logical_or(&mut self) -> Result<Expr, RaisedFault> {
        self.binary_level(Self::logical_and, &[(Token::PipePipe, BinOp::Or)])
    }

    fn logical_and(&mut self) -> Result<Expr, RaisedFault> {
        self.binary_level(Self::equality, &[(Token::AmpAmp, BinOp::And)])
    }

    fn equality(&mut self) -> Result<Expr, RaisedFault> {
        self.binary_level(
            Self::relational,
            &[(Token::EqEq, BinOp::Eq), (Token::BangEq, BinOp::Ne)],
        )
    }

    fn relational(&mut self) -> Result<Expr, RaisedFault> {
        self.binary_level(
            Self::additive,
            &[
                (Token::LtEq, BinOp::Le),
                (Token::GtEq, BinOp::Ge),
                (Token::Lt, BinOp::Lt),
                (Token::Gt, BinOp::Gt),
            ],
        )
    }

    fn additive(&mut self) -> Result<Expr, RaisedFault> {
        self.binary_level(
            Self::multiplicative,
            &[(Token::Plus, BinOp::Add), (Token::Minus, BinOp::Sub)],
        )
    }

    fn multiplicative(&mut self) -> Result<Expr, RaisedFault> {
        self.binary_level(
            Self::unary,
            &[
                (Token::Star, BinOp::Mul),
                (Token::Slash, BinOp::Div),
                (Token::Percent, BinOp::Rem),
            ],
        )
    }

    fn unary(&mut self) -> Result<Expr, RaisedFault> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Unary(UnOp::Neg, Box::new(self.unary()?)));
        }
        if self.eat(&Token::Bang) {
            return Ok(Expr::Unary(UnOp::Not, Box::new(self.unary()?)));
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, RaisedFault> {
        match self.advance() {
            Some(Token::Int(n)) => Ok(Expr::Int(n)),
            Some(Token::Float(f)) => Ok(Expr::Float(f)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::Ident(name)) if name == "true" => Ok(Expr::Bool(true)),
            Some(Token::Ident(name)) if name == "false" => Ok(Expr::Bool(false)),
            Some(Token::Ident(name)) => {
                if !self.eat(&Token::LParen) {
                    return Ok(Expr::Var(name));
                }
                let mut args = Vec::new();
                if !self.eat(&Token::RParen) {
                    loop {
                        args.push(self.expression()?);
                        if self.eat(&Token::RParen) {
                            break;
                        }
                        self.expect(&Token::Comma, "',' or ')' in argument list")?;
                    }
                }
                Ok(Expr::Call(name, args))
            }
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(syntax("expected expression")),
        }
    }
}

/// `Some(op)` for an assignment token: `Some(None)` is plain `=`.
fn assign_op(token: &Token) -> Option<Option<BinOp>> {
    match token {
        Token::Eq => Some(None),
        Token::PlusEq => Some(Some(BinOp::Add)),
        Token::MinusEq => Some(Some(BinOp::Sub)),
        Token::StarEq => Some(Some(BinOp::Mul)),
        Token::SlashEq => Some(Some(BinOp::Div)),
        _ => None,
    }
}
