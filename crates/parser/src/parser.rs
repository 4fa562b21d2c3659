//! Recursive-descent parser: token stream -> one of four `Stmt` variants.

use crate::ast::{BinaryOp, ColumnDef, ColumnType, Expr, Literal, SelectItem, Stmt};
use crate::lexer::{tokenize, Token, TokenKind};
use common::{DbError, DbResult};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Parse one SQL statement.
pub fn parse(sql: &str) -> DbResult<Stmt> {
    let tokens = tokenize(sql)?;
    Parser::new(tokens).parse_statement()
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn syntax_error(&self, expected: &str) -> DbError {
        let tok = self.current();
        DbError::Syntax(format!(
            "expected {expected}, found {:?} '{}' at position {}",
            tok.kind, tok.lexeme, tok.position
        ))
    }

    /// Consume the current token if its kind matches, returning its lexeme.
    fn eat(&mut self, kind: TokenKind) -> DbResult<String> {
        if self.current().kind != kind {
            return Err(self.syntax_error(&format!("{kind:?}")));
        }
        let lexeme = self.current().lexeme.clone();
        self.pos += 1;
        Ok(lexeme)
    }

    /// Consume the current token if it is a `Keyword` with the exact
    /// (already-uppercased) lexeme given.
    fn eat_keyword(&mut self, keyword: &str) -> DbResult<()> {
        let tok = self.current();
        if tok.kind != TokenKind::Keyword || tok.lexeme != keyword {
            return Err(self.syntax_error(&format!("keyword {keyword}")));
        }
        self.pos += 1;
        Ok(())
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        let tok = self.current();
        tok.kind == TokenKind::Keyword && tok.lexeme == keyword
    }

    fn eat_optional_semicolon(&mut self) {
        if self.current().kind == TokenKind::Semicolon {
            self.pos += 1;
        }
    }

    fn parse_statement(&mut self) -> DbResult<Stmt> {
        let tok = self.current();
        if tok.kind != TokenKind::Keyword {
            return Err(self.syntax_error("statement keyword"));
        }
        match tok.lexeme.as_str() {
            "SELECT" => self.parse_select(),
            "INSERT" => self.parse_insert(),
            "CREATE" => self.parse_create_table(),
            "DROP" => self.parse_drop_table(),
            other => Err(DbError::Syntax(format!("unsupported statement: {other}"))),
        }
    }

    fn parse_select(&mut self) -> DbResult<Stmt> {
        self.eat_keyword("SELECT")?;

        let mut columns = Vec::new();
        if self.current().kind == TokenKind::Operator && self.current().lexeme == "*" {
            self.pos += 1;
            columns.push(SelectItem::Wildcard);
        } else {
            loop {
                let name = self.eat(TokenKind::Identifier)?;
                columns.push(SelectItem::Column(name));
                if self.current().kind != TokenKind::Comma {
                    break;
                }
                self.pos += 1;
            }
        }

        self.eat_keyword("FROM")?;
        let table = self.eat(TokenKind::Identifier)?;

        let selection = if self.at_keyword("WHERE") {
            self.pos += 1;
            Some(self.parse_condition()?)
        } else {
            None
        };

        self.eat_optional_semicolon();
        Ok(Stmt::Select {
            columns,
            table,
            selection,
        })
    }

    fn parse_insert(&mut self) -> DbResult<Stmt> {
        self.eat_keyword("INSERT")?;
        self.eat_keyword("INTO")?;
        let table = self.eat(TokenKind::Identifier)?;
        self.eat_keyword("VALUES")?;
        self.eat(TokenKind::LParen)?;

        let mut values = Vec::new();
        loop {
            values.push(self.parse_value()?);
            if self.current().kind != TokenKind::Comma {
                break;
            }
            self.pos += 1;
        }

        self.eat(TokenKind::RParen)?;
        self.eat_optional_semicolon();
        Ok(Stmt::Insert { table, values })
    }

    fn parse_value(&mut self) -> DbResult<Expr> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Number => {
                self.pos += 1;
                Ok(Expr::Constant(parse_number_literal(&tok.lexeme)?))
            }
            TokenKind::String => {
                self.pos += 1;
                Ok(Expr::Constant(Literal::Text(tok.lexeme)))
            }
            TokenKind::Identifier => {
                self.pos += 1;
                Ok(Expr::Constant(identifier_literal(&tok.lexeme)))
            }
            _ => Err(self.syntax_error("a value (number, string, or identifier)")),
        }
    }

    fn parse_create_table(&mut self) -> DbResult<Stmt> {
        self.eat_keyword("CREATE")?;
        self.eat_keyword("TABLE")?;
        let table = self.eat(TokenKind::Identifier)?;
        self.eat(TokenKind::LParen)?;

        let mut columns = Vec::new();
        let mut primary_key = None;

        loop {
            let name = self.eat(TokenKind::Identifier)?;

            let type_tok = self.current().clone();
            if type_tok.kind != TokenKind::Keyword {
                return Err(self.syntax_error("column type (INT or VARCHAR)"));
            }
            let sql_type = match type_tok.lexeme.as_str() {
                "INT" => {
                    self.pos += 1;
                    ColumnType::Int
                }
                "VARCHAR" => {
                    self.pos += 1;
                    self.eat(TokenKind::LParen)?;
                    let len_tok = self.eat(TokenKind::Number)?;
                    let length = len_tok.parse::<u32>().map_err(|_| {
                        DbError::Syntax(format!("invalid VARCHAR length: {len_tok}"))
                    })?;
                    self.eat(TokenKind::RParen)?;
                    ColumnType::Varchar(length)
                }
                other => {
                    return Err(DbError::Syntax(format!(
                        "unsupported column type: {other}"
                    )))
                }
            };

            let mut is_primary_key = false;
            if self.at_keyword("PRIMARY") {
                self.pos += 1;
                self.eat_keyword("KEY")?;
                is_primary_key = true;
                primary_key = Some(name.clone());
            }

            columns.push(ColumnDef {
                name,
                sql_type,
                primary_key: is_primary_key,
            });

            if self.current().kind != TokenKind::Comma {
                break;
            }
            self.pos += 1;
        }

        self.eat(TokenKind::RParen)?;
        self.eat_optional_semicolon();
        Ok(Stmt::CreateTable {
            table,
            columns,
            primary_key,
        })
    }

    fn parse_drop_table(&mut self) -> DbResult<Stmt> {
        self.eat_keyword("DROP")?;
        self.eat_keyword("TABLE")?;
        let table = self.eat(TokenKind::Identifier)?;
        self.eat_optional_semicolon();
        Ok(Stmt::DropTable { table })
    }

    /// `condition := ColumnRef Operator (Number | String | ColumnRef)`.
    /// No `AND`/`OR` nesting in this core.
    fn parse_condition(&mut self) -> DbResult<Expr> {
        let column = self.eat(TokenKind::Identifier)?;
        let left = Expr::ColumnRef(column);

        let op_tok = self.eat(TokenKind::Operator)?;
        let op = parse_binary_op(&op_tok).map_err(|_| {
            DbError::Syntax(format!("unsupported comparison operator: {op_tok}"))
        })?;

        let tok = self.current().clone();
        let right = match tok.kind {
            TokenKind::Number => {
                self.pos += 1;
                Expr::Constant(parse_number_literal(&tok.lexeme)?)
            }
            TokenKind::String => {
                self.pos += 1;
                Expr::Constant(Literal::Text(tok.lexeme))
            }
            TokenKind::Identifier => {
                self.pos += 1;
                Expr::ColumnRef(tok.lexeme)
            }
            _ => return Err(self.syntax_error("a number, string, or column reference")),
        };

        Ok(Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }
}

fn parse_number_literal(lexeme: &str) -> DbResult<Literal> {
    if lexeme.contains('.') {
        lexeme
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| DbError::Syntax(format!("invalid number literal: {lexeme}")))
    } else {
        lexeme
            .parse::<i32>()
            .map(Literal::Int)
            .map_err(|_| DbError::Syntax(format!("invalid integer literal: {lexeme}")))
    }
}

/// `NULL`/`TRUE`/`FALSE` (by uppercased spelling) become their literal
/// constant; every other identifier is passed through as bare text — a
/// looseness inherited from the source grammar (see module docs).
fn identifier_literal(lexeme: &str) -> Literal {
    match lexeme.to_ascii_uppercase().as_str() {
        "NULL" => Literal::Null,
        "TRUE" => Literal::Bool(true),
        "FALSE" => Literal::Bool(false),
        _ => Literal::Text(lexeme.to_string()),
    }
}

fn parse_binary_op(lexeme: &str) -> Result<BinaryOp, ()> {
    match lexeme {
        "=" => Ok(BinaryOp::Eq),
        "<>" | "!=" => Ok(BinaryOp::Ne),
        "<" => Ok(BinaryOp::Lt),
        "<=" => Ok(BinaryOp::Le),
        ">" => Ok(BinaryOp::Gt),
        ">=" => Ok(BinaryOp::Ge),
        _ => Err(()),
    }
}
