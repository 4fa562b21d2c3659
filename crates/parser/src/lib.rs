//! SQL text -> AST: lexing and recursive-descent parsing.
//!
//! `tokenize` exposes the token stream directly (useful for the lexer's own
//! unit tests); `parse` runs the full `Lexer -> Parser` pipeline for one
//! statement and returns its `Stmt`.

pub mod ast;
mod lexer;
mod parser;

pub use ast::{BinaryOp, ColumnDef, ColumnType, Expr, Literal, SelectItem, Stmt};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::parse;
