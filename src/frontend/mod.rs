
pub mod ast;
pub mod char_reader;
pub mod elaborator;
pub mod lexer;
pub mod parser;
pub mod symbol;
pub mod symbol_table;
