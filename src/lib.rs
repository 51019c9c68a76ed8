mod shared;
mod frontend;
mod backend;

use std::fs::File;
use std::io;
use std::io::{BufWriter, Read, Write};
use std::rc::Rc;

use clap::{App, Arg};
use derive_more::Display;

use crate::backend::EmitFormat;
use crate::frontend::ast::AstNode;
use crate::frontend::elaborator::Elaborator;
use crate::frontend::lexer::{Lexer, Location};
use crate::frontend::parser::Parser;
use crate::shared::diagnostics::Reporter;
use crate::shared::error;

#[derive(Debug, Display)]
pub enum ErrorKind {
    #[display(fmt = "failed to open file {}", _0)]
    FileOpen(String),
    #[display(fmt = "failed to create output file {}", _0)]
    FileCreate(String),
    #[display(fmt = "failed to compile {}", _0)]
    Compile(String),
    #[display(fmt = "{}: {} error(s)", _0, _1)]
    CompileFailed(String, usize),
}

pub type Error = error::Error<ErrorKind>;

pub fn run(args: Vec<String>) -> Result<(), Error> {
    let matches = App::new("RTLCompiler")
        .version("0.1")
        .arg(Arg::with_name("dump_ast")
            .short("d")
            .long("dump-ast")
            .help("Pretty-print the parsed tree instead of compiling"))
        .arg(Arg::with_name("emit")
            .long("emit")
            .value_name("FORMAT")
            .help("Select the output format")
            .possible_values(&["verilog", "json"])
            .default_value("verilog"))
        .arg(Arg::with_name("output_file")
            .short("o")
            .value_name("FILE")
            .help("Write output to FILE"))
        .arg(Arg::with_name("input_file")
            .value_name("FILE")
            .help("The input file, or - for standard input")
            .default_value("-"))
        .get_matches_from(args);

    let dump_ast = matches.is_present("dump_ast");

    let format = match matches.value_of("emit").unwrap() {
        "json" => EmitFormat::Json,
        _ => EmitFormat::Verilog,
    };

    let input_file = matches.value_of("input_file").unwrap();
    let output_file = matches.value_of("output_file");

    let stdin;
    let (file_name, source): (&str, Box<dyn Read + '_>) = if input_file == "-" {
        stdin = io::stdin();
        ("<stdin>", Box::new(stdin.lock()))
    } else {
        let f = File::open(input_file)
            .map_err(|err| Error::with_source(ErrorKind::FileOpen(input_file.to_string()), err))?;
        (input_file, Box::new(f))
    };

    let mut output: Box<dyn Write> = match output_file {
        Some(path) => {
            let f = File::create(path)
                .map_err(|err| Error::with_source(ErrorKind::FileCreate(path.to_string()), err))?;
            Box::new(BufWriter::new(f))
        },
        None => Box::new(io::stdout()),
    };

    let stderr = io::stderr();
    let mut reporter = Reporter::new(stderr.lock());

    compile(file_name, source, format, dump_ast, &mut output, &mut reporter)?;

    output.flush()
        .map_err(|err| Error::with_source(ErrorKind::Compile(file_name.to_string()), err))?;

    // Everything that could be elaborated has been emitted at this point;
    // a nonzero error count still fails the run
    if reporter.failed() {
        return Err(ErrorKind::CompileFailed(file_name.to_string(), reporter.error_count()).into());
    }

    Ok(())
}

/// Run the scan-parse-elaborate-emit pipeline over one source unit.
///
/// The top-level statements are wrapped into the outermost module
/// expression before elaboration.
fn compile<R, W, E>(file_name: &str, source: R, format: EmitFormat, dump_ast: bool,
                    output: &mut W, reporter: &mut Reporter<E>) -> Result<(), Error>
    where R: Read, W: Write, E: Write
{
    let lexer = Lexer::new(file_name, source);

    let mut parser = Parser::new(lexer)
        .map_err(|err| Error::with_source(ErrorKind::Compile(file_name.to_string()), err))?;

    let statements = parser.parse()
        .map_err(|err| Error::with_source(ErrorKind::Compile(file_name.to_string()), err))?;

    let root = AstNode::module(Location::new(Rc::from(file_name), 1), statements);

    if dump_ast {
        writeln!(output, "{}", root.pretty_print(false, 0, 0))
            .map_err(|err| Error::with_source(ErrorKind::Compile(file_name.to_string()), err))?;

        return Ok(());
    }

    let (scopes, elaboration) = Elaborator::new(reporter).run(&root)
        .map_err(|err| Error::with_source(ErrorKind::Compile(file_name.to_string()), err))?;

    let result = match format {
        EmitFormat::Verilog => backend::verilog::emit(&elaboration, &scopes, output),
        EmitFormat::Json => backend::json::emit(&elaboration, &scopes, output),
    };

    result.map_err(|err| Error::with_source(ErrorKind::Compile(file_name.to_string()), err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    fn compile_to_string(source: &str, format: EmitFormat, dump_ast: bool) -> (String, String) {
        let mut output = Vec::new();
        let mut sink = Vec::new();

        {
            let mut reporter = Reporter::new(&mut sink);
            compile("test.rtl", Cursor::new(source), format, dump_ast, &mut output, &mut reporter).unwrap();
        }

        (String::from_utf8(output).unwrap(), String::from_utf8(sink).unwrap())
    }

    #[test]
    fn full_pipeline() {
        let (output, diagnostics) =
            compile_to_string("top: int; top = module { a: int; b: int; a = b; };", EmitFormat::Verilog, false);

        assert!(diagnostics.is_empty());
        assert!(output.starts_with("module top(\na\nb\n);\n\tassign a = b;\nendmodule\n"));
    }

    #[test]
    fn errors_do_not_stop_emission() {
        let (output, diagnostics) =
            compile_to_string("x: int;\nx = y;\n", EmitFormat::Verilog, false);

        assert_eq!(diagnostics, "test.rtl:2 y undefined\n");
        assert!(output.contains("module __top("));
        assert!(output.contains("\tassign x = y;\n"));
    }

    #[test]
    fn dump_ast_pretty_prints() {
        let (output, _) = compile_to_string("a: int;\na = 1;\n", EmitFormat::Verilog, true);

        assert_eq!(output, "module {\n\ta : int;\n\ta = 1;\n}\n");
    }

    #[test]
    fn json_format_selected() {
        let (output, _) = compile_to_string("top: int; top = module { };", EmitFormat::Json, false);

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["modules"][0]["name"], "top");
    }
}
