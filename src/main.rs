use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use kaleido::compiler::CompilationPipeline;
use kaleido::lexer;

#[derive(Parser)]
#[command(name = "kaleido")]
#[command(author, version, about = "The Kaleido language JIT compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a Kaleido source file and print the results
    Run {
        /// The source file to evaluate
        input: PathBuf,

        /// Dump tokens to stdout
        #[arg(long)]
        dump_tokens: bool,

        /// Dump the AST to stdout
        #[arg(long)]
        dump_ast: bool,
    },

    /// Compile a Kaleido source file and print the LLVM IR
    Emit {
        /// The source file to compile
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Skip optimization passes to inspect the raw IR
        #[arg(long)]
        debug: bool,
    },

    /// Start an interactive evaluation loop
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = inkwell::context::Context::create();

    match cli.command {
        Commands::Run {
            input,
            dump_tokens,
            dump_ast,
        } => run(&context, input, dump_tokens, dump_ast, cli.verbose),
        Commands::Emit {
            input,
            output,
            debug,
        } => emit(&context, input, output, debug, cli.verbose),
        Commands::Repl => repl(&context, cli.verbose),
    }
}

/// ソースファイルを評価して結果を出力する
fn run(
    context: &inkwell::context::Context,
    input: PathBuf,
    dump_tokens: bool,
    dump_ast: bool,
    verbose: bool,
) -> Result<()> {
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let name = input.display().to_string();

    if dump_tokens {
        let tokens = lexer::tokenize(&source)?;
        println!("{}", lexer::format_tokens(&tokens));
    }

    let mut pipeline = CompilationPipeline::new(context, verbose)?;

    if let Some(items) = pipeline.parse_source(&name, &source) {
        if dump_ast {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }

        for value in pipeline.evaluate_items(&items) {
            println!("{}", value);
        }
    }

    pipeline.report_errors()?;
    if pipeline.state().has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

/// ソースファイルをコンパイルしてLLVM IRを出力する
fn emit(
    context: &inkwell::context::Context,
    input: PathBuf,
    output: Option<PathBuf>,
    debug: bool,
    verbose: bool,
) -> Result<()> {
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let name = input.display().to_string();

    let mut pipeline = CompilationPipeline::new(context, verbose)?;
    let ir = pipeline.emit_assembly(&name, &source, debug);
    pipeline.report_errors()?;

    match ir {
        Some(ir) => match output {
            Some(path) => fs::write(&path, ir)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => print!("{}", ir),
        },
        None => std::process::exit(1),
    }

    Ok(())
}

/// 対話的な評価ループ
///
/// JITの状態とユーザー定義演算子は行をまたいで保持されるので、
/// 前の行で定義した関数や演算子をそのまま使える。
fn repl(context: &inkwell::context::Context, verbose: bool) -> Result<()> {
    println!("{}", "Kaleido REPL".bold());
    println!("式、'def'による関数定義、'extern'宣言を入力してください。Ctrl-Dで終了します。");

    let mut pipeline = CompilationPipeline::new(context, verbose)?;
    let stdin = io::stdin();
    let mut line_number = 0usize;

    loop {
        print!("{}", "ready> ".cyan());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        line_number += 1;
        let name = format!("repl:{}", line_number);
        for value in pipeline.evaluate(&name, line) {
            println!("{}", format!("=> {}", value).green());
        }

        pipeline.report_errors()?;
        pipeline.clear_errors();
    }

    Ok(())
}
