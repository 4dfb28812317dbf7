use std::env;

use expr_engine::{
    ast::printer::print_tree,
    display_error,
    lexer::lexer::LexerConfig,
    parse_expression, ExpressionKind,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: expr_engine <arith|bool|text> \"<expression>\"");
        std::process::exit(2);
    }

    let kind = match args[1].as_str() {
        "arith" => ExpressionKind::Arithmetic,
        "bool" => ExpressionKind::Boolean,
        "text" => ExpressionKind::Text,
        "any" => ExpressionKind::Any,
        other => {
            eprintln!("unknown expression kind: {}", other);
            std::process::exit(2);
        }
    };

    let source = &args[2];

    match parse_expression(kind, source, LexerConfig::default()) {
        Ok(tree) => {
            let root = tree.root().unwrap();
            print!("{}", print_tree(&tree, root));
        }
        Err(error) => {
            print!("{}", display_error(&error, source));
            std::process::exit(1);
        }
    }
}
