//! srparse CLI tool - parse a sentence with the shift-reduce parser
//!
//! Usage: srparse [OPTIONS] <TEXT>
//!
//! Without file options the bundled grammar, lexicon and reduction table
//! under `grammars/` are used.

use clap::Parser;
use srparse::{
    Grammar, Lexicon, ParserOptions, PreTagged, ReductionMap, SRParser, TaggedToken, Tagger,
    DEFAULT_START,
};
use std::fmt::Display;
use std::path::PathBuf;
use std::process;

const BUNDLED_GRAMMAR: &str = include_str!("../../grammars/grammar.json");
const BUNDLED_LEXICON: &str = include_str!("../../grammars/lexicon.json");
const BUNDLED_REDUCTION: &str = include_str!("../../grammars/reduction.json");

/// Parse a sentence against a context-free grammar and print its tree.
#[derive(Parser)]
#[command(name = "srparse", version, about = "Shift-reduce parser for tagged sentences")]
struct Cli {
    /// Sentence to parse
    text: String,

    /// Grammar JSON file (nonterminal -> list of productions)
    #[arg(long, short)]
    grammar: Option<PathBuf>,

    /// Reduction JSON file (grammar terminal -> fine-grained tags)
    #[arg(long, short)]
    reduction: Option<PathBuf>,

    /// Lexicon JSON file (word -> tag)
    #[arg(long, short)]
    lexicon: Option<PathBuf>,

    /// Start symbol of the grammar
    #[arg(long, default_value = DEFAULT_START)]
    start: String,

    /// TEXT is already tagged as word/TAG pairs
    #[arg(long)]
    pretagged: bool,

    /// Print the outcome and action trace as JSON
    #[arg(long)]
    json: bool,

    /// Print the grammar report and every parser action to stderr
    #[arg(long, short)]
    verbose: bool,

    /// Deepest chain of derivations one expansion may build
    #[arg(long, default_value_t = ParserOptions::default().max_expansion_depth)]
    max_depth: usize,

    /// Most shift/reduce steps one parse may take
    #[arg(long, default_value_t = ParserOptions::default().max_steps)]
    max_steps: usize,
}

fn main() {
    let cli = Cli::parse();

    let grammar = or_exit(
        match &cli.grammar {
            Some(path) => Grammar::load(path, &cli.start),
            None => Grammar::from_json_str(BUNDLED_GRAMMAR, &cli.start),
        },
        "Grammar error",
    );
    let reduction = or_exit(
        match &cli.reduction {
            Some(path) => ReductionMap::load(path),
            None => ReductionMap::from_json_str(BUNDLED_REDUCTION),
        },
        "Reduction error",
    );

    if cli.verbose {
        eprintln!(
            "Grammar: {} rules, {} terminals, start {}",
            grammar.rule_count(),
            grammar.terminals().count(),
            grammar.start_symbol()
        );
        eprintln!("Reduction: {} tags", reduction.len());
        eprintln!("{}", grammar.analysis().report());
    }

    let tokens = tag(&cli);
    if cli.verbose {
        let tagged: Vec<String> = tokens.iter().map(|t| format!("{}/{}", t.text, t.tag)).collect();
        eprintln!("Tagged: {}", tagged.join(" "));
    }

    let parser = SRParser::new(grammar)
        .with_reduction(reduction)
        .with_options(ParserOptions {
            max_expansion_depth: cli.max_depth,
            max_steps: cli.max_steps,
        });

    let traced = or_exit(parser.parse_traced(&tokens), "Parse aborted");

    if cli.verbose {
        eprintln!("Actions:");
        for (step, action) in traced.trace.iter().enumerate() {
            eprintln!("  {:>3}. {}", step + 1, action);
        }
    }

    if cli.json {
        println!("{}", or_exit(serde_json::to_string_pretty(&traced), "JSON error"));
    } else {
        println!("{}:", cli.text);
        print!("{}", traced.outcome.pretty_print());
    }

    if let Some(partial) = traced.outcome.partial() {
        if !cli.json {
            eprint!("{}", partial.diagnostics());
        }
        process::exit(1);
    }
}

fn tag(cli: &Cli) -> Vec<TaggedToken> {
    let tagged = if cli.pretagged {
        PreTagged.tag(&cli.text)
    } else {
        let lexicon = or_exit(
            match &cli.lexicon {
                Some(path) => Lexicon::load(path),
                None => Lexicon::from_json_str(BUNDLED_LEXICON),
            },
            "Lexicon error",
        );
        lexicon.tag(&cli.text)
    };
    or_exit(tagged, "Tagging error")
}

fn or_exit<T, E: Display>(result: Result<T, E>, context: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("{}: {}", context, e);
        process::exit(1);
    })
}
