//! Form Builder CLI
//!
//! Usage:
//!   form-builder [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Builder configuration (TOML format)
//!   -o, --outline        Print a text outline instead of JSON
//!   -s, --submission     Print the last preview submission as JSON
//!   -v, --verbose        Log more (repeat for more detail)
//!   -g, --grammar        Show script language reference
//!   -e, --examples       Show annotated examples
//!   -h, --help           Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use form_builder::catalog::FieldGroup;
use form_builder::preview::{outline, JsonSink, SubmissionSink};
use form_builder::{replay_with_config, BuilderConfig, FieldType};

#[derive(Parser)]
#[command(name = "form-builder")]
#[command(about = "Replay form builder scripts and preview the result")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Builder configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a text outline of the form instead of JSON
    #[arg(short, long)]
    outline: bool,

    /// Print the last preview submission instead of the form
    #[arg(short, long)]
    submission: bool,

    /// Log more detail to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Show script language reference
    #[arg(short, long)]
    grammar: bool,

    /// Show annotated examples
    #[arg(short, long)]
    examples: bool,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Handle documentation flags first
    if cli.grammar {
        print_grammar();
        return;
    }

    if cli.examples {
        print_examples();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    init_logging(cli.verbose);

    // Load configuration
    let config = match &cli.config {
        Some(path) => match BuilderConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => BuilderConfig::default(),
    };

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let outcome = match replay_with_config(&source, config) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    for run in &outcome.previews {
        for message in &run.messages {
            eprintln!("preview: {}", message);
        }
    }

    if cli.submission {
        let Some(submission) = outcome.last_submission() else {
            eprintln!("Error: no preview block submitted the form");
            std::process::exit(1);
        };
        let mut sink = JsonSink::new(io::stdout().lock());
        if let Err(e) = sink.accept(submission) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if cli.outline {
        print!("{}", outline(&outcome.form));
        return;
    }

    match serde_json::to_string_pretty(&outcome.form) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Form Builder - replay builder scripts and preview the result

USAGE:
    form-builder [OPTIONS] [FILE]
    echo '<script>' | form-builder

OPTIONS:
    -g, --grammar      Show script language reference
    -e, --examples     Show annotated examples
    -c, --config       Builder configuration (TOML file)
    -o, --outline      Print a text outline instead of JSON
    -s, --submission   Print the last preview submission
    -v, --verbose      Log more detail to stderr
    -h, --help         Print help

QUICK START:
    echo 'add field text to page-1' | form-builder --outline

Run --grammar for syntax reference or --examples for more patterns."#
    );
}

fn print_grammar() {
    println!(
        r#"FORM BUILDER SCRIPT LANGUAGE
============================

FORM
----
title "text"                          Set the form title
description "text"                    Set the form description

PAGES
-----
add page                              Append an empty page
update page <page> [title: "..", description: ".."]
duplicate page <page>                 Copy a page right after itself
move page <page> up|down              Swap with the neighbouring page
delete page <page>                    Remove a page (never the last one)

FIELDS
------
add field <type> to <page>            Append a field with catalog defaults
update field <field> on <page> [modifiers]
delete field <field> on <page>

DRAGGING
--------
drag <type> from sidebar:<i> to <page>:<i>     Create a field
drag <field> from <page>:<i> to <page>:<i>     Move a field
drag <field> from <page>:<i> to nowhere        Dropped outside (ignored)

FIELD MODIFIERS
---------------
type: <type>              Change the field type
label: "text"             Question label
required: true|false      Gate navigation on an answer
description: "text"       Help text
placeholder: "text"       Input hint
options: ("A", "B")       Choices (select, radio, checkbox only)
min_length: N | none      Text length bounds
max_length: N | none
min: N | none             Numeric bounds (number only)
max: N | none
pattern: "regex" | none   Input pattern (text-like types)
error_message: "text" | none

PREVIEW
-------
preview {{
    set <field> "text"        Enter text
    set <field> ("A", "B")    Select options
    set <field> 4             Enter a number or rating
    toggle <field> "A" on|off Check or uncheck one option
    next                      Go to the next page (needs required answers)
    prev                      Go back one page
    submit                    Submit from the last page
}}

Ids are page-N and field-N, numbered in creation order.
Comments: // line and /* block */"#
    );

    println!("\nFIELD TYPES\n-----------");
    for group in [FieldGroup::Basic, FieldGroup::Special, FieldGroup::Prefilled] {
        println!("{:?}:", group);
        for field_type in FieldType::ALL
            .iter()
            .filter(|t| t.capabilities().group == group)
        {
            println!("    {:<12} {}", field_type.tag(), field_type.display_name());
        }
    }
}

fn print_examples() {
    println!(
        r#"FORM BUILDER EXAMPLES
=====================

EXAMPLE 1: A contact page
-------------------------
title "Contact us"
add field text to page-1
add field email to page-1
update field field-1 on page-1 [label: "Name", required: true]

Creates one page with a required name and an email address.

EXAMPLE 2: Choices
------------------
add field checkbox to page-1
update field field-1 on page-1 [label: "Topics", options: ("Billing", "Support")]
update field field-1 on page-1 [type: radio]

Changing to another choice type keeps the options.

EXAMPLE 3: Two pages and dragging
---------------------------------
add page
drag rating from sidebar:6 to page-2:0
drag field-1 from page-2:0 to page-1:0
move page page-2 up

The rating field is created on page 2, then moved to page 1.

EXAMPLE 4: Preview
------------------
add field text to page-1
update field field-1 on page-1 [label: "Name", required: true]
add page
add field full_name to page-2
preview {{
    next
    set field-1 "Jean"
    next
    submit
}}

The first `next` is refused until the name is filled in. Run with
--submission to print what was submitted."#
    );
}
