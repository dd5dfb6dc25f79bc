use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};

use wpstruct_core::json::JsonOpts;
use wpstruct_core::mapper::PopulateContext;
use wpstruct_core::{FlatFileParser, ParseOpts, Parsed, TypeRegistry};

#[derive(Parser, Debug)]
#[command(
    name = "wpstruct",
    about = "Parse blog post drafts into API structs and inspect record types",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a draft and print the resulting struct as JSON
    Parse(ParseArgs),
    /// Parse a draft into a record type and print the record as JSON
    Load(LoadArgs),
    /// Print a blank draft for a record type
    Template(TypeArgs),
    /// List registered record types
    Types,
    /// Parse every draft below a directory and report the outcome per file
    Scan(ScanArgs),
}

#[derive(ClapArgs, Debug)]
struct OutputArgs {
    /// Fail on any skipped key or element problem
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Single-line JSON output
    #[arg(long, default_value_t = false)]
    compact: bool,
    /// chrono format for dates in the output
    #[arg(long, default_value = wpstruct_core::value::ISO_DATE_FORMAT)]
    date_format: String,
}

#[derive(ClapArgs, Debug)]
struct ParseArgs {
    /// Draft file to parse
    path: PathBuf,
    #[command(flatten)]
    out: OutputArgs,
}

#[derive(ClapArgs, Debug)]
struct LoadArgs {
    /// Draft file to parse
    path: PathBuf,
    /// Record type, e.g. Post or Comment
    #[arg(long = "type", value_name = "RECORD")]
    record_type: String,
    #[command(flatten)]
    out: OutputArgs,
}

#[derive(ClapArgs, Debug)]
struct TypeArgs {
    /// Record type, e.g. Post or Comment
    #[arg(long = "type", value_name = "RECORD")]
    record_type: String,
}

#[derive(ClapArgs, Debug)]
struct ScanArgs {
    /// Directory holding .txt / .draft files
    dir: PathBuf,
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Parse(a) => cmd_parse(a),
        Cmd::Load(a) => cmd_load(a),
        Cmd::Template(a) => cmd_template(a),
        Cmd::Types => cmd_types(),
        Cmd::Scan(a) => cmd_scan(a),
    }
}

fn json_opts(args: &OutputArgs) -> JsonOpts {
    JsonOpts {
        pretty: !args.compact,
        date_format: args.date_format.clone(),
    }
}

fn parse_or_exit(path: &Path, strict: bool) -> Parsed {
    let parser = FlatFileParser::new().with_opts(ParseOpts { strict });
    let parsed = parser.parse_file(path).unwrap_or_else(|e| {
        eprintln!("error: {}: {}", path.display(), e);
        if let wpstruct_core::ParseError::Rejected { diagnostics } = &e {
            for d in diagnostics {
                eprintln!("  {}", d);
            }
        }
        std::process::exit(2);
    });
    for d in &parsed.diagnostics {
        eprintln!("warning: {}", d);
    }
    parsed
}

fn print_struct(s: &wpstruct_core::Struct, opts: &JsonOpts) {
    match wpstruct_core::json::dump_struct_json(s, opts) {
        Ok(js) => println!("{}", js),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(5);
        }
    }
}

fn cmd_parse(args: ParseArgs) {
    let parsed = parse_or_exit(&args.path, args.out.strict);
    print_struct(&parsed.fields, &json_opts(&args.out));
}

fn cmd_load(args: LoadArgs) {
    let factory = TypeRegistry::global()
        .get(&args.record_type)
        .unwrap_or_else(|| {
            eprintln!("unknown record type: {}", args.record_type);
            std::process::exit(3);
        });
    let parsed = parse_or_exit(&args.path, args.out.strict);
    let mut ctx = PopulateContext::new();
    let record = (factory.normalize)(&parsed.fields, &mut ctx);
    let errors = ctx.into_errors();
    for e in &errors {
        eprintln!("warning: {}", e);
    }
    if args.out.strict && !errors.is_empty() {
        std::process::exit(4);
    }
    print_struct(&record, &json_opts(&args.out));
}

fn cmd_template(args: TypeArgs) {
    match TypeRegistry::global().get(&args.record_type) {
        Some(f) => print!(
            "{}",
            wpstruct_core::template_from_fields(f.type_name, f.fields)
        ),
        None => {
            eprintln!("unknown record type: {}", args.record_type);
            std::process::exit(3);
        }
    }
}

fn cmd_types() {
    let reg = TypeRegistry::global();
    for name in reg.type_names() {
        let fields = reg.get(name).map(|f| f.fields.len()).unwrap_or_default();
        println!("{}\t({} fields)", name, fields);
    }
}

fn cmd_scan(args: ScanArgs) {
    if !args.dir.is_dir() {
        eprintln!("not a directory: {}", args.dir.display());
        std::process::exit(2);
    }
    let parser = FlatFileParser::new().with_opts(ParseOpts {
        strict: args.strict,
    });
    let mut failed = 0usize;
    for path in wpstruct_core::find_drafts(&args.dir) {
        match parser.parse_file(&path) {
            Ok(parsed) => println!(
                "{}\t{} key(s)\t{} warning(s)",
                path.display(),
                parsed.fields.len(),
                parsed.diagnostics.len()
            ),
            Err(e) => {
                failed += 1;
                println!("{}\terror: {}", path.display(), e);
            }
        }
    }
    if failed > 0 {
        std::process::exit(1);
    }
}
