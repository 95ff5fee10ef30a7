//! Compile message schemas into record-layout reports.
//!
//! Usage:
//!   layoutc --schema-dir DIR --list
//!   layoutc --schema-dir DIR --message NAME [--group groupNN | --all-groups]
//!   layoutc --schema-dir DIR --message NAME --list-groups
//!
//! Options:
//!   --schema-dir, -d DIR   Directory of *.json message schemas
//!   --message, -m NAME     Message to compile (exact or prefix match)
//!   --group, -g NAME       Compile for one protocol group (group14..group31)
//!   --all-groups           Compile the base layout plus every group with overrides
//!   --list                 List available messages
//!   --list-groups          List groups with overrides for the selected message
//!   --scaffold             Also print the derived test scaffold

use anyhow::{bail, Context};
use std::path::PathBuf;
use wiregen::registry::SchemaRegistry;
use wiregen::report;
use wiregen::schema::MessageSchema;
use wiregen::testgen::TestScaffold;
use wiregen::version::ProtocolGroup;
use wiregen::{packet, CompiledRecord};

struct Options {
    schema_dir: PathBuf,
    message: Option<String>,
    group: Option<ProtocolGroup>,
    all_groups: bool,
    list: bool,
    list_groups: bool,
    scaffold: bool,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut args = std::env::args().skip(1);
    let mut schema_dir = None;
    let mut message = None;
    let mut group = None;
    let mut all_groups = false;
    let mut list = false;
    let mut list_groups = false;
    let mut scaffold = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--schema-dir" | "-d" => {
                let dir = args.next().context("--schema-dir needs a directory")?;
                schema_dir = Some(PathBuf::from(dir));
            }
            "--message" | "-m" => {
                message = Some(args.next().context("--message needs a name")?);
            }
            "--group" | "-g" => {
                let name = args.next().context("--group needs a group name")?;
                group = Some(
                    ProtocolGroup::from_name(&name)
                        .with_context(|| format!("unknown protocol group `{}`", name))?,
                );
            }
            "--all-groups" => all_groups = true,
            "--list" => list = true,
            "--list-groups" => list_groups = true,
            "--scaffold" => scaffold = true,
            other => bail!("unknown argument `{}` (see the header of this binary for usage)", other),
        }
    }

    Ok(Options {
        schema_dir: schema_dir.context("--schema-dir is required")?,
        message,
        group,
        all_groups,
        list,
        list_groups,
        scaffold,
    })
}

fn print_compiled(record: CompiledRecord, scaffold: bool) {
    println!("{}", report::record_report(&record));
    if scaffold {
        let derived = TestScaffold::derive(record);
        println!("{}", report::scaffold_report(&derived));
    }
    println!();
}

fn compile_and_print(
    schema: &MessageSchema,
    group: Option<ProtocolGroup>,
    scaffold: bool,
) -> anyhow::Result<()> {
    let record = packet::compile(schema, group)
        .with_context(|| format!("compiling {}", schema.name))?;
    print_compiled(record, scaffold);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = parse_args()?;
    let registry = SchemaRegistry::load_dir(&opts.schema_dir)
        .with_context(|| format!("loading schemas from {}", opts.schema_dir.display()))?;

    if opts.list {
        println!("Available messages:");
        for name in registry.names() {
            println!("  {}", name);
        }
        return Ok(());
    }

    let Some(query) = &opts.message else {
        bail!("specify --message NAME or --list");
    };
    let matches = registry.find(query);
    if matches.is_empty() {
        // Not found is reported, not fatal: listing what exists helps more
        // than a failing exit in batch scripts.
        eprintln!("no schema found for {}", query);
        return Ok(());
    }

    for schema in matches {
        if opts.list_groups {
            let groups = schema.override_groups();
            if groups.is_empty() {
                println!("{}: no version-specific overrides", schema.name);
            } else {
                println!("{}: overrides for", schema.name);
                for g in groups {
                    println!("  {}", g);
                }
            }
            continue;
        }
        if opts.all_groups {
            compile_and_print(schema, None, opts.scaffold)?;
            for g in schema.override_groups() {
                compile_and_print(schema, Some(g), opts.scaffold)?;
            }
        } else {
            compile_and_print(schema, opts.group, opts.scaffold)?;
        }
    }
    Ok(())
}
