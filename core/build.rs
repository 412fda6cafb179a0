use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();

    let path = Path::new(&out_dir).join("ignore_lists.rs");
    let mut file = BufWriter::new(fs::File::create(&path).unwrap());

    write_name_set(&mut file, "IGNORED_COMBATANT_NAMES", "data/ignored_combatants.txt");
    write_name_set(&mut file, "IGNORED_ABILITY_NAMES", "data/ignored_abilities.txt");

    println!("cargo:rerun-if-changed=data/ignored_combatants.txt");
    println!("cargo:rerun-if-changed=data/ignored_abilities.txt");
}

/// Emit a `phf::Set` of lowercased names, one per non-comment line of `source`.
fn write_name_set(file: &mut impl Write, const_name: &str, source: &str) {
    let text = fs::read_to_string(source).unwrap_or_else(|_| panic!("failed to read {source}"));

    let mut names: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect();
    names.sort_unstable();
    names.dedup();

    let mut builder = phf_codegen::Set::new();
    for name in &names {
        builder.entry(name.as_str());
    }

    writeln!(file, "pub static {}: phf::Set<&'static str> = {};", const_name, builder.build())
        .unwrap();
}
