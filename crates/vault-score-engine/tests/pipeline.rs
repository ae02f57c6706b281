use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use vault_score_engine::{
    Assembler, FixedIndex, ParseOptions, SeededRandom, parse_file, parse_str,
};

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn plain_links_render_as_embeds_in_source_order() {
    // A single section with N plain links has N alternatives; each one
    // renders as an embed on its own line
    let names = ["Graphs", "!Trees", "Heaps", "Tries"];
    let source: String = names.iter().map(|n| format!("[[{n}]]\n")).collect();
    let doc = parse_str(&source, &ParseOptions::default()).unwrap();

    let rendered: Vec<String> = (0..names.len())
        .map(|i| doc.root.render(&mut FixedIndex(i)))
        .collect();

    assert_eq!(
        rendered,
        vec![
            "![[Graphs]]\n\n",
            // the `!` is the mark directive, so it gains a mark line
            "\\mark \\default\n![[Trees]]\n\n",
            "![[Heaps]]\n\n",
            "![[Tries]]\n\n",
        ]
    );
}

#[test]
fn nested_inclusion_matches_direct_parse() {
    let vault = tempfile::tempdir().unwrap();
    let inner = write(
        vault.path(),
        "Musik/Drums.md",
        "# Intro\n[[Kick]]\n[[Snare]]*\n# Fill\n![[Crash]]||\n",
    );
    let outer = write(vault.path(), "Song.md", "[[####Musik/Drums|drums]]\n");
    let options = ParseOptions::new(vault.path());

    let direct = parse_file(&inner, &options).unwrap();
    let included = parse_file(&outer, &options).unwrap();

    for index in 0..3 {
        let direct_text = direct.root.render(&mut FixedIndex(index));
        let included_text = included.root.render(&mut FixedIndex(index));
        // Only the line and document terminators of the outer note differ
        assert_eq!(included_text, format!("{direct_text}\n\n"));
        assert_eq!(included_text.trim_end(), direct_text.trim_end());
    }
}

#[test]
fn missing_raw_inclusion_does_not_abort_siblings() {
    let vault = tempfile::tempdir().unwrap();
    let note = write(
        vault.path(),
        "Index.md",
        "# Notes\n[[+Gone]]\n# More\n[[Kept]]\n",
    );
    let options = ParseOptions::new(vault.path());

    let doc = parse_file(&note, &options).unwrap();
    let out = doc.root.render(&mut FixedIndex(0));

    assert!(out.starts_with("ERROR_READING_FILE: "));
    assert!(out.ends_with("![[Kept]]\n\n"));
}

#[test]
fn note_to_assembled_score() {
    // Given a song that pulls LilyPond fragments from two notes
    let vault = tempfile::tempdir().unwrap();
    write(
        vault.path(),
        "Musik/Verse.md",
        "```lily\nvoiceMelody = { c'4 d' e' f' }\nvoiceBass = { c,2 g, }\n```",
    );
    write(
        vault.path(),
        "Musik/Chorus.md",
        "```lily\nvoiceMelody = { g'1 }\n```",
    );
    let song = write(
        vault.path(),
        "Musik/Song.md",
        "# Verse\n[[+Musik/Verse]]\n# Chorus\n[[+Musik/Chorus]]\n",
    );
    let template = write(
        vault.path(),
        "Musik/Template.md",
        "% ###DATEGOESHERE###\n####MUSICGOESHERE####",
    );
    let output = vault.path().join("lily");

    // When parsing, rendering and assembling
    let doc = parse_file(&song, &ParseOptions::new(vault.path())).unwrap();
    let rendered = doc.root.render(&mut FixedIndex(0));
    let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let score = Assembler::new(&template)
        .with_output_path(&output)
        .assemble_on(&rendered, date)
        .unwrap();

    // Then each voice is defined once with its fragments in order
    assert_eq!(
        score,
        "% 2026-01-15\n\
         voiceMelody = {\n  c'4 d' e' f'\n  g'1\n}\n\n\
         voiceBass = {\n  c,2 g,\n}\n\n"
    );
    assert_eq!(fs::read_to_string(&output).unwrap(), score);
}

#[test]
fn same_seed_same_arrangement() {
    let source = "# A\n[[A1]]\n[[A2]]\n[[A3]]\n# B\n[[B1]]\n[[B2]]\n# C\n[[C1]]\n[[C2]]*\n";
    let doc = parse_str(source, &ParseOptions::default()).unwrap();

    for seed in [1, 7, 2024] {
        let first = doc.root.render(&mut SeededRandom::new(seed));
        let second = doc.root.render(&mut SeededRandom::new(seed));
        assert_eq!(first, second);
    }
}
