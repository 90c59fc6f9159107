//! Registers, macros, marks and the jump list

mod common;

use common::fixtures::{cursor, feed, run, setup};
use imprint_vim::{parse_keys, MemoryHost, MessageKind, VimConfig, VimEngine, VimMode};

// === Registers ===

#[test]
fn test_named_register_yank_and_paste() {
    let (engine, host) = run("foo bar", "\"ayw$\"ap");
    assert_eq!(host.text(), "foo barfoo ");
    assert_eq!(engine.state().registers().get('a').unwrap().text, "foo ");
}

#[test]
fn test_uppercase_register_appends() {
    let (engine, _host) = run("foo bar", "\"ayiww\"Ayiw");
    assert_eq!(engine.state().registers().get('a').unwrap().text, "foobar");
}

#[test]
fn test_black_hole_register_keeps_unnamed() {
    let (engine, host) = run("foo bar", "yiww\"_dw");
    assert_eq!(host.text(), "foo ");
    assert_eq!(engine.state().registers().unnamed().text, "foo");
}

#[test]
fn test_small_delete_and_numbered_registers() {
    let (engine, _host) = run("one two\nthree", "dwdd");
    let registers = engine.state().registers();
    assert_eq!(registers.get('-').unwrap().text, "one ");
    assert_eq!(registers.get('1').unwrap().text, "two\n");
}

#[test]
fn test_paste_from_empty_register() {
    let (_engine, host) = run("abc", "\"qp");
    assert_eq!(host.text(), "abc");
    let message = host.last_message().unwrap();
    assert_eq!(message.text, "Nothing in register q");
    assert_eq!(message.kind, MessageKind::Error);
}

#[test]
fn test_counted_paste() {
    let (_engine, host) = run("ab", "yl3p");
    assert_eq!(host.text(), "aaaab");
}

// === Macros ===

#[test]
fn test_record_and_play_macro() {
    let (mut engine, mut host) = run("a\nb\nc", "qaA!<Esc>jq");
    assert_eq!(host.text(), "a!\nb\nc");
    assert!(!engine.state().macros().is_recording());
    assert_eq!(
        engine.state().macros().get('a').unwrap(),
        parse_keys("A!<Esc>j").as_slice()
    );

    feed(&mut engine, &mut host, "@a");
    assert_eq!(host.text(), "a!\nb!\nc");

    feed(&mut engine, &mut host, "@@");
    assert_eq!(host.text(), "a!\nb!\nc!");
}

#[test]
fn test_macro_matches_typed_keys() {
    let keys = "dwjx";
    let (_engine, typed) = run("one two\nthree four", keys);

    let (mut recorder, mut scratch) = setup("one two\nthree four");
    feed(&mut recorder, &mut scratch, &format!("qz{}q", keys));
    assert_eq!(scratch.text(), typed.text());

    let (mut engine, mut host) = setup("one two\nthree four");
    let recorded = recorder.state().macros().get('z').unwrap().to_vec();
    engine.feed_keys(&recorded, &mut host);
    assert_eq!(host.text(), typed.text());
}

#[test]
fn test_macro_with_count() {
    let (mut engine, mut host) = run("1\n2\n3\n4", "qqI-<Esc>jq");
    feed(&mut engine, &mut host, "2@q");
    assert_eq!(host.text(), "-1\n-2\n-3\n4");
}

#[test]
fn test_recording_label() {
    let (mut engine, mut host) = run("abc", "qa");
    assert_eq!(engine.status().recording, Some('a'));
    assert_eq!(engine.status().mode_label, "recording @a");

    feed(&mut engine, &mut host, "i");
    assert_eq!(engine.status().mode_label, "-- INSERT -- recording @a");

    feed(&mut engine, &mut host, "<Esc>q");
    assert_eq!(engine.status().recording, None);
}

#[test]
fn test_play_empty_macro() {
    let (_engine, host) = run("abc", "@x");
    assert_eq!(host.text(), "abc");
    assert_eq!(host.last_message().unwrap().kind, MessageKind::Error);
}

#[test]
fn test_recursive_macro_stops_at_depth_limit() {
    let config = VimConfig {
        max_macro_depth: 4,
        ..VimConfig::default()
    };
    let mut engine = VimEngine::new(config);
    let mut host = MemoryHost::new("abcdefghij");

    // Clear `a`, then record `x@a` so that `a` calls itself.
    engine.feed_keys(&parse_keys("qaqqax@aq"), &mut host);
    assert_eq!(host.text(), "bcdefghij");

    engine.feed_keys(&parse_keys("@a"), &mut host);
    assert_eq!(host.text(), "fghij");
    assert_eq!(engine.mode(), VimMode::Normal);
    let message = host.last_message().unwrap();
    assert_eq!(message.kind, MessageKind::Warning);
    assert_eq!(message.text, "Macro recursion limit (4) reached");
}

// === Marks ===

#[test]
fn test_set_and_jump_to_mark() {
    let (mut engine, mut host) = run("  one\ntwo\nthree", "llmaG");
    assert_eq!(cursor(&host), (3, 1));

    feed(&mut engine, &mut host, "'a");
    assert_eq!(cursor(&host), (1, 3));

    feed(&mut engine, &mut host, "G`a");
    assert_eq!(cursor(&host), (1, 3));
}

#[test]
fn test_previous_context_mark() {
    let (mut engine, mut host) = run("a\nb\nc\nd", "G");
    feed(&mut engine, &mut host, "``");
    assert_eq!(cursor(&host), (1, 1));

    feed(&mut engine, &mut host, "``");
    assert_eq!(cursor(&host), (4, 1));
}

#[test]
fn test_unset_mark() {
    let (_engine, host) = run("abc", "'z");
    assert_eq!(host.last_message().unwrap().text, "Mark not set: z");
}

#[test]
fn test_delete_to_mark() {
    let (_engine, host) = run("a\nb\nc\nd", "majjd'a");
    assert_eq!(host.text(), "d");
}

// === Jump List ===

#[test]
fn test_jump_back_and_forward() {
    let (mut engine, mut host) = run("a\nb\nc\nd\ne", "G");
    assert_eq!(cursor(&host), (5, 1));

    feed(&mut engine, &mut host, "<C-o>");
    assert_eq!(cursor(&host), (1, 1));

    feed(&mut engine, &mut host, "<C-i>");
    assert_eq!(cursor(&host), (5, 1));

    feed(&mut engine, &mut host, "<C-i>");
    assert_eq!(cursor(&host), (5, 1));
}

#[test]
fn test_small_motions_are_not_jumps() {
    let (engine, _host) = run("a\nb\nc", "jjw");
    assert!(engine.state().jump_list().is_empty());
}

#[test]
fn test_jump_list_capacity() {
    let config = VimConfig {
        jump_list_capacity: 2,
        ..VimConfig::default()
    };
    let mut engine = VimEngine::new(config);
    let mut host = MemoryHost::new("1\n2\n3\n4\n5");
    engine.feed_keys(&parse_keys("2G3G4G5G"), &mut host);
    assert_eq!(engine.state().jump_list().len(), 2);
}
