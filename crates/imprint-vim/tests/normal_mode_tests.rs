//! Normal mode integration tests
//!
//! Motions, operators, inserts and dot-repeat driven through the engine
//! against an in-memory buffer.

mod common;

use common::fixtures::{cursor, feed, run, setup};
use imprint_vim::{TextBuffer, VimMode};

// === Motions ===

#[test]
fn test_h_and_l_stop_at_line_edges() {
    let (mut engine, mut host) = run("abc", "lllll");
    assert_eq!(cursor(&host), (1, 3));

    feed(&mut engine, &mut host, "hhhhh");
    assert_eq!(cursor(&host), (1, 1));
}

#[test]
fn test_word_motions() {
    let (mut engine, mut host) = run("foo bar baz", "w");
    assert_eq!(cursor(&host), (1, 5));

    feed(&mut engine, &mut host, "e");
    assert_eq!(cursor(&host), (1, 7));

    feed(&mut engine, &mut host, "b");
    assert_eq!(cursor(&host), (1, 5));

    feed(&mut engine, &mut host, "$");
    assert_eq!(cursor(&host), (1, 11));

    feed(&mut engine, &mut host, "0");
    assert_eq!(cursor(&host), (1, 1));
}

#[test]
fn test_count_before_motion() {
    let (_engine, host) = run("one two three four", "3w");
    assert_eq!(cursor(&host), (1, 15));
}

#[test]
fn test_document_motions() {
    let (mut engine, mut host) = run("a\nb\nc\nd", "G");
    assert_eq!(cursor(&host), (4, 1));

    feed(&mut engine, &mut host, "gg");
    assert_eq!(cursor(&host), (1, 1));

    feed(&mut engine, &mut host, "3G");
    assert_eq!(cursor(&host), (3, 1));
}

#[test]
fn test_vertical_motion_clamps_column() {
    let (_engine, host) = run("long line\nab", "$j");
    assert_eq!(cursor(&host), (2, 2));
}

#[test]
fn test_find_char_repeat() {
    let (mut engine, mut host) = run("a,b,c,d", "f,");
    assert_eq!(cursor(&host), (1, 2));

    feed(&mut engine, &mut host, ";");
    assert_eq!(cursor(&host), (1, 4));

    feed(&mut engine, &mut host, ",");
    assert_eq!(cursor(&host), (1, 2));
}

#[test]
fn test_screen_motions_use_viewport() {
    let (mut engine, mut host) = setup("1\n2\n3\n4\n5\n6\n7\n8\n9");
    host.set_viewport(3, 7);

    feed(&mut engine, &mut host, "H");
    assert_eq!(cursor(&host), (3, 1));

    feed(&mut engine, &mut host, "L");
    assert_eq!(cursor(&host), (7, 1));

    feed(&mut engine, &mut host, "M");
    assert_eq!(cursor(&host), (5, 1));
}

// === Operators ===

#[test]
fn test_delete_word_paste_and_undo() {
    let (mut engine, mut host) = run("foo bar baz", "w");
    assert_eq!(cursor(&host), (1, 5));

    feed(&mut engine, &mut host, "dw");
    assert_eq!(host.text(), "foo baz");
    assert_eq!(cursor(&host), (1, 5));
    assert_eq!(engine.state().registers().unnamed().text, "bar ");

    feed(&mut engine, &mut host, "p");
    assert_eq!(host.text(), "foo bbar az");
    assert_eq!(cursor(&host), (1, 9));

    feed(&mut engine, &mut host, "u");
    assert_eq!(host.text(), "foo baz");

    feed(&mut engine, &mut host, "u");
    assert_eq!(host.text(), "foo bar baz");
}

#[test]
fn test_dw_at_end_of_line_keeps_line_break() {
    let (_engine, host) = run("foo bar\nbaz", "wdw");
    assert_eq!(host.text(), "foo \nbaz");
}

#[test]
fn test_dd_on_single_line_buffer() {
    let (engine, host) = run("only", "dd");
    assert_eq!(host.text(), "");
    let register = engine.state().registers().unnamed();
    assert_eq!(register.text, "only\n");
    assert!(register.linewise);
}

#[test]
fn test_dd_on_multi_line_buffer() {
    let (_engine, host) = run("a\nb\nc", "jdd");
    assert_eq!(host.text(), "a\nc");
    assert_eq!(cursor(&host), (2, 1));

    let (_engine, host) = run("a\nb\nc", "Gdd");
    assert_eq!(host.text(), "a\nb");
    assert_eq!(cursor(&host), (2, 1));

    let (_engine, host) = run("a\nb\nc\nd", "2dd");
    assert_eq!(host.text(), "c\nd");
}

#[test]
fn test_yank_line_and_paste() {
    let (_engine, host) = run("one\ntwo", "yyp");
    assert_eq!(host.text(), "one\none\ntwo");
    assert_eq!(cursor(&host), (2, 1));

    let (_engine, host) = run("one\ntwo", "jyyP");
    assert_eq!(host.text(), "one\ntwo\ntwo");
    assert_eq!(cursor(&host), (2, 1));
}

#[test]
fn test_yank_does_not_modify_buffer() {
    let (engine, host) = run("foo bar", "yw");
    assert_eq!(host.text(), "foo bar");
    assert_eq!(engine.state().registers().get('0').unwrap().text, "foo ");
}

#[test]
fn test_delete_shorthands() {
    let (_engine, host) = run("abc", "x");
    assert_eq!(host.text(), "bc");

    let (_engine, host) = run("abc", "$X");
    assert_eq!(host.text(), "ac");

    let (_engine, host) = run("foo bar", "wD");
    assert_eq!(host.text(), "foo ");
    assert_eq!(cursor(&host), (1, 4));
}

#[test]
fn test_x_on_empty_line_keeps_line_break() {
    let (_engine, host) = run("\nabc", "x");
    assert_eq!(host.text(), "\nabc");

    let (_engine, host) = run("\nabc", "D");
    assert_eq!(host.text(), "\nabc");
}

#[test]
fn test_inclusive_word_end() {
    let (_engine, host) = run("foo bar", "de");
    assert_eq!(host.text(), " bar");
}

#[test]
fn test_inclusive_word_end_backward() {
    let (_engine, host) = run("foo bar", "$dge");
    assert_eq!(host.text(), "fo");
}

#[test]
fn test_counts_multiply() {
    let (_engine, host) = run("a b c d e f g", "2d3w");
    assert_eq!(host.text(), "g");
}

#[test]
fn test_change_word() {
    let (engine, host) = run("foo bar", "cwxyz<Esc>");
    assert_eq!(host.text(), "xyz bar");
    assert_eq!(engine.mode(), VimMode::Normal);
    assert_eq!(cursor(&host), (1, 3));
}

#[test]
fn test_change_line() {
    let (_engine, host) = run("foo\nbar", "ccnew<Esc>");
    assert_eq!(host.text(), "new\nbar");
}

#[test]
fn test_indent_and_dedent() {
    let (mut engine, mut host) = run("foo", ">>");
    assert_eq!(host.text(), "    foo");

    feed(&mut engine, &mut host, "<<");
    assert_eq!(host.text(), "foo");
}

#[test]
fn test_case_operators() {
    let (_engine, host) = run("hello world", "gUiw");
    assert_eq!(host.text(), "HELLO world");

    let (_engine, host) = run("abc", "gUU");
    assert_eq!(host.text(), "ABC");

    let (_engine, host) = run("abc", "~~");
    assert_eq!(host.text(), "ABc");
    assert_eq!(cursor(&host), (1, 3));
}

#[test]
fn test_text_objects() {
    let (_engine, host) = run("f(a, b)", "fadi(");
    assert_eq!(host.text(), "f()");

    let (_engine, host) = run("say \"hi\" now", "fhci\"yo<Esc>");
    assert_eq!(host.text(), "say \"yo\" now");
}

#[test]
fn test_missing_text_object_is_a_no_op() {
    let (engine, host) = run("no brackets", "di(");
    assert_eq!(host.text(), "no brackets");
    assert_eq!(engine.mode(), VimMode::Normal);
    assert!(engine.state().last_edit().is_none());
}

#[test]
fn test_replace_char() {
    let (_engine, host) = run("abc", "rx");
    assert_eq!(host.text(), "xbc");

    let (_engine, host) = run("abc", "2rx");
    assert_eq!(host.text(), "xxc");

    let (_engine, host) = run("abc", "5rx");
    assert_eq!(host.text(), "abc");
}

#[test]
fn test_join_lines() {
    let (_engine, host) = run("foo\n  bar", "J");
    assert_eq!(host.text(), "foo bar");
}

// === Insert and Replace ===

#[test]
fn test_insert_kinds() {
    let (_engine, host) = run("bar", "ifoo <Esc>");
    assert_eq!(host.text(), "foo bar");

    let (_engine, host) = run("bar", "A!<Esc>");
    assert_eq!(host.text(), "bar!");
    assert_eq!(cursor(&host), (1, 4));

    let (_engine, host) = run("a\nb", "ofoo<Esc>");
    assert_eq!(host.text(), "a\nfoo\nb");

    let (_engine, host) = run("a\nb", "Ofoo<Esc>");
    assert_eq!(host.text(), "foo\na\nb");
}

#[test]
fn test_escape_steps_cursor_back() {
    let (engine, host) = run("abc", "A<Esc>");
    assert_eq!(engine.mode(), VimMode::Normal);
    assert_eq!(cursor(&host), (1, 3));
}

#[test]
fn test_counted_insert() {
    let (_engine, host) = run("", "3ia<Esc>");
    assert_eq!(host.text(), "aaa");
    assert_eq!(cursor(&host), (1, 3));

    let (_engine, host) = run("a", "2ox<Esc>");
    assert_eq!(host.text(), "a\nx\nx");
}

#[test]
fn test_replace_mode() {
    let (engine, host) = run("abcd", "Rxy<Esc>");
    assert_eq!(host.text(), "xycd");
    assert_eq!(cursor(&host), (1, 2));
    assert_eq!(engine.mode(), VimMode::Normal);

    let (_engine, host) = run("abc", "lRxyz<Esc>");
    assert_eq!(host.text(), "axyz");
}

#[test]
fn test_replace_char_and_replace_mode_are_distinct() {
    let (engine, host) = run("abc", "rR");
    assert_eq!(host.text(), "Rbc");
    assert_eq!(engine.mode(), VimMode::Normal);

    let (engine, host) = run("abc", "Rr");
    assert_eq!(host.text(), "rbc");
    assert_eq!(engine.mode(), VimMode::Replace);
}

// === Dot Repeat ===

#[test]
fn test_dot_repeats_delete() {
    let (_engine, host) = run("a b c d", "dw.");
    assert_eq!(host.text(), "c d");

    let (_engine, host) = run("abcd", "x..");
    assert_eq!(host.text(), "d");

    let (_engine, host) = run("a\nb\nc", "dd.");
    assert_eq!(host.text(), "c");
}

#[test]
fn test_dot_count_replaces_original() {
    let (_engine, host) = run("one two three four five", "dw2.");
    assert_eq!(host.text(), "four five");
}

#[test]
fn test_dot_repeats_insert() {
    let (_engine, host) = run("a\nb", "A;<Esc>j.");
    assert_eq!(host.text(), "a;\nb;");
}

#[test]
fn test_dot_repeats_change_with_typed_text() {
    let (_engine, host) = run("foo bar", "cwxyz<Esc>w.");
    assert_eq!(host.text(), "xyz xyz");
}

#[test]
fn test_dot_repeats_replace_mode() {
    let (_engine, host) = run("abcd\nabcd", "Rxy<Esc>j0.");
    assert_eq!(host.text(), "xycd\nxycd");
}

#[test]
fn test_yank_is_not_repeatable() {
    let (_engine, host) = run("abc def", "xyw.");
    assert_eq!(host.text(), "c def");
}

// === Undo ===

#[test]
fn test_undo_and_redo() {
    let (mut engine, mut host) = run("abc", "x");
    assert_eq!(host.text(), "bc");

    feed(&mut engine, &mut host, "u");
    assert_eq!(host.text(), "abc");

    feed(&mut engine, &mut host, "<C-r>");
    assert_eq!(host.text(), "bc");
    assert_eq!(host.line_count(), 1);
}
